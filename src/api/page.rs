// src/api/page.rs
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use std::time::Duration;

use crate::dom::{Container, escape};

const RESULTS_TEMPLATE: &str = include_str!("../../templates/results.html");
pub const PAGE_TITLE: &str = "Challenge Results";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"));

/// Render the hosting page around the container's current contents.
/// The page reloads itself once per poll interval.
pub fn render_page(container: &Container, interval: Duration) -> String {
    let refresh_secs = interval.as_secs().max(1).to_string();
    let title = escape(PAGE_TITLE);
    let results = container.outer_html();

    let values: HashMap<&str, &str> = HashMap::from([
        ("refresh_secs", refresh_secs.as_str()),
        ("title", title.as_str()),
        ("results", results.as_str()),
    ]);
    render_template(RESULTS_TEMPLATE, &values)
}

/// Substitute `{{key}}` placeholders. Unknown keys are left as written.
fn render_template(template: &str, values: &HashMap<&str, &str>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            values
                .get(&caps[1])
                .map(|v| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    #[test]
    fn test_render_template_keeps_unknown_placeholders() {
        let values = HashMap::from([("name", "world")]);
        assert_eq!(
            render_template("hello {{ name }}, {{missing}}", &values),
            "hello world, {{missing}}"
        );
    }

    #[test]
    fn test_page_embeds_container() {
        let mut container = Container::new("results");
        container.append(Element::new("p").with_id("no-grade").with_text("No grades yet."));

        let html = render_page(&container, Duration::from_millis(500));

        assert!(html.contains("<div id=\"results\"><p id=\"no-grade\">No grades yet.</p></div>"));
        assert!(html.contains("content=\"1\""));
        assert!(!html.contains("{{"));
    }
}
