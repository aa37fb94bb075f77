// src/navigation.rs
use serde::Serialize;

use crate::dom::{Container, Element};
use crate::errors::{PollError, Result};

pub const REGRADE_ID: &str = "regrade";
pub const REGRADE_LABEL: &str = "Re-Grade Tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
        }
    }
}

/// A page change requested by a control on the results view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub method: Method,
    pub url: String,
}

/// Something that can carry out a [`Navigation`], like a browser.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &Navigation) -> Result<()>;
}

/// Opens navigation targets in the system's default browser.
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, target: &Navigation) -> Result<()> {
        log::info!("Opening {} {}", target.method, target.url);
        open::that(&target.url).map_err(|source| PollError::Navigation {
            url: target.url.clone(),
            source,
        })
    }
}

/// The "Re-Grade Tasks" control. Activating it leaves the results page for
/// the task list and sends nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegradeControl {
    pub label: String,
    pub target: Navigation,
}

impl RegradeControl {
    pub fn new(tasks_url: impl Into<String>) -> Self {
        Self {
            label: REGRADE_LABEL.to_string(),
            target: Navigation {
                method: Method::Get,
                url: tasks_url.into(),
            },
        }
    }

    pub fn activate(&self, navigator: &dyn Navigator) -> Result<()> {
        navigator.navigate(&self.target)
    }
}

/// Find the re-grade control in a rendered container: the form enclosing
/// the `#regrade` element determines where activation goes.
pub fn regrade_target(container: &Container) -> Option<RegradeControl> {
    container
        .children()
        .iter()
        .find_map(|child| find_in(child, None))
}

fn find_in<'a>(
    element: &'a Element,
    enclosing_form: Option<&'a Element>,
) -> Option<RegradeControl> {
    let form = if element.tag == "form" && element.attr("action").is_some() {
        Some(element)
    } else {
        enclosing_form
    };

    if element.id.as_deref() == Some(REGRADE_ID) {
        let form = form?;
        let method = form.attr("method").unwrap_or("GET");
        if !method.eq_ignore_ascii_case("get") {
            return None;
        }
        return Some(RegradeControl {
            label: element.text_content(),
            target: Navigation {
                method: Method::Get,
                url: form.attr("action")?.to_string(),
            },
        });
    }

    element.children.iter().find_map(|child| find_in(child, form))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recording(Mutex<Vec<Navigation>>);

    impl Navigator for Recording {
        fn navigate(&self, target: &Navigation) -> Result<()> {
            self.0.lock().unwrap().push(target.clone());
            Ok(())
        }
    }

    #[test]
    fn test_activate_navigates_once_to_tasks() {
        let control = RegradeControl::new("/challenge/tasks");
        let navigator = Recording::default();

        control.activate(&navigator).unwrap();

        let seen = navigator.0.lock().unwrap();
        assert_eq!(
            *seen,
            vec![Navigation { method: Method::Get, url: "/challenge/tasks".to_string() }]
        );
    }

    #[test]
    fn test_regrade_target_requires_enclosing_form() {
        let mut container = Container::new("results");
        container.append(Element::new("a").with_id(REGRADE_ID));
        assert_eq!(regrade_target(&container), None);

        container.clear();
        container.append(
            Element::new("form")
                .with_attr("action", "/challenge/tasks")
                .with_attr("method", "GET")
                .with_child(Element::new("a").with_id(REGRADE_ID)),
        );
        assert_eq!(
            regrade_target(&container).map(|c| c.target.url),
            Some("/challenge/tasks".to_string())
        );
    }
}
