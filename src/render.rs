// src/render.rs
use serde::Serialize;

use crate::dom::{Container, Element};
use crate::navigation::{REGRADE_ID, RegradeControl};
use crate::view::{ErrorNotice, ResultsTable, ResultsView, TableRow};

pub const ERROR_ID: &str = "err";
pub const NO_GRADE_ID: &str = "no-grade";
pub const TOP_LEVEL_ID: &str = "top-level";

/// What a reconcile pass did to the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderKind {
    Error,
    NoGrades,
    Table,
    /// The container already showed this state and was left alone.
    Unchanged,
}

/// Bring `container` in line with `view` by clearing and rebuilding it.
///
/// The "no grades" state is the one exception: if the message is already
/// the container's only child nothing is touched, so repeated empty polls
/// cause no churn.
pub fn reconcile(container: &mut Container, view: &ResultsView) -> RenderKind {
    match view {
        ResultsView::Error(notice) => {
            container.replace_with(error_panel(notice));
            RenderKind::Error
        }
        ResultsView::NoGrades { message } => {
            if container.sole_child_has_id(NO_GRADE_ID) {
                return RenderKind::Unchanged;
            }
            let message = Element::new("p").with_id(NO_GRADE_ID).with_text(message.as_str());
            container.replace_with(message);
            RenderKind::NoGrades
        }
        ResultsView::Table(table) => {
            container.replace_with(results_panel(table));
            RenderKind::Table
        }
    }
}

fn error_panel(notice: &ErrorNotice) -> Element {
    Element::new("h2")
        .with_id(ERROR_ID)
        .with_text(notice.heading.as_str())
        .with_child(Element::new("p").with_text(notice.detail.as_str()))
}

/// The table and the re-grade form side by side. The wrapper must not be a
/// form itself: HTML parsers drop a form nested inside another form.
fn results_panel(table: &ResultsTable) -> Element {
    let head = Element::new("thead").with_class("res-thead").with_children(
        table.header.iter().enumerate().map(|(i, title)| {
            Element::new("th")
                .with_class(if i == 0 { "reslist1" } else { "reslist2" })
                .with_text(title.as_str())
        }),
    );

    let mut body = Element::new("tbody");
    for row in &table.rows {
        body.children.push(match row {
            TableRow::Task(task) => Element::new("tr")
                .with_class("bodypost")
                .with_child(cell("reslist1", &task.label))
                .with_child(cell("reslist2", &task.status))
                .with_child(cell("reslist2", &task.token)),
            TableRow::Notice { text } => spanning_row(text),
        });
    }
    if let Some(summary) = &table.summary {
        body.children.push(spanning_row(summary));
    }

    let results_table = Element::new("table")
        .with_class("res-table")
        .with_child(head)
        .with_child(body);

    Element::new("div").with_id(TOP_LEVEL_ID).with_child(
        Element::new("fieldset")
            .with_child(
                Element::new("legend")
                    .with_attr("align", "center")
                    .with_text(table.legend.as_str()),
            )
            .with_child(results_table)
            .with_child(regrade_form(&table.regrade)),
    )
}

fn cell(class: &str, text: &str) -> Element {
    Element::new("td")
        .with_class(class)
        .with_child(Element::new("label").with_text(text))
}

fn spanning_row(text: &str) -> Element {
    Element::new("tr").with_child(
        Element::new("th")
            .with_class("resspan")
            .with_attr("colspan", "3")
            .with_text(text),
    )
}

fn regrade_form(control: &RegradeControl) -> Element {
    Element::new("form")
        .with_attr("action", control.target.url.as_str())
        .with_attr("method", control.target.method.to_string())
        .with_child(
            Element::new("a").with_id(REGRADE_ID).with_child(
                Element::new("button")
                    .with_class("btn btn-default")
                    .with_text(control.label.as_str()),
            ),
        )
}
