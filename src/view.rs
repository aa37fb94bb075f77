// src/view.rs
use serde::Serialize;

use crate::models::{GradingMode, ResultsResponse};
use crate::navigation::RegradeControl;
use crate::ordering::sort_task_ids;

pub const ERROR_HEADING: &str = "There was an error grading your challenge";
pub const ERROR_DETAIL: &str =
    "The grading error has been logged. If the error is not resolved by re-grading, please contact support.";
pub const NO_GRADES_MESSAGE: &str = "No grades yet. Grades will show after grading occurs.";
pub const LEGEND: &str = "Grading Results";
pub const HEADER: [&str; 3] = ["Task", "Status", "Result"];

/// Where the view's controls lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub tasks_url: String,
}

impl Endpoints {
    pub fn new(tasks_url: impl Into<String>) -> Self {
        Self { tasks_url: tasks_url.into() }
    }
}

/// What the results container should show for one server snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultsView {
    Error(ErrorNotice),
    NoGrades { message: String },
    Table(ResultsTable),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorNotice {
    pub heading: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsTable {
    pub legend: String,
    pub header: [String; 3],
    pub rows: Vec<TableRow>,
    pub summary: Option<String>,
    pub regrade: RegradeControl,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum TableRow {
    Task(TaskRow),
    /// A full-width line, used when an enabled mode has no results yet.
    Notice { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    pub mode: GradingMode,
    pub task_id: String,
    pub label: String,
    pub status: String,
    pub token: String,
}

impl ResultsTable {
    pub fn task_rows(&self) -> impl Iterator<Item = &TaskRow> {
        self.rows.iter().filter_map(|row| match row {
            TableRow::Task(task) => Some(task),
            TableRow::Notice { .. } => None,
        })
    }
}

/// Compute the view for a snapshot. Pure: the same response always yields
/// the same view.
pub fn build_view(res: &ResultsResponse, endpoints: &Endpoints) -> ResultsView {
    if res.fatal_error {
        return ResultsView::Error(ErrorNotice {
            heading: ERROR_HEADING.to_string(),
            detail: ERROR_DETAIL.to_string(),
        });
    }

    if res.has_no_results() {
        return ResultsView::NoGrades {
            message: NO_GRADES_MESSAGE.to_string(),
        };
    }

    let mut rows = Vec::new();
    for mode in [GradingMode::Manual, GradingMode::Cron] {
        if !res.enabled(mode) {
            continue;
        }
        match res.results(mode) {
            Some(results) => {
                for task_id in sort_task_ids(results.keys()) {
                    rows.push(TableRow::Task(TaskRow {
                        mode,
                        task_id: task_id.to_string(),
                        label: res.label(task_id).to_string(),
                        status: results[task_id].clone(),
                        token: res.token(mode, task_id).to_string(),
                    }));
                }
            }
            None => rows.push(TableRow::Notice {
                text: format!("No {} grades yet.", mode),
            }),
        }
    }

    ResultsView::Table(ResultsTable {
        legend: LEGEND.to_string(),
        header: HEADER.map(String::from),
        rows,
        summary: summary_line(res),
        regrade: RegradeControl::new(endpoints.tasks_url.clone()),
    })
}

/// Manual submissions take precedence over the last cron run.
fn summary_line(res: &ResultsResponse) -> Option<String> {
    if res.manual_enabled {
        if let Some(time) = res.submit_time(GradingMode::Manual) {
            return Some(format!("Last Submission of manual tasks: {}", time));
        }
    }
    if res.cron_enabled {
        if let Some(time) = res.submit_time(GradingMode::Cron) {
            return Some(format!("Auto-grading last triggered at: {}", time));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoints() -> Endpoints {
        Endpoints::new("/challenge/tasks")
    }

    fn response(body: serde_json::Value) -> ResultsResponse {
        serde_json::from_value(body).unwrap()
    }

    fn table(view: ResultsView) -> ResultsTable {
        match view {
            ResultsView::Table(table) => table,
            other => panic!("expected a table, got {:?}", other),
        }
    }

    #[test]
    fn test_fatal_error_wins_over_results() {
        let res = response(json!({
            "fatal_error": true,
            "manual_enabled": true,
            "manual_results": {"q1": "Success"}
        }));
        assert!(matches!(build_view(&res, &endpoints()), ResultsView::Error(_)));
    }

    #[test]
    fn test_no_results_at_all() {
        let res = response(json!({"manual_enabled": true, "cron_enabled": true}));
        assert_eq!(
            build_view(&res, &endpoints()),
            ResultsView::NoGrades { message: NO_GRADES_MESSAGE.to_string() }
        );
    }

    #[test]
    fn test_manual_rows_sorted_numerically() {
        let res = response(json!({
            "manual_enabled": true,
            "manual_results": {"task2": "Pass", "task10": "Fail"},
            "grading_parts": {"task2": {"text": "Two"}, "task10": {"text": "Ten"}},
            "tokens": {"manual": {"task2": "tok-2"}}
        }));
        let table = table(build_view(&res, &endpoints()));
        let rows: Vec<_> = table.task_rows().collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].task_id, "task2");
        assert_eq!(rows[0].label, "Two");
        assert_eq!(rows[0].token, "tok-2");
        assert_eq!(rows[1].task_id, "task10");
        assert_eq!(rows[1].status, "Fail");
        assert_eq!(rows[1].token, "");
    }

    #[test]
    fn test_disabled_cron_contributes_nothing() {
        let res = response(json!({
            "manual_enabled": true,
            "cron_enabled": false,
            "manual_results": {"m1": "Success"},
            "cron_results": {"c1": "Success"}
        }));
        let table = table(build_view(&res, &endpoints()));
        assert!(table.task_rows().all(|row| row.mode == GradingMode::Manual));
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_manual_rows_precede_cron_rows() {
        let res = response(json!({
            "manual_enabled": true,
            "cron_enabled": true,
            "manual_results": {"q9": "Success"},
            "cron_results": {"q1": "Failure"}
        }));
        let table = table(build_view(&res, &endpoints()));
        let modes: Vec<_> = table.task_rows().map(|r| r.mode).collect();
        assert_eq!(modes, vec![GradingMode::Manual, GradingMode::Cron]);
    }

    #[test]
    fn test_enabled_mode_without_results_gets_notice_row() {
        let res = response(json!({
            "manual_enabled": true,
            "cron_enabled": true,
            "manual_results": null,
            "cron_results": {"c1": "Success"}
        }));
        let table = table(build_view(&res, &endpoints()));
        assert_eq!(
            table.rows[0],
            TableRow::Notice { text: "No manual grades yet.".to_string() }
        );
    }

    #[test]
    fn test_summary_prefers_manual_timestamp() {
        let res = response(json!({
            "manual_enabled": true,
            "cron_enabled": true,
            "manual_results": {},
            "cron_results": {},
            "manual_submit_time": "05/06/2024 12:00:00",
            "cron_submit_time": "05/06/2024 12:05:00"
        }));
        let table = table(build_view(&res, &endpoints()));
        assert_eq!(
            table.summary.as_deref(),
            Some("Last Submission of manual tasks: 05/06/2024 12:00:00")
        );
    }

    #[test]
    fn test_summary_falls_back_to_cron_when_manual_unset() {
        let res = response(json!({
            "manual_enabled": true,
            "cron_enabled": true,
            "cron_results": {"c1": "Success"},
            "manual_submit_time": "01/01/1900 00:00:00",
            "cron_submit_time": "05/06/2024 12:05:00"
        }));
        let table = table(build_view(&res, &endpoints()));
        assert_eq!(
            table.summary.as_deref(),
            Some("Auto-grading last triggered at: 05/06/2024 12:05:00")
        );
    }

    #[test]
    fn test_no_summary_without_timestamps() {
        let res = response(json!({
            "cron_enabled": true,
            "cron_results": {"c1": "Success"}
        }));
        assert_eq!(table(build_view(&res, &endpoints())).summary, None);
    }

    #[test]
    fn test_regrade_points_at_tasks() {
        let res = response(json!({"cron_enabled": true, "cron_results": {}}));
        let table = table(build_view(&res, &endpoints()));
        assert_eq!(table.regrade.target.url, "/challenge/tasks");
    }
}
