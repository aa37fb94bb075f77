// src/ordering.rs
use regex::Regex;
use std::sync::LazyLock;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// The first run of digits in a task id, read as a number.
/// Ids without digits, or whose digits overflow, count as 0.
pub fn task_number(task_id: &str) -> u64 {
    FIRST_NUMBER
        .find(task_id)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Sort task ids numerically by their first embedded number.
/// The sort is stable, so equal numbers keep their incoming order.
pub fn sort_task_ids<'a, I>(ids: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a String>,
{
    let mut sorted: Vec<&str> = ids.into_iter().map(String::as_str).collect();
    sorted.sort_by_key(|id| task_number(id));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_task_number() {
        assert_eq!(task_number("task2"), 2);
        assert_eq!(task_number("q10part3"), 10);
        assert_eq!(task_number("GradingCheck007"), 7);
        assert_eq!(task_number("intro"), 0);
        assert_eq!(task_number("x99999999999999999999999"), 0);
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        let ids = owned(&["task10", "task2", "task1"]);
        assert_eq!(sort_task_ids(&ids), vec!["task1", "task2", "task10"]);
    }

    #[test]
    fn test_ids_without_numbers_sort_first_and_stay_stable() {
        let ids = owned(&["beta", "alpha3", "alpha", "gamma1"]);
        assert_eq!(sort_task_ids(&ids), vec!["beta", "alpha", "gamma1", "alpha3"]);
    }
}
