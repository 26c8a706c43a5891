use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{Priority, Todo, timestamp::parse_timestamp};

/// Sentinel accepted by `priority` meaning "do not filter".
pub const ALL_PRIORITIES: &str = "ALL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gte,
    Lte,
}

/// One predicate of a list request. A record is kept only when every filter
/// of the request matches it.
#[derive(Debug, Clone, PartialEq)]
pub enum TodoFilter {
    Completed(bool),
    Priority(Priority),
    /// Lowercased needle matched against the lowercased title.
    Search(String),
    CreatedAt {
        op: CompareOp,
        bound: DateTime<Utc>,
    },
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        match self {
            TodoFilter::Completed(completed) => todo.completed == *completed,
            TodoFilter::Priority(priority) => todo.priority == *priority,
            TodoFilter::Search(needle) => todo.title.to_lowercase().contains(needle.as_str()),
            TodoFilter::CreatedAt { op, bound } => match op {
                CompareOp::Gte => todo.created_at >= *bound,
                CompareOp::Lte => todo.created_at <= *bound,
            },
        }
    }
}

/// Builds the filter set from raw query parameters. Values that cannot be
/// interpreted disable their filter instead of failing the request.
pub fn parse_filters(params: &HashMap<String, String>) -> Vec<TodoFilter> {
    let mut filters = Vec::new();

    if let Some(completed) = params.get("completed").and_then(|raw| parse_bool(raw)) {
        filters.push(TodoFilter::Completed(completed));
    }

    if let Some(priority) = params.get("priority").and_then(|raw| parse_priority(raw)) {
        filters.push(TodoFilter::Priority(priority));
    }

    if let Some(search) = params.get("search").filter(|raw| !raw.is_empty()) {
        filters.push(TodoFilter::Search(search.to_lowercase()));
    }

    for (key, op) in [("dateGte", CompareOp::Gte), ("dateLte", CompareOp::Lte)] {
        if let Some(bound) = params.get(key).and_then(|raw| parse_timestamp(raw)) {
            filters.push(TodoFilter::CreatedAt { op, bound });
        }
    }

    filters
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn parse_priority(raw: &str) -> Option<Priority> {
    if raw.trim().eq_ignore_ascii_case(ALL_PRIORITIES) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};

    use super::{CompareOp, TodoFilter, parse_filters};
    use crate::models::Priority;

    fn params(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn ignores_unrecognized_values() {
        let filters = parse_filters(&params(&[
            ("completed", "yes"),
            ("priority", "urgent"),
            ("search", ""),
            ("dateGte", "last tuesday"),
        ]));
        assert!(filters.is_empty());
    }

    #[test]
    fn all_priority_disables_filter() {
        assert!(parse_filters(&params(&[("priority", "ALL")])).is_empty());
        assert!(parse_filters(&params(&[("priority", "all")])).is_empty());
    }

    #[test]
    fn parses_every_supported_option() {
        let filters = parse_filters(&params(&[
            ("completed", "false"),
            ("priority", "high"),
            ("search", "React"),
            ("dateGte", "2024-01-02"),
            ("dateLte", "2024-01-03T12:00:00Z"),
        ]));

        assert_eq!(
            filters,
            vec![
                TodoFilter::Completed(false),
                TodoFilter::Priority(Priority::High),
                TodoFilter::Search("react".to_string()),
                TodoFilter::CreatedAt {
                    op: CompareOp::Gte,
                    bound: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
                },
                TodoFilter::CreatedAt {
                    op: CompareOp::Lte,
                    bound: Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap(),
                },
            ]
        );
    }
}
