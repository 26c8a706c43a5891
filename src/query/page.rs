use std::collections::HashMap;

use serde::Serialize;

use crate::models::Todo;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Non-numeric, zero or negative values fall back to the defaults.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            page: parse_positive(params.get("page")).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(params.get("limit")).unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn start_index(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn end_index(&self) -> usize {
        self.start_index().saturating_add(self.limit)
    }
}

/// Whole positive integers only: `"2.5"` or `"3abc"` count as malformed.
fn parse_positive(raw: Option<&String>) -> Option<usize> {
    raw.and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|value| *value > 0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPage {
    pub todos: Vec<Todo>,
    pub total_todos: usize,
    pub has_next_page: bool,
    pub next_page: Option<usize>,
}

/// Slices `[start, end)` out of an already filtered and sorted collection.
pub fn paginate(todos: Vec<Todo>, request: PageRequest) -> TodoPage {
    let total_todos = todos.len();
    let end = request.end_index();
    let has_next_page = end < total_todos;
    let todos = todos
        .into_iter()
        .skip(request.start_index())
        .take(request.limit)
        .collect();

    TodoPage {
        todos,
        total_todos,
        has_next_page,
        next_page: has_next_page.then(|| request.page.saturating_add(1)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{DEFAULT_LIMIT, PageRequest, paginate};
    use crate::store::seed_todos;

    fn request(page: &str, limit: &str) -> PageRequest {
        let params: HashMap<String, String> = [
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ]
        .into_iter()
        .collect();
        PageRequest::from_params(&params)
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        assert_eq!(request("abc", "xyz"), PageRequest::default());
        assert_eq!(request("0", "-5"), PageRequest::default());
        assert_eq!(request(" 2 ", "3"), PageRequest { page: 2, limit: 3 });
        assert_eq!(request("2.5", "3abc"), PageRequest::default());
        assert_eq!(PageRequest::from_params(&HashMap::new()).limit, DEFAULT_LIMIT);
    }

    #[test]
    fn middle_page_reports_next() {
        let page = paginate(seed_todos(), PageRequest { page: 1, limit: 2 });
        assert_eq!(page.todos.len(), 2);
        assert_eq!(page.total_todos, 3);
        assert!(page.has_next_page);
        assert_eq!(page.next_page, Some(2));
    }

    #[test]
    fn last_page_has_no_next() {
        let page = paginate(seed_todos(), PageRequest { page: 2, limit: 2 });
        assert_eq!(page.todos.len(), 1);
        assert_eq!(page.todos[0].id, "3");
        assert!(!page.has_next_page);
        assert_eq!(page.next_page, None);
    }

    #[test]
    fn exact_fit_has_no_next() {
        let page = paginate(seed_todos(), PageRequest { page: 1, limit: 3 });
        assert_eq!(page.todos.len(), 3);
        assert!(!page.has_next_page);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = paginate(seed_todos(), PageRequest { page: 9, limit: 10 });
        assert!(page.todos.is_empty());
        assert_eq!(page.total_todos, 3);
        assert!(!page.has_next_page);

        let huge = paginate(seed_todos(), PageRequest { page: usize::MAX, limit: usize::MAX });
        assert!(huge.todos.is_empty());
        assert!(!huge.has_next_page);
    }

    #[test]
    fn serializes_response_shape() {
        let value = serde_json::to_value(paginate(Vec::new(), PageRequest::default())).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "todos": [],
                "totalTodos": 0,
                "hasNextPage": false,
                "nextPage": null
            })
        );
    }
}
