//! List query engine: filter, then sort, then paginate.

pub mod filter;
pub mod page;
pub mod sort;

use std::collections::HashMap;

use crate::models::Todo;

pub use filter::{ALL_PRIORITIES, CompareOp, TodoFilter, parse_filters};
pub use page::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest, TodoPage, paginate};
pub use sort::{SortField, SortOrder, SortSpec};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub filters: Vec<TodoFilter>,
    pub sort: SortSpec,
    pub page: PageRequest,
}

impl ListQuery {
    /// Unknown parameters are ignored and malformed values disable the option
    /// they belong to, so building a query never fails.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            filters: parse_filters(params),
            sort: SortSpec::from_params(params),
            page: PageRequest::from_params(params),
        }
    }

    pub fn matches(&self, todo: &Todo) -> bool {
        self.filters.iter().all(|filter| filter.matches(todo))
    }

    pub fn run(&self, todos: Vec<Todo>) -> TodoPage {
        let mut matching: Vec<Todo> = todos.into_iter().filter(|todo| self.matches(todo)).collect();
        self.sort.sort(&mut matching);
        paginate(matching, self.page)
    }
}
