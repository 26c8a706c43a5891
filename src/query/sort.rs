use std::{cmp::Ordering, collections::HashMap};

use serde_json::Value;

use crate::models::Todo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    Priority,
    CreatedAt,
    UpdatedAt,
    DueDate,
    /// Any other field, compared through its JSON value.
    Field(String),
}

impl SortField {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "priority" => SortField::Priority,
            "date" | "createdAt" | "created_at" => SortField::CreatedAt,
            "updatedAt" | "updated_at" => SortField::UpdatedAt,
            "dueDate" | "due_date" => SortField::DueDate,
            "text" => SortField::Field("title".to_string()),
            other => SortField::Field(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    /// Newest first.
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Without `sort`, records are listed by creation time, newest first unless
    /// `order=asc` is given. With `sort`, the order defaults to ascending.
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let order = params.get("order").and_then(|raw| SortOrder::parse(raw));
        match params.get("sort").filter(|raw| !raw.trim().is_empty()) {
            Some(field) => Self {
                field: SortField::parse(field),
                order: order.unwrap_or_default(),
            },
            None => Self {
                order: order.unwrap_or(SortOrder::Desc),
                ..Self::default()
            },
        }
    }

    /// Stable: records with equal keys keep their relative order in both
    /// directions.
    pub fn sort(&self, todos: &mut Vec<Todo>) {
        let order = self.order;
        match &self.field {
            SortField::Priority => {
                todos.sort_by(|a, b| order.apply(a.priority.cmp(&b.priority)));
            }
            SortField::CreatedAt => {
                todos.sort_by(|a, b| order.apply(a.created_at.cmp(&b.created_at)));
            }
            SortField::UpdatedAt => {
                todos.sort_by(|a, b| order.apply(a.updated_at.cmp(&b.updated_at)));
            }
            SortField::DueDate => {
                todos.sort_by(|a, b| {
                    present_first(a.due_date.as_ref(), b.due_date.as_ref(), |a, b| {
                        order.apply(a.cmp(b))
                    })
                });
            }
            SortField::Field(name) => {
                let mut keyed: Vec<(Option<Value>, Todo)> = todos
                    .drain(..)
                    .map(|todo| (field_value(&todo, name), todo))
                    .collect();
                keyed.sort_by(|(a, _), (b, _)| {
                    present_first(a.as_ref(), b.as_ref(), |a, b| order.apply(compare_values(a, b)))
                });
                todos.extend(keyed.into_iter().map(|(_, todo)| todo));
            }
        }
    }
}

fn field_value(todo: &Todo, name: &str) -> Option<Value> {
    match serde_json::to_value(todo) {
        Ok(Value::Object(mut fields)) => fields.remove(name).filter(|value| !value.is_null()),
        _ => None,
    }
}

/// Records without a value sort after the rest in either direction and keep
/// their relative order.
fn present_first<T>(a: Option<&T>, b: Option<&T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numbers, strings and booleans compare within their own kind. Values of
/// different kinds are ranked by kind so the ordering stays total.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .zip(b.as_f64())
            .map(|(a, b)| a.total_cmp(&b))
            .unwrap_or(Ordering::Equal),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

fn kind_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
