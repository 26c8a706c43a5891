pub mod priority;
pub mod timestamp;
pub mod todo;

pub use priority::Priority;
pub use todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
