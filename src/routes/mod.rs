mod entry;
pub mod extract;
pub mod root;
pub mod route_list;
pub mod todos;

pub use entry::{API_PREFIX, app, router};
