use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RouteInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: "/api/todos",
        description: "List todos with filtering and pagination",
    },
    RouteInfo {
        method: "POST",
        path: "/api/todos",
        description: "Create new todo",
    },
    RouteInfo {
        method: "GET",
        path: "/api/todos/{id}",
        description: "Get single todo",
    },
    RouteInfo {
        method: "PUT",
        path: "/api/todos/{id}",
        description: "Update todo",
    },
    RouteInfo {
        method: "DELETE",
        path: "/api/todos/{id}",
        description: "Delete todo",
    },
];

pub fn routes() -> &'static [RouteInfo] {
    ROUTES
}
