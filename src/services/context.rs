use crate::{services::todo_service::TodoService, state::AppState, store::TodoStore};

#[derive(Clone)]
pub struct ServiceContext {
    store: TodoStore,
}

impl ServiceContext {
    pub fn new(store: &TodoStore) -> Self {
        Self {
            store: store.clone(),
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(&state.store)
    }

    pub fn todo(&self) -> TodoService {
        TodoService::new(self.store.clone())
    }
}
