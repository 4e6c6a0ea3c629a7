use crate::domain::Todo as DomainTodo;
use async_graphql::Object;

/// GraphQL representation of a Todo. Fields are declared nullable on the wire.
#[derive(Clone)]
pub struct Todo {
    pub inner: DomainTodo,
}

impl From<DomainTodo> for Todo {
    fn from(todo: DomainTodo) -> Self {
        Self { inner: todo }
    }
}

#[Object(name = "TodoType")]
impl Todo {
    /// Store-assigned identifier
    async fn id(&self) -> Option<&str> {
        Some(&self.inner.id)
    }

    /// Owner of the todo
    async fn user_id(&self) -> Option<i32> {
        Some(self.inner.user_id)
    }

    async fn title(&self) -> Option<&str> {
        Some(&self.inner.title)
    }

    async fn completed(&self) -> Option<bool> {
        Some(self.inner.completed)
    }
}
