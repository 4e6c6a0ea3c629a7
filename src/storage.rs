use crate::domain::*;
use crate::error::{Result, TodoError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// Storage trait for persisting todos
#[async_trait]
pub trait Storage: Send + Sync {
    /// Todos matching every supplied filter field, ordered by title then id
    async fn search(&self, filter: &TodoFilter) -> Result<Vec<Todo>>;
    async fn get(&self, id: &str) -> Result<Option<Todo>>;
    /// Store a new todo and return it with its assigned id
    async fn insert(&self, todo: NewTodo) -> Result<Todo>;
    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<UpdateOutcome>;
    async fn delete(&self, id: &str) -> Result<DeleteOutcome>;
}

/// In-memory storage implementation for development/testing
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    todos: Arc<Mutex<HashMap<String, Todo>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing todos, keeping their ids
    pub fn with_todos(todos: impl IntoIterator<Item = Todo>) -> Self {
        let map = todos.into_iter().map(|t| (t.id.clone(), t)).collect();
        Self {
            todos: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Todo>>> {
        self.todos
            .lock()
            .map_err(|_| TodoError::storage("in-memory todo map lock poisoned"))
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn search(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let todos = self.lock()?;
        let mut found: Vec<Todo> = todos
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();

        sort_todos(&mut found);
        debug!("Search matched {} todos", found.len());
        Ok(found)
    }

    async fn get(&self, id: &str) -> Result<Option<Todo>> {
        let todos = self.lock()?;
        Ok(todos.get(id).cloned())
    }

    async fn insert(&self, todo: NewTodo) -> Result<Todo> {
        let id = Uuid::new_v4().to_string();
        let todo = todo.into_todo(id.clone());

        let mut todos = self.lock()?;
        todos.insert(id.clone(), todo.clone());

        debug!("Created todo: {} with id {}", todo.title, id);
        Ok(todo)
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<UpdateOutcome> {
        let mut todos = self.lock()?;
        let Some(todo) = todos.get_mut(id) else {
            debug!("Update skipped, no todo with id {}", id);
            return Ok(UpdateOutcome::default());
        };

        let modified = todo.apply(patch);
        debug!("Updated todo {} (modified: {})", id, modified);
        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: i64::from(modified),
        })
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
        let mut todos = self.lock()?;
        let deleted_count = i64::from(todos.remove(id).is_some());

        debug!("Deleted {} todo(s) with id {}", deleted_count, id);
        Ok(DeleteOutcome { deleted_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(user_id: i32, title: &str, completed: bool) -> NewTodo {
        NewTodo {
            user_id,
            title: title.to_string(),
            completed,
        }
    }

    #[tokio::test]
    async fn insert_assigns_unique_ids() {
        let storage = InMemoryStorage::new();
        let a = storage.insert(new_todo(1, "a", false)).await.unwrap();
        let b = storage.insert(new_todo(1, "a", false)).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(Uuid::parse_str(&a.id).is_ok());
        assert_eq!(storage.get(&a.id).await.unwrap(), Some(a));
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn search_applies_filter_and_orders_results() {
        let storage = InMemoryStorage::new();
        storage.insert(new_todo(1, "laundry", true)).await.unwrap();
        storage.insert(new_todo(1, "dishes", false)).await.unwrap();
        storage.insert(new_todo(2, "groceries", false)).await.unwrap();

        let all = storage.search(&TodoFilter::default()).await.unwrap();
        let titles: Vec<_> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["dishes", "groceries", "laundry"]);

        let open_for_user_one = TodoFilter {
            user_id: Some(1),
            completed: Some(false),
            ..Default::default()
        };
        let found = storage.search(&open_for_user_one).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "dishes");
    }

    #[tokio::test]
    async fn update_reports_matched_and_modified() {
        let storage = InMemoryStorage::new();
        let todo = storage.insert(new_todo(1, "call mom", false)).await.unwrap();

        let patch = TodoPatch {
            completed: Some(true),
            ..Default::default()
        };
        let outcome = storage.update(&todo.id, &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched_count: 1, modified_count: 1 });

        // Same patch again changes nothing
        let outcome = storage.update(&todo.id, &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome { matched_count: 1, modified_count: 0 });

        let stored = storage.get(&todo.id).await.unwrap().unwrap();
        assert!(stored.completed);
        assert_eq!(stored.title, "call mom");
    }

    #[tokio::test]
    async fn update_unknown_id_matches_nothing() {
        let storage = InMemoryStorage::new();
        let patch = TodoPatch {
            title: Some("x".to_string()),
            ..Default::default()
        };
        let outcome = storage.update("nope", &patch).await.unwrap();
        assert_eq!(outcome, UpdateOutcome::default());
    }

    #[tokio::test]
    async fn delete_removes_once() {
        let storage = InMemoryStorage::new();
        let todo = storage.insert(new_todo(3, "taxes", false)).await.unwrap();

        assert_eq!(storage.delete(&todo.id).await.unwrap().deleted_count, 1);
        assert_eq!(storage.delete(&todo.id).await.unwrap().deleted_count, 0);
        assert_eq!(storage.get(&todo.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn seeded_store_keeps_ids() {
        let storage = InMemoryStorage::with_todos(vec![Todo {
            id: "fixed".to_string(),
            user_id: 9,
            title: "seeded".to_string(),
            completed: true,
        }]);
        let todo = storage.get("fixed").await.unwrap().unwrap();
        assert_eq!(todo.user_id, 9);
    }
}
