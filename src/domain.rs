/// A persisted todo item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    pub id: String,
    pub user_id: i32,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Apply the supplied fields of a patch, returning whether anything changed.
    pub fn apply(&mut self, patch: &TodoPatch) -> bool {
        let mut changed = false;

        if let Some(user_id) = patch.user_id {
            if self.user_id != user_id {
                self.user_id = user_id;
                changed = true;
            }
        }
        if let Some(title) = &patch.title {
            if &self.title != title {
                self.title = title.clone();
                changed = true;
            }
        }
        if let Some(completed) = patch.completed {
            if self.completed != completed {
                self.completed = completed;
                changed = true;
            }
        }

        changed
    }
}

/// Fields required to create a todo; the store assigns the id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub user_id: i32,
    pub title: String,
    pub completed: bool,
}

impl NewTodo {
    pub fn into_todo(self, id: String) -> Todo {
        Todo {
            id,
            user_id: self.user_id,
            title: self.title,
            completed: self.completed,
        }
    }
}

/// Partial update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Equality filter used by search. Every supplied field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoFilter {
    pub id: Option<String>,
    pub user_id: Option<i32>,
    pub title: Option<String>,
    pub completed: Option<bool>,
}

impl TodoFilter {
    pub fn matches(&self, todo: &Todo) -> bool {
        self.id.as_ref().map_or(true, |id| &todo.id == id)
            && self.user_id.map_or(true, |user_id| todo.user_id == user_id)
            && self.title.as_ref().map_or(true, |title| &todo.title == title)
            && self.completed.map_or(true, |completed| todo.completed == completed)
    }
}

/// Result of an update by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Number of todos whose id matched (0 or 1)
    pub matched_count: i64,
    /// Number of todos whose stored fields actually changed
    pub modified_count: i64,
}

/// Result of a delete by id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: i64,
}

/// Search results come back ordered by title, then id.
pub fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
}
