use super::{observe, required_id};
use crate::domain::{NewTodo, TodoPatch};
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::{DeleteTodoResult, Todo, UpdateTodoResult};
use async_graphql::{Context, FieldResult, Object};
use tracing::info;

/// Root mutation object for GraphQL
pub struct Mutation;

#[Object]
impl Mutation {
    /// Insert todo item
    async fn insert_todo(
        &self,
        ctx: &Context<'_>,
        user_id: i32,
        title: String,
        completed: bool,
    ) -> FieldResult<Option<Todo>> {
        let context = ctx.data::<GraphQLContext>()?;
        let new_todo = NewTodo {
            user_id,
            title,
            completed,
        };

        let todo = observe("insertTodo", context.storage.insert(new_todo)).await?;
        info!("Inserted todo {} for user {}", todo.id, todo.user_id);
        Ok(Some(todo.into()))
    }

    /// Update todo by id. Omitted fields keep their stored values.
    async fn update_todo(
        &self,
        ctx: &Context<'_>,
        id: String,
        user_id: Option<i32>,
        title: Option<String>,
        completed: Option<bool>,
    ) -> FieldResult<Option<UpdateTodoResult>> {
        let context = ctx.data::<GraphQLContext>()?;
        let patch = TodoPatch {
            user_id,
            title,
            completed,
        };

        let outcome = observe("updateTodo", context.storage.update(&id, &patch)).await?;
        info!(
            "Updated todo {}: matched {}, modified {}",
            id, outcome.matched_count, outcome.modified_count
        );
        Ok(Some(outcome.into()))
    }

    /// Delete todo by id
    async fn delete_todo(
        &self,
        ctx: &Context<'_>,
        id: Option<String>,
    ) -> FieldResult<Option<DeleteTodoResult>> {
        let context = ctx.data::<GraphQLContext>()?;
        let id = required_id(id)?;

        let outcome = observe("deleteTodo", context.storage.delete(&id)).await?;
        info!("Deleted {} todo(s) with id {}", outcome.deleted_count, id);
        Ok(Some(outcome.into()))
    }
}
