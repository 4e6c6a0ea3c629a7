use super::{observe, required_id};
use crate::domain::TodoFilter;
use crate::graphql::schema::GraphQLContext;
use crate::graphql::types::Todo;
use async_graphql::{Context, FieldResult, Object};
use tracing::debug;

/// Root query object for GraphQL
pub struct Query;

#[Object]
impl Query {
    /// List of todos matching every supplied field
    async fn search_todos(
        &self,
        ctx: &Context<'_>,
        id: Option<String>,
        user_id: Option<i32>,
        title: Option<String>,
        completed: Option<bool>,
    ) -> FieldResult<Vec<Todo>> {
        let context = ctx.data::<GraphQLContext>()?;
        let filter = TodoFilter {
            id,
            user_id,
            title,
            completed,
        };
        debug!(?filter, "searchTodos");

        let todos = observe("searchTodos", context.storage.search(&filter)).await?;
        Ok(todos.into_iter().map(|t| t.into()).collect())
    }

    /// Get todo by id
    async fn get_todo(&self, ctx: &Context<'_>, id: Option<String>) -> FieldResult<Option<Todo>> {
        let context = ctx.data::<GraphQLContext>()?;
        let id = required_id(id)?;
        debug!(%id, "getTodo");

        let todo = observe("getTodo", context.storage.get(&id)).await?;
        Ok(todo.map(|t| t.into()))
    }
}
