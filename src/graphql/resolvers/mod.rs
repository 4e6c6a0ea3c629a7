pub mod mutation;
pub mod query;

pub use mutation::Mutation;
pub use query::Query;

use crate::error::{Result, TodoError};
use crate::metrics::OperationTimer;
use std::future::Future;
use tracing::warn;

/// Nullable `id` arguments still have to be present for lookups by id
fn required_id(id: Option<String>) -> Result<String> {
    id.ok_or_else(|| TodoError::InvalidArgument("argument \"id\" is required".to_string()))
}

/// Time one storage call and record its outcome
async fn observe<T, F>(operation: &'static str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let timer = OperationTimer::start(operation);
    let result = call.await;
    timer.finish(result.is_ok());

    if let Err(e) = &result {
        warn!(operation, error = %e, "Storage call failed");
    }
    result
}
