pub mod outcome;
pub mod todo;

pub use outcome::{DeleteTodoResult, UpdateTodoResult};
pub use todo::Todo;
