pub mod identity;
pub mod task;

pub use identity::{Identity, NewIdentity, PublicIdentity, Role};
pub use task::{Task, TaskInput, TaskPriority, TaskStatus};
