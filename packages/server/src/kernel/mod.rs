//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod openai;
pub mod retry;
pub mod scheduled_tasks;
pub mod test_dependencies;
pub mod traits;

pub use deps::{JBoardAdapter, ServerDeps};
pub use openai::{OpenAIClient, GPT_4O};
pub use retry::RetryPolicy;
pub use scheduled_tasks::{start_scheduler, EnrichmentSchedule};
pub use test_dependencies::{MockAI, MockDirectory, TestDependencies};
pub use traits::*;
