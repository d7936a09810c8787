//! Employer enrichment domain.
//!
//! ```text
//! run_to_completion(page_size)
//!     │
//!     └─► process_page(n) ──► fetch page n
//!             └─► For each employer (bounded concurrency)
//!                     └─► prompt ─► BaseAI ─► extract ─► patch
//! ```

pub mod enrichment;
pub mod extraction;
pub mod reconcile;

pub use enrichment::{enrich, enrichment_prompt};
pub use extraction::extract;
pub use reconcile::{EmployerReconciler, ItemOutcome, PageReport, PassSummary, ReconcileOptions};
