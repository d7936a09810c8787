//! Builds a reconciler over mock dependencies.

use std::sync::Arc;

use enricher_core::domains::employers::{EmployerReconciler, ReconcileOptions};
use enricher_core::kernel::{MockAI, MockDirectory, RetryPolicy, TestDependencies};

pub struct TestHarness {
    pub deps: TestDependencies,
    pub reconciler: Arc<EmployerReconciler>,
}

impl TestHarness {
    /// Sequential processing, no retries.
    pub fn new(directory: MockDirectory, ai: MockAI) -> Self {
        Self::with_options(
            directory,
            ai,
            ReconcileOptions {
                concurrency: 1,
                retry: RetryPolicy::none(),
            },
        )
    }

    pub fn with_options(directory: MockDirectory, ai: MockAI, options: ReconcileOptions) -> Self {
        let deps = TestDependencies::new(directory, ai);
        let reconciler = Arc::new(EmployerReconciler::new(deps.server_deps(), options));
        Self { deps, reconciler }
    }
}
