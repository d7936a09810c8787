//! Server dependencies for the reconciliation loop (using traits for testability)
//!
//! Every external service sits behind a trait so tests can swap in doubles.

use std::sync::Arc;

use async_trait::async_trait;
use jboard_client::{Employer, EmployerPage, EmployerUpdate, JBoardClient};

use crate::common::Result;
use crate::kernel::{BaseAI, BaseEmployerDirectory};

// =============================================================================
// JBoardClient Adapter (implements BaseEmployerDirectory trait)
// =============================================================================

/// Wrapper around JBoardClient that implements BaseEmployerDirectory trait
pub struct JBoardAdapter(pub Arc<JBoardClient>);

impl JBoardAdapter {
    pub fn new(client: Arc<JBoardClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseEmployerDirectory for JBoardAdapter {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<EmployerPage> {
        Ok(self.0.fetch_page(page, per_page).await?)
    }

    async fn patch_employer(&self, employer: &Employer, update: &EmployerUpdate) -> Result<()> {
        self.0.patch_employer(employer, update).await?;
        Ok(())
    }

    async fn fetch_all(&self, per_page: u32) -> Result<Vec<Employer>> {
        Ok(self.0.fetch_all(per_page).await?)
    }
}

// =============================================================================
// ServerDeps
// =============================================================================

/// Dependencies shared by every invocation of the loop
#[derive(Clone)]
pub struct ServerDeps {
    pub directory: Arc<dyn BaseEmployerDirectory>,
    pub ai: Arc<dyn BaseAI>,
}

impl ServerDeps {
    pub fn new(directory: Arc<dyn BaseEmployerDirectory>, ai: Arc<dyn BaseAI>) -> Self {
        Self { directory, ai }
    }
}
