// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// What to prompt for and how to merge results lives in domains/employers.
//
// Naming convention: Base* for trait names (e.g., BaseAI, BaseEmployerDirectory)

use async_trait::async_trait;
use jboard_client::{Employer, EmployerPage, EmployerUpdate};

use crate::common::Result;

// =============================================================================
// AI Trait (Infrastructure - Generic LLM capabilities)
// =============================================================================

#[async_trait]
pub trait BaseAI: Send + Sync {
    /// Complete a prompt with an LLM (returns raw text of the first reply)
    async fn complete(&self, prompt: &str) -> Result<String>;
}

// =============================================================================
// Employer Directory Trait (Infrastructure - job board records)
// =============================================================================

#[async_trait]
pub trait BaseEmployerDirectory: Send + Sync {
    /// Fetch one page of employers (pages start at 1)
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<EmployerPage>;

    /// Write back the full record with the non-empty update fields applied
    async fn patch_employer(&self, employer: &Employer, update: &EmployerUpdate) -> Result<()>;

    /// Collect every employer across all pages
    async fn fetch_all(&self, per_page: u32) -> Result<Vec<Employer>> {
        let mut employers = Vec::new();
        let mut page = 1;
        loop {
            let data = self.fetch_page(page, per_page).await?;
            let has_more = data.has_more() && !data.items.is_empty();
            employers.extend(data.items);
            if !has_more {
                return Ok(employers);
            }
            page += 1;
        }
    }
}
