//! Reconciliation loop: walk every directory page and enrich each employer.
//!
//! Pages are processed strictly in order. Within a page, employers are
//! enriched with at most `concurrency` calls in flight and their outcomes are
//! collected in page order. A failing employer never aborts the page; a
//! failing page fetch aborts the pass.

use futures::stream::{self, StreamExt};
use jboard_client::Employer;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{enrich, extract};
use crate::common::{EnrichError, Result};
use crate::kernel::{RetryPolicy, ServerDeps};

/// Tuning for a pass.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    /// Maximum employers enriched at the same time within a page
    pub concurrency: usize,
    pub retry: RetryPolicy,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            retry: RetryPolicy::default(),
        }
    }
}

/// What happened to a single employer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// A patch was sent (even if it changed nothing)
    Patched,
    /// The model reply had no usable JSON; record left as is
    Skipped,
    /// Oracle or patch call failed after retries
    Failed(String),
}

/// Result of one `process_page` call.
#[derive(Debug, Clone)]
pub struct PageReport {
    pub page: u32,
    pub has_more: bool,
    pub outcomes: Vec<ItemOutcome>,
}

/// Counters for a whole pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassSummary {
    pub pages: u32,
    pub employers: usize,
    pub patched: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl PassSummary {
    fn record(&mut self, report: &PageReport) {
        self.pages += 1;
        self.employers += report.outcomes.len();
        for outcome in &report.outcomes {
            match outcome {
                ItemOutcome::Patched => self.patched += 1,
                ItemOutcome::Skipped => self.skipped += 1,
                ItemOutcome::Failed(_) => self.failed += 1,
            }
        }
    }
}

pub struct EmployerReconciler {
    deps: ServerDeps,
    options: ReconcileOptions,
}

impl EmployerReconciler {
    pub fn new(deps: ServerDeps, options: ReconcileOptions) -> Self {
        Self { deps, options }
    }

    pub fn deps(&self) -> &ServerDeps {
        &self.deps
    }

    /// Run a full pass starting at page 1 until the directory is exhausted.
    ///
    /// There is no cap on the number of pages beyond what the directory
    /// reports as its last page.
    pub async fn run_to_completion(&self, page_size: u32) -> Result<PassSummary> {
        if page_size == 0 {
            return Err(EnrichError::InvalidRequest("page size must be positive".into()));
        }

        info!(page_size, concurrency = self.options.concurrency, "Starting employer enrichment pass");

        let mut summary = PassSummary::default();
        let mut page = 1;
        loop {
            let report = self.process_page(page, page_size).await?;
            summary.record(&report);
            if !report.has_more {
                break;
            }
            page += 1;
        }

        info!(
            pages = summary.pages,
            employers = summary.employers,
            patched = summary.patched,
            skipped = summary.skipped,
            failed = summary.failed,
            "Employer enrichment pass complete"
        );

        Ok(summary)
    }

    /// Fetch one page and enrich every employer on it.
    ///
    /// An empty page is terminal regardless of the reported last page.
    pub async fn process_page(&self, page: u32, page_size: u32) -> Result<PageReport> {
        let directory = self.deps.directory.as_ref();
        let data = self
            .options
            .retry
            .run("fetch_page", || directory.fetch_page(page, page_size))
            .await
            .map_err(|e| {
                warn!(page, error = %e, "Failed to fetch employer page");
                e
            })?;

        if data.items.is_empty() {
            debug!(page, "Empty employer page, stopping");
            return Ok(PageReport {
                page,
                has_more: false,
                outcomes: Vec::new(),
            });
        }

        debug!(
            page,
            last_page = data.last_page,
            count = data.items.len(),
            "Enriching employer page"
        );

        let futures: Vec<_> = data
            .items
            .iter()
            .map(|employer| self.enrich_employer(employer))
            .collect();
        let outcomes: Vec<ItemOutcome> = stream::iter(futures)
            .buffered(self.options.concurrency.max(1))
            .collect()
            .await;

        Ok(PageReport {
            page,
            has_more: data.has_more(),
            outcomes,
        })
    }

    /// Oracle → extract → patch for one employer. Never fails.
    pub async fn enrich_employer(&self, employer: &Employer) -> ItemOutcome {
        let retry = self.options.retry;
        let ai = self.deps.ai.as_ref();

        let raw = match retry.run("enrich", || enrich(ai, employer)).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(employer_id = %employer.id, name = %employer.name(), error = %e, "Enrichment call failed");
                return ItemOutcome::Failed(e.to_string());
            }
        };

        let update = match extract(&raw).ok_or(EnrichError::UnrecoverableExtraction) {
            Ok(update) => update,
            Err(e) => {
                warn!(
                    employer_id = %employer.id,
                    response_preview = %preview(&raw),
                    error = %e,
                    "Skipping employer"
                );
                return ItemOutcome::Skipped;
            }
        };

        let directory = self.deps.directory.as_ref();
        match retry
            .run("patch_employer", || directory.patch_employer(employer, &update))
            .await
        {
            Ok(()) => {
                info!(
                    employer_id = %employer.id,
                    website_changed = update.website.as_deref().is_some_and(|w| !w.trim().is_empty()),
                    description_changed = update.description.as_deref().is_some_and(|d| !d.trim().is_empty()),
                    "Employer patched"
                );
                ItemOutcome::Patched
            }
            Err(e) => {
                warn!(employer_id = %employer.id, error = %e, "Failed to patch employer");
                ItemOutcome::Failed(e.to_string())
            }
        }
    }
}

fn preview(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
