// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jboard_client::{Employer, EmployerPage, EmployerUpdate};

use super::{BaseAI, BaseEmployerDirectory, ServerDeps};
use crate::common::{EnrichError, Result};

// =============================================================================
// Mock Employer Directory
// =============================================================================

/// In-memory directory serving fixed pages.
///
/// Patches are applied to a record store so tests can inspect the state
/// after a pass.
pub struct MockDirectory {
    pages: Vec<EmployerPage>,
    records: Mutex<HashMap<String, Employer>>,
    fetch_calls: Mutex<Vec<u32>>,
    patch_calls: Mutex<Vec<Employer>>,
    failing_pages: Mutex<HashMap<u32, EnrichError>>,
    failing_patches: HashSet<String>,
}

impl MockDirectory {
    /// Pages built from item lists; `last_page` is the number of lists.
    pub fn with_pages(pages: Vec<Vec<Employer>>) -> Self {
        let last_page = pages.len().max(1) as u32;
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, items)| EmployerPage {
                per_page: items.len() as u32,
                items,
                current_page: i as u32 + 1,
                last_page,
            })
            .collect();
        Self::with_raw_pages(pages)
    }

    /// Pages with caller-controlled metadata.
    pub fn with_raw_pages(pages: Vec<EmployerPage>) -> Self {
        let records = pages
            .iter()
            .flat_map(|p| p.items.iter())
            .map(|e| (e.id.to_string(), e.clone()))
            .collect();
        Self {
            pages,
            records: Mutex::new(records),
            fetch_calls: Mutex::new(Vec::new()),
            patch_calls: Mutex::new(Vec::new()),
            failing_pages: Mutex::new(HashMap::new()),
            failing_patches: HashSet::new(),
        }
    }

    /// Fail the next fetch of `page` with `error`.
    pub fn failing_page(self, page: u32, error: EnrichError) -> Self {
        self.failing_pages.lock().unwrap().insert(page, error);
        self
    }

    /// Reject every patch for this employer id.
    pub fn failing_patch(mut self, employer_id: &str) -> Self {
        self.failing_patches.insert(employer_id.to_string());
        self
    }

    /// Page numbers requested, in order
    pub fn fetch_calls(&self) -> Vec<u32> {
        self.fetch_calls.lock().unwrap().clone()
    }

    /// Request bodies of every successful patch, in order
    pub fn patch_calls(&self) -> Vec<Employer> {
        self.patch_calls.lock().unwrap().clone()
    }

    /// Current state of a record
    pub fn record(&self, employer_id: &str) -> Option<Employer> {
        self.records.lock().unwrap().get(employer_id).cloned()
    }
}

#[async_trait]
impl BaseEmployerDirectory for MockDirectory {
    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<EmployerPage> {
        self.fetch_calls.lock().unwrap().push(page);

        if let Some(error) = self.failing_pages.lock().unwrap().remove(&page) {
            return Err(error);
        }

        let last_page = self.pages.last().map(|p| p.last_page).unwrap_or(1);
        Ok(page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .cloned()
            .unwrap_or(EmployerPage {
                items: Vec::new(),
                current_page: page,
                last_page,
                per_page,
            }))
    }

    async fn patch_employer(&self, employer: &Employer, update: &EmployerUpdate) -> Result<()> {
        let id = employer.id.to_string();
        if self.failing_patches.contains(&id) {
            return Err(EnrichError::directory(format!("patch rejected for {}", id), false));
        }

        let body = employer.merged_with(update);
        self.patch_calls.lock().unwrap().push(body.clone());
        self.records.lock().unwrap().insert(id, body);
        Ok(())
    }
}

// =============================================================================
// Mock AI
// =============================================================================

/// Timing of one completion call
#[derive(Debug, Clone)]
pub struct AICall {
    pub prompt: String,
    pub started: Instant,
    pub finished: Instant,
}

/// Scripted model: replies are chosen by the employer name in the prompt.
pub struct MockAI {
    responses: HashMap<String, String>,
    default_response: String,
    failing: HashSet<String>,
    transient_failures: AtomicUsize,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<Vec<AICall>>,
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAI {
    /// Replies `{}` (no overrides) unless told otherwise.
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: "{}".to_string(),
            failing: HashSet::new(),
            transient_failures: AtomicUsize::new(0),
            delay: Duration::ZERO,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply for the employer with this name.
    pub fn with_response(mut self, employer_name: &str, response: &str) -> Self {
        self.responses
            .insert(employer_name.to_string(), response.to_string());
        self
    }

    /// Reply for every employer without a specific response.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = response.to_string();
        self
    }

    /// Fail every call about this employer (not retryable).
    pub fn failing_for(mut self, employer_name: &str) -> Self {
        self.failing.insert(employer_name.to_string());
        self
    }

    /// Fail the first `count` calls with a retryable error.
    pub fn with_transient_failures(self, count: usize) -> Self {
        self.transient_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Hold each call open for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// All completed calls, in completion order
    pub fn calls(&self) -> Vec<AICall> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of calls observed in flight at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn employer_name<'a>(prompt: &'a str) -> Option<&'a str> {
        prompt
            .lines()
            .find_map(|line| line.trim().strip_prefix("- Name: "))
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(AICall {
            prompt: prompt.to_string(),
            started,
            finished: Instant::now(),
        });

        let transient = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if transient {
            return Err(EnrichError::oracle("rate limited", true));
        }

        let name = Self::employer_name(prompt).unwrap_or_default();
        if self.failing.contains(name) {
            return Err(EnrichError::oracle(format!("model refused {}", name), false));
        }

        Ok(self
            .responses
            .get(name)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mock directory and AI bundled as ServerDeps, with handles kept for assertions
pub struct TestDependencies {
    pub directory: Arc<MockDirectory>,
    pub ai: Arc<MockAI>,
}

impl TestDependencies {
    pub fn new(directory: MockDirectory, ai: MockAI) -> Self {
        Self {
            directory: Arc::new(directory),
            ai: Arc::new(ai),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(self.directory.clone(), self.ai.clone())
    }
}
