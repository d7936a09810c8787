//! Pure JBoard REST API client.
//!
//! A minimal client for the employer endpoints of a JBoard job board:
//! paginated listing and partial updates.
//!
//! # Example
//!
//! ```rust,ignore
//! use jboard_client::{JBoardClient, EmployerUpdate};
//!
//! let client = JBoardClient::new("https://board.example/api/v1", "api-key")?;
//!
//! let page = client.fetch_page(1, 15).await?;
//! for employer in &page.items {
//!     let update = EmployerUpdate {
//!         website: Some("https://acme.com".into()),
//!         description: None,
//!     };
//!     client.patch_employer(employer, &update).await?;
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{JBoardError, Result};
pub use types::{Employer, EmployerId, EmployerPage, EmployerUpdate};

use std::time::Duration;

use serde_json::Value;
use types::EmployerPageRaw;

/// Default per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct JBoardClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl JBoardClient {
    /// Fails with [`JBoardError::Network`] when the HTTP client cannot be
    /// built with its request timeout.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of employers.
    ///
    /// Fails with [`JBoardError::MalformedResponse`] when the payload has no
    /// `items` array.
    pub async fn fetch_page(&self, page: u32, per_page: u32) -> Result<EmployerPage> {
        if page == 0 {
            return Err(JBoardError::InvalidRequest("page numbers start at 1".into()));
        }
        if per_page == 0 {
            return Err(JBoardError::InvalidRequest("per_page must be positive".into()));
        }

        let url = format!("{}/employers", self.base_url);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(JBoardError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: Value = resp
            .json()
            .await
            .map_err(|e| JBoardError::MalformedResponse(format!("invalid JSON: {}", e)))?;
        let page_data = parse_page(payload)?.into_page(page, per_page);

        tracing::debug!(
            page = page_data.current_page,
            last_page = page_data.last_page,
            count = page_data.items.len(),
            "Fetched employer page"
        );

        Ok(page_data)
    }

    /// Send the full record with `update` applied.
    ///
    /// Returns the record the directory sends back, or the merged record when
    /// the response body is not an employer.
    pub async fn patch_employer(
        &self,
        employer: &Employer,
        update: &EmployerUpdate,
    ) -> Result<Employer> {
        let id = employer.id.to_string();
        if id.is_empty() {
            return Err(JBoardError::InvalidRequest("employer id is empty".into()));
        }

        let body = employer.merged_with(update);
        let url = format!("{}/employers/{}", self.base_url, id);
        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(JBoardError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<Employer>(&text) {
            Ok(updated) => Ok(updated),
            Err(_) => {
                tracing::debug!(employer_id = %id, "Patch response was not an employer record");
                Ok(body)
            }
        }
    }

    /// Walk every page and collect all employers.
    pub async fn fetch_all(&self, per_page: u32) -> Result<Vec<Employer>> {
        let mut employers = Vec::new();
        let mut page = 1;

        loop {
            let data = self.fetch_page(page, per_page).await?;
            let has_more = data.has_more() && !data.items.is_empty();
            employers.extend(data.items);
            if !has_more {
                break;
            }
            page += 1;
        }

        tracing::info!(count = employers.len(), pages = page, "Fetched all employers");
        Ok(employers)
    }
}

/// Validate the list payload shape before deserializing it.
fn parse_page(payload: Value) -> Result<EmployerPageRaw> {
    match payload.get("items") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(JBoardError::MalformedResponse(
                "`items` is not an array".into(),
            ))
        }
        None => {
            return Err(JBoardError::MalformedResponse(
                "response has no `items` field".into(),
            ))
        }
    }

    serde_json::from_value(payload)
        .map_err(|e| JBoardError::MalformedResponse(format!("unexpected employer list: {}", e)))
}
