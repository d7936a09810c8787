//! Test fixtures for employer records.

use jboard_client::Employer;

/// Employer with a LinkedIn website and no description.
pub fn unenriched_employer(id: i64) -> Employer {
    Employer::new(id, format!("Employer {}", id))
        .with_website(format!("https://www.linkedin.com/company/employer-{}", id))
        .with_description("")
        .with_created_at("2024-05-01 10:00:00")
}

/// `count` unenriched employers with ids starting at `first_id`.
pub fn employer_batch(first_id: i64, count: usize) -> Vec<Employer> {
    (0..count as i64)
        .map(|offset| unenriched_employer(first_id + offset))
        .collect()
}

/// Model reply overriding both fields.
pub fn enrichment_reply(website: &str, description: &str) -> String {
    serde_json::json!({ "website": website, "description": description }).to_string()
}
