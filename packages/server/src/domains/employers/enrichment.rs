//! Enrichment prompt and oracle call.

use jboard_client::Employer;

use crate::common::Result;
use crate::kernel::BaseAI;

/// Build the instruction that asks the model to repair one employer.
pub fn enrichment_prompt(employer: &Employer) -> String {
    format!(
        r#"Please respond with a JSON object that includes updated fields for "website" and "description" for the following employer.

Employer:
- Name: {name}
- Current Website: {website}
- Description: {description}

INSTRUCTIONS:
1. **website**: Find the employer's real company domain (their own corporate site).
   - DO NOT return a LinkedIn profile, Glassdoor page, Indeed page, Crunchbase entry or any other third-party profile link
   - If the current website is already the company's own domain, return it unchanged
2. **description**: If the current description is empty, write a professional summary of the company in 5 to 7 sentences.
   - If a description already exists, return it unchanged

OUTPUT FORMAT REQUIREMENTS:
- Return ONLY a raw JSON object
- NO markdown code blocks (no ```json)
- NO explanation or commentary before or after the JSON

{{
  "website": "updated website URL here",
  "description": "updated description here"
}}"#,
        name = employer.name(),
        website = employer.website_or_empty(),
        description = employer.description_or_empty(),
    )
}

/// Ask the model about one employer and return its raw reply.
///
/// The reply is not validated here; see [`super::extract`].
pub async fn enrich(ai: &dyn BaseAI, employer: &Employer) -> Result<String> {
    let prompt = enrichment_prompt(employer);

    tracing::debug!(
        employer_id = %employer.id,
        prompt_length = prompt.len(),
        "Requesting employer enrichment"
    );

    ai.complete(&prompt).await
}
