use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Employer identifier as the directory sends it.
///
/// JBoard uses numeric ids, but the value is kept in its wire form so a
/// patch body echoes back exactly what was read.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EmployerId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EmployerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmployerId::Number(n) => write!(f, "{}", n),
            EmployerId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EmployerId {
    fn from(id: i64) -> Self {
        EmployerId::Number(id)
    }
}

impl From<&str> for EmployerId {
    fn from(id: &str) -> Self {
        EmployerId::Text(id.to_string())
    }
}

/// A single employer record from the directory.
///
/// Everything except `id` is kept in `fields` exactly as received, so a
/// patch echoes back absent keys as absent and `null`s as `null`. The typed
/// accessors read leniently: a missing, `null` or non-string value reads as
/// `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employer {
    pub id: EmployerId,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Employer {
    /// Build a record with only `id` and `name` set.
    pub fn new(id: impl Into<EmployerId>, name: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("name".into(), Value::String(name.into()));
        Self { id: id.into(), fields }
    }

    pub fn with_website(self, website: impl Into<String>) -> Self {
        self.with_field("website", website)
    }

    pub fn with_description(self, description: impl Into<String>) -> Self {
        self.with_field("description", description)
    }

    pub fn with_created_at(self, created_at: impl Into<String>) -> Self {
        self.with_field("created_at", created_at)
    }

    fn with_field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), Value::String(value.into()));
        self
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Display name, or `""` when the directory sent none.
    pub fn name(&self) -> &str {
        self.str_field("name").unwrap_or("")
    }

    pub fn website(&self) -> Option<&str> {
        self.str_field("website")
    }

    pub fn description(&self) -> Option<&str> {
        self.str_field("description")
    }

    pub fn created_at(&self) -> Option<&str> {
        self.str_field("created_at")
    }

    /// Website, or `""` when the directory has none.
    pub fn website_or_empty(&self) -> &str {
        self.website().unwrap_or("")
    }

    /// Description, or `""` when the directory has none.
    pub fn description_or_empty(&self) -> &str {
        self.description().unwrap_or("")
    }

    /// Parse `created_at` in the formats JBoard is known to emit.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// Full record with the non-empty update fields applied.
    ///
    /// Empty or whitespace-only values never overwrite the original, and
    /// no other key is added or touched.
    pub fn merged_with(&self, update: &EmployerUpdate) -> Employer {
        let mut merged = self.clone();
        if let Some(website) = non_empty(update.website.as_deref()) {
            merged = merged.with_website(website);
        }
        if let Some(description) = non_empty(update.description.as_deref()) {
            merged = merged.with_description(description);
        }
        merged
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Partial update for an employer. Only `website` and `description` are
/// ever overridden.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployerUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EmployerUpdate {
    /// True when neither field would change anything.
    pub fn is_empty(&self) -> bool {
        non_empty(self.website.as_deref()).is_none()
            && non_empty(self.description.as_deref()).is_none()
    }
}

/// One page of employers with pagination metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct EmployerPage {
    pub items: Vec<Employer>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
}

impl EmployerPage {
    /// Whether the directory reports pages after this one.
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// Paginated list response as JBoard sends it.
#[derive(Debug, Deserialize)]
pub(crate) struct EmployerPageRaw {
    pub items: Vec<Employer>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub last_page: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub per_page: Option<u32>,
}

impl EmployerPageRaw {
    /// Fill missing metadata: current page falls back to the requested one,
    /// last page to the current one.
    pub fn into_page(self, requested_page: u32, requested_size: u32) -> EmployerPage {
        let current_page = self.current_page.unwrap_or(requested_page);
        EmployerPage {
            items: self.items,
            current_page,
            last_page: self.last_page.unwrap_or(current_page),
            per_page: self.per_page.unwrap_or(requested_size),
        }
    }
}

/// Accepts `3`, `"3"` or `null`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u32),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_employer_roundtrip_keeps_unknown_fields() {
        let raw = json!({
            "id": 42,
            "name": "Acme",
            "website": "linkedin.com/company/acme",
            "description": "",
            "created_at": "2024-05-01 10:00:00",
            "logo": "https://cdn.example/acme.png",
            "featured": true
        });

        let employer: Employer = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(employer.id, EmployerId::Number(42));
        assert_eq!(employer.fields.len(), 6);
        assert_eq!(serde_json::to_value(&employer).unwrap(), raw);
    }

    #[test]
    fn test_sparse_record_roundtrips_exactly() {
        let raw = json!({"id": 5, "name": "Sparse"});
        let employer: Employer = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(employer.website(), None);
        assert_eq!(employer.created_at_utc(), None);
        let body = employer.merged_with(&EmployerUpdate::default());
        assert_eq!(serde_json::to_value(&body).unwrap(), raw);
    }

    #[test]
    fn test_null_and_non_string_fields_read_leniently() {
        let raw = json!({"id": 2, "name": null, "website": 17, "description": null});
        let employer: Employer = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(employer.name(), "");
        assert_eq!(employer.website_or_empty(), "");
        assert_eq!(employer.description(), None);
        // nulls are echoed back as nulls
        assert_eq!(serde_json::to_value(&employer).unwrap(), raw);
    }

    #[test]
    fn test_merge_only_touches_overridden_keys() {
        let employer: Employer = serde_json::from_value(json!({"id": 1, "name": "Acme"})).unwrap();
        let update = EmployerUpdate {
            website: Some("https://acme.com".into()),
            description: Some("".into()),
        };

        let merged = employer.merged_with(&update);
        assert_eq!(
            serde_json::to_value(&merged).unwrap(),
            json!({"id": 1, "name": "Acme", "website": "https://acme.com"})
        );
    }

    #[test]
    fn test_text_ids_stay_text() {
        let employer: Employer = serde_json::from_value(json!({"id": "emp-7"})).unwrap();
        assert_eq!(employer.id.to_string(), "emp-7");
        assert_eq!(serde_json::to_value(&employer.id).unwrap(), json!("emp-7"));
    }

    #[test]
    fn test_merge_ignores_empty_fields() {
        let employer = Employer::new(1, "Acme")
            .with_website("acme.com")
            .with_description("Makes anvils.");

        let update = EmployerUpdate {
            website: Some("   ".into()),
            description: None,
        };
        assert!(update.is_empty());
        assert_eq!(employer.merged_with(&update), employer);
    }

    #[test]
    fn test_merge_applies_non_empty_fields() {
        let employer = Employer::new(1, "Acme").with_website("linkedin.com/company/acme");
        let update = EmployerUpdate {
            website: Some("https://acme.com".into()),
            description: Some("Acme makes anvils.".into()),
        };

        let merged = employer.merged_with(&update);
        assert_eq!(merged.website(), Some("https://acme.com"));
        assert_eq!(merged.description(), Some("Acme makes anvils."));
        assert_eq!(merged.name(), "Acme");
    }

    #[test]
    fn test_created_at_formats() {
        let laravel = Employer::new(1, "A").with_created_at("2024-05-01 10:00:00");
        let rfc = Employer::new(2, "B").with_created_at("2024-05-01T10:00:00Z");
        let micros = Employer::new(3, "C").with_created_at("2024-05-01T10:00:00.000000Z");
        let junk = Employer::new(4, "D").with_created_at("yesterday");

        let expected = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(laravel.created_at_utc(), Some(expected));
        assert_eq!(rfc.created_at_utc(), Some(expected));
        assert_eq!(micros.created_at_utc(), Some(expected));
        assert_eq!(junk.created_at_utc(), None);
    }

    #[test]
    fn test_page_metadata_defaults() {
        let raw: EmployerPageRaw =
            serde_json::from_value(json!({"items": [], "last_page": "3"})).unwrap();
        let page = raw.into_page(2, 15);
        assert_eq!(page.current_page, 2);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.per_page, 15);
        assert!(page.has_more());

        let raw: EmployerPageRaw = serde_json::from_value(json!({"items": []})).unwrap();
        let page = raw.into_page(4, 15);
        assert_eq!(page.last_page, 4);
        assert!(!page.has_more());
    }
}
