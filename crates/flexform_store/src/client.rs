use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use uuid::Uuid;

use flexform_core::models::SubmissionRecord;

use crate::error::{Result, StoreError};
use crate::filter::Filter;

/// Thin typed wrapper over the hosted submissions table, speaking the
/// PostgREST dialect Supabase exposes. Holds no state beyond the HTTP
/// client; every dashboard refresh re-queries.
#[derive(Clone)]
pub struct SubmissionStore {
    http: reqwest::Client,
    base_url: String,
    table: String,
}

impl SubmissionStore {
    pub fn new(base_url: impl Into<String>, service_key: &str, table: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(service_key)
            .map_err(|_| StoreError::Store("Service key contains invalid characters".to_string()))?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {service_key}"))
            .map_err(|_| StoreError::Store("Service key contains invalid characters".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(SubmissionStore {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            table: table.into(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Cheap reachability/authorization probe so the CLI can fail fast
    /// before starting a long import.
    pub async fn check_connection(&self) -> Result<()> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[("limit", "1")])
            .send()
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(StoreError::Store(format!(
                "Store rejected connection probe: HTTP {}",
                response.status()
            )))
        }
    }

    pub async fn insert(&self, record: &SubmissionRecord) -> Result<Uuid> {
        let response = self
            .http
            .post(self.endpoint())
            .header("Prefer", "return=representation")
            .json(record)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Store(format!("Insert failed: HTTP {status}: {body}")));
        }

        // PostgREST returns the inserted rows as an array.
        let rows: Vec<SubmissionRecord> = response.json().await?;
        rows.first()
            .and_then(|row| row.id)
            .ok_or_else(|| StoreError::Store("Insert returned no row id".to_string()))
    }

    pub async fn select_all(&self, filter: &Filter) -> Result<Vec<SubmissionRecord>> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&filter.to_query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Store(format!("Select failed: HTTP {status}: {body}")));
        }
        Ok(response.json().await?)
    }

    pub async fn select_one(&self, id: Uuid) -> Result<SubmissionRecord> {
        let filter = Filter::new().eq("id", id.to_string()).limit(1);
        let rows = self.select_all(&filter).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64> {
        let response = self
            .http
            .get(self.endpoint())
            .header("Prefer", "count=exact")
            .header("Range", "0-0")
            .query(&filter.to_query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Store(format!("Count failed: HTTP {status}")));
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| StoreError::Store("Count response missing Content-Range".to_string()))?;

        parse_content_range_total(content_range)
            .ok_or_else(|| StoreError::Store(format!("Unparseable Content-Range: {content_range}")))
    }
}

/// Total row count from a `Content-Range` header such as `0-0/42` or `*/0`.
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_totals_parse() {
        assert_eq!(parse_content_range_total("0-0/42"), Some(42));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("nonsense"), None);
    }

    #[test]
    fn endpoint_joins_without_duplicate_slash() {
        let store =
            SubmissionStore::new("https://proj.supabase.co/", "service-key", "form_submissions")
                .unwrap();
        assert_eq!(
            store.endpoint(),
            "https://proj.supabase.co/rest/v1/form_submissions"
        );
    }

    #[test]
    fn select_response_deserializes_into_records() {
        let body = r#"[
            {
                "id": "7f2c6a4e-91d3-4a37-b6a8-55f0e3f7d111",
                "created_at": "2025-10-01T12:00:00Z",
                "created_by": "import@flexform.local",
                "department": "NYA",
                "security_classification": "internal",
                "data_hash": "abc123",
                "short_description": "Spill in hallway",
                "event_date": "2025-10-01"
            }
        ]"#;
        let rows: Vec<SubmissionRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].department, "NYA");
        assert!(rows[0].fields.contains_key("short_description"));
        assert!(rows[0].fields.contains_key("event_date"));
    }
}
