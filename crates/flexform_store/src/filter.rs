use chrono::{DateTime, Utc};

// ---------------------------------------------------------------------------
// Query filters supported by the submission store: equality on a named
// column, a range on the creation timestamp, and a hard result limit.
// Rendered as PostgREST query parameters.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Filter {
    eq: Vec<(String, String)>,
    since: Option<DateTime<Utc>>,
    until: Option<DateTime<Utc>>,
    limit: Option<u32>,
}

impl Filter {
    pub fn new() -> Self {
        Filter::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.eq.push((column.into(), value.into()));
        self
    }

    pub fn since(mut self, timestamp: DateTime<Utc>) -> Self {
        self.since = Some(timestamp);
        self
    }

    pub fn until(mut self, timestamp: DateTime<Utc>) -> Self {
        self.until = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST encodes operators inside the parameter value, so these
    /// pairs go straight into the request's query string.
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        for (column, value) in &self.eq {
            params.push((column.clone(), format!("eq.{value}")));
        }
        if let Some(since) = self.since {
            params.push(("created_at".to_string(), format!("gte.{}", since.to_rfc3339())));
        }
        if let Some(until) = self.until {
            params.push(("created_at".to_string(), format!("lte.{}", until.to_rfc3339())));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}
