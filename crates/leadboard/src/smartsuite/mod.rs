//! SmartSuite records client.
//!
//! Fetches hydrated records from one SmartSuite table and flattens them into
//! [`Lead`]s via [`normalize_record`].

mod normalize;

pub use normalize::{extract_location, normalize_record, Location};

use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::config::SmartSuiteConfig;
use crate::error::{Error, Result};
use crate::lead::{count_with_coordinates, Lead};

/// Body of a records list response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordsPage {
    /// Raw hydrated records.
    #[serde(default)]
    pub items: Vec<Value>,
    /// Total number of records in the table.
    #[serde(default)]
    pub total: Option<u64>,
    /// Offset of this page.
    #[serde(default)]
    pub offset: Option<u64>,
    /// Page size the server applied.
    #[serde(default)]
    pub limit: Option<u64>,
}

/// HTTP client for the SmartSuite records API.
#[derive(Debug, Clone)]
pub struct SmartSuiteClient {
    http: reqwest::Client,
    config: SmartSuiteConfig,
}

impl SmartSuiteClient {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: SmartSuiteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("leadboard/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub fn config(&self) -> &SmartSuiteConfig {
        &self.config
    }

    fn check_config(&self) -> Result<()> {
        if self.config.api_key.trim().is_empty() {
            return Err(Error::MissingApiKey);
        }
        if self.config.account_id.trim().is_empty() {
            return Err(Error::SmartSuiteConfig {
                field: "account_id",
            });
        }
        if self.config.table_id.trim().is_empty() {
            return Err(Error::SmartSuiteConfig { field: "table_id" });
        }
        Ok(())
    }

    /// Fetch raw records, optionally capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns an error when credentials are missing, the request fails, the
    /// server answers with a non-success status, or the body is not a
    /// records page.
    #[instrument(skip(self), fields(table = %self.config.table_id))]
    pub async fn fetch_records(&self, limit: Option<usize>) -> Result<RecordsPage> {
        self.check_config()?;

        let request_id = uuid::Uuid::new_v4().to_string();
        let body = request_body(limit);
        debug!(request_id = %request_id, "Requesting SmartSuite records");

        let response = self
            .http
            .post(self.config.records_url())
            .header("Authorization", format!("Token {}", self.config.api_key))
            .header("ACCOUNT-ID", &self.config.account_id)
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, "no-cache")
            .header("X-Request-ID", &request_id)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(Error::smartsuite_status(status.as_u16(), &text));
        }

        let page: RecordsPage = serde_json::from_str(&text)
            .map_err(|e| Error::SmartSuiteResponse(format!("unexpected response body: {e}")))?;

        debug!(
            items = page.items.len(),
            total = ?page.total,
            "Received SmartSuite records"
        );
        Ok(page)
    }

    /// Fetch every record and normalize it into a lead.
    ///
    /// # Errors
    ///
    /// See [`SmartSuiteClient::fetch_records`].
    pub async fn fetch_leads(&self) -> Result<Vec<Lead>> {
        let page = self.fetch_records(None).await?;
        let leads: Vec<Lead> = page
            .items
            .iter()
            .map(|record| normalize_record(record, &self.config.fields))
            .collect();

        info!(
            total = leads.len(),
            with_coordinates = count_with_coordinates(&leads),
            "Normalized SmartSuite records"
        );
        Ok(leads)
    }

    /// Fetch the first raw record, for diagnostics.
    ///
    /// # Errors
    ///
    /// See [`SmartSuiteClient::fetch_records`].
    pub async fn fetch_sample(&self) -> Result<Option<Value>> {
        let page = self.fetch_records(Some(1)).await?;
        Ok(page.items.into_iter().next())
    }
}

fn request_body(limit: Option<usize>) -> Value {
    let mut body = json!({
        "sort": [],
        "filter": {},
        "hydrated": true,
    });
    if let Some(limit) = limit {
        body["limit"] = json!(limit);
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, routing::post, Json, Router};
    use pretty_assertions::assert_eq;

    fn config(base_url: &str) -> SmartSuiteConfig {
        SmartSuiteConfig {
            base_url: base_url.to_string(),
            api_key: "secret".to_string(),
            account_id: "acct".to_string(),
            table_id: "tbl".to_string(),
            ..SmartSuiteConfig::default()
        }
    }

    async fn list_records(
        Path(table): Path<String>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (axum::http::StatusCode, Json<Value>) {
        let authorized = headers.get("authorization").and_then(|v| v.to_str().ok())
            == Some("Token secret")
            && headers.get("account-id").and_then(|v| v.to_str().ok()) == Some("acct")
            && headers.contains_key("x-request-id");
        if !authorized || table != "tbl" {
            return (
                axum::http::StatusCode::UNAUTHORIZED,
                Json(json!({"error": "bad credentials"})),
            );
        }

        let mut items = vec![
            json!({"s79c2f08d9": "Acme", "s5d25b0846": {"lat": 40.0, "lng": -75.0}}),
            json!({"s79c2f08d9": "Globex", "s5d25b0846": "Austin, TX"}),
        ];
        if let Some(limit) = body.get("limit").and_then(Value::as_u64) {
            items.truncate(usize::try_from(limit).unwrap());
        }
        let total = items.len();
        (
            axum::http::StatusCode::OK,
            Json(json!({"items": items, "total": total, "offset": 0, "limit": 100})),
        )
    }

    async fn spawn_mock() -> String {
        let app = Router::new().route(
            "/applications/:table/records/list/",
            post(list_records),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_request_body() {
        assert_eq!(
            request_body(None),
            json!({"sort": [], "filter": {}, "hydrated": true})
        );
        assert_eq!(request_body(Some(1))["limit"], 1);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.api_key = "  ".to_string();
        let client = SmartSuiteClient::new(cfg).unwrap();
        let err = client.fetch_leads().await.unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
    }

    #[tokio::test]
    async fn test_missing_table_id() {
        let mut cfg = config("http://127.0.0.1:9");
        cfg.table_id = String::new();
        let client = SmartSuiteClient::new(cfg).unwrap();
        let err = client.fetch_leads().await.unwrap_err();
        assert!(matches!(err, Error::SmartSuiteConfig { field: "table_id" }));
    }

    #[tokio::test]
    async fn test_fetch_leads_from_mock() {
        let base = spawn_mock().await;
        let client = SmartSuiteClient::new(config(&base)).unwrap();

        let leads = client.fetch_leads().await.unwrap();

        assert_eq!(leads.len(), 2);
        assert_eq!(leads[0].company, "Acme");
        assert!(leads[0].has_coordinates());
        assert_eq!(leads[1].address, "Austin, TX");
        assert!(leads[1].needs_geocoding());
    }

    #[tokio::test]
    async fn test_fetch_sample_sends_limit() {
        let base = spawn_mock().await;
        let client = SmartSuiteClient::new(config(&base)).unwrap();

        let sample = client.fetch_sample().await.unwrap().unwrap();

        assert_eq!(sample["s79c2f08d9"], "Acme");
    }

    #[tokio::test]
    async fn test_status_error_carries_body() {
        let base = spawn_mock().await;
        let mut cfg = config(&base);
        cfg.api_key = "wrong".to_string();
        let client = SmartSuiteClient::new(cfg).unwrap();

        let err = client.fetch_leads().await.unwrap_err();

        match err {
            Error::SmartSuiteStatus { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("bad credentials"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
