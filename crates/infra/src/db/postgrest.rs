//! Row store backed by the hosted database's REST interface (PostgREST).
//!
//! Wire format:
//! - endpoint `{base}/rest/v1/{table}`
//! - `apikey` + `Authorization: Bearer` headers on every request
//! - reads: `GET ?select=<columns>`; writes: `POST` (array body), `PATCH`
//!   (object body), `DELETE`
//! - equality filters as `<column>=eq.<value>` query parameters
//! - `Prefer: return=representation` when rows should come back
//!
//! No retries and no session state; the configured timeout is the only bound
//! on a hung call.

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Deserialize;

use super::{DbError, Operation, Query, Row, RowStore};
use crate::config::DatabaseConfig;

const REST_PATH: &str = "rest/v1/";
const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MINIMAL: &str = "return=minimal";

/// Error body returned by the service on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct RemoteErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

pub struct PostgrestStore {
    http: reqwest::Client,
    rest_url: Url,
}

impl PostgrestStore {
    pub fn new(config: &DatabaseConfig) -> Result<Self, DbError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| DbError::Config(format!("api key is not a valid header value: {e}")))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| DbError::Config(format!("api key is not a valid header value: {e}")))?;
        headers.insert("apikey", key);
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| DbError::Config(e.to_string()))?;

        Ok(Self {
            http,
            rest_url: rest_url(&config.url)?,
        })
    }

    /// Full URL (path + query string) a query will be sent to.
    pub fn request_url(&self, query: &Query) -> Result<Url, DbError> {
        let mut url = self
            .rest_url
            .join(&query.table)
            .map_err(|e| DbError::Config(format!("invalid table name {:?}: {e}", query.table)))?;

        {
            let mut pairs = url.query_pairs_mut();
            if let Some(columns) = &query.columns {
                pairs.append_pair("select", columns);
            }
            for filter in &query.filters {
                pairs.append_pair(&filter.column, &format!("eq.{}", filter.value));
            }
        }
        // Drop a dangling `?` when nothing was appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    fn build_request(&self, query: &Query) -> Result<reqwest::RequestBuilder, DbError> {
        let url = self.request_url(query)?;
        let method = match query.operation {
            Operation::Select => Method::GET,
            Operation::Insert(_) => Method::POST,
            Operation::Update(_) => Method::PATCH,
            Operation::Delete => Method::DELETE,
        };

        let mut request = self.http.request(method, url);
        if query.operation.is_mutation() {
            let prefer = if query.returns_rows() {
                PREFER_REPRESENTATION
            } else {
                PREFER_MINIMAL
            };
            request = request.header("Prefer", prefer);
        }
        request = match &query.operation {
            Operation::Insert(rows) => request.json(rows),
            Operation::Update(patch) => request.json(patch),
            Operation::Select | Operation::Delete => request,
        };
        Ok(request)
    }
}

#[async_trait::async_trait]
impl RowStore for PostgrestStore {
    #[tracing::instrument(
        name = "postgrest.execute",
        skip_all,
        fields(table = %query.table, op = query.operation.name())
    )]
    async fn execute(&self, query: Query) -> Result<Vec<Row>, DbError> {
        let request = self.build_request(&query)?;
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let err = remote_error(status, &body);
            tracing::warn!(status = status.as_u16(), error = %err, "remote query failed");
            return Err(err);
        }

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "remote query ok");
        if !query.returns_rows() || body.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice::<Vec<Row>>(&body).map_err(|e| DbError::Decode(e.to_string()))
    }
}

/// `{base}/rest/v1/`, keeping any path prefix the base URL already has.
fn rest_url(base: &Url) -> Result<Url, DbError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(REST_PATH)
        .map_err(|e| DbError::Config(format!("invalid base url: {e}")))
}

fn remote_error(status: StatusCode, body: &[u8]) -> DbError {
    let parsed: RemoteErrorBody = serde_json::from_slice(body).unwrap_or_default();
    let mut message = parsed
        .message
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());
    if let Some(details) = parsed.details {
        message = format!("{message} ({details})");
    }
    if let Some(hint) = parsed.hint {
        message = format!("{message}; hint: {hint}");
    }
    DbError::remote(status.as_u16(), parsed.code, message)
}
