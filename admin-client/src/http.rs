//! HTTP client for the hosted Postgres REST (PostgREST) API

use crate::{ClientConfig, ClientError, ClientResult};
use reqwest::header::{AUTHORIZATION, CONTENT_RANGE, HeaderMap, HeaderValue, RANGE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// `Prefer` header value asking for the affected rows back
pub const PREFER_REPRESENTATION: &str = "return=representation";

/// `Prefer` header value asking for an exact row count
pub const PREFER_COUNT_EXACT: &str = "count=exact";

/// Rows plus the total reported by `Content-Range`
#[derive(Debug, Clone)]
pub struct RangedRows<T> {
    pub rows: Vec<T>,
    pub total: Option<u64>,
}

/// HTTP client for making requests to the REST and RPC endpoints
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            token: config.token.clone(),
        })
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build authorization header value
    fn auth_header(&self) -> String {
        format!("Bearer {}", self.token.as_deref().unwrap_or(&self.api_key))
    }

    fn rest_url(&self, table: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}/rest/v1/{}", self.base_url, table)
        } else {
            format!("{}/rest/v1/{}?{}", self.base_url, table, query)
        }
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, self.auth_header())
    }

    /// GET rows from a table
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &str) -> ClientResult<Vec<T>> {
        let url = self.rest_url(table, query);
        tracing::debug!(%url, "GET");
        let response = self.request(Method::GET, &url).send().await?;
        Self::handle_response(response).await
    }

    /// GET a row range from a table along with the exact total
    pub async fn select_range<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &str,
        from: u64,
        to: u64,
    ) -> ClientResult<RangedRows<T>> {
        let url = self.rest_url(table, query);
        tracing::debug!(%url, from, to, "GET range");
        let response = self
            .request(Method::GET, &url)
            .header(RANGE, format!("{from}-{to}"))
            .header("Range-Unit", "items")
            .header("Prefer", PREFER_COUNT_EXACT)
            .send()
            .await?;

        let total = parse_content_range_total(response.headers());
        let rows = Self::handle_response(response).await?;
        Ok(RangedRows { rows, total })
    }

    /// POST a row and return the stored representation
    pub async fn insert<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        body: &B,
    ) -> ClientResult<Vec<T>> {
        let url = self.rest_url(table, "");
        tracing::debug!(%url, "POST");
        let response = self
            .request(Method::POST, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// PATCH the rows matched by `filter` and return them
    pub async fn update<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        filter: &str,
        body: &B,
    ) -> ClientResult<Vec<T>> {
        let url = self.rest_url(table, filter);
        tracing::debug!(%url, "PATCH");
        let response = self
            .request(Method::PATCH, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// DELETE the rows matched by `filter` and return them
    pub async fn delete<T: DeserializeOwned>(&self, table: &str, filter: &str) -> ClientResult<Vec<T>> {
        let url = self.rest_url(table, filter);
        tracing::debug!(%url, "DELETE");
        let response = self
            .request(Method::DELETE, &url)
            .header("Prefer", PREFER_REPRESENTATION)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Call a database function; the response body is discarded
    pub async fn rpc<B: Serialize>(&self, function: &str, body: &B) -> ClientResult<()> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        tracing::debug!(%url, "RPC");
        let response = self.request(Method::POST, &url).json(body).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    async fn check_status(response: Response) -> ClientResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        tracing::warn!(%status, body = %text, "Request rejected");
        Err(ClientError::from_status(status, &text))
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            ClientError::InvalidResponse(format!(
                "{e}: {}",
                String::from_utf8_lossy(&bytes[..bytes.len().min(200)])
            ))
        })
    }
}

/// Parse the total out of `Content-Range: 0-19/57` (or `*/0`)
fn parse_content_range_total(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_RANGE)
        .and_then(|v: &HeaderValue| v.to_str().ok())
        .and_then(|v| v.rsplit_once('/'))
        .and_then(|(_, total)| total.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(CONTENT_RANGE, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn test_parse_content_range_total() {
        assert_eq!(parse_content_range_total(&headers("0-19/57")), Some(57));
        assert_eq!(parse_content_range_total(&headers("*/0")), Some(0));
        assert_eq!(parse_content_range_total(&headers("0-19/*")), None);
        assert_eq!(parse_content_range_total(&HeaderMap::new()), None);
    }

    #[test]
    fn test_rest_url() {
        let config = ClientConfig::new("https://demo.supabase.co/", "anon");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(
            client.rest_url("links", "id=eq.4"),
            "https://demo.supabase.co/rest/v1/links?id=eq.4"
        );
        assert_eq!(client.rest_url("links", ""), "https://demo.supabase.co/rest/v1/links");
    }

    #[test]
    fn test_auth_header_falls_back_to_api_key() {
        let config = ClientConfig::new("https://demo.supabase.co", "anon");
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.auth_header(), "Bearer anon");

        let client = client.with_token("user-jwt");
        assert_eq!(client.auth_header(), "Bearer user-jwt");
        assert_eq!(client.token(), Some("user-jwt"));
    }
}
