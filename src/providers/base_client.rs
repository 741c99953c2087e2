use crate::core::error::ProviderError;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Thin JSON-over-HTTP client shared by the provider adapters.
///
/// The underlying `reqwest::Client` is built once, so every request
/// reuses the same connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    auth_header: Option<(String, String)>,
    query_params: Vec<(String, String)>,
}

impl HttpClient {
    pub fn new(
        base_url: String,
        auth_header: Option<(String, String)>,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            auth_header,
            query_params: Vec::new(),
        })
    }

    pub fn add_query_param(&mut self, key: &str, value: String) {
        self.query_params.push((key.to_string(), value));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST `payload` as JSON and return the response if the status is a
    /// success.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
    ) -> Result<Response, ProviderError> {
        let mut request = self.client.post(self.url(path)).json(payload);

        if let Some((name, value)) = &self.auth_header {
            request = request.header(name, value);
        }
        if !self.query_params.is_empty() {
            request = request.query(&self.query_params);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = status.as_u16(), body = %body, "provider returned error status");
            return Err(ProviderError::Unknown(format!(
                "API returned error status {}",
                status.as_u16()
            )));
        }

        Ok(response)
    }
}
