//! JSON-over-HTTP client for the remote invoicing API

use crate::{error::AppError, Result};
use reqwest::{Client, Method, Response};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServiceClient {
    client: Client,
    base_url: String,
    service_name: String,
    token: String,
}

impl ServiceClient {
    pub fn new(
        base_url: impl Into<String>,
        service_name: impl Into<String>,
        token: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, base_url, service_name, token))
    }

    /// Reuse an already configured reqwest client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        service_name: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_name: service_name.into(),
            token: token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        self.send::<Value>(Method::GET, endpoint, None).await
    }

    pub async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Value> {
        self.send(Method::POST, endpoint, Some(body)).await
    }

    pub async fn put<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<Value> {
        self.send(Method::PUT, endpoint, Some(body)).await
    }

    pub async fn delete(&self, endpoint: &str) -> Result<Value> {
        self.send::<Value>(Method::DELETE, endpoint, None).await
    }

    async fn send<T: Serialize>(&self, method: Method, endpoint: &str, body: Option<&T>) -> Result<Value> {
        let url = self.url(endpoint);
        tracing::debug!("{} {} -> {}", method, url, self.service_name);

        let mut request = self
            .client
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.map_reqwest_error(e))?;
        self.handle_response(response).await
    }

    /// The API answers JSON on error statuses too, so the body is parsed
    /// whatever the status and left to the caller to triage.
    async fn handle_response(&self, response: Response) -> Result<Value> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        tracing::debug!("API Response ({}): {}", status, text);

        serde_json::from_str::<Value>(&text).map_err(|_| {
            AppError::protocol(format!(
                "{} answered HTTP {} with a non-JSON body",
                self.service_name, status
            ))
        })
    }

    fn map_reqwest_error(&self, error: reqwest::Error) -> AppError {
        if error.is_timeout() {
            AppError::timeout(format!("Request to {} timed out", self.service_name))
        } else if error.is_connect() {
            AppError::service_unavailable(&self.service_name)
        } else {
            AppError::external_service(&self.service_name, error.to_string())
        }
    }
}
