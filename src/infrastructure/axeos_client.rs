// AxeOS HTTP client - reqwest implementation of the device API
use crate::application::device_api::{DeviceApi, TransportError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

pub const API_SYSTEM_INFO: &str = "/api/system/info";
pub const API_SYSTEM_RESTART: &str = "/api/system/restart";
pub const API_SYSTEM_FREQUENCY: &str = "/api/system/frequency";
pub const API_SYSTEM_VOLTAGE: &str = "/api/system/voltage";
pub const API_SYSTEM_FANSPEED: &str = "/api/system/fanspeed";

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one AxeOS miner. Every request is bounded by the client
/// timeout; a non-2xx status becomes `HttpStatus` rather than an error
/// escaping this boundary. Retrying is the coordinator's business.
#[derive(Debug, Clone)]
pub struct AxeOsClient {
    http: reqwest::Client,
    base_url: String,
}

/// Shared client with the fixed request timeout applied.
pub fn build_http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}

impl AxeOsClient {
    pub fn new(http: reqwest::Client, host: &str) -> Self {
        // Accept bare hosts as well as hosts with an explicit scheme.
        let host = host
            .trim()
            .trim_start_matches("http://")
            .trim_end_matches('/');
        Self {
            http,
            base_url: format!("http://{host}"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn classify(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::ConnectionFailed(err.to_string())
        }
    }

    async fn get_json(&self, path: &str) -> Result<Value, TransportError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }

        response.json().await.map_err(Self::classify)
    }

    async fn post(&self, path: &str, body: Option<Value>) -> Result<(), TransportError> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.map_err(Self::classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceApi for AxeOsClient {
    async fn system_info(&self) -> Result<Value, TransportError> {
        self.get_json(API_SYSTEM_INFO).await
    }

    async fn restart(&self) -> Result<(), TransportError> {
        self.post(API_SYSTEM_RESTART, None).await
    }

    async fn set_frequency(&self, frequency: u32) -> Result<(), TransportError> {
        self.post(API_SYSTEM_FREQUENCY, Some(json!({"frequency": frequency})))
            .await
    }

    async fn set_voltage(&self, voltage: u32) -> Result<(), TransportError> {
        self.post(API_SYSTEM_VOLTAGE, Some(json!({"voltage": voltage})))
            .await
    }

    async fn set_fanspeed(&self, fanspeed: u32) -> Result<(), TransportError> {
        self.post(API_SYSTEM_FANSPEED, Some(json!({"fanspeed": fanspeed})))
            .await
    }
}
