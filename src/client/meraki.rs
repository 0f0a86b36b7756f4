//! Meraki Dashboard API client implementation

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use log::debug;
use reqwest::{Client as HttpClient, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{DashboardApi, Network, Organization};
use crate::error::{ApiError, Result};

/// Meraki Dashboard API base URL
pub const API_BASE_URL: &str = "https://api.meraki.com/api/v1";

/// Rate limit: the dashboard allows 10 requests per second per organization
const RATE_LIMIT_PER_SECOND: u32 = 10;

/// Meraki Dashboard API client
pub struct MerakiClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl MerakiClient {
    /// Create a client against the production dashboard
    #[cfg(test)]
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_host(api_key, None)
    }

    /// Create a client, optionally against a custom base URL
    pub fn with_host(api_key: impl Into<String>, api_host: Option<&str>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let quota = Quota::per_second(NonZeroU32::new(RATE_LIMIT_PER_SECOND).unwrap_or(NonZeroU32::MIN));
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        let base_url = api_host
            .map(|h| h.trim_end_matches('/').to_string())
            .unwrap_or_else(|| API_BASE_URL.to_string());

        Ok(Self {
            http,
            base_url,
            api_key: api_key.into(),
            rate_limiter,
        })
    }

    /// Base URL requests are issued against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue an authenticated GET and decode the body
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let data = response.json::<T>().await.map_err(|e| {
                    ApiError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                Ok(data)
            }
            StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized.into()),
            StatusCode::FORBIDDEN => Err(ApiError::Forbidden.into()),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(path.to_string()).into()),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                Err(ApiError::RateLimit(Duration::from_secs(retry_after)).into())
            }
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Bad request".to_string());
                Err(ApiError::BadRequest(error_msg).into())
            }
            status if status.is_server_error() => {
                let error_msg = response
                    .text()
                    .await
                    .unwrap_or_else(|_| format!("Server error: {}", status));
                Err(ApiError::ServerError(error_msg).into())
            }
            _ => {
                let error_msg = format!("Unexpected status code: {}", status);
                Err(ApiError::InvalidResponse(error_msg).into())
            }
        }
    }
}

#[async_trait]
impl DashboardApi for MerakiClient {
    async fn list_organizations(&self) -> Result<Vec<Organization>> {
        self.get("/organizations").await
    }

    async fn list_networks(&self, org_id: &str) -> Result<Vec<Network>> {
        self.get(&format!("/organizations/{}/networks", org_id)).await
    }

    async fn get_ssids(&self, network_id: &str) -> Result<Value> {
        self.get(&format!("/networks/{}/wireless/ssids", network_id))
            .await
    }

    async fn get_firewall_rules(&self, network_id: &str) -> Result<Value> {
        self.get(&format!(
            "/networks/{}/appliance/firewall/l3FirewallRules",
            network_id
        ))
        .await
    }

    async fn get_webhook_servers(&self, network_id: &str) -> Result<Value> {
        self.get(&format!("/networks/{}/webhooks/httpServers", network_id))
            .await
    }

    async fn get_alert_settings(&self, network_id: &str) -> Result<Value> {
        self.get(&format!("/networks/{}/alerts/settings", network_id))
            .await
    }

    async fn get_vlans_mx(&self, network_id: &str) -> Result<Value> {
        self.get(&format!("/networks/{}/appliance/vlans", network_id))
            .await
    }

    async fn get_devices(&self, network_id: &str) -> Result<Value> {
        self.get(&format!("/networks/{}/devices", network_id)).await
    }
}
