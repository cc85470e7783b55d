use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    config::AppConfig,
    core::{error::ConsoleError, session::Session},
};

pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponse {
    #[serde(default)]
    access_token: Option<String>,
}

/// HTTP front door for every backend call. Attaches the session's bearer
/// token and keeps a cookie jar so the refresh cookie survives between calls.
#[derive(Clone, Debug)]
pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    session: Session,
}

impl Gateway {
    pub fn new(config: &AppConfig, session: Session) -> Result<Self, ConsoleError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .cookie_store(true)
            .build()
            .map_err(ConsoleError::from)?;
        Ok(Self::with_client(client, &config.base_url, session))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, session: Session) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Single attempt with whatever token is currently held.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ConsoleError> {
        let mut req = self.client.request(method.clone(), self.url(path));
        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        tracing::debug!("{} {}", method, path);
        req.send().await.map_err(ConsoleError::from)
    }

    /// Sends the request; on 401 refreshes once and retries once.
    ///
    /// Any non-401 response is handed back untouched so callers can decide
    /// what a 404 or 500 means for them. A failed refresh, or a retry that is
    /// still rejected, clears the session and yields `Unauthorized`.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Response, ConsoleError> {
        let resp = self.send(method.clone(), path, body).await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return Ok(resp);
        }

        tracing::info!("{} {} rejected with 401, refreshing session", method, path);
        if !self.refresh().await {
            return Err(ConsoleError::Unauthorized);
        }

        let retried = self.send(method.clone(), path, body).await?;
        if retried.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("{} {} still unauthorized after refresh", method, path);
            self.session.clear();
            return Err(ConsoleError::Unauthorized);
        }
        Ok(retried)
    }

    /// Exchanges the refresh cookie for a new access token. Returns whether a
    /// token is now held; every failure leaves the session empty.
    pub async fn refresh(&self) -> bool {
        let resp = match self.client.post(self.url(REFRESH_PATH)).send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!("refresh request failed: {}", err);
                self.session.clear();
                return false;
            }
        };
        if !resp.status().is_success() {
            tracing::info!("refresh rejected with {}", resp.status());
            self.session.clear();
            return false;
        }
        match resp.json::<RefreshResponse>().await {
            Ok(RefreshResponse {
                access_token: Some(token),
            }) if !token.is_empty() => {
                self.session.set_token(token);
                tracing::info!("session refreshed");
                true
            }
            Ok(_) => {
                tracing::warn!("refresh response carried no access token");
                self.session.clear();
                false
            }
            Err(err) => {
                tracing::warn!("refresh response unreadable: {}", err);
                self.session.clear();
                false
            }
        }
    }
}
