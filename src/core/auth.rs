use reqwest::Response;

use crate::core::{
    error::ConsoleError,
    gateway::Gateway,
    types::{AuthConfig, AuthResponse, Credentials},
};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const REGISTER_PATH: &str = "/api/v1/auth/register";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
pub const CONFIG_PATH: &str = "/api/v1/auth/config";

pub async fn login(gw: &Gateway, id: &str, password: &str) -> Result<AuthResponse, ConsoleError> {
    let resp = post_credentials(gw, LOGIN_PATH, id, password).await?;
    if !resp.status().is_success() {
        tracing::info!("login for {} rejected with {}", id, resp.status());
        return Err(ConsoleError::Unauthorized);
    }
    let auth = store_token(gw, resp).await?;
    tracing::info!("logged in as {}", id);
    Ok(auth)
}

pub async fn register(
    gw: &Gateway,
    id: &str,
    password: &str,
) -> Result<AuthResponse, ConsoleError> {
    if id.trim().is_empty() || password.is_empty() {
        return Err(ConsoleError::Validation("id and password are required".into()));
    }
    let resp = post_credentials(gw, REGISTER_PATH, id, password).await?;
    if !resp.status().is_success() {
        return Err(ConsoleError::Validation(format!(
            "registration rejected ({})",
            resp.status()
        )));
    }
    let auth = store_token(gw, resp).await?;
    tracing::info!("registered and logged in as {}", id);
    Ok(auth)
}

pub async fn refresh(gw: &Gateway) -> bool {
    gw.refresh().await
}

/// Ends the server session. The local token is dropped even when the call
/// fails.
pub async fn logout(gw: &Gateway) {
    match gw.send(reqwest::Method::POST, LOGOUT_PATH, None).await {
        Ok(resp) if !resp.status().is_success() => {
            tracing::warn!("logout returned {}", resp.status());
        }
        Ok(_) => tracing::info!("logged out"),
        Err(err) => tracing::warn!("logout request failed: {}", err),
    }
    gw.session().clear();
}

/// Signup availability; any failure reads as signup disabled.
pub async fn fetch_auth_config(gw: &Gateway) -> AuthConfig {
    let resp = match gw.send(reqwest::Method::GET, CONFIG_PATH, None).await {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            tracing::debug!("auth config returned {}", resp.status());
            return AuthConfig::default();
        }
        Err(err) => {
            tracing::warn!("auth config request failed: {}", err);
            return AuthConfig::default();
        }
    };
    resp.json::<AuthConfig>().await.unwrap_or_else(|err| {
        tracing::warn!("auth config unreadable: {}", err);
        AuthConfig::default()
    })
}

async fn post_credentials(
    gw: &Gateway,
    path: &str,
    id: &str,
    password: &str,
) -> Result<Response, ConsoleError> {
    let body = serde_json::to_value(Credentials { id, password })?;
    gw.send(reqwest::Method::POST, path, Some(&body)).await
}

async fn store_token(gw: &Gateway, resp: Response) -> Result<AuthResponse, ConsoleError> {
    let auth: AuthResponse = resp.json().await.map_err(ConsoleError::from)?;
    if auth.access_token.is_empty() {
        return Err(ConsoleError::MalformedResponse(
            "auth response without access token".into(),
        ));
    }
    gw.session().set_token(auth.access_token.clone());
    Ok(auth)
}
