use gloo_console::warn;
use gloo_net::http::{Request, Response};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::model::{
    default_categories, normalize_categories, normalize_pie, Category, NewTransaction, PieSlice,
    Transaction,
};

const DEFAULT_API_ROOT: &str = "https://localhost:7026/api";
const TOKEN_KEY: &str = "authToken";

/// Base URLs of the remote service. Swap these out to point the app at a
/// different deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiConfig {
    pub auth_base: String,
    pub transaction_base: String,
    pub category_base: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_base: format!("{}/Auth", DEFAULT_API_ROOT),
            transaction_base: format!("{}/Transaction", DEFAULT_API_ROOT),
            category_base: format!("{}/Category", DEFAULT_API_ROOT),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success status; carries the response body text or a fallback.
    #[error("{0}")]
    Http(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response: {0}")]
    Decode(String),
}

/// The authenticated session: endpoint config plus the opaque token obtained
/// at login. Passed into whichever component issues data requests.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    config: ApiConfig,
    token: String,
}

impl ApiClient {
    pub fn new(config: ApiConfig, token: String) -> Self {
        Self { config, token }
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    async fn get_json(&self, url: &str, fallback: &str) -> Result<Value, ApiError> {
        let response = Request::get(url)
            .header("Authorization", &self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(http_error(response, fallback).await);
        }
        response
            .json()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        let response = Request::get(&self.config.transaction_base)
            .header("Authorization", &self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(http_error(response, "Failed to load transactions").await);
        }
        response
            .json::<Vec<Transaction>>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    pub async fn create_transaction(&self, new_transaction: &NewTransaction) -> Result<(), ApiError> {
        let response = Request::post(&self.config.transaction_base)
            .header("Authorization", &self.bearer())
            .json(new_transaction)
            .map_err(|err| ApiError::Decode(err.to_string()))?
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(http_error(response, "Could not create the transaction").await);
        }
        Ok(())
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        let url = format!("{}/{}", self.config.transaction_base, id);
        let response = Request::delete(&url)
            .header("Authorization", &self.bearer())
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.ok() {
            return Err(http_error(response, "Could not delete transaction").await);
        }
        Ok(())
    }

    /// Fetches the pre-aggregated category breakdown for the chart.
    pub async fn pie_chart(&self) -> Result<Vec<PieSlice>, ApiError> {
        let url = format!("{}/piechart", self.config.transaction_base);
        let payload = self.get_json(&url, "Could not load the chart").await?;
        Ok(normalize_pie(&payload))
    }

    /// Resolves the category set. Tries the base URL, then the pluralized
    /// variant, and falls back to the built-in set when neither yields any
    /// usable record. Never fails.
    pub async fn categories(&self) -> Vec<Category> {
        let mut payload = None;
        for url in category_attempts(&self.config.category_base) {
            if let Ok(value) = self.get_json(&url, "category request failed").await {
                payload = Some(value);
                break;
            }
        }

        let resolved = payload
            .map(|value| normalize_categories(&value))
            .unwrap_or_default();

        if resolved.is_empty() {
            warn!("category endpoints unavailable or unparseable, using the built-in set");
            default_categories()
        } else {
            resolved
        }
    }
}

/// The two candidate category endpoints: the base collection URL and its
/// pluralized variant. An already-plural base is simply retried.
fn category_attempts(base: &str) -> [String; 2] {
    let plural = if base.ends_with('s') {
        base.to_string()
    } else {
        format!("{}s", base)
    };
    [base.to_string(), plural]
}

async fn http_error(response: Response, fallback: &str) -> ApiError {
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        ApiError::Http(fallback.to_string())
    } else {
        ApiError::Http(body.to_string())
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

pub async fn login(config: &ApiConfig, email: &str, password: &str) -> Result<String, ApiError> {
    let url = format!("{}/login", config.auth_base);
    let response = Request::post(&url)
        .json(&serde_json::json!({ "email": email, "password": password }))
        .map_err(|err| ApiError::Decode(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(http_error(response, "Login failed").await);
    }
    let body: LoginResponse = response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))?;
    Ok(body.token)
}

pub async fn register(config: &ApiConfig, email: &str, password: &str) -> Result<(), ApiError> {
    let url = format!("{}/register", config.auth_base);
    let response = Request::post(&url)
        .json(&serde_json::json!({ "email": email, "password": password }))
        .map_err(|err| ApiError::Decode(err.to_string()))?
        .send()
        .await
        .map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(http_error(response, "Could not register").await);
    }
    Ok(())
}

pub fn stored_token() -> Option<String> {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            if let Ok(Some(token)) = storage.get_item(TOKEN_KEY) {
                if !token.is_empty() {
                    return Some(token);
                }
            }
        }
    }
    None
}

pub fn remember_token(token: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.local_storage() {
            let _ = storage.set_item(TOKEN_KEY, token);
        }
    }
}

#[cfg(test)]
mod endpoint_tests {
    use super::{category_attempts, ApiConfig};

    #[test]
    fn singular_base_gets_a_pluralized_second_attempt() {
        let attempts = category_attempts("https://localhost:7026/api/Category");

        assert_eq!(attempts[0], "https://localhost:7026/api/Category");
        assert_eq!(attempts[1], "https://localhost:7026/api/Categorys");
    }

    #[test]
    fn plural_base_is_retried_as_is() {
        let attempts = category_attempts("https://example.test/api/categories");

        assert_eq!(attempts[0], attempts[1]);
    }

    #[test]
    fn default_config_points_every_base_at_the_same_root() {
        let config = ApiConfig::default();

        assert!(config.auth_base.ends_with("/Auth"));
        assert!(config.transaction_base.ends_with("/Transaction"));
        assert!(config.category_base.ends_with("/Category"));
    }
}
