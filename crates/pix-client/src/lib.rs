//! # pix-client -- HTTP Session for PIX Endpoints
//!
//! Fetches JSON from a PIX service and hands the decoded tree to a
//! [`pix_core::Factory`], so callers receive promoted [`PixObject`]s instead
//! of raw mappings.
//!
//! ## Request Path Convention
//!
//! Paths are resolved against [`PixConfig::base_url`]. A leading `/` is
//! ignored, so `"/shots/sh010"` and `"shots/sh010"` address the same
//! resource under a base URL that carries its own path prefix.

pub mod config;
pub mod error;
pub mod retry;

pub use config::{ConfigError, PixConfig};
pub use error::PixApiError;
pub use retry::RetryPolicy;

use std::time::Duration;

use pix_core::{Factory, PixObject, Value};
use url::Url;

/// Authenticated session against one PIX endpoint.
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::Client,
    base_url: Url,
    retry: RetryPolicy,
    factory: Factory,
}

impl Session {
    /// Create a session from configuration. Responses are promoted with
    /// `factory`.
    pub fn new(config: PixConfig, factory: Factory) -> Result<Self, PixApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!(
                        "Bearer {}",
                        config.api_token.as_str()
                    ))
                    .map_err(|_| PixApiError::Config(ConfigError::InvalidToken))?,
                );
                headers
            })
            .build()
            .map_err(|e| PixApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let mut base_url = config.base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http,
            base_url,
            retry: config.retry,
            factory,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// `GET path` and return the decoded body without promotion.
    pub async fn get_raw(&self, path: &str) -> Result<Value, PixApiError> {
        let endpoint = format!("GET {path}");
        let url = self.endpoint_url(path)?;

        let resp = self
            .retry
            .run(&endpoint, || self.http.get(url.clone()).send())
            .await
            .map_err(|e| PixApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        read_json(&endpoint, resp).await
    }

    /// `GET path` and promote every tagged mapping in the response.
    pub async fn get(&self, path: &str) -> Result<Value, PixApiError> {
        let raw = self.get_raw(path).await?;
        self.objectify(&format!("GET {path}"), raw)
    }

    /// `POST path` with a JSON body and promote the response.
    pub async fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Value, PixApiError> {
        let endpoint = format!("POST {path}");
        let url = self.endpoint_url(path)?;

        let resp = self
            .retry
            .run(&endpoint, || self.http.post(url.clone()).json(body).send())
            .await
            .map_err(|e| PixApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        let raw = read_json(&endpoint, resp).await?;
        self.objectify(&endpoint, raw)
    }

    /// `GET path` and return every tagged mapping in the response as an
    /// object, depth-first pre-order, including mappings nested inside
    /// other tagged mappings.
    pub async fn children(&self, path: &str) -> Result<Vec<PixObject>, PixApiError> {
        let endpoint = format!("GET {path}");
        let raw = self.get_raw(path).await?;
        self.factory
            .iter_objects(&raw, true)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| PixApiError::Objectify { endpoint, source })
    }

    fn objectify(&self, endpoint: &str, raw: Value) -> Result<Value, PixApiError> {
        self.factory
            .objectify(raw)
            .map_err(|source| PixApiError::Objectify {
                endpoint: endpoint.to_string(),
                source,
            })
    }

    fn endpoint_url(&self, path: &str) -> Result<Url, PixApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| PixApiError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }
}

async fn read_json(endpoint: &str, resp: reqwest::Response) -> Result<Value, PixApiError> {
    let status = resp.status();
    tracing::debug!(endpoint, status = status.as_u16(), "PIX response");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(PixApiError::ApiError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            body,
        });
    }

    let json: serde_json::Value = resp.json().await.map_err(|e| PixApiError::Deserialization {
        endpoint: endpoint.to_string(),
        source: e,
    })?;
    Ok(Value::from(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pix_core::TypeRegistry;
    use std::sync::Arc;

    fn session(base: &str) -> Session {
        let config = PixConfig {
            base_url: base.parse().unwrap(),
            api_token: "t".into(),
            timeout_secs: 1,
            retry: RetryPolicy::NEVER,
        };
        Session::new(config, Factory::with_registry(Arc::new(TypeRegistry::new()))).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let s = session("http://127.0.0.1:9100/pix/api");
        assert_eq!(s.base_url().as_str(), "http://127.0.0.1:9100/pix/api/");
        assert_eq!(
            s.endpoint_url("/shots/sh010").unwrap().as_str(),
            "http://127.0.0.1:9100/pix/api/shots/sh010"
        );
    }

    #[test]
    fn invalid_token_is_config_error() {
        let config = PixConfig {
            base_url: "http://127.0.0.1:9100".parse().unwrap(),
            api_token: "bad\ntoken".into(),
            timeout_secs: 1,
            retry: RetryPolicy::NEVER,
        };
        let err = Session::new(config, Factory::with_registry(Arc::new(TypeRegistry::new())))
            .unwrap_err();
        assert!(matches!(err, PixApiError::Config(ConfigError::InvalidToken)));
    }
}
