//! HTTP client for the remote AI gateway.
//!
//! Two endpoints: chat completion and translation. Both take JSON and return
//! JSON; non-success statuses carry `{"error": ...}` bodies that
//! [`GatewayError::from_response`] classifies.

use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use url::Url;

use crate::config::GatewayConfig;
use crate::core::i18n::Language;

use super::error::{GatewayError, GatewayResult};
use super::translate::parse_translations;

/// Operations the rest of the app needs from the gateway.
///
/// Views and the assistant depend on this trait rather than the concrete
/// client so tests can swap in a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Send one chat turn with its knowledge context, returning the reply
    /// text verbatim.
    async fn chat(&self, message: &str, knowledge_context: &str) -> GatewayResult<String>;

    /// Translate `text` from `source` into each of `targets`.
    ///
    /// A language missing from the result map means the model skipped it;
    /// callers treat that as "translation unavailable", not an error.
    async fn translate(
        &self,
        text: &str,
        source: Language,
        targets: &[Language],
    ) -> GatewayResult<IndexMap<Language, String>>;
}

/// Concrete client over the configured gateway endpoints.
pub struct GatewayClient {
    client: Client,
    chat_url: Url,
    translate_url: Url,
    api_token: Option<String>,
}

impl GatewayClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// Fails when the configured base URL or endpoint paths do not form
    /// valid URLs, or the HTTP client cannot be constructed.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            chat_url: config.chat_url()?,
            translate_url: config.translate_url()?,
            // Trim the token at construction so a stray newline in an env
            // var cannot corrupt the header
            api_token: config.api_token.as_deref().map(|t| t.trim().to_string()),
        })
    }

    fn post(&self, url: &Url) -> reqwest::RequestBuilder {
        let mut req = self
            .client
            .post(url.clone())
            .header("content-type", "application/json");
        if let Some(token) = &self.api_token {
            req = req.header("authorization", format!("Bearer {token}"));
        }
        req
    }

    async fn send_json(
        &self,
        url: &Url,
        body: &serde_json::Value,
    ) -> GatewayResult<serde_json::Value> {
        let resp = self
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(GatewayError::from_transport)?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GatewayError::from_response(status.as_u16(), &text));
        }

        let text = resp.text().await.map_err(GatewayError::from_transport)?;
        serde_json::from_str(&text).map_err(|_| GatewayError::Parse { raw: text })
    }
}

#[async_trait]
impl Gateway for GatewayClient {
    async fn chat(&self, message: &str, knowledge_context: &str) -> GatewayResult<String> {
        let body = serde_json::json!({
            "message": message,
            "knowledgeContext": knowledge_context,
        });

        let json = self.send_json(&self.chat_url, &body).await?;

        json["response"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Parse {
                raw: json.to_string(),
            })
    }

    async fn translate(
        &self,
        text: &str,
        source: Language,
        targets: &[Language],
    ) -> GatewayResult<IndexMap<Language, String>> {
        let codes: Vec<&str> = targets.iter().map(|l| l.code()).collect();
        let body = serde_json::json!({
            "text": text,
            "targetLanguages": codes,
            "sourceLanguage": source.code(),
        });

        let json = self.send_json(&self.translate_url, &body).await?;
        parse_translations(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_base_url() {
        let config = GatewayConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            GatewayClient::new(&config),
            Err(GatewayError::Url(_))
        ));
    }

    #[test]
    fn test_new_trims_token() {
        let config = GatewayConfig {
            api_token: Some("  tok-123\n".to_string()),
            ..Default::default()
        };
        let client = GatewayClient::new(&config).unwrap();
        assert_eq!(client.api_token.as_deref(), Some("tok-123"));
    }
}
