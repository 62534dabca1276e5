use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vokabel_config::translator::TranslatorConfig;

use crate::reply::{parse_enrichment, parse_translation};
use crate::{Enricher, Enrichment, EnrichmentError, ProviderMetadata, prompt};

const SNIPPET_CHARS: usize = 200;

/// Enricher backed by an OpenAI-compatible chat completions endpoint
#[derive(Clone)]
pub struct ChatEnricher {
    client: reqwest::Client,
    api_key: String,
    url_chat: String,
    model: String,
    target_lang: String,
    context_chars: usize,
}

impl ChatEnricher {
    pub fn new(config: &TranslatorConfig) -> Result<Self, EnrichmentError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let base = config.api_url.trim().trim_end_matches('/');
        let url_chat = format!("{base}/v1/chat/completions");

        tracing::info!(
            model = %config.model,
            endpoint = %base,
            configured = !config.api_key.is_empty(),
            "ChatEnricher initialized"
        );

        Ok(Self {
            client,
            api_key: config.api_key.trim().to_string(),
            url_chat,
            model: config.model.clone(),
            target_lang: config.target_lang.clone(),
            context_chars: config.context_chars,
        })
    }

    /// One non-streaming completion, returning the message content
    async fn complete(&self, system: String, user: String) -> Result<String, EnrichmentError> {
        if self.api_key.is_empty() {
            return Err(EnrichmentError::NotConfigured);
        }

        let body = ChatRequest {
            model: &self.model,
            temperature: 0.2,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        tracing::debug!(model = %self.model, "POST {}", self.url_chat);

        let response = self
            .client
            .post(&self.url_chat)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!("Lookup service returned HTTP {}", status);
            return Err(EnrichmentError::HttpStatus {
                status,
                snippet: prompt::excerpt(text.trim(), SNIPPET_CHARS).to_string(),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&text).map_err(|e| EnrichmentError::Parse {
                reason: e.to_string(),
                raw: text.clone(),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .ok_or(EnrichmentError::MissingField("choices"))?
            .message
            .content
            .ok_or(EnrichmentError::MissingField("content"))
    }
}

#[async_trait]
impl Enricher for ChatEnricher {
    async fn enrich(&self, word: &str, context: &str) -> Result<Enrichment, EnrichmentError> {
        let context = prompt::excerpt(context, self.context_chars);
        let content = self
            .complete(
                prompt::enrich_system(&self.target_lang),
                prompt::enrich_user(word, context),
            )
            .await?;

        let result = parse_enrichment(&content);
        if let Err(EnrichmentError::Parse { raw, .. }) = &result {
            tracing::warn!("Undecodable enrichment reply for '{}': {}", word, raw);
        }
        result
    }

    async fn translate(&self, text: &str) -> Result<String, EnrichmentError> {
        let content = self
            .complete(prompt::translate_system(&self.target_lang), text.to_string())
            .await?;
        parse_translation(&content)
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "openai-compatible".to_string(),
            model: self.model.clone(),
            requires_api_key: true,
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReplyMessage,
}

#[derive(Deserialize)]
struct ChatReplyMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config(server: &MockServer, api_key: &str) -> TranslatorConfig {
        TranslatorConfig {
            api_key: api_key.to_string(),
            api_url: format!("{}/", server.uri()),
            ..TranslatorConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": content } }
            ]
        })
    }

    #[tokio::test]
    async fn enrich_decodes_fenced_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_string_contains("verneinung"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "```json\n{\"translation\": \"negation\", \"notes\": \"from 'nein'\"}\n```",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "test-key")).unwrap();
        let enrichment = enricher
            .enrich("verneinung", "Das ist eine Verneinung.")
            .await
            .unwrap();

        assert_eq!(
            enrichment,
            Enrichment {
                translation: "negation".to_string(),
                notes: "from 'nein'".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn missing_key_skips_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "")).unwrap();
        assert!(!enricher.is_configured());

        let err = enricher.enrich("haus", "").await.unwrap_err();
        assert!(err.is_config());
        let err = enricher.translate("Haus").await.unwrap_err();
        assert!(err.is_config());
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "k")).unwrap();
        match enricher.enrich("haus", "").await {
            Err(EnrichmentError::HttpStatus { status, snippet }) => {
                assert_eq!(status.as_u16(), 429);
                assert_eq!(snippet, "slow down");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "k")).unwrap();
        let err = enricher.enrich("haus", "").await.unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("<html>oops</html>"));
    }

    #[tokio::test]
    async fn empty_choices_is_missing_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "k")).unwrap();
        assert!(matches!(
            enricher.enrich("haus", "").await,
            Err(EnrichmentError::MissingField("choices"))
        ));
    }

    #[tokio::test]
    async fn translate_returns_plain_text() {
        let server = MockServer::start().await;
        let reply = completion(" The tree is old.\n");
        Mock::given(method("POST"))
            .and(body_string_contains("Der Baum ist alt."))
            .respond_with(ResponseTemplate::new(200).set_body_json(reply))
            .mount(&server)
            .await;

        let enricher = ChatEnricher::new(&config(&server, "k")).unwrap();
        assert_eq!(
            enricher.translate("Der Baum ist alt.").await.unwrap(),
            "The tree is old."
        );
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let config = TranslatorConfig {
            api_key: "k".to_string(),
            api_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..TranslatorConfig::default()
        };

        let enricher = ChatEnricher::new(&config).unwrap();
        let err = enricher.translate("Haus").await.unwrap_err();
        assert!(err.is_transport());
    }
}
