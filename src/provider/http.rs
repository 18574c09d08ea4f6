use super::model_map::resolve_model;
use super::types::{GenerateRequest, GeneratedText, ProviderError, ProviderKind, TextGenerator};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_ANTHROPIC_API_BASE: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Clone, Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Blocking HTTP `TextGenerator` speaking the OpenAI chat-completions and
/// Anthropic messages wire formats. API bases can be overridden through
/// `PLAYCHAIN_OPENAI_API_BASE` / `PLAYCHAIN_ANTHROPIC_API_BASE`; keys come
/// from `OPENAI_API_KEY` / `ANTHROPIC_API_KEY`.
#[derive(Debug, Clone)]
pub struct HttpTextGenerator {
    default_provider: ProviderKind,
    openai_api_base: String,
    anthropic_api_base: String,
}

fn api_base_from_env(env_var: &str, default: &str) -> String {
    std::env::var(env_var)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl HttpTextGenerator {
    pub fn new(default_provider: ProviderKind) -> Self {
        Self {
            default_provider,
            openai_api_base: api_base_from_env("PLAYCHAIN_OPENAI_API_BASE", DEFAULT_OPENAI_API_BASE),
            anthropic_api_base: api_base_from_env(
                "PLAYCHAIN_ANTHROPIC_API_BASE",
                DEFAULT_ANTHROPIC_API_BASE,
            ),
        }
    }

    fn provider_for(&self, request: &GenerateRequest) -> Result<ProviderKind, ProviderError> {
        match request.provider.as_deref() {
            Some(raw) => ProviderKind::try_from(raw),
            None => Ok(self.default_provider),
        }
    }

    fn api_key(provider: ProviderKind) -> Result<String, ProviderError> {
        let env_var = match provider {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        };
        std::env::var(env_var)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey {
                provider,
                env_var: env_var.to_string(),
            })
    }

    fn generate_openai(
        &self,
        request: &GenerateRequest,
        model: &str,
        api_key: &str,
    ) -> Result<GeneratedText, ProviderError> {
        let provider = ProviderKind::OpenAi;
        let url = format!(
            "{}/chat/completions",
            self.openai_api_base.trim_end_matches('/')
        );
        let body = json!({
            "model": model,
            "messages": [
                { "role": "system", "content": request.system_text },
                { "role": "user", "content": request.user_text },
            ],
        });

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_json(body)
            .map_err(|err| ProviderError::Request {
                provider,
                reason: err.to_string(),
            })?;
        let parsed: ChatCompletionsResponse =
            response
                .into_json()
                .map_err(|err| ProviderError::ParseFailure {
                    provider,
                    reason: err.to_string(),
                })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ProviderError::ParseFailure {
                provider,
                reason: "response carries no message content".to_string(),
            })?;
        Ok(GeneratedText { text })
    }

    fn generate_anthropic(
        &self,
        request: &GenerateRequest,
        model: &str,
        api_key: &str,
    ) -> Result<GeneratedText, ProviderError> {
        let provider = ProviderKind::Anthropic;
        let url = format!("{}/messages", self.anthropic_api_base.trim_end_matches('/'));
        let body = json!({
            "model": model,
            "max_tokens": ANTHROPIC_MAX_TOKENS,
            "system": request.system_text,
            "messages": [
                { "role": "user", "content": request.user_text },
            ],
        });

        let response = ureq::post(&url)
            .set("x-api-key", api_key)
            .set("anthropic-version", ANTHROPIC_VERSION)
            .send_json(body)
            .map_err(|err| ProviderError::Request {
                provider,
                reason: err.to_string(),
            })?;
        let parsed: MessagesResponse =
            response
                .into_json()
                .map_err(|err| ProviderError::ParseFailure {
                    provider,
                    reason: err.to_string(),
                })?;

        let text = parsed
            .content
            .into_iter()
            .next()
            .and_then(|block| block.text)
            .ok_or_else(|| ProviderError::ParseFailure {
                provider,
                reason: "response carries no text block".to_string(),
            })?;
        Ok(GeneratedText { text })
    }
}

impl TextGenerator for HttpTextGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<GeneratedText, ProviderError> {
        let provider = self.provider_for(request)?;
        let model = resolve_model(provider, request.model.as_deref());
        let api_key = Self::api_key(provider)?;
        match provider {
            ProviderKind::OpenAi => self.generate_openai(request, &model, &api_key),
            ProviderKind::Anthropic => self.generate_anthropic(request, &model, &api_key),
        }
    }
}
