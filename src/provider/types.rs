#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("unknown provider `{0}`")]
    UnknownProvider(String),
    #[error("missing api key environment variable `{env_var}` for {provider}")]
    MissingApiKey {
        provider: ProviderKind,
        env_var: String,
    },
    #[error("request to {provider} failed: {reason}")]
    Request {
        provider: ProviderKind,
        reason: String,
    },
    #[error("response from {provider} could not be parsed: {reason}")]
    ParseFailure {
        provider: ProviderKind,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ProviderKind {
    type Error = ProviderError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAi),
            other => Err(ProviderError::UnknownProvider(other.to_string())),
        }
    }
}

/// Compiled prompt pair handed to the collaborator. Provider and model are
/// opaque strings at this seam; the implementation resolves them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub system_text: String,
    pub user_text: String,
    pub provider: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedText {
    pub text: String,
}

/// Collaborator that turns a compiled prompt pair into generated text. Any
/// error means "step failed": the engine leaves the memo entry absent and
/// aborts the remaining chain.
pub trait TextGenerator {
    fn generate(&self, request: &GenerateRequest) -> Result<GeneratedText, ProviderError>;
}
