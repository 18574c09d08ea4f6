use super::types::ProviderKind;

/// Resolves a requested model name to the concrete id sent over the wire.
/// Short aliases map to current defaults; unrecognized names pass through
/// unchanged so newly released models work without a code change.
pub fn resolve_model(provider: ProviderKind, model: Option<&str>) -> String {
    let requested = model.map(str::trim).filter(|name| !name.is_empty());
    match provider {
        ProviderKind::Anthropic => match requested {
            None | Some("sonnet") => "claude-sonnet-4-5".to_string(),
            Some("opus") => "claude-opus-4-1".to_string(),
            Some("haiku") => "claude-haiku-4-5".to_string(),
            Some(other) => other.to_string(),
        },
        ProviderKind::OpenAi => match requested {
            None | Some("gpt") => "gpt-4o".to_string(),
            Some("gpt-mini") => "gpt-4o-mini".to_string(),
            Some(other) => other.to_string(),
        },
    }
}
