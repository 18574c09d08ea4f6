pub mod http;
pub mod model_map;
pub mod types;

pub use http::HttpTextGenerator;
pub use model_map::resolve_model;
pub use types::{GenerateRequest, GeneratedText, ProviderError, ProviderKind, TextGenerator};
