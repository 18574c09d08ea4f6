pub mod error;
pub mod load;
pub mod play_file;

pub use crate::shared::ids::PlayId;
pub use error::ConfigError;
pub use load::{load_play, load_variables};
pub use play_file::{ConfigProviderKind, PlayConfig, StepConfig};
