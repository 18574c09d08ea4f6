pub mod error;
pub mod executor;
pub mod interpolate;
pub mod invalidate;
pub mod readiness;
pub mod variables;

pub use error::EngineError;
pub use executor::{ChainEngine, ChainMemo, StepOutput};
pub use interpolate::{interpolate, Interpolation, ReplacedVariable};
pub use invalidate::InvalidationTracker;
pub use readiness::{evaluate_chain, evaluate_step, ChainReadiness, StepReadiness};
pub use variables::{prompt_output_name, prompt_reference_index, VariableBag};
