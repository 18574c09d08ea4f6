use crate::provider::ProviderError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("step index {index} is out of range for a chain of {step_count} steps")]
    StepOutOfRange { index: usize, step_count: usize },
    #[error("step {index} is not ready to run; missing variables: [{}]", .missing_variables.join(", "))]
    StepNotReady {
        index: usize,
        missing_variables: Vec<String>,
    },
    #[error("chain is not ready to run; missing variables: [{}]", .missing_variables.join(", "))]
    ChainNotReady { missing_variables: Vec<String> },
    #[error("text generation failed: {0}")]
    Provider(#[from] ProviderError),
}
