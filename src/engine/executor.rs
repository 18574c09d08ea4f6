use super::error::EngineError;
use super::interpolate::interpolate;
use super::invalidate::InvalidationTracker;
use super::readiness::{self, ChainReadiness};
use super::variables::{prompt_output_name, VariableBag};
use crate::config::StepConfig;
use crate::provider::{GenerateRequest, TextGenerator};
use crate::shared::logging::append_engine_log_line;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutput {
    pub text: String,
}

/// Per-step output cache. At most one entry per step index, and an entry
/// is valid only while the inputs it was derived from remain unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainMemo {
    outputs: BTreeMap<usize, StepOutput>,
}

impl ChainMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: usize) -> Option<&StepOutput> {
        self.outputs.get(&index)
    }

    pub fn insert(&mut self, index: usize, output: StepOutput) {
        self.outputs.insert(index, output);
    }

    pub fn remove(&mut self, index: usize) {
        self.outputs.remove(&index);
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
    }

    pub fn retain_below(&mut self, step_count: usize) {
        self.outputs.retain(|index, _| *index < step_count);
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<usize, StepOutput> {
        self.outputs.clone()
    }
}

/// Per-play runtime: holds the current steps and variable bag, the output
/// memo, and the invalidation tracker. One instance per play; discarding
/// the instance discards the memo.
pub struct ChainEngine<'a> {
    generator: &'a dyn TextGenerator,
    steps: Vec<StepConfig>,
    variables: VariableBag,
    memo: ChainMemo,
    tracker: InvalidationTracker,
    run_in_flight: bool,
    log_root: Option<PathBuf>,
}

impl<'a> ChainEngine<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self {
            generator,
            steps: Vec::new(),
            variables: VariableBag::new(),
            memo: ChainMemo::new(),
            tracker: InvalidationTracker::new(),
            run_in_flight: false,
            log_root: None,
        }
    }

    pub fn with_log_root(mut self, log_root: PathBuf) -> Self {
        self.log_root = Some(log_root);
        self
    }

    /// Installs new steps and variables. Invalidation is applied here,
    /// synchronously, so no later readiness or execution call can observe
    /// memo entries derived from the old inputs.
    pub fn prepare(&mut self, steps: Vec<StepConfig>, variables: VariableBag) {
        let before = self.memo.len();
        self.tracker.reconcile(&steps, &variables, &mut self.memo);
        self.steps = steps;
        self.variables = variables;
        let dropped = before.saturating_sub(self.memo.len());
        if dropped > 0 {
            self.log(format!("decision=invalidate dropped={dropped}"));
        }
    }

    pub fn steps(&self) -> &[StepConfig] {
        &self.steps
    }

    pub fn variables(&self) -> &VariableBag {
        &self.variables
    }

    pub fn memo_snapshot(&self) -> BTreeMap<usize, StepOutput> {
        self.memo.snapshot()
    }

    /// Whole-chain readiness. `chain_ready` is additionally false while a
    /// chain run is in flight.
    pub fn readiness(&self) -> ChainReadiness {
        let mut readiness = readiness::evaluate_chain(&self.steps, &self.variables);
        if self.run_in_flight {
            readiness.chain_ready = false;
        }
        readiness
    }

    /// Variables visible to step `index`: the caller bag plus a
    /// `prompt_{j+1}` entry for every memoized step `j < index`.
    pub fn available_variables_for_step(&self, index: usize) -> VariableBag {
        let mut variables = self.variables.clone();
        for upstream in 0..index.min(self.steps.len()) {
            if let Some(output) = self.memo.get(upstream) {
                variables.insert(prompt_output_name(upstream), output.text.clone());
            }
        }
        variables
    }

    /// Runs one step, reusing a memoized output when present. A step that
    /// is not ready fails without touching the collaborator; the caller
    /// should treat that as "not enough information yet", not as a fault.
    pub fn run_step(&mut self, index: usize) -> Result<StepOutput, EngineError> {
        if index >= self.steps.len() {
            return Err(EngineError::StepOutOfRange {
                index,
                step_count: self.steps.len(),
            });
        }
        if let Some(cached) = self.memo.get(index) {
            let cached = cached.clone();
            self.log(format!("step={index} decision=run_step outcome=cached"));
            return Ok(cached);
        }
        self.execute_step(index)
    }

    /// Runs every step in index order. A call while a run is in flight is
    /// a no-op; a chain that is not ready refuses to start. The first step
    /// failure aborts the remainder, keeping memo gains from the steps
    /// that already succeeded.
    pub fn run_chain(&mut self) -> Result<(), EngineError> {
        if self.run_in_flight {
            self.log("decision=run_chain outcome=already_in_flight".to_string());
            return Ok(());
        }
        let readiness = self.readiness();
        if !readiness.chain_ready {
            return Err(EngineError::ChainNotReady {
                missing_variables: readiness.missing_variables,
            });
        }

        self.run_in_flight = true;
        let mut outcome = Ok(());
        for index in 0..self.steps.len() {
            if self.memo.get(index).is_some() {
                continue;
            }
            if let Err(err) = self.execute_step(index) {
                outcome = Err(err);
                break;
            }
        }
        self.run_in_flight = false;

        self.log(format!(
            "decision=run_chain outcome={}",
            if outcome.is_ok() { "succeeded" } else { "failed" }
        ));
        outcome
    }

    fn execute_step(&mut self, index: usize) -> Result<StepOutput, EngineError> {
        let variables = self.available_variables_for_step(index);
        let step = &self.steps[index];
        let system_text = interpolate(&step.system_template, &variables).compiled;
        let user_text = interpolate(&step.user_template, &variables).compiled;

        let readiness = readiness::evaluate_step(step, index, &variables);
        if !readiness.is_ready || system_text.is_empty() || user_text.is_empty() {
            self.log(format!(
                "step={index} decision=run_step outcome=not_ready missing=[{}]",
                readiness.missing_variables.join(", ")
            ));
            return Err(EngineError::StepNotReady {
                index,
                missing_variables: readiness.missing_variables,
            });
        }

        let request = GenerateRequest {
            system_text,
            user_text,
            provider: step.model_provider.map(|provider| provider.as_str().to_string()),
            model: step.model_name.clone(),
        };
        match self.generator.generate(&request) {
            Ok(generated) => {
                let output = StepOutput {
                    text: generated.text,
                };
                self.memo.insert(index, output.clone());
                self.log(format!("step={index} decision=run_step outcome=generated"));
                Ok(output)
            }
            Err(err) => {
                self.log(format!(
                    "step={index} decision=run_step outcome=failed error={err}"
                ));
                Err(EngineError::Provider(err))
            }
        }
    }

    // Logging is a diagnostic trail; it never fails a run.
    fn log(&self, line: String) {
        if let Some(log_root) = &self.log_root {
            let _ = append_engine_log_line(log_root, &line);
        }
    }
}
