use super::interpolate::interpolate;
use super::variables::{prompt_reference_index, VariableBag};
use crate::config::StepConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReadiness {
    pub index: usize,
    pub is_ready: bool,
    pub missing_variables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainReadiness {
    pub per_step: Vec<StepReadiness>,
    pub chain_ready: bool,
    pub missing_variables: Vec<String>,
}

/// Required-and-missing names for one step, deduplicated in first-seen
/// order across both templates.
fn required_missing(step: &StepConfig, bag: &VariableBag) -> Vec<String> {
    let mut missing = Vec::new();
    for template in [&step.user_template, &step.system_template] {
        for replaced in interpolate(template, bag).replaced {
            if replaced.is_missing && !replaced.is_optional && !missing.contains(&replaced.name) {
                missing.push(replaced.name);
            }
        }
    }
    missing
}

fn templates_present(step: &StepConfig) -> bool {
    !step.user_template.is_empty() && !step.system_template.is_empty()
}

/// Readiness of a single step against `bag` as-is. Used at execution time,
/// after upstream outputs have already been merged into the bag, so there
/// is no `prompt_N` exemption here.
pub fn evaluate_step(step: &StepConfig, index: usize, bag: &VariableBag) -> StepReadiness {
    let missing = required_missing(step, bag);
    StepReadiness {
        index,
        is_ready: templates_present(step) && missing.is_empty(),
        missing_variables: missing,
    }
}

/// Whole-chain readiness against the caller bag only. A reference to
/// `prompt_k` with `k <= i` is exempted for step `i`: ordered execution
/// supplies those outputs before the step runs. Later or self references
/// stay missing.
pub fn evaluate_chain(steps: &[StepConfig], bag: &VariableBag) -> ChainReadiness {
    let mut per_step = Vec::with_capacity(steps.len());
    let mut missing_union: Vec<String> = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let mut missing = required_missing(step, bag);
        missing.retain(|name| match prompt_reference_index(name) {
            Some(source) => source >= index,
            None => true,
        });
        for name in &missing {
            if !missing_union.contains(name) {
                missing_union.push(name.clone());
            }
        }
        per_step.push(StepReadiness {
            index,
            is_ready: templates_present(step) && missing.is_empty(),
            missing_variables: missing,
        });
    }

    let chain_ready = per_step.iter().all(|step| step.is_ready);
    ChainReadiness {
        per_step,
        chain_ready,
        missing_variables: missing_union,
    }
}
