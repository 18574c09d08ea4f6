use super::executor::ChainMemo;
use super::interpolate::interpolate;
use super::variables::{prompt_reference_index, VariableBag};
use crate::config::StepConfig;
use std::collections::BTreeSet;

/// Watches the step definitions and the variable bag across evaluations and
/// drops memoized outputs whose inputs changed. A bag change clears the
/// whole memo (any variable can feed any step); a step change clears that
/// step and everything downstream of it through `prompt_N` references.
#[derive(Debug, Clone, Default)]
pub struct InvalidationTracker {
    prev_steps: Vec<StepConfig>,
    prev_bag_fingerprint: Option<String>,
}

impl InvalidationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the memo with new inputs. Must run before any readiness
    /// or execution call observes `steps`/`bag`, so stale outputs cannot
    /// leak into a new chain.
    pub fn reconcile(&mut self, steps: &[StepConfig], bag: &VariableBag, memo: &mut ChainMemo) {
        let fingerprint = bag.fingerprint();
        if self.prev_bag_fingerprint.as_deref() != Some(fingerprint.as_str()) {
            memo.clear();
        }
        self.prev_bag_fingerprint = Some(fingerprint);

        let stale = close_over_references(steps, self.changed_steps(steps));
        for index in &stale {
            memo.remove(*index);
        }
        memo.retain_below(steps.len());
        self.prev_steps = steps.to_vec();
    }

    /// Indices whose watched fields (templates and model selection) differ
    /// from the previous evaluation. Indices outside the overlap of the two
    /// arrays count as changed. The `name` field is display-only and not
    /// watched.
    fn changed_steps(&self, steps: &[StepConfig]) -> BTreeSet<usize> {
        let mut changed = BTreeSet::new();
        let overlap = steps.len().min(self.prev_steps.len());
        for index in 0..overlap {
            if watched_fields_differ(&steps[index], &self.prev_steps[index]) {
                changed.insert(index);
            }
        }
        for index in overlap..steps.len().max(self.prev_steps.len()) {
            changed.insert(index);
        }
        changed
    }
}

fn watched_fields_differ(a: &StepConfig, b: &StepConfig) -> bool {
    a.user_template != b.user_template
        || a.system_template != b.system_template
        || a.model_provider != b.model_provider
        || a.model_name != b.model_name
}

/// Step indices reachable from `seed` through `prompt_N` references,
/// computed to fixpoint. Only placeholders written literally in a template
/// are seen; a dynamically assembled reference is not detected.
fn close_over_references(steps: &[StepConfig], seed: BTreeSet<usize>) -> BTreeSet<usize> {
    let references = step_references(steps);
    let mut stale = seed;
    loop {
        let mut grew = false;
        for (index, sources) in references.iter().enumerate() {
            if stale.contains(&index) {
                continue;
            }
            if sources.iter().any(|source| stale.contains(source)) {
                stale.insert(index);
                grew = true;
            }
        }
        if !grew {
            return stale;
        }
    }
}

/// Per-step sets of upstream indices referenced via `prompt_N`
/// placeholders, taken from a placeholder parse of both templates.
fn step_references(steps: &[StepConfig]) -> Vec<BTreeSet<usize>> {
    let empty = VariableBag::new();
    steps
        .iter()
        .map(|step| {
            let mut sources = BTreeSet::new();
            for template in [&step.user_template, &step.system_template] {
                for replaced in interpolate(template, &empty).replaced {
                    if let Some(source) = prompt_reference_index(&replaced.name) {
                        sources.insert(source);
                    }
                }
            }
            sources
        })
        .collect()
}
