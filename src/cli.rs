use crate::config::{load_play, load_variables};
use crate::engine::ChainEngine;
use crate::provider::{HttpTextGenerator, ProviderKind};
use std::path::{Path, PathBuf};

pub fn usage_lines() -> Vec<&'static str> {
    vec![
        "usage:",
        "  playchain ready <play.yaml> <variables.yaml>   show per-step readiness",
        "  playchain run <play.yaml> <variables.yaml>     execute the chain in order",
    ]
}

pub fn run(args: Vec<String>) -> Result<String, String> {
    match args.first().map(String::as_str) {
        Some("ready") if args.len() == 3 => cmd_ready(Path::new(&args[1]), Path::new(&args[2])),
        Some("run") if args.len() == 3 => cmd_run(Path::new(&args[1]), Path::new(&args[2])),
        _ => Err(usage_lines().join("\n")),
    }
}

fn step_label(name: Option<&str>, index: usize) -> String {
    match name {
        Some(name) => format!("step {} `{name}`", index + 1),
        None => format!("step {}", index + 1),
    }
}

fn cmd_ready(play_path: &Path, variables_path: &Path) -> Result<String, String> {
    let play = load_play(play_path).map_err(|err| err.to_string())?;
    let variables = load_variables(variables_path).map_err(|err| err.to_string())?;

    let generator = HttpTextGenerator::new(ProviderKind::OpenAi);
    let mut engine = ChainEngine::new(&generator);
    engine.prepare(play.steps.clone(), variables);
    let readiness = engine.readiness();

    let mut lines = vec![format!(
        "play `{}`: {}",
        play.id,
        if readiness.chain_ready {
            "ready"
        } else {
            "not ready"
        }
    )];
    for step in &readiness.per_step {
        let label = step_label(play.steps[step.index].name.as_deref(), step.index);
        if step.is_ready {
            lines.push(format!("{label}: ready"));
        } else {
            lines.push(format!(
                "{label}: missing {}",
                step.missing_variables.join(", ")
            ));
        }
    }
    Ok(lines.join("\n"))
}

fn cmd_run(play_path: &Path, variables_path: &Path) -> Result<String, String> {
    let play = load_play(play_path).map_err(|err| err.to_string())?;
    let variables = load_variables(variables_path).map_err(|err| err.to_string())?;

    let generator = HttpTextGenerator::new(ProviderKind::OpenAi);
    let mut engine = ChainEngine::new(&generator);
    if let Some(state_root) = std::env::var_os("PLAYCHAIN_STATE_ROOT") {
        engine = engine.with_log_root(PathBuf::from(state_root));
    }
    engine.prepare(play.steps.clone(), variables);
    engine.run_chain().map_err(|err| err.to_string())?;

    let mut lines = Vec::new();
    for (index, output) in engine.memo_snapshot() {
        let label = step_label(play.steps[index].name.as_deref(), index);
        lines.push(format!("{label}:\n{}", output.text));
    }
    Ok(lines.join("\n\n"))
}
