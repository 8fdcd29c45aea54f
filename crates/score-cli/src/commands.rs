use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use score_config::{load_workload_file, load_workloads_dir};
use score_convert::{convert_workload_into, ComposeProject};
use score_provider::builtins::{
    CounterProvider, EnvironmentProvider, PlaceholderEnvProvider, StaticOutputsProvider, VolumeProvider,
};
use score_provider::{ProviderRegistry, ProvisionContext};
use score_provision::provision_all;
use score_state::{prime_resources, ScoreWorkloadState, State};
use tracing::info;

use crate::output;

/// The engine's own version, compared against `--require-version` if given.
const ENGINE_VERSION: &str = "1.0.0";

pub fn generate(
    files: Vec<PathBuf>,
    output_path: PathBuf,
    state_dir: PathBuf,
    project_name: String,
    require_version: Option<String>,
) -> Result<()> {
    if let Some(constraint) = &require_version {
        score_state::check_version(ENGINE_VERSION, constraint)
            .context("engine version check failed")?;
    }

    let mounts_dir = state_dir.join("mounts");

    let mut state = if state_dir.join("state.yaml").exists() {
        info!(dir = %state_dir.display(), "resuming existing state");
        score_state::load(&state_dir).context("failed to load existing state")?
    } else {
        State::new(project_name, mounts_dir.display().to_string())
    };

    for path in &files {
        let loaded = if path.is_dir() {
            load_workloads_dir(path).context("failed to load workloads directory")?
        } else {
            let (name, workload) = load_workload_file(path).context("failed to load workload file")?;
            vec![(name, workload, path.clone())]
        };

        for (name, workload, source) in loaded {
            if state.workloads.contains_key(&name) {
                return Err(score_state::StateError::DuplicateWorkload(name).into());
            }
            info!(workload = %name, file = %source.display(), "loaded workload");
            state.workloads.insert(
                name,
                ScoreWorkloadState {
                    spec: workload,
                    source_file: Some(source.display().to_string()),
                },
            );
        }
    }

    prime_resources(&mut state).context("failed to prime resources")?;

    let mut registry = ProviderRegistry::new();
    registry
        .register(Arc::new(VolumeProvider))
        .register(Arc::new(StaticOutputsProvider))
        .register(Arc::new(EnvironmentProvider))
        .register(Arc::new(PlaceholderEnvProvider))
        .register(Arc::new(CounterProvider));

    let mut project = ComposeProject::new();
    let ctx = ProvisionContext::never_cancelled();
    provision_all(&mut state, &registry, &mut project, &ctx).context("provisioning failed")?;

    let mut workload_names: Vec<String> = state.workloads.keys().cloned().collect();
    workload_names.sort();
    for name in &workload_names {
        let ws = &state.workloads[name];
        let source = ws.source_file.as_deref().map(Path::new);
        convert_workload_into(&mut project, name, &ws.spec, source, &state.resources, Some(&mounts_dir))
            .with_context(|| format!("failed to convert workload '{name}'"))?;
    }

    score_state::persist(&state, &state_dir).context("failed to persist state")?;

    let encoded = serde_yaml::to_string(&project).context("failed to encode compose project")?;
    std::fs::write(&output_path, encoded)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    println!("{}", output::render_summary(&state));
    println!("Wrote {}", output_path.display());

    Ok(())
}
