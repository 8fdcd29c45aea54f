use std::path::Path;

use score_domain::Workload;
use tracing::debug;

use crate::error::ConfigError;

/// Load a single Workload Spec YAML file.
///
/// Expects exactly one YAML document describing one [`Workload`]. Returns
/// the workload's `metadata.name` alongside the parsed spec.
pub fn load_workload_file(path: &Path) -> Result<(String, Workload), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let workload: Workload = serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
        path: path.display().to_string(),
        source,
    })?;
    let name = workload
        .name()
        .map_err(|_| ConfigError::MissingName { path: path.display().to_string() })?
        .to_string();
    debug!(path = %path.display(), workload = %name, "loaded workload spec");
    Ok((name, workload))
}

/// Walk `dir` non-recursively for `*.yaml`/`*.yml` files, each holding one
/// workload. Files are visited in lexicographic order for determinism.
///
/// Returns `(name, workload, source_path)` triples; `source_path` is the
/// absolute-or-relative path as given, later attached to
/// `ScoreWorkloadState::source_file` so relative file-mount `source` entries
/// can be resolved against it (spec §4.8).
pub fn load_workloads_dir(dir: &Path) -> Result<Vec<(String, Workload, std::path::PathBuf)>, ConfigError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<std::path::PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
        if path.is_file() && is_yaml {
            paths.push(path);
        }
    }
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let (name, workload) = load_workload_file(&path)?;
        out.push((name, workload, path));
    }
    Ok(out)
}
