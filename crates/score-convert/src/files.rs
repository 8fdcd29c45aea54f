use std::fs;
use std::path::{Path, PathBuf};

use score_domain::FileMount;
use score_substitute::Resolver;

use crate::error::ConvertError;
use crate::project::{BindKind, BindMount};

/// Expand a container's file mounts into bind mounts on disk (spec §4.8).
///
/// `files` is iterated in the target's lexicographic order for determinism.
/// `workload_source` is the workload's own source file (if loaded from disk),
/// used to resolve relative `source` entries.
pub fn expand_files(
    workload_name: &str,
    container_name: &str,
    files: &std::collections::HashMap<String, FileMount>,
    mounts_dir: Option<&Path>,
    workload_source: Option<&Path>,
    resolver: &dyn Resolver,
) -> Result<Vec<BindMount>, ConvertError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let mounts_dir = match mounts_dir {
        None => return Err(ConvertError::FilesNotSupported),
        Some(p) if p == Path::new("/dev/null") => return Err(ConvertError::FilesNotSupported),
        Some(p) => p,
    };

    let files_dir = mounts_dir.join("files");
    fs::create_dir_all(&files_dir).map_err(|source| ConvertError::Io {
        container: container_name.to_string(),
        target: files_dir.display().to_string(),
        source,
    })?;

    let mut targets: Vec<&String> = files.keys().collect();
    targets.sort();

    let mut seen_names: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    for target in &targets {
        let basename = target.trim_end_matches('/').rsplit('/').next().unwrap_or(target);
        let file_name = format!("{workload_name}-files-{basename}");
        if let Some(earlier) = seen_names.insert(file_name.clone(), (*target).clone()) {
            return Err(ConvertError::FileNameCollision(earlier, (*target).clone(), file_name));
        }
    }

    let mut out = Vec::with_capacity(targets.len());
    for target in targets {
        let mount = &files[target];
        out.push(expand_one(
            workload_name,
            container_name,
            target,
            mount,
            &files_dir,
            workload_source,
            resolver,
        )?);
    }
    Ok(out)
}

fn expand_one(
    workload_name: &str,
    container_name: &str,
    target: &str,
    mount: &FileMount,
    files_dir: &Path,
    workload_source: Option<&Path>,
    resolver: &dyn Resolver,
) -> Result<BindMount, ConvertError> {
    let raw_bytes: Vec<u8> = if let Some(content) = &mount.content {
        let text = if mount.no_expand {
            content.clone()
        } else {
            let (substituted, err) = score_substitute::substitute_string(content, resolver);
            if let Some(err) = err {
                return Err(ConvertError::FileSubstitution {
                    container: container_name.to_string(),
                    target: target.to_string(),
                    inner: err.to_string(),
                });
            }
            substituted
        };
        text.into_bytes()
    } else if let Some(b64) = &mount.binary_content {
        use base64::Engine;
        base64::engine::general_purpose::STANDARD
            .decode(b64)
            .map_err(|source| ConvertError::Base64 {
                container: container_name.to_string(),
                target: target.to_string(),
                source,
            })?
    } else if let Some(source_path) = &mount.source {
        let resolved = resolve_source_path(source_path, workload_source);
        let raw = fs::read(&resolved).map_err(|source| ConvertError::Io {
            container: container_name.to_string(),
            target: target.to_string(),
            source,
        })?;
        if mount.no_expand {
            raw
        } else {
            match String::from_utf8(raw.clone()) {
                Ok(text) => {
                    let (substituted, err) = score_substitute::substitute_string(&text, resolver);
                    if let Some(err) = err {
                        return Err(ConvertError::FileSubstitution {
                            container: container_name.to_string(),
                            target: target.to_string(),
                            inner: err.to_string(),
                        });
                    }
                    substituted.into_bytes()
                }
                Err(_) => raw, // not text: pass through untouched
            }
        }
    } else {
        return Err(ConvertError::MissingFileContent {
            container: container_name.to_string(),
            target: target.to_string(),
        });
    };

    let mode = match &mount.mode {
        Some(m) => {
            let digits = m.strip_prefix("0o").unwrap_or(m);
            u32::from_str_radix(digits, 8).map_err(|_| ConvertError::InvalidMode {
                container: container_name.to_string(),
                target: target.to_string(),
                mode: m.clone(),
            })?
        }
        None => 0o644,
    };
    let read_only = mode & 0o200 == 0;

    let basename = target.trim_end_matches('/').rsplit('/').next().unwrap_or(target);
    let file_name = format!("{workload_name}-files-{basename}");
    let file_path = files_dir.join(&file_name);

    write_atomic(&file_path, &raw_bytes, mode).map_err(|source| ConvertError::Io {
        container: container_name.to_string(),
        target: target.to_string(),
        source,
    })?;

    Ok(BindMount {
        kind: BindKind::Bind,
        source: file_path.display().to_string(),
        target: target.to_string(),
        read_only,
    })
}

fn resolve_source_path(source: &str, workload_source: Option<&Path>) -> PathBuf {
    let path = Path::new(source);
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match workload_source.and_then(Path::parent) {
        Some(base) => base.join(path),
        None => path.to_path_buf(),
    }
}

fn write_atomic(path: &Path, content: &[u8], mode: u32) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&temp_path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    {
        let _ = mode;
    }

    fs::rename(&temp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_op_resolver() -> impl Resolver {
        |s: &str| Ok(format!("${{{s}}}"))
    }

    #[test]
    fn missing_mounts_dir_fails() {
        let mut files = std::collections::HashMap::new();
        files.insert(
            "/etc/app/config".to_string(),
            FileMount {
                content: Some("hello".to_string()),
                binary_content: None,
                source: None,
                no_expand: false,
                mode: None,
            },
        );
        let resolver = no_op_resolver();
        let err = expand_files("app", "web", &files, None, None, &resolver).unwrap_err();
        assert!(matches!(err, ConvertError::FilesNotSupported));
    }

    #[test]
    fn literal_content_is_written_and_mode_derives_read_only() {
        let dir = std::env::temp_dir().join(format!(
            "score-convert-test-{}",
            std::process::id()
        ));
        let mut files = std::collections::HashMap::new();
        files.insert(
            "/etc/app/config".to_string(),
            FileMount {
                content: Some("hello world".to_string()),
                binary_content: None,
                source: None,
                no_expand: true,
                mode: Some("0444".to_string()),
            },
        );
        let resolver = no_op_resolver();
        let mounts = expand_files("app", "web", &files, Some(&dir), None, &resolver).unwrap();
        assert_eq!(mounts.len(), 1);
        assert!(mounts[0].read_only);
        assert_eq!(mounts[0].target, "/etc/app/config");
        let written = fs::read_to_string(&mounts[0].source).unwrap();
        assert_eq!(written, "hello world");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn colliding_basenames_are_rejected() {
        let dir = std::env::temp_dir().join(format!(
            "score-convert-test-collide-{}",
            std::process::id()
        ));
        let mut files = std::collections::HashMap::new();
        files.insert(
            "/etc/a/config".to_string(),
            FileMount { content: Some("a".to_string()), binary_content: None, source: None, no_expand: true, mode: None },
        );
        files.insert(
            "/etc/b/config".to_string(),
            FileMount { content: Some("b".to_string()), binary_content: None, source: None, no_expand: true, mode: None },
        );
        let resolver = no_op_resolver();
        let err = expand_files("app", "web", &files, Some(&dir), None, &resolver).unwrap_err();
        assert!(matches!(err, ConvertError::FileNameCollision(..)));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_content_source_is_an_error() {
        let dir = std::env::temp_dir().join(format!(
            "score-convert-test2-{}",
            std::process::id()
        ));
        let mut files = std::collections::HashMap::new();
        files.insert(
            "/etc/app/config".to_string(),
            FileMount {
                content: None,
                binary_content: None,
                source: None,
                no_expand: false,
                mode: None,
            },
        );
        let resolver = no_op_resolver();
        let err = expand_files("app", "web", &files, Some(&dir), None, &resolver).unwrap_err();
        assert!(matches!(err, ConvertError::MissingFileContent { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
