use crate::error::StorageError;
use std::path::{Component, Path, PathBuf};

/// Collapses `.` and `..` lexically; `..` may never climb above the root.
fn normalize_relative(path: &Path) -> Result<PathBuf, StorageError> {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::Normal(segment) => out.push(segment),
            Component::ParentDir => {
                if !out.pop() {
                    return Err(StorageError::PathTraversalAttempt {
                        message: path.display().to_string().into(),
                        context: Some("Path escapes the storage root via '..'".into()),
                    });
                }
            },
            Component::RootDir | Component::Prefix(_) => {
                return Err(StorageError::PathTraversalAttempt {
                    message: path.display().to_string().into(),
                    context: Some("Absolute paths are not allowed".into()),
                });
            },
        }
    }

    Ok(out)
}

/// Joins `folder/path` to `root`, refusing anything that lands outside of it.
pub(crate) fn resolve_path(
    root: &Path,
    folder: Option<&str>,
    path: impl AsRef<Path>,
) -> Result<PathBuf, StorageError> {
    let path = path.as_ref();
    if path.is_absolute() {
        return Err(StorageError::PathTraversalAttempt {
            message: path.display().to_string().into(),
            context: Some("Absolute paths are not allowed".into()),
        });
    }

    let relative = match folder {
        Some(folder) => Path::new(folder).join(path),
        None => path.to_path_buf(),
    };
    let joined = root.join(normalize_relative(&relative)?);

    match joined.canonicalize() {
        Ok(canonical) if canonical.starts_with(root) => Ok(canonical),
        Ok(canonical) => Err(StorageError::PathTraversalAttempt {
            message: canonical.display().to_string().into(),
            context: Some("Resolved path is outside the storage root".into()),
        }),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => check_ancestors(root, joined),
        Err(err) => Err(StorageError::Io { source: err, context: None }),
    }
}

/// For paths that do not exist yet, the nearest existing ancestor must live
/// inside the root (guards against symlinked sub-directories).
fn check_ancestors(root: &Path, joined: PathBuf) -> Result<PathBuf, StorageError> {
    let mut current = joined.parent();

    while let Some(dir) = current {
        if dir == root {
            return Ok(joined);
        }
        if dir.exists() {
            return match dir.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(joined),
                Ok(canonical) => Err(StorageError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Parent directory links outside the storage root".into()),
                }),
                Err(err) => Err(StorageError::Io {
                    source: err,
                    context: Some("Failed to verify parent directory".into()),
                }),
            };
        }
        current = dir.parent();
    }

    Err(StorageError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No ancestor inside the storage root".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_inner_parent_segments() {
        let path = normalize_relative(Path::new("vehicles/./old/../x5.jpg")).unwrap();
        assert_eq!(path, PathBuf::from("vehicles/x5.jpg"));
    }

    #[test]
    fn rejects_climbing_above_root() {
        assert!(normalize_relative(Path::new("../secret")).is_err());
        assert!(normalize_relative(Path::new("a/../../b")).is_err());
    }
}
