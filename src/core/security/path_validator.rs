use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::Config;

/// Errors that can occur during path validation
#[derive(Debug, thiserror::Error)]
pub enum PathSecurityError {
    #[error("Path '{path}' is outside allowed root directory '{root}'")]
    OutsideRootDirectory { path: PathBuf, root: PathBuf },

    #[error("Symlink '{path}' points outside allowed root directory")]
    SymlinkOutsideRoot { path: PathBuf },

    #[error("Cannot canonicalize path '{path}': {error}")]
    CannotCanonicalize { path: PathBuf, error: io::Error },

    #[error("Path does not exist: '{path}'")]
    PathNotFound { path: PathBuf },

    #[error("Path '{path}' has no parent directory")]
    NoParent { path: PathBuf },

    #[error("IO error for path '{path}': {error}")]
    IoError { path: PathBuf, error: io::Error },
}

/// Validates that an existing path is within the configured security boundaries.
///
/// The path is canonicalized (resolving `.`, `..` and symlinks). When a root
/// directory is configured, the canonical path must lie inside it and
/// symlinks are handled according to `allow_symlinks`. Without a root, the
/// path only has to exist.
///
/// Returns the canonical path.
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::from_env()?;
/// let project = validate_path("/home/user/projects/app", &config)?;
/// ```
pub fn validate_path(
    input_path: impl AsRef<Path>,
    config: &Config,
) -> Result<PathBuf, PathSecurityError> {
    let path = input_path.as_ref();

    let Some(ref root) = config.security.root_path else {
        return canonicalize_path(path);
    };

    let canonical_root = root.canonicalize().map_err(|e| PathSecurityError::IoError {
        path: root.clone(),
        error: e,
    })?;

    if !path.exists() {
        return Err(PathSecurityError::PathNotFound {
            path: path.to_path_buf(),
        });
    }

    if path.is_symlink() && !config.security.allow_symlinks {
        let target = path.read_link().map_err(|e| PathSecurityError::IoError {
            path: path.to_path_buf(),
            error: e,
        })?;

        let canonical_target =
            canonicalize_path(&target).map_err(|_| PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            })?;

        if !is_within_root(&canonical_target, &canonical_root) {
            return Err(PathSecurityError::SymlinkOutsideRoot {
                path: path.to_path_buf(),
            });
        }
    }

    let canonical_path = path.canonicalize().map_err(|e| PathSecurityError::CannotCanonicalize {
        path: path.to_path_buf(),
        error: e,
    })?;

    if !is_within_root(&canonical_path, &canonical_root) {
        return Err(PathSecurityError::OutsideRootDirectory {
            path: canonical_path,
            root: canonical_root,
        });
    }

    Ok(canonical_path)
}

/// Validates a file path that may not exist yet (e.g. a save destination).
///
/// Without a root directory every path is accepted unchanged. With one, the
/// parent directory must exist and pass [`validate_path`]; the returned path
/// is the canonical parent joined with the file name.
pub fn validate_output_path(path: &Path, config: &Config) -> Result<PathBuf, PathSecurityError> {
    if config.security.root_path.is_none() {
        return Ok(path.to_path_buf());
    }

    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(PathSecurityError::NoParent {
            path: path.to_path_buf(),
        });
    };

    let canonical_parent = validate_path(parent, config)?;
    Ok(canonical_parent.join(file_name))
}

/// Checks if a path is within (or equal to) a root directory
fn is_within_root(path: &Path, root: &Path) -> bool {
    path.starts_with(root)
}

/// Canonicalizes a path, reporting a missing path as [`PathSecurityError::PathNotFound`].
fn canonicalize_path(path: &Path) -> Result<PathBuf, PathSecurityError> {
    path.canonicalize().map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            PathSecurityError::PathNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PathSecurityError::CannotCanonicalize {
                path: path.to_path_buf(),
                error: e,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_config(root: Option<PathBuf>, allow_symlinks: bool) -> Config {
        use crate::core::config::SecurityConfig;

        let mut config = Config::default();
        config.security = SecurityConfig {
            root_path: root,
            allow_symlinks,
        };
        config
    }

    #[test]
    fn test_no_root_allows_existing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(None, true);

        let result = validate_path(temp_dir.path(), &config);
        assert_eq!(result.unwrap(), temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    fn test_project_within_root() {
        let temp_dir = TempDir::new().unwrap();
        let project = temp_dir.path().join("project");
        fs::create_dir(&project).unwrap();

        let config = create_test_config(Some(temp_dir.path().to_path_buf()), true);
        assert!(validate_path(&project, &config).is_ok());
    }

    #[test]
    fn test_project_outside_root() {
        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);
        let result = validate_path(outside_dir.path(), &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_path_traversal_blocked() {
        let temp_dir = TempDir::new().unwrap();
        let subdir = temp_dir.path().join("subdir");
        fs::create_dir(&subdir).unwrap();

        // `subdir/..` resolves to the temp dir, which is outside the subdir root
        let config = create_test_config(Some(subdir.clone()), true);
        let result = validate_path(subdir.join(".."), &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[test]
    fn test_nonexistent_path() {
        let temp_dir = TempDir::new().unwrap();
        let nonexistent = temp_dir.path().join("does_not_exist");

        let config = create_test_config(Some(temp_dir.path().to_path_buf()), true);
        let result = validate_path(&nonexistent, &config);
        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));

        let config = create_test_config(None, true);
        let result = validate_path(&nonexistent, &config);
        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_outside_root_blocked() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let link = root_dir.path().join("linked-project");
        symlink(outside_dir.path(), &link).unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);
        let result = validate_path(&link, &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::OutsideRootDirectory { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_disallowed_by_config() {
        use std::os::unix::fs::symlink;

        let root_dir = TempDir::new().unwrap();
        let outside_dir = TempDir::new().unwrap();
        let link = root_dir.path().join("linked-project");
        symlink(outside_dir.path(), &link).unwrap();

        let config = create_test_config(Some(root_dir.path().to_path_buf()), false);
        let result = validate_path(&link, &config);

        assert!(matches!(
            result,
            Err(PathSecurityError::SymlinkOutsideRoot { .. })
        ));
    }

    #[test]
    fn test_output_path_without_root_is_unchanged() {
        let config = create_test_config(None, true);
        let path = PathBuf::from("/anywhere/out.txt");
        assert_eq!(validate_output_path(&path, &config).unwrap(), path);
    }

    #[test]
    fn test_output_path_inside_root() {
        let root_dir = TempDir::new().unwrap();
        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);

        let resolved = validate_output_path(&root_dir.path().join("out.txt"), &config).unwrap();
        assert_eq!(
            resolved,
            root_dir.path().canonicalize().unwrap().join("out.txt")
        );
    }

    #[test]
    fn test_output_path_with_missing_parent() {
        let root_dir = TempDir::new().unwrap();
        let config = create_test_config(Some(root_dir.path().to_path_buf()), true);

        let result = validate_output_path(&root_dir.path().join("missing/out.txt"), &config);
        assert!(matches!(result, Err(PathSecurityError::PathNotFound { .. })));
    }
}
