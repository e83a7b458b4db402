//! Packs a resource directory into a registry.
//!
//! # Responsibility
//! - Walk one bundle directory in sorted order and register every regular file.
//! - Derive `/`-separated bundle paths relative to the directory root.
//!
//! # Invariants
//! - Packing is deterministic for the same directory contents.
//! - Symlinks and other special files are skipped, not followed.
//! - Files whose names cannot form a bundle path are skipped and logged;
//!   they never fail the whole bundle.

use crate::resource::registry::{RegistryBuilder, RegistryError, ResourceRegistry};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Bundle packing errors.
#[derive(Debug)]
pub enum BundleError {
    Io { path: PathBuf, source: std::io::Error },
    /// A derived path collides with an entry already in the builder.
    Registry(RegistryError),
}

impl Display for BundleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Registry(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BundleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<RegistryError> for BundleError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<walkdir::Error> for BundleError {
    fn from(value: walkdir::Error) -> Self {
        let path = value.path().map(Path::to_path_buf).unwrap_or_default();
        let message = value.to_string();
        let source = value
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other(message));
        Self::Io { path, source }
    }
}

/// Packs every file under `root` into a new registry.
///
/// # Errors
/// - `Io` when the directory or a file cannot be read.
/// - `Registry` when a derived path is already registered.
pub fn load_bundle_dir(root: impl AsRef<Path>) -> Result<ResourceRegistry, BundleError> {
    let mut builder = RegistryBuilder::new();
    add_bundle_dir(&mut builder, root)?;
    Ok(builder.build())
}

/// Adds every file under `root` to an existing builder.
pub fn add_bundle_dir(
    builder: &mut RegistryBuilder,
    root: impl AsRef<Path>,
) -> Result<(), BundleError> {
    let root = root.as_ref();
    let started_at = Instant::now();
    let before = builder.len();

    match walk(builder, root) {
        Ok(skipped) => {
            info!(
                "event=bundle_pack module=resource status=ok files={} skipped={} duration_ms={}",
                builder.len() - before,
                skipped,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=bundle_pack module=resource status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Registers the regular files under `root`; returns how many were skipped.
fn walk(builder: &mut RegistryBuilder, root: &Path) -> Result<usize, BundleError> {
    let mut skipped = 0;
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry?;
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        if !file_type.is_file() {
            debug!(
                "event=bundle_pack module=resource status=skip reason=special_file path={}",
                entry.path().display()
            );
            skipped += 1;
            continue;
        }

        let Some(bundle_path) = bundle_path(root, entry.path()) else {
            warn!(
                "event=bundle_pack module=resource status=skip reason=non_utf8_path path={}",
                entry.path().display()
            );
            skipped += 1;
            continue;
        };
        let content = std::fs::read(entry.path()).map_err(|source| BundleError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        match builder.register_inferred(&bundle_path, content) {
            Ok(()) => {}
            Err(RegistryError::InvalidPath(path)) => {
                warn!(
                    "event=bundle_pack module=resource status=skip reason=invalid_path path={}",
                    path
                );
                skipped += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(skipped)
}

fn bundle_path(root: &Path, file: &Path) -> Option<String> {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let segments = relative
        .components()
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::{add_bundle_dir, load_bundle_dir, BundleError};
    use crate::resource::registry::{RegistryBuilder, RegistryError};
    use std::fs;

    #[test]
    fn packs_nested_files_with_relative_paths() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::create_dir_all(dir.path().join("images/icons")).expect("mkdir");
        fs::write(dir.path().join("drawio.css"), "a{}").expect("write css");
        fs::write(dir.path().join("images/icons/x.svg"), "<svg/>").expect("write svg");

        let registry = load_bundle_dir(dir.path()).expect("bundle packs");
        assert_eq!(
            registry.paths().collect::<Vec<_>>(),
            vec!["drawio.css", "images/icons/x.svg"]
        );
        let svg = registry
            .lookup("local://images/icons/x.svg")
            .expect("svg entry");
        assert_eq!(svg.content_type(), "image/svg+xml");
        assert_eq!(svg.content().as_ref(), b"<svg/>");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent");
        let err = load_bundle_dir(&missing).expect_err("missing dir");
        match err {
            BundleError::Io { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_file_names_are_skipped_without_dropping_the_bundle() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("bad name.css"), "a{}").expect("write bad");
        fs::write(dir.path().join("drawio.css"), "b{}").expect("write css");
        fs::create_dir_all(dir.path().join("img")).expect("mkdir");
        fs::write(dir.path().join("img/ok.png"), [1_u8, 2]).expect("write png");

        let registry = load_bundle_dir(dir.path()).expect("bundle packs");
        assert_eq!(
            registry.paths().collect::<Vec<_>>(),
            vec!["drawio.css", "img/ok.png"]
        );
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempfile::tempdir().expect("temp dir");
        let outside = tempfile::tempdir().expect("outside dir");
        fs::write(outside.path().join("secret.txt"), "x").expect("write secret");
        fs::write(dir.path().join("drawio.css"), "a{}").expect("write css");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked"))
            .expect("symlink dir");

        let registry = load_bundle_dir(dir.path()).expect("bundle packs");
        assert_eq!(registry.paths().collect::<Vec<_>>(), vec!["drawio.css"]);
    }

    #[test]
    fn paths_already_in_the_builder_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("drawio.css"), "a{}").expect("write css");

        let mut builder = RegistryBuilder::new();
        builder
            .register_inferred("drawio.css", "builtin{}")
            .expect("first registration");
        let err = add_bundle_dir(&mut builder, dir.path()).expect_err("duplicate path");
        assert!(matches!(
            err,
            BundleError::Registry(RegistryError::DuplicatePath(ref path)) if path == "drawio.css"
        ));
    }
}
