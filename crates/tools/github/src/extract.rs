//! Release archive extraction.
//!
//! Supports the two formats GitHub releases ship in (zip, tar.gz). Leading
//! path components can be stripped so that an archive wrapping everything in
//! `step_0.28.6/` unpacks straight into the destination.

use flate2::read::GzDecoder;
use setup_step_core::{ArchiveKind, Error, ExtractOptions, Result};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use tar::Archive;
use tracing::{debug, trace};

/// Unpack `archive` into `dest`.
///
/// Entries whose path becomes empty after stripping are skipped, as are
/// entries that would escape `dest`.
pub fn unpack(
    archive: &Path,
    dest: &Path,
    kind: ArchiveKind,
    options: ExtractOptions,
) -> Result<PathBuf> {
    debug!(?archive, ?dest, ?kind, strip = options.strip_components, "Extracting archive");
    std::fs::create_dir_all(dest)?;

    let result = match kind {
        ArchiveKind::TarGz => unpack_tar_gz(archive, dest, options.strip_components),
        ArchiveKind::Zip => unpack_zip(archive, dest, options.strip_components),
    };
    result.map_err(|e| match e {
        Error::Io(io) => {
            Error::extraction(format!("Failed to extract {}: {io}", archive.display()))
        }
        other => other,
    })?;

    Ok(dest.to_path_buf())
}

fn unpack_tar_gz(archive: &Path, dest: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive)?;
    let mut archive = Archive::new(GzDecoder::new(file));
    archive.set_preserve_permissions(true);
    let root = dest.canonicalize()?;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let entry_path = entry.path()?.into_owned();

        let Some(relative) = strip_components(&entry_path, strip) else {
            trace!(?entry_path, "Skipping entry");
            continue;
        };

        let out = dest.join(&relative);
        if let Some(parent) = out.parent() {
            ensure_inside(&root, parent)?;
            std::fs::create_dir_all(parent)?;
        }

        let entry_type = entry.header().entry_type();
        if entry_type.is_symlink() || entry_type.is_hard_link() {
            let target = entry
                .link_name()?
                .map(|name| name.into_owned())
                .unwrap_or_default();
            if !is_plain_relative(&target) {
                return Err(Error::extraction(format!(
                    "Refusing to extract link {} -> {}",
                    entry_path.display(),
                    target.display()
                )));
            }

            if entry_type.is_hard_link() {
                // Hard link targets are archive paths, not paths relative to the link.
                let Some(source) = strip_components(&target, strip) else {
                    return Err(Error::extraction(format!(
                        "Refusing to extract link {} -> {}",
                        entry_path.display(),
                        target.display()
                    )));
                };
                let source = dest.join(source);
                ensure_inside(&root, &source)?;
                if out.symlink_metadata().is_ok() {
                    std::fs::remove_file(&out)?;
                }
                std::fs::hard_link(&source, &out)?;
                continue;
            }
        }

        entry.unpack(&out)?;
    }

    Ok(())
}

fn unpack_zip(archive: &Path, dest: &Path, strip: usize) -> Result<()> {
    let file = File::open(archive)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| Error::extraction(format!("Failed to open zip: {e}")))?;
    let root = dest.canonicalize()?;

    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| Error::extraction(format!("Failed to read zip entry: {e}")))?;

        let Some(entry_path) = file.enclosed_name() else {
            continue;
        };
        let Some(relative) = strip_components(&entry_path, strip) else {
            trace!(?entry_path, "Skipping entry");
            continue;
        };

        let out = dest.join(relative);
        if file.is_dir() {
            ensure_inside(&root, &out)?;
            std::fs::create_dir_all(&out)?;
            continue;
        }

        if let Some(parent) = out.parent() {
            ensure_inside(&root, parent)?;
            std::fs::create_dir_all(parent)?;
        }
        let mut target = File::create(&out)?;
        std::io::copy(&mut file, &mut target)?;

        #[cfg(unix)]
        if let Some(mode) = file.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode))?;
        }
    }

    Ok(())
}

/// Whether a link target stays below the directory holding the link.
fn is_plain_relative(target: &Path) -> bool {
    !target.as_os_str().is_empty()
        && target
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Fail unless `path`, with links resolved, lies under `root`.
///
/// `path` may not exist yet; its nearest existing ancestor is checked.
fn ensure_inside(root: &Path, path: &Path) -> Result<()> {
    let existing = path
        .ancestors()
        .find(|ancestor| ancestor.symlink_metadata().is_ok())
        .unwrap_or(path);
    let resolved = existing.canonicalize()?;
    if resolved.starts_with(root) {
        Ok(())
    } else {
        Err(Error::extraction(format!(
            "Refusing to write {} outside {}",
            path.display(),
            root.display()
        )))
    }
}

/// Drop the first `count` components of `path`.
///
/// Returns `None` when nothing is left or when the path is not a plain
/// relative path (absolute, `..`).
fn strip_components(path: &Path, count: usize) -> Option<PathBuf> {
    let mut parts = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => parts.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    let remaining: PathBuf = parts.into_iter().skip(count).collect();
    if remaining.as_os_str().is_empty() {
        None
    } else {
        Some(remaining)
    }
}
