//! Filesystem connector: recipe discovery and loading.
//!
//! [`scan_markdown`] walks the source root depth-first and lazily yields the
//! path of every recipe file. [`read_text`] loads one file as UTF-8 text.

use anyhow::{bail, Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::SourceConfig;

/// Lazily enumerate recipe files under `root`.
///
/// Directories are recursed into but never yielded. Entries within a
/// directory are visited in file-name order. The first unreadable
/// directory surfaces as an `Err` item.
pub fn scan_markdown(
    root: &Path,
    source: &SourceConfig,
) -> Result<impl Iterator<Item = Result<PathBuf>>> {
    if !root.exists() {
        bail!("Recipe root does not exist: {}", root.display());
    }

    let exclude_set = build_globset(&source.exclude_globs)?;
    let suffix = format!(".{}", source.extension.trim_start_matches('.'));
    let root_owned = root.to_path_buf();

    let walker = WalkDir::new(root)
        .follow_links(source.follow_symlinks)
        .sort_by_file_name();

    let iter = walker.into_iter().filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => return Some(Err(anyhow::Error::new(e).context("Failed to walk recipe root"))),
        };
        if !entry.file_type().is_file() {
            return None;
        }

        let path = entry.into_path();
        let name_matches = path
            .file_name()
            .map(|n| n.to_string_lossy().ends_with(&suffix))
            .unwrap_or(false);
        if !name_matches {
            return None;
        }

        let relative = path.strip_prefix(&root_owned).unwrap_or(&path);
        if exclude_set.is_match(relative) {
            tracing::debug!(path = %path.display(), "excluded");
            return None;
        }

        Some(Ok(path))
    });

    Ok(iter)
}

/// Read a file as UTF-8 text.
///
/// Decoding is lossy: invalid sequences become U+FFFD and a leading byte
/// order mark is dropped.
pub fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "invalid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
