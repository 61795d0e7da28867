//! Journal tree discovery
//!
//! Walks the journal root in lexical order and sorts files into markdown
//! logs and exercise scripts by extension. Hidden entries, excluded
//! directory names and the rendered overview itself are never returned.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use logbook_core::LogbookConfig;
use walkdir::{DirEntry, WalkDir};

use crate::error::IngestError;

/// Files found under a journal root, each list in lexical path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    pub logs: Vec<PathBuf>,
    pub exercises: Vec<PathBuf>,
}

pub fn discover(root: &Path, config: &LogbookConfig) -> Result<Discovered, IngestError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(IngestError::RootNotFound(root.to_path_buf())),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(IngestError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    }

    let journal = &config.journal;
    let output = root.join(&config.render.output);
    let mut found = Discovered::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(e, &journal.exclude));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.path() == output {
            continue;
        }

        let Some(ext) = entry.path().extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if has_extension(ext, &journal.log_extensions) {
            found.logs.push(entry.into_path());
        } else if has_extension(ext, &journal.exercise_extensions) {
            found.exercises.push(entry.into_path());
        }
    }

    tracing::info!(
        "Discovered {} logs and {} exercises under {}",
        found.logs.len(),
        found.exercises.len(),
        root.display()
    );
    Ok(found)
}

/// `path` relative to `root`, `/`-separated whatever the platform.
pub fn source_of(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_skipped(entry: &DirEntry, exclude: &[String]) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || exclude.iter().any(|x| *x == name)
}

fn has_extension(ext: &str, wanted: &[String]) -> bool {
    wanted
        .iter()
        .any(|w| w.trim_start_matches('.').eq_ignore_ascii_case(ext))
}
