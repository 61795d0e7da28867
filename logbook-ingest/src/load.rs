use std::path::{Path, PathBuf};

use logbook_core::models::{Exercise, Overview, WeekLog};
use logbook_core::{merge_with, parse_exercise, parse_week_log, LogbookConfig, MergeOptions};

use crate::discover::{discover, source_of};
use crate::error::IngestError;

/// Parse every markdown log. Unreadable files are skipped with a warning and
/// files with nothing in them worth merging are dropped.
pub fn load_week_logs(root: &Path, paths: &[PathBuf]) -> Vec<WeekLog> {
    let mut logs = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(document) = read_lossy(path) else {
            continue;
        };
        let source = source_of(root, path);
        let log = parse_week_log(&source, &document);
        if log.is_empty() {
            tracing::debug!("No day entries in {}, skipping", source);
            continue;
        }
        tracing::debug!("Parsed {} entries from {} (week {})", log.entries.len(), source, log.week);
        logs.push(log);
    }
    logs
}

pub fn load_exercises(root: &Path, paths: &[PathBuf]) -> Vec<Exercise> {
    paths
        .iter()
        .filter_map(|path| {
            let source = read_lossy(path)?;
            Some(parse_exercise(&source_of(root, path), &source))
        })
        .collect()
}

/// Discover, parse and merge a whole journal, then attach its exercises.
pub fn build_overview(config: &LogbookConfig) -> Result<Overview, IngestError> {
    let root = config.journal.root_path();
    let found = discover(&root, config)?;

    let logs = load_week_logs(&root, &found.logs);
    let exercises = load_exercises(&root, &found.exercises);

    let overview = merge_with(&logs, &MergeOptions::from(config)).with_exercises(&exercises);
    if !overview.unmatched_exercises.is_empty() {
        tracing::info!(
            "{} exercises have no matching day entry",
            overview.unmatched_exercises.len()
        );
    }
    Ok(overview)
}

fn read_lossy(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::warn!("Could not read {}: {}", path.display(), e);
            None
        }
    }
}
