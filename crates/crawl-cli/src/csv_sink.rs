//! CSV snapshot writer.
//!
//! Layout: `{out}/{YYYYMMDDThhmmss}-{start label}/{iteration}/venues.csv` and
//! `.../edge-list.csv`, header-less.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crawl_core::errors::SnapshotError;
use crawl_core::traits::SnapshotSink;
use crawl_core::{EdgeList, VisitedSet};

pub const VENUES_FILE: &str = "venues.csv";
pub const EDGES_FILE: &str = "edge-list.csv";

/// Writes each recorded snapshot into its own iteration directory under a
/// per-run directory.
#[derive(Debug)]
pub struct CsvSnapshotWriter {
    run_dir: PathBuf,
}

impl CsvSnapshotWriter {
    /// Start a run under `out_dir`, stamped with the current local time.
    pub fn create(out_dir: &Path, start_label: &str) -> Result<Self, SnapshotError> {
        Self::create_at(out_dir, start_label, Local::now())
    }

    pub fn create_at(
        out_dir: &Path,
        start_label: &str,
        started: DateTime<Local>,
    ) -> Result<Self, SnapshotError> {
        let run_dir = out_dir.join(run_dir_name(started, start_label));
        fs::create_dir_all(&run_dir).map_err(|e| io_error(&run_dir, e))?;
        tracing::info!(run_dir = %run_dir.display(), "writing snapshots");
        Ok(Self { run_dir })
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// Directory holding the snapshot for `iteration`.
    pub fn iteration_dir(&self, iteration: u64) -> PathBuf {
        self.run_dir.join(iteration.to_string())
    }
}

impl SnapshotSink for CsvSnapshotWriter {
    fn record(
        &mut self,
        iteration: u64,
        visited: &VisitedSet,
        edges: &EdgeList,
    ) -> Result<(), SnapshotError> {
        let dir = self.iteration_dir(iteration);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        write_rows(
            &dir.join(VENUES_FILE),
            visited.iter().map(|n| [n.id.as_str(), n.label.as_str()]),
        )?;
        write_rows(&dir.join(EDGES_FILE), edges.iter().map(|e| {
            let (source, target) = e.ids();
            [source, target]
        }))?;

        tracing::debug!(
            iteration,
            venues = visited.len(),
            edges = edges.len(),
            dir = %dir.display(),
            "snapshot written"
        );
        Ok(())
    }
}

/// `{YYYYMMDDThhmmss}-{label}` with path separators in the label replaced.
pub fn run_dir_name(started: DateTime<Local>, start_label: &str) -> String {
    let label: String = start_label
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    let stamp = started.format("%Y%m%dT%H%M%S");
    if label.is_empty() {
        stamp.to_string()
    } else {
        format!("{stamp}-{label}")
    }
}

fn write_rows<'a, I>(path: &Path, rows: I) -> Result<(), SnapshotError>
where
    I: IntoIterator<Item = [&'a str; 2]>,
{
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| encode_error(path, e))?;
    for row in rows {
        wtr.write_record(row).map_err(|e| encode_error(path, e))?;
    }
    wtr.flush().map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> SnapshotError {
    SnapshotError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn encode_error(path: &Path, e: csv::Error) -> SnapshotError {
    SnapshotError::Encode {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}
