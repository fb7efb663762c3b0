//! Upload batches
//!
//! Each batch of files gets a generation number. Files are read and parsed
//! independently; once every read has settled the results are joined and
//! committed, unless a newer batch was started in the meantime.

use rayon::prelude::*;
use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use crate::core::ListeningEvent;
use crate::error::{AppError, IngestError};
use crate::ingest::parser::{ParsedHistory, file_label, parse_file};

/// Per-file problem reported for a batch. An empty batch is
/// `AppError::NoFiles` instead, since there is nothing to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Notice {
    pub(crate) file: String,
    pub(crate) message: String,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Handle for one submitted batch
#[derive(Debug, Clone)]
pub(crate) struct BatchTicket {
    generation: u64,
    files: Vec<PathBuf>,
}

impl BatchTicket {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of reading one file of a batch
#[derive(Debug)]
pub(crate) struct FileOutcome {
    pub(crate) file: String,
    pub(crate) result: Result<ParsedHistory, IngestError>,
}

/// Committed state of the latest completed batch
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub(crate) generation: u64,
    /// Names of every file in the batch, including ones that failed
    pub(crate) files: Vec<String>,
    pub(crate) events: Vec<ListeningEvent>,
    pub(crate) notices: Vec<Notice>,
    /// Records dropped during validation across all files
    pub(crate) invalid_records: usize,
}

#[derive(Debug, Default)]
pub(crate) struct UploadSession {
    generation: u64,
    uploaded: Vec<String>,
    snapshot: Option<Snapshot>,
}

impl UploadSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Start a new batch. Any batch still in flight becomes stale.
    pub(crate) fn begin(&mut self, files: Vec<PathBuf>) -> Result<BatchTicket, AppError> {
        if files.is_empty() {
            return Err(AppError::NoFiles);
        }
        self.generation += 1;
        self.uploaded = files.iter().map(|p| file_label(p)).collect();
        tracing::debug!(
            generation = self.generation,
            "Started batch of {} files",
            files.len()
        );
        Ok(BatchTicket {
            generation: self.generation,
            files,
        })
    }

    /// File names of the most recently started batch
    pub(crate) fn uploaded_files(&self) -> &[String] {
        &self.uploaded
    }

    /// Commit a batch's outcomes. Returns `None` when the ticket is stale.
    pub(crate) fn complete(
        &mut self,
        ticket: BatchTicket,
        outcomes: Vec<FileOutcome>,
    ) -> Option<&Snapshot> {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "Discarding results of a superseded batch"
            );
            return None;
        }

        let mut snapshot = Snapshot {
            generation: ticket.generation,
            files: ticket.files.iter().map(|p| file_label(p)).collect(),
            ..Snapshot::default()
        };
        for outcome in outcomes {
            match outcome.result {
                Ok(parsed) => {
                    snapshot.invalid_records += parsed.invalid;
                    snapshot.events.extend(parsed.events);
                }
                Err(err) => {
                    tracing::debug!(file = err.file(), "{:?}", err);
                    snapshot.notices.push(Notice {
                        file: outcome.file,
                        message: err.to_string(),
                    });
                }
            }
        }

        self.snapshot = Some(snapshot);
        self.snapshot.as_ref()
    }
}

/// Read and parse every file of a batch in parallel.
/// Outcomes come back in ticket order whatever order the reads finish in.
pub(crate) fn load_batch(ticket: &BatchTicket) -> Vec<FileOutcome> {
    let start = Instant::now();
    tracing::info!("Scanning {} files...", ticket.files.len());

    let outcomes: Vec<FileOutcome> = ticket
        .files
        .par_iter()
        .map(|path| FileOutcome {
            file: file_label(path),
            result: parse_file(path),
        })
        .collect();

    tracing::info!(
        "Parsed {} files ({:.2}ms)",
        outcomes.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    outcomes
}
