// Append-only JSONL segment files.
//
// One file per UTC day, named audit-YYYY-MM-DD.jsonl. Files are opened in
// append mode and never truncated or rewritten; each event is a complete
// serialized line followed by a newline, flushed before the append returns.
// The writer holds the current day's handle open and reopens when the date
// rolls over.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use chrono::NaiveDate;
use thiserror::Error;

use super::event::AuditEvent;

/// Errors from the audit pipeline.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to create audit directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to open audit segment {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to append to audit segment {}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read audit segment {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to encode audit event")]
    Encode(#[from] serde_json::Error),
}

struct SegmentHandle {
    path: PathBuf,
    file: File,
}

/// Appends events to the current day's segment file.
pub struct SegmentWriter {
    dir: PathBuf,
    handle: Mutex<Option<SegmentHandle>>,
}

impl SegmentWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            handle: Mutex::new(None),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Append one event to the segment for the event's date.
    ///
    /// The line is fully encoded before the handle lock is taken, so an
    /// encoding failure never leaves a partial line in the file.
    pub fn append(&self, event: &AuditEvent) -> Result<(), AuditError> {
        let path = segment_path(&self.dir, event.timestamp.date_naive());

        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut guard = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let needs_reopen = match &*guard {
            Some(handle) => handle.path != path,
            None => true,
        };

        if needs_reopen {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| AuditError::Open {
                    path: path.clone(),
                    source,
                })?;
            *guard = Some(SegmentHandle {
                path: path.clone(),
                file,
            });
        }

        if let Some(handle) = guard.as_mut() {
            handle
                .file
                .write_all(&line)
                .map_err(|source| AuditError::Append {
                    path: path.clone(),
                    source,
                })?;
            handle.file.flush().map_err(|source| AuditError::Append {
                path: path.clone(),
                source,
            })?;
        }

        Ok(())
    }
}

/// Path of the segment file for the given date.
pub fn segment_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("audit-{}.jsonl", date.format("%Y-%m-%d")))
}

/// Open a segment for reading. A missing segment is not an error: a day
/// with no events has no file.
pub fn open_segment(dir: &Path, date: NaiveDate) -> Result<Option<File>, AuditError> {
    let path = segment_path(dir, date);
    match File::open(&path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(AuditError::Read { path, source }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_path_embeds_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let path = segment_path(Path::new("/var/log/audit"), date);
        assert_eq!(path, Path::new("/var/log/audit/audit-2025-03-09.jsonl"));
    }
}
