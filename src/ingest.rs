// Transcript ingestion — CSV transcripts in, flagged rows out.
//
// Transcripts are plain CSV with an `id,message` header. The whole file is
// read up front: batches are small enough that streaming buys nothing, and
// the row count is needed for the upload audit event before scanning starts.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One row of an uploaded chat transcript.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "message")]
    pub text: String,
}

/// Read a transcript CSV with `id,message` columns.
pub fn read_transcript(path: &Path) -> Result<Vec<Message>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open transcript {}", path.display()))?;

    let mut messages = Vec::new();
    for result in reader.deserialize() {
        let message: Message =
            result.with_context(|| format!("Failed to parse transcript {}", path.display()))?;
        messages.push(message);
    }
    Ok(messages)
}

/// One row of the flagged-messages export.
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedRow {
    pub id: String,
    pub message: String,
    pub severity: String,
    pub match_count: u32,
    pub compound: f64,
}

/// Write flagged messages to a CSV file.
pub fn write_flagged(path: &Path, rows: &[FlaggedRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .context("Failed to write flagged row")?;
    }
    writer.flush().context("Failed to flush flagged CSV")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_id_and_message_columns() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,message").unwrap();
        writeln!(file, "1,hello there").unwrap();
        writeln!(file, "2,\"don't tell, ok?\"").unwrap();
        file.flush().unwrap();

        let messages = read_transcript(file.path()).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].id, "1");
        assert_eq!(messages[0].text, "hello there");
        assert_eq!(messages[1].text, "don't tell, ok?");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = read_transcript(Path::new("/nonexistent/chats.csv")).unwrap_err();
        assert!(err.to_string().contains("Failed to open transcript"));
    }

    #[test]
    fn writes_flagged_rows_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flagged.csv");
        let rows = vec![FlaggedRow {
            id: "7".to_string(),
            message: "it's our secret".to_string(),
            severity: "High Risk".to_string(),
            match_count: 2,
            compound: -0.3,
        }];

        write_flagged(&path, &rows).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,message,severity,match_count,compound"
        );
        assert!(lines.next().unwrap().contains("High Risk"));
    }
}
