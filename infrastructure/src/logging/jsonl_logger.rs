//! JSONL file writer for conversation events.
//!
//! Each [`ConversationEvent`] is serialized as a single JSON line with a
//! `type`, a `timestamp` and a per-process `seq` number, appended to the
//! transcript through a buffered writer. Transcripts from several runs
//! accumulate in the same file.

use agentdesk_application::{ConversationEvent, ConversationLogger};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

struct Transcript {
    writer: BufWriter<File>,
    seq: u64,
}

/// JSONL conversation logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`. Flushes after every event and on `Drop`.
pub struct JsonlConversationLogger {
    transcript: Mutex<Transcript>,
    path: PathBuf,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path` for appending.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; the chat works without a transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            transcript: Mutex::new(Transcript {
                writer: BufWriter::new(file),
                seq: 0,
            }),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the transcript file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn record(event: ConversationEvent, seq: u64) -> Value {
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    let mut map = match event.payload {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert("type".to_string(), Value::String(event.event_type.to_string()));
    map.insert("timestamp".to_string(), Value::String(timestamp));
    map.insert("seq".to_string(), Value::from(seq));
    Value::Object(map)
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let Ok(mut transcript) = self.transcript.lock() else {
            return;
        };
        transcript.seq += 1;
        let seq = transcript.seq;

        let Ok(line) = serde_json::to_string(&record(event, seq)) else {
            return;
        };
        let _ = writeln!(transcript.writer, "{}", line);
        let _ = transcript.writer.flush();
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut transcript) = self.transcript.lock() {
            let _ = transcript.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new(
            "message_sent",
            json!({"epoch": 1, "id": "local-5", "text": "hola"}),
        ));
        logger.log(ConversationEvent::new(
            "message_received",
            json!({"epoch": 1, "role": "agent", "content": "buenas"}),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "message_sent");
        assert_eq!(records[0]["text"], "hola");
        assert_eq!(records[0]["seq"], 1);
        assert!(records[0]["timestamp"].is_string());
        assert_eq!(records[1]["type"], "message_received");
        assert_eq!(records[1]["seq"], 2);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chat.jsonl");
        let logger = JsonlConversationLogger::new(&path).unwrap();

        logger.log(ConversationEvent::new("frame_dropped", json!("garbage")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "frame_dropped");
        assert_eq!(records[0]["data"], "garbage");
    }

    #[test]
    fn test_appends_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("chat.jsonl");

        for _ in 0..2 {
            let logger = JsonlConversationLogger::new(&path).unwrap();
            assert_eq!(logger.path(), path.as_path());
            logger.log(ConversationEvent::new("session_started", json!({"epoch": 1})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened as a file
        assert!(JsonlConversationLogger::new(dir.path()).is_none());
    }
}
