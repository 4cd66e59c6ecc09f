//! JSON persistence for save records.
//!
//! One file per level (`level-<n>.json`) inside the save directory. Writes go
//! through a temp file and a rename so a crash never leaves half a record.
//!
//! Decoding is tolerant per entry: a position or connection that does not
//! parse is dropped with a warning, the rest of the record survives.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::{ConnectionEntry, PositionEntry, SaveRecord};

// ============== Wire types ==============

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PositionWire {
    correct_row: i32,
    correct_col: i32,
    pixel_x: f32,
    pixel_y: f32,
    #[serde(default)]
    locked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionWire {
    a_row: i32,
    a_col: i32,
    b_row: i32,
    b_col: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordOut<'a> {
    level: u32,
    timestamp: i64,
    grid_size: u8,
    positions: &'a [PositionWire],
    connections: &'a [ConnectionWire],
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordIn {
    level: u32,
    #[serde(default)]
    timestamp: i64,
    #[serde(default)]
    grid_size: u8,
    #[serde(default)]
    positions: Vec<serde_json::Value>,
    #[serde(default)]
    connections: Vec<serde_json::Value>,
}

impl From<&PositionEntry> for PositionWire {
    fn from(e: &PositionEntry) -> Self {
        Self {
            correct_row: e.correct_row,
            correct_col: e.correct_col,
            pixel_x: e.pixel_x,
            pixel_y: e.pixel_y,
            locked: e.locked,
        }
    }
}

impl From<PositionWire> for PositionEntry {
    fn from(w: PositionWire) -> Self {
        Self {
            correct_row: w.correct_row,
            correct_col: w.correct_col,
            pixel_x: w.pixel_x,
            pixel_y: w.pixel_y,
            locked: w.locked,
        }
    }
}

impl From<&ConnectionEntry> for ConnectionWire {
    fn from(e: &ConnectionEntry) -> Self {
        Self {
            a_row: e.a_row,
            a_col: e.a_col,
            b_row: e.b_row,
            b_col: e.b_col,
        }
    }
}

impl From<ConnectionWire> for ConnectionEntry {
    fn from(w: ConnectionWire) -> Self {
        Self {
            a_row: w.a_row,
            a_col: w.a_col,
            b_row: w.b_row,
            b_col: w.b_col,
        }
    }
}

// ============== Encode / decode ==============

pub fn encode(record: &SaveRecord) -> Result<Vec<u8>> {
    let positions: Vec<PositionWire> = record.positions.iter().map(Into::into).collect();
    let connections: Vec<ConnectionWire> = record.connections.iter().map(Into::into).collect();
    let out = RecordOut {
        level: record.level,
        timestamp: record.timestamp,
        grid_size: record.grid_size,
        positions: &positions,
        connections: &connections,
    };
    serde_json::to_vec_pretty(&out).context("failed to encode save record")
}

/// Decode a record. Fails only when the envelope itself is unreadable.
pub fn decode(bytes: &[u8]) -> Result<SaveRecord> {
    let raw: RecordIn = serde_json::from_slice(bytes).context("malformed save record")?;

    let mut positions = Vec::with_capacity(raw.positions.len());
    for value in raw.positions {
        match serde_json::from_value::<PositionWire>(value) {
            Ok(w) => positions.push(w.into()),
            Err(err) => warn!(error = %err, "skipping malformed position entry"),
        }
    }

    let mut connections = Vec::with_capacity(raw.connections.len());
    for value in raw.connections {
        match serde_json::from_value::<ConnectionWire>(value) {
            Ok(w) => connections.push(w.into()),
            Err(err) => warn!(error = %err, "skipping malformed connection entry"),
        }
    }

    Ok(SaveRecord {
        level: raw.level,
        timestamp: raw.timestamp,
        grid_size: raw.grid_size,
        positions,
        connections,
    })
}

// ============== Store ==============

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, level: u32) -> PathBuf {
        self.dir.join(format!("level-{}.json", level))
    }

    pub fn save(&self, record: &SaveRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.path_for(record.level);
        let tmp = path.with_extension("json.tmp");
        let bytes = encode(record)?;
        fs::write(&tmp, &bytes).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to move save into {}", path.display()))?;
        debug!(path = %path.display(), entries = record.positions.len(), "saved puzzle");
        Ok(path)
    }

    /// `Ok(None)` when no save exists for `level`.
    pub fn load(&self, level: u32) -> Result<Option<SaveRecord>> {
        let path = self.path_for(level);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        decode(&bytes)
            .with_context(|| format!("in {}", path.display()))
            .map(Some)
    }

    /// Returns whether a file was removed.
    pub fn remove(&self, level: u32) -> Result<bool> {
        let path = self.path_for(level);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn temp_dir() -> PathBuf {
        static COUNTER: AtomicU32 = AtomicU32::new(0);
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!("jigsaw-store-{}-{}", std::process::id(), n))
    }

    fn sample_record() -> SaveRecord {
        SaveRecord {
            level: 4,
            timestamp: 1_700_000_000_000,
            grid_size: 2,
            positions: vec![PositionEntry {
                correct_row: 1,
                correct_col: 0,
                pixel_x: 20.0,
                pixel_y: 10.0,
                locked: true,
            }],
            connections: vec![ConnectionEntry {
                a_row: 0,
                a_col: 0,
                b_row: 0,
                b_col: 1,
            }],
        }
    }

    #[test]
    fn encode_uses_camel_case_keys() {
        let json = String::from_utf8(encode(&sample_record()).unwrap()).unwrap();
        assert!(json.contains("\"correctRow\""));
        assert!(json.contains("\"pixelX\""));
        assert!(json.contains("\"aRow\""));
        assert!(json.contains("\"gridSize\""));
    }

    #[test]
    fn decode_skips_bad_entries() {
        let json = br#"{
            "level": 2,
            "timestamp": 5,
            "positions": [
                {"correctRow": 0, "correctCol": 1, "pixelX": 0.0, "pixelY": 0.0, "locked": false},
                {"correctRow": "zero"},
                42
            ],
            "connections": [{"aRow": 0}]
        }"#;
        let record = decode(json).unwrap();
        assert_eq!(record.level, 2);
        assert_eq!(record.grid_size, 0);
        assert_eq!(record.positions.len(), 1);
        assert!(record.connections.is_empty());
    }

    #[test]
    fn decode_rejects_broken_envelope() {
        assert!(decode(b"not json").is_err());
        assert!(decode(br#"{"positions": []}"#).is_err());
    }

    #[test]
    fn store_save_load_remove() {
        let dir = temp_dir();
        let store = SaveStore::new(&dir);
        assert!(store.load(4).unwrap().is_none());

        let record = sample_record();
        let path = store.save(&record).unwrap();
        assert_eq!(path, dir.join("level-4.json"));
        assert!(!dir.join("level-4.json.tmp").exists());
        assert_eq!(store.load(4).unwrap(), Some(record));

        assert!(store.remove(4).unwrap());
        assert!(!store.remove(4).unwrap());
        let _ = fs::remove_dir_all(&dir);
    }
}
