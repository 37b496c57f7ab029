//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one entity.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::StorageError;

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let count = write_lines(BufWriter::new(file), entities)?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// Write entities as JSON lines to any writer.
pub fn write_lines<W: Write, T: Serialize>(
    mut writer: W,
    entities: &[T],
) -> Result<usize, StorageError> {
    let mut count = 0;

    for entity in entities {
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file.
    ///
    /// Blank lines are skipped. The first line that fails to parse or
    /// validate aborts the read with its line number.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            let entity = serde_json::from_str(&line).map_err(|e| StorageError::Parse {
                path: self.path.clone(),
                line: idx + 1,
                message: e.to_string(),
            })?;
            entities.push(entity);
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlayerRecord;
    use tempfile::TempDir;

    const RECORDS: &str = r#"{"scope":"s1","equipo":"halcones","nombre":"Felipe","apellido":"Rojas","hits":20,"tirosTotales":61,"setsJugados":9}

{"scope":"s2","equipo":"lobos","nombre":"Ana","apellido":"Ortiz","hits":3}
"#;

    fn write_fixture(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("input").join("players.jsonl");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_all_player_records() {
        let dir = TempDir::new().unwrap();
        let reader = JsonlReader::<PlayerRecord>::new(write_fixture(&dir, RECORDS));

        assert!(reader.exists());
        let records = reader.read_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].counters.tiros_totales, 61);
        assert_eq!(records[1].apellido, "Ortiz");
    }

    #[test]
    fn test_read_reports_line_of_invalid_record() {
        let dir = TempDir::new().unwrap();
        let contents = format!(
            "{}\n{}\n",
            r#"{"scope":"s1","equipo":"e","nombre":"A","apellido":"B"}"#,
            r#"{"scope":"s1","equipo":"e","nombre":"C","apellido":"D","catches":-1}"#
        );
        let reader = JsonlReader::<PlayerRecord>::new(write_fixture(&dir, &contents));

        match reader.read_all() {
            Err(StorageError::Parse { line, message, .. }) => {
                assert_eq!(line, 2);
                assert!(message.contains("catches"));
            }
            other => panic!("expected parse error, got {:?}", other.map(|v| v.len())),
        }
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let reader = JsonlReader::<PlayerRecord>::new(dir.path().join("missing.jsonl"));

        assert!(!reader.exists());
        assert!(matches!(reader.read_all(), Err(StorageError::PathNotFound(_))));
    }

    #[test]
    fn test_write_then_read_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output").join("copy.jsonl");
        let original = JsonlReader::<PlayerRecord>::new(write_fixture(&dir, RECORDS))
            .read_all()
            .unwrap();

        let written = JsonlWriter::new(path.clone()).write_all(&original).unwrap();
        assert_eq!(written, 2);

        let copy = JsonlReader::<PlayerRecord>::new(path).read_all().unwrap();
        assert_eq!(copy, original);
    }

    #[test]
    fn test_write_lines_to_buffer() {
        let mut buf = Vec::new();
        let rows = [serde_json::json!({"a": 1}), serde_json::json!({"b": 2})];
        let count = write_lines(&mut buf, &rows).unwrap();

        assert_eq!(count, 2);
        assert_eq!(String::from_utf8(buf).unwrap(), "{\"a\":1}\n{\"b\":2}\n");
    }
}
