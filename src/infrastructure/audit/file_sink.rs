// src/infrastructure/audit/file_sink.rs
use crate::domain::audit::{AuditEvent, AuditSink};
use crate::domain::errors::DomainResult;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Append-only JSON-lines file: one serialized event per line.
pub struct JsonLinesFileSink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesFileSink {
    pub fn open(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonLinesFileSink {
    fn name(&self) -> &str {
        "jsonl-file"
    }

    fn write(&self, event: &AuditEvent) -> DomainResult<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        // Each event must reach the file even if the process dies right after.
        writer.flush()?;
        Ok(())
    }

    fn flush(&self) -> DomainResult<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.flush()?;
        writer.get_ref().sync_data()?;
        Ok(())
    }
}
