use crate::domain::LineStorage;
use crate::utils::error::Result;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

/// Data files living side by side in one directory.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn full_path(&self, file: &str) -> PathBuf {
        self.base_path.join(file)
    }
}

impl LineStorage for LocalStorage {
    fn append_line(&self, file: &str, line: &str) -> Result<()> {
        let full_path = self.full_path(file);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&full_path)?;
        writeln!(out, "{}", line)?;
        out.flush()?;
        tracing::debug!("Appended line to {}", full_path.display());
        Ok(())
    }

    fn read_lines(&self, file: &str) -> Result<Option<Vec<String>>> {
        let full_path = self.full_path(file);
        if !full_path.exists() {
            return Ok(None);
        }

        let reader = BufReader::new(fs::File::open(&full_path)?);
        let lines = reader.lines().collect::<std::io::Result<Vec<_>>>()?;
        Ok(Some(lines))
    }
}
