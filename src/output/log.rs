//! Per-run transition log.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Local;

use crate::error::Result;

/// Timestamped log of every major transition, written inside the output
/// directory. Created once per run, handed to both orchestrators, and
/// flushed on every line so a crashed run still leaves its trail.
pub struct RunLog {
    writer: Option<Mutex<BufWriter<File>>>,
    path: Option<PathBuf>,
}

impl RunLog {
    /// Create `sharefetch_<timestamp>.log` inside `dir`.
    pub fn create(dir: &Path) -> Result<RunLog> {
        std::fs::create_dir_all(dir)?;
        let name = format!("sharefetch_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(RunLog {
            writer: Some(Mutex::new(BufWriter::new(file))),
            path: Some(path),
        })
    }

    /// A sink that records nothing.
    pub fn disabled() -> RunLog {
        RunLog {
            writer: None,
            path: None,
        }
    }

    /// Where the log lives, when enabled.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Append one timestamped line. Logging failures never disturb the run.
    pub fn event(&self, message: &str) {
        let Some(writer) = &self.writer else {
            return;
        };
        if let Ok(mut w) = writer.lock() {
            let _ = writeln!(w, "[{}] {}", Local::now().format("%Y-%m-%dT%H:%M:%S"), message);
            let _ = w.flush();
        }
    }
}
