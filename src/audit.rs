//! Append-only request audit log.
//!
//! One line per inbound request, written before dispatch and regardless of
//! the operation's outcome. Best-effort: a failed append goes to the
//! diagnostic log and never fails the request.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::warn;

use crate::store::now_stamp;

/// One inbound request, as the audit log sees it.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub method: String,
    pub path: String,
    pub query: Value,
    pub body: Value,
    pub origin: String,
}

pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line for the entry. Failures are reported to the
    /// diagnostic channel only.
    pub fn record(&self, entry: &AuditEntry) {
        if let Err(err) = self.append(entry) {
            warn!(
                path = %self.path.display(),
                error = %err,
                "audit log append failed"
            );
        }
    }

    fn append(&self, entry: &AuditEntry) -> std::io::Result<()> {
        let line = format!(
            "{} [{}] {} {} {} {}\n",
            now_stamp(),
            entry.method,
            entry.path,
            entry.query,
            entry.body,
            entry.origin,
        );
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn entry() -> AuditEntry {
        AuditEntry {
            method: "POST".into(),
            path: "/items".into(),
            query: json!({}),
            body: json!({ "Name": "Starfall" }),
            origin: "127.0.0.1".into(),
        }
    }

    #[test]
    fn appends_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("access_log.txt"));

        log.record(&entry());
        log.record(&entry());

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[POST] /items"));
        assert!(lines[0].contains(r#"{"Name":"Starfall"}"#));
        assert!(lines[0].ends_with("127.0.0.1"));
    }

    #[test]
    fn append_failure_does_not_panic_or_propagate() {
        let dir = TempDir::new().unwrap();
        // parent directory does not exist, so every append fails
        let log = AuditLog::new(dir.path().join("missing").join("access_log.txt"));
        log.record(&entry());
    }
}
