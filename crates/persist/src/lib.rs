//! Deckhand persistence: SQLite history of command results.
//! Keep code tiny and predictable.

#![forbid(unsafe_code)]

use anyhow::{anyhow, Context, Result};
use deckhand_core::{CommandResult, Redacted};
use metrics::{counter, histogram};
use tracing::debug;

/// A command result as kept in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredResult {
    pub id: String,
    pub cluster_id: String,
    pub ts: i64,
    /// Compacted YAML document of the result.
    pub yaml: String,
}

/// Durable sink for redacted command results.
pub trait ResultStore {
    fn write_command_result(&self, cr: &Redacted<CommandResult>) -> Result<()>;
    /// Newest first.
    fn list_command_results(&self, limit: Option<usize>) -> Result<Vec<StoredResult>>;
}

/// SQLite-backed store. Simple, synchronous; one write per command run.
pub struct SqliteStore {
    db: std::sync::Mutex<rusqlite::Connection>,
    keep: usize,
}

impl SqliteStore {
    pub fn open_default() -> Result<Self> {
        let path = std::env::var("DECKHAND_DB_PATH").unwrap_or_else(|_| default_db_path());
        Self::open(&path)
    }

    pub fn open(path: &str) -> Result<Self> {
        let started = std::time::Instant::now();
        let db = rusqlite::Connection::open(path).with_context(|| format!("opening sqlite db at {}", path))?;
        db.pragma_update(None, "journal_mode", "WAL").ok();
        db.pragma_update(None, "synchronous", "NORMAL").ok();
        db.execute(
            "CREATE TABLE IF NOT EXISTS command_results (
                id         TEXT PRIMARY KEY,
                cluster_id TEXT NOT NULL,
                ts         INTEGER NOT NULL,
                yaml       BLOB NOT NULL
            )",
            [],
        ).context("creating command_results table")?;
        db.execute("CREATE INDEX IF NOT EXISTS idx_command_results_ts ON command_results(ts DESC)", []).ok();
        histogram!("result_store_open_ms", started.elapsed().as_secs_f64() * 1000.0);
        Ok(Self { db: std::sync::Mutex::new(db), keep: keep_results() })
    }

    /// Override how many results survive each write.
    pub fn with_retention(mut self, keep: usize) -> Self {
        self.keep = keep.max(1);
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, rusqlite::Connection>> {
        self.db.lock().map_err(|_| anyhow!("result store connection lock poisoned"))
    }
}

impl ResultStore for SqliteStore {
    fn write_command_result(&self, cr: &Redacted<CommandResult>) -> Result<()> {
        let started = std::time::Instant::now();
        let yaml = serde_yaml::to_string(&cr.to_compacted()).context("encoding command result")?;
        let mut db = self.lock()?;
        let tx = db.transaction()?;
        tx.execute(
            "INSERT OR REPLACE INTO command_results(id, cluster_id, ts, yaml) VALUES (?1, ?2, ?3, ?4)",
            (&cr.id, &cr.cluster_info.cluster_id, now_ts(), maybe_compress(&yaml)),
        ).with_context(|| format!("writing command result {}", cr.id))?;
        // Keep the newest `keep` results (delete older rows by rowid)
        tx.execute(
            "DELETE FROM command_results
             WHERE rowid NOT IN (
                 SELECT rowid FROM command_results ORDER BY ts DESC, rowid DESC LIMIT ?1
             )",
            [self.keep as i64],
        )?;
        tx.commit()?;
        histogram!("result_store_put_ms", started.elapsed().as_secs_f64() * 1000.0);
        counter!("result_store_put_total", 1u64);
        debug!(id = %cr.id, bytes = yaml.len(), "command result stored");
        Ok(())
    }

    fn list_command_results(&self, limit: Option<usize>) -> Result<Vec<StoredResult>> {
        let cap = limit.unwrap_or(self.keep);
        let db = self.lock()?;
        let mut stmt = db.prepare(
            "SELECT id, cluster_id, ts, yaml FROM command_results ORDER BY ts DESC, rowid DESC LIMIT ?1",
        )?;
        let mut rows = stmt.query([cap as i64])?;
        let mut out: Vec<StoredResult> = Vec::new();
        while let Some(row) = rows.next()? {
            let blob: Vec<u8> = row.get(3)?;
            out.push(StoredResult { id: row.get(0)?, cluster_id: row.get(1)?, ts: row.get(2)?, yaml: maybe_decompress(&blob) });
        }
        Ok(out)
    }
}

fn keep_results() -> usize {
    std::env::var("DECKHAND_KEEP_RESULTS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(200)
        .max(1)
}

fn default_db_path() -> String {
    if let Some(home) = std::env::var_os("HOME") {
        let mut p = std::path::PathBuf::from(home);
        p.push(".deckhand");
        let _ = std::fs::create_dir_all(&p);
        p.push("results.db");
        return p.to_string_lossy().to_string();
    }
    // Fallback to current directory
    "results.db".to_string()
}

pub fn now_ts() -> i64 {
    // seconds since epoch
    let now = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap_or_default();
    now.as_secs() as i64
}

pub fn maybe_compress(yaml: &str) -> Vec<u8> {
    #[cfg(feature = "zstd")]
    {
        let lvl: i32 = std::env::var("DECKHAND_ZSTD_LEVEL").ok().and_then(|s| s.parse().ok()).unwrap_or(3);
        return zstd::encode_all(yaml.as_bytes(), lvl).unwrap_or_else(|_| yaml.as_bytes().to_vec());
    }
    yaml.as_bytes().to_vec()
}

pub fn maybe_decompress(blob: &[u8]) -> String {
    #[cfg(feature = "zstd")]
    {
        if let Ok(de) = zstd::decode_all(std::io::Cursor::new(blob)) {
            return String::from_utf8_lossy(&de).to_string();
        }
    }
    String::from_utf8_lossy(blob).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::RedactionGate;

    fn temp_store(dir: &tempfile::TempDir) -> SqliteStore {
        let path = dir.path().join("results.db");
        SqliteStore::open(&path.to_string_lossy()).unwrap()
    }

    fn result(id: &str) -> Redacted<CommandResult> {
        let mut cr = CommandResult { id: id.into(), ..Default::default() };
        cr.cluster_info.cluster_id = "c1".into();
        RedactionGate::exempt(cr)
    }

    #[test]
    fn write_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let s = temp_store(&dir);
        s.write_command_result(&result("a")).unwrap();
        let rows = s.list_command_results(None).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, "a");
        assert_eq!(rows[0].cluster_id, "c1");
        let back: CommandResult = serde_yaml::from_str(&rows[0].yaml).unwrap();
        assert_eq!(&back, &*result("a"));
    }

    #[test]
    fn same_id_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let s = temp_store(&dir);
        s.write_command_result(&result("a")).unwrap();
        s.write_command_result(&result("a")).unwrap();
        assert_eq!(s.list_command_results(None).unwrap().len(), 1);
    }

    #[test]
    fn retention_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        let s = temp_store(&dir).with_retention(3);
        for i in 0..5 {
            s.write_command_result(&result(&format!("r-{}", i))).unwrap();
        }
        let rows = s.list_command_results(None).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id, "r-4");
        assert_eq!(rows[1].id, "r-3");
        assert_eq!(rows[2].id, "r-2");
    }
}
