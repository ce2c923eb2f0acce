use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc, Mutex},
    thread::{self, JoinHandle},
};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};

mod migrations;

use crate::storage::KeyValueStore;
use migrations::run_migrations;

type DbTask = Box<dyn FnOnce(&mut Connection) + Send + 'static>;

enum DbCommand {
    Execute(DbTask),
    Shutdown,
}

struct DatabaseInner {
    sender: mpsc::Sender<DbCommand>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for DatabaseInner {
    fn drop(&mut self) {
        let mut guard = match self.worker.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(handle) = guard.take() {
            if let Err(err) = self.sender.send(DbCommand::Shutdown) {
                error!("Failed to send shutdown to DB thread: {err}");
            }
            if let Err(join_err) = handle.join() {
                error!("Failed to join DB thread: {join_err:?}");
            }
        }
    }
}

/// SQLite-backed key-value store. All statements run on a single worker
/// thread that owns the connection.
#[derive(Clone)]
pub struct Database {
    inner: Arc<DatabaseInner>,
    db_path: Arc<PathBuf>,
}

impl Database {
    pub fn new(db_path: PathBuf) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create database directory {}", parent.display())
            })?;
        }

        let (command_tx, command_rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let path_for_thread = db_path.clone();

        let worker = thread::Builder::new()
            .name("ikara-db".into())
            .spawn(move || {
                let mut conn = match Connection::open(&path_for_thread) {
                    Ok(connection) => connection,
                    Err(err) => {
                        let _ = ready_tx.send(Err(anyhow::Error::new(err)
                            .context("failed to open SQLite database")));
                        return;
                    }
                };

                if let Err(err) = conn.pragma_update(None, "journal_mode", "WAL") {
                    error!("Failed to enable WAL mode: {err}");
                }

                let init_result =
                    run_migrations(&mut conn).context("failed to run database migrations");
                if ready_tx.send(init_result).is_err() {
                    error!("DB initialization receiver dropped before ready signal");
                    return;
                }

                while let Ok(command) = command_rx.recv() {
                    match command {
                        DbCommand::Execute(task) => {
                            task(&mut conn);
                        }
                        DbCommand::Shutdown => break,
                    }
                }

                info!("Database thread shutting down");
            })
            .with_context(|| "failed to spawn database worker thread")?;

        ready_rx
            .recv()
            .context("database worker exited before signaling readiness")??;

        info!("Database initialized at {}", db_path.as_path().display());

        Ok(Self {
            inner: Arc::new(DatabaseInner {
                sender: command_tx,
                worker: Mutex::new(Some(worker)),
            }),
            db_path: Arc::new(db_path),
        })
    }

    pub fn path(&self) -> &Path {
        self.db_path.as_path()
    }

    /// Runs `task` on the worker thread and blocks the calling thread until it
    /// completes. From async code, call it inside `spawn_blocking`.
    pub fn execute<F, T>(&self, task: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let sender = self.inner.sender.clone();
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);

        let command = DbCommand::Execute(Box::new(move |conn| {
            let result = task(conn);
            if reply_tx.send(result).is_err() {
                error!("DB caller dropped before receiving result");
            }
        }));

        sender
            .send(command)
            .map_err(|err| anyhow!("failed to send command to DB thread: {err}"))?;

        reply_rx
            .recv()
            .map_err(|_| anyhow!("database thread terminated unexpectedly"))?
    }
}

impl KeyValueStore for Database {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.execute(move |conn| {
            let value = conn
                .query_row(
                    "SELECT value FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                    params![namespace, key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .with_context(|| format!("failed to read {namespace}/{key}"))?;
            Ok(value)
        })
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        let value = value.to_string();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO kv_entries (namespace, key, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(namespace, key) DO UPDATE
                 SET value = excluded.value,
                     updated_at = excluded.updated_at",
                params![namespace, key, value, Utc::now().to_rfc3339()],
            )
            .with_context(|| format!("failed to write {namespace}/{key}"))?;
            Ok(())
        })
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        let namespace = namespace.to_string();
        let key = key.to_string();
        self.execute(move |conn| {
            conn.execute(
                "DELETE FROM kv_entries WHERE namespace = ?1 AND key = ?2",
                params![namespace, key],
            )
            .with_context(|| format!("failed to delete {namespace}/{key}"))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ikara.sqlite3");

        {
            let db = Database::new(path.clone()).unwrap();
            db.set("ikara", "history", "[]").unwrap();
            db.set("ikara", "history", "[{\"label\":\"Gond\"}]").unwrap();
        }

        let db = Database::new(path).unwrap();
        assert_eq!(
            db.get("ikara", "history").unwrap().as_deref(),
            Some("[{\"label\":\"Gond\"}]")
        );
    }

    #[test]
    fn remove_deletes_only_the_addressed_key() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("nested/ikara.sqlite3")).unwrap();

        db.set("ikara", "history", "[]").unwrap();
        db.set("ikara", "feedback", "[]").unwrap();
        db.remove("ikara", "history").unwrap();

        assert!(db.get("ikara", "history").unwrap().is_none());
        assert!(db.get("ikara", "feedback").unwrap().is_some());
        assert!(db.path().ends_with("nested/ikara.sqlite3"));
    }
}
