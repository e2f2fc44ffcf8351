use crate::app::ports::SnapshotPort;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Writes each snapshot as pretty-printed `<dir>/<name>.json`.
///
/// Failures are logged and swallowed; a run never reads its snapshots back.
pub struct FsSnapshotStore {
    dir: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }
}

#[async_trait]
impl SnapshotPort for FsSnapshotStore {
    async fn record(&self, name: &str, value: &Value) {
        let path = self.path_for(name);
        let body = match serde_json::to_vec_pretty(value) {
            Ok(body) => body,
            Err(e) => {
                warn!(name, "Could not encode snapshot: {}", e);
                return;
            }
        };
        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            warn!(dir = %self.dir.display(), "Could not create snapshot directory: {}", e);
            return;
        }
        match tokio::fs::write(&path, body).await {
            Ok(()) => debug!(path = %path.display(), "Wrote snapshot"),
            Err(e) => warn!(path = %path.display(), "Could not write snapshot: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_record_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsSnapshotStore::new(dir.path().join("output"));
        store.record("concept", &json!({"data": {"identifier": "A"}})).await;

        let written = std::fs::read_to_string(store.path_for("concept")).unwrap();
        assert!(written.contains('\n'));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["data"]["identifier"], "A");
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        // A regular file where the directory should be
        let store = FsSnapshotStore::new(&blocker);
        store.record("concept", &json!({})).await;
        assert!(!store.path_for("concept").exists());
    }
}
