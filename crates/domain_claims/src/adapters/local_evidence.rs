//! Local filesystem evidence store
//!
//! Files are content-addressed within a claim scope:
//!
//! ```text
//! <root>/claims/<claim-uuid>/<sha256>-<sanitised name>
//! ```
//!
//! and exposed as `<base_url>/claims/<claim-uuid>/<sha256>-<sanitised name>`.
//! Writing the same bytes under the same name twice is idempotent. Bytes go
//! to a dot-prefixed temporary file first and are renamed into place, so a
//! file at a final path is always complete.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use core_kernel::{ClaimId, DomainPort, PortError};

use crate::ports::EvidenceStore;

const MAX_NAME_LEN: usize = 100;

static NEXT_TEMP: AtomicU64 = AtomicU64::new(0);

/// Evidence store writing to a local directory
#[derive(Debug, Clone)]
pub struct LocalEvidenceStore {
    root: PathBuf,
    base_url: String,
}

impl LocalEvidenceStore {
    pub fn new(root: impl AsRef<Path>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            root: root.as_ref().to_path_buf(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn claim_dir(&self, claim_id: ClaimId) -> PathBuf {
        self.root.join("claims").join(claim_id.as_uuid().to_string())
    }
}

/// Reduces a client-supplied file name to a safe single path component
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "evidence".to_string()
    } else {
        cleaned.to_string()
    }
}

impl DomainPort for LocalEvidenceStore {}

#[async_trait]
impl EvidenceStore for LocalEvidenceStore {
    async fn put(&self, claim_id: ClaimId, bytes: &[u8], file_name: &str) -> Result<String, PortError> {
        if bytes.is_empty() {
            return Err(PortError::validation_field("evidence file is empty", "file"));
        }

        let digest = hex::encode(Sha256::digest(bytes));
        let key = format!("{}-{}", digest, sanitize_file_name(file_name));
        let dir = self.claim_dir(claim_id);
        let path = dir.join(&key);

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(claim_id = %claim_id, key = %key, "Evidence already stored");
        } else {
            fs::create_dir_all(&dir)
                .await
                .map_err(|e| PortError::internal(format!("failed to create {}: {e}", dir.display())))?;
            let temp = dir.join(format!(
                ".{}.{}.{}.part",
                key,
                std::process::id(),
                NEXT_TEMP.fetch_add(1, Ordering::Relaxed)
            ));
            if let Err(e) = write_complete(&temp, bytes).await {
                let _ = fs::remove_file(&temp).await;
                return Err(e);
            }
            fs::rename(&temp, &path)
                .await
                .map_err(|e| PortError::internal(format!("failed to move evidence into place: {e}")))?;
            debug!(claim_id = %claim_id, key = %key, size = bytes.len(), "Evidence stored");
        }

        Ok(format!(
            "{}/claims/{}/{}",
            self.base_url,
            claim_id.as_uuid(),
            key
        ))
    }
}

async fn write_complete(path: &Path, bytes: &[u8]) -> Result<(), PortError> {
    let mut file = fs::File::create(path)
        .await
        .map_err(|e| PortError::internal(format!("failed to create {}: {e}", path.display())))?;
    file.write_all(bytes)
        .await
        .map_err(|e| PortError::internal(format!("failed to write evidence: {e}")))?;
    file.sync_all()
        .await
        .map_err(|e| PortError::internal(format!("failed to sync evidence: {e}")))
}
