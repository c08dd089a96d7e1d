//! Recording port implementations for tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use core_kernel::{ClaimId, DomainPort, PortError};
use domain_claims::{EvidenceStore, Notification, NotificationDispatcher, NotificationTemplate};

/// Evidence store that keeps uploads in memory, keyed by URL
#[derive(Debug, Default)]
pub struct MemoryEvidenceStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    fail_on: Mutex<Option<String>>,
}

impl MemoryEvidenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every upload of `file_name` fail with a connection error
    pub fn fail_uploads_named(&self, file_name: &str) {
        *self.fail_on.lock().unwrap() = Some(file_name.to_string());
    }

    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn bytes_at(&self, url: &str) -> Option<Vec<u8>> {
        self.objects.lock().unwrap().get(url).cloned()
    }
}

impl DomainPort for MemoryEvidenceStore {}

#[async_trait]
impl EvidenceStore for MemoryEvidenceStore {
    async fn put(&self, claim_id: ClaimId, bytes: &[u8], file_name: &str) -> Result<String, PortError> {
        if self.fail_on.lock().unwrap().as_deref() == Some(file_name) {
            return Err(PortError::connection("evidence store unreachable"));
        }
        let url = format!("mem://claims/{}/{}", claim_id.as_uuid(), file_name);
        self.objects.lock().unwrap().insert(url.clone(), bytes.to_vec());
        Ok(url)
    }
}

/// Dispatcher that remembers every notification it accepts
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    failing: AtomicBool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// While set, every send fails with `ServiceUnavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn templates(&self) -> Vec<NotificationTemplate> {
        self.sent.lock().unwrap().iter().map(|n| n.template).collect()
    }

    /// The most recent notification with the given template
    pub fn last(&self, template: NotificationTemplate) -> Option<Notification> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|n| n.template == template)
            .cloned()
    }
}

impl DomainPort for RecordingDispatcher {}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), PortError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PortError::ServiceUnavailable {
                service: "mailer".to_string(),
            });
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_evidence_store_keeps_bytes() {
        let store = MemoryEvidenceStore::new();
        let url = store.put(ClaimId::new(), b"license", "license.pdf").await.unwrap();

        assert!(url.starts_with("mem://claims/"));
        assert_eq!(store.bytes_at(&url), Some(b"license".to_vec()));
        assert_eq!(store.object_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_evidence_store_failure() {
        let store = MemoryEvidenceStore::new();
        store.fail_uploads_named("bad.pdf");

        let err = store.put(ClaimId::new(), b"x", "bad.pdf").await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(store.object_count(), 0);
    }
}
