//! Claim-lifecycle notifications
//!
//! The workflow builds a [`Notification`] and hands it to a
//! [`NotificationDispatcher`]. In production that dispatcher is an
//! [`OutboxDispatcher`]: `send` only enqueues, and an [`OutboxWorker`] running
//! on its own task drains the queue into the transport. A slow or failing
//! transport therefore cannot delay or fail a claim write.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use core_kernel::{DomainPort, PortError};

use crate::claim::Claim;
use crate::ports::NotificationDispatcher;

/// Message templates known to the delivery side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTemplate {
    Received,
    Approved,
    Rejected,
    DocumentsRequested,
}

impl NotificationTemplate {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationTemplate::Received => "received",
            NotificationTemplate::Approved => "approved",
            NotificationTemplate::Rejected => "rejected",
            NotificationTemplate::DocumentsRequested => "documents_requested",
        }
    }
}

impl fmt::Display for NotificationTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message addressed to a claimant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub template: NotificationTemplate,
    pub recipient: String,
    pub params: BTreeMap<String, String>,
}

impl Notification {
    fn for_claim(template: NotificationTemplate, claim: &Claim) -> Self {
        let mut params = BTreeMap::new();
        params.insert("claim_id".to_string(), claim.id.to_string());
        params.insert("claimant_name".to_string(), claim.claimant_name.clone());
        params.insert("venue_name".to_string(), claim.venue_name.clone());
        Self {
            template,
            recipient: claim.claimant_email.clone(),
            params,
        }
    }

    fn with_param(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// Acknowledges a new submission
    pub fn received(claim: &Claim) -> Self {
        Self::for_claim(NotificationTemplate::Received, claim)
    }

    /// Announces approval with a link to the venue management page
    pub fn approved(claim: &Claim, manage_url: impl Into<String>) -> Self {
        Self::for_claim(NotificationTemplate::Approved, claim).with_param("manage_url", manage_url)
    }

    /// Announces rejection with the administrator's stated reason
    pub fn rejected(claim: &Claim, reason: impl Into<String>) -> Self {
        Self::for_claim(NotificationTemplate::Rejected, claim).with_param("reason", reason)
    }

    /// Asks the claimant for more evidence
    pub fn documents_requested(claim: &Claim, message: impl Into<String>) -> Self {
        Self::for_claim(NotificationTemplate::DocumentsRequested, claim).with_param("message", message)
    }
}

/// Transport that only writes the notification to the log
#[derive(Debug, Default, Clone)]
pub struct LoggingDispatcher;

impl DomainPort for LoggingDispatcher {}

#[async_trait]
impl NotificationDispatcher for LoggingDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), PortError> {
        info!(
            template = %notification.template,
            recipient = %notification.recipient,
            params = ?notification.params,
            "Notification dispatched"
        );
        Ok(())
    }
}

/// Dispatcher that enqueues into a bounded in-process outbox
///
/// `send` never waits: a full queue is reported as
/// `PortError::ServiceUnavailable` and a stopped worker as
/// `PortError::Connection`.
#[derive(Debug, Clone)]
pub struct OutboxDispatcher {
    sender: mpsc::Sender<Notification>,
}

impl OutboxDispatcher {
    /// Creates the outbox and the worker that drains it into `transport`
    ///
    /// The worker must be spawned by the caller.
    pub fn new(capacity: usize, transport: Arc<dyn NotificationDispatcher>) -> (Self, OutboxWorker) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, OutboxWorker { receiver, transport })
    }
}

impl DomainPort for OutboxDispatcher {}

#[async_trait]
impl NotificationDispatcher for OutboxDispatcher {
    async fn send(&self, notification: &Notification) -> Result<(), PortError> {
        self.sender
            .try_send(notification.clone())
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => PortError::ServiceUnavailable {
                    service: "notification outbox".to_string(),
                },
                mpsc::error::TrySendError::Closed(_) => {
                    PortError::connection("notification outbox worker has stopped")
                }
            })?;
        debug!(template = %notification.template, "Notification queued");
        Ok(())
    }
}

/// Background task draining the outbox
pub struct OutboxWorker {
    receiver: mpsc::Receiver<Notification>,
    transport: Arc<dyn NotificationDispatcher>,
}

impl OutboxWorker {
    /// Delivers queued notifications until every sender is dropped
    pub async fn run(mut self) {
        while let Some(notification) = self.receiver.recv().await {
            if let Err(e) = self.transport.send(&notification).await {
                warn!(
                    error = %e,
                    template = %notification.template,
                    recipient = %notification.recipient,
                    "Failed to deliver notification"
                );
            }
        }
        info!("Notification outbox closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Capture(Mutex<Vec<Notification>>);

    impl DomainPort for Capture {}

    #[async_trait]
    impl NotificationDispatcher for Capture {
        async fn send(&self, notification: &Notification) -> Result<(), PortError> {
            self.0.lock().unwrap().push(notification.clone());
            Ok(())
        }
    }

    fn message(template: NotificationTemplate) -> Notification {
        Notification {
            template,
            recipient: "claimant@example.test".to_string(),
            params: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_outbox_delivers_in_order() {
        let capture = Arc::new(Capture::default());
        let (outbox, worker) = OutboxDispatcher::new(8, capture.clone());

        outbox.send(&message(NotificationTemplate::Received)).await.unwrap();
        outbox.send(&message(NotificationTemplate::Approved)).await.unwrap();
        drop(outbox);
        worker.run().await;

        let sent = capture.0.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].template, NotificationTemplate::Received);
        assert_eq!(sent[1].template, NotificationTemplate::Approved);
    }

    #[tokio::test]
    async fn test_full_outbox_is_unavailable() {
        let (outbox, _worker) = OutboxDispatcher::new(1, Arc::new(LoggingDispatcher));

        outbox.send(&message(NotificationTemplate::Received)).await.unwrap();
        let err = outbox.send(&message(NotificationTemplate::Received)).await.unwrap_err();
        assert!(matches!(err, PortError::ServiceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_closed_outbox_is_connection_error() {
        let (outbox, worker) = OutboxDispatcher::new(4, Arc::new(LoggingDispatcher));
        drop(worker);

        let err = outbox.send(&message(NotificationTemplate::Rejected)).await.unwrap_err();
        assert!(matches!(err, PortError::Connection { .. }));
    }

    #[test]
    fn test_template_names() {
        assert_eq!(NotificationTemplate::DocumentsRequested.as_str(), "documents_requested");
        assert_eq!(NotificationTemplate::Received.to_string(), "received");
    }
}
