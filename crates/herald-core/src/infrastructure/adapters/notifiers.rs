//! Notification port implementations without an external provider

use crate::domain::ports::{
    DeliveryReceipt, NotificationError, NotificationMessage, NotificationPort,
};
use async_trait::async_trait;
use herald_domain::Channel;
use parking_lot::{Mutex, RwLock};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tracing::info;

/// Records every accepted message instead of sending it
///
/// Failures can be scripted, either for the next few sends or for every
/// send until [`recover`](Self::recover) is called. Clones share state.
#[derive(Debug, Clone)]
pub struct OutboxNotifier {
    channel: Channel,
    sent: Arc<RwLock<Vec<NotificationMessage>>>,
    attempts: Arc<AtomicUsize>,
    planned_failures: Arc<Mutex<VecDeque<NotificationError>>>,
    persistent_failure: Arc<RwLock<Option<NotificationError>>>,
    channel_tx: Option<mpsc::UnboundedSender<NotificationMessage>>,
}

impl OutboxNotifier {
    pub fn new(channel: Channel) -> Self {
        Self {
            channel,
            sent: Arc::new(RwLock::new(Vec::new())),
            attempts: Arc::new(AtomicUsize::new(0)),
            planned_failures: Arc::new(Mutex::new(VecDeque::new())),
            persistent_failure: Arc::new(RwLock::new(None)),
            channel_tx: None,
        }
    }

    /// Also stream accepted messages to the returned receiver
    pub fn with_channel(channel: Channel) -> (Self, mpsc::UnboundedReceiver<NotificationMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let notifier = Self {
            channel_tx: Some(tx),
            ..Self::new(channel)
        };
        (notifier, rx)
    }

    /// Fail the next `times` sends with `error`
    pub fn fail_next(&self, times: usize, error: NotificationError) {
        let mut planned = self.planned_failures.lock();
        planned.extend(std::iter::repeat_n(error, times));
    }

    /// Provider is down until [`recover`](Self::recover)
    pub fn fail_always(&self, reason: impl Into<String>) {
        *self.persistent_failure.write() = Some(NotificationError::Unavailable {
            channel: self.channel,
            reason: reason.into(),
        });
    }

    pub fn recover(&self) {
        *self.persistent_failure.write() = None;
        self.planned_failures.lock().clear();
    }

    /// Accepted messages in send order
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.read().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().len()
    }

    /// Sends attempted, including failed ones
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<NotificationError> {
        if let Some(error) = self.planned_failures.lock().pop_front() {
            return Some(error);
        }
        self.persistent_failure.read().clone()
    }
}

#[async_trait]
impl NotificationPort for OutboxNotifier {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<DeliveryReceipt, NotificationError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;

        if message.channel != self.channel {
            return Err(NotificationError::ChannelMismatch {
                expected: self.channel,
                actual: message.channel,
            });
        }

        if let Some(error) = self.next_failure() {
            return Err(error);
        }

        self.sent.write().push(message.clone());
        if let Some(tx) = &self.channel_tx {
            let _ = tx.send(message.clone());
        }

        Ok(DeliveryReceipt {
            channel: self.channel,
            recipient: message.recipient.clone(),
            accepted_at: chrono::Utc::now(),
            provider_reference: Some(format!("outbox-{attempt}")),
        })
    }
}

/// Transport that only writes the message to the log
#[derive(Debug, Clone, Copy)]
pub struct LogNotifier {
    channel: Channel,
}

impl LogNotifier {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }
}

#[async_trait]
impl NotificationPort for LogNotifier {
    fn channel(&self) -> Channel {
        self.channel
    }

    async fn send(
        &self,
        message: &NotificationMessage,
    ) -> Result<DeliveryReceipt, NotificationError> {
        info!(
            channel = %message.channel,
            recipient = %message.recipient,
            subject = %message.subject,
            "notification"
        );

        Ok(DeliveryReceipt {
            channel: self.channel,
            recipient: message.recipient.clone(),
            accepted_at: chrono::Utc::now(),
            provider_reference: None,
        })
    }
}
