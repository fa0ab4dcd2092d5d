//! Post-commit side effects
//!
//! Handlers never call notification ports directly. They attach work to
//! a successful outcome as a [`PostCommit`] list, and the dispatcher hands
//! it to a [`SideEffectRunner`] once the handler has returned. A side
//! effect that keeps failing is retried a bounded number of times and then
//! dropped; its failure is logged and never reaches the caller.

use crate::application::{CancellationSignal, RequestKind};
use crate::config::{DeliveryMode, NotificationConfig, RetryPolicy};
use crate::domain::ports::{NotificationError, NotificationMessage, NotificationPort};
use crate::telemetry;
use async_trait::async_trait;
use herald_domain::{Channel, Contact};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{Instrument, debug, info, warn};

/// Deferred best-effort task
#[async_trait]
pub trait SideEffect: Send + Sync {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Channel used, when the effect is a notification
    fn channel(&self) -> Option<Channel> {
        None
    }

    async fn run(&self) -> Result<(), NotificationError>;
}

/// Send one message through one port
pub struct Notify {
    port: Arc<dyn NotificationPort>,
    message: NotificationMessage,
}

impl Notify {
    pub fn new(port: Arc<dyn NotificationPort>, message: NotificationMessage) -> Self {
        Self { port, message }
    }

    pub fn message(&self) -> &NotificationMessage {
        &self.message
    }
}

#[async_trait]
impl SideEffect for Notify {
    fn describe(&self) -> String {
        format!(
            "{} to {}: {}",
            self.message.channel, self.message.recipient, self.message.subject
        )
    }

    fn channel(&self) -> Option<Channel> {
        Some(self.message.channel)
    }

    async fn run(&self) -> Result<(), NotificationError> {
        let receipt = self.port.send(&self.message).await?;
        debug!(
            channel = %receipt.channel,
            recipient = %receipt.recipient,
            reference = ?receipt.provider_reference,
            "notification accepted"
        );
        Ok(())
    }
}

/// Side effects attached to a successful handler outcome
#[derive(Default)]
pub struct PostCommit {
    effects: Vec<Box<dyn SideEffect>>,
}

impl PostCommit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: impl SideEffect + 'static) -> &mut Self {
        self.effects.push(Box::new(effect));
        self
    }

    /// Queue `subject`/`body` for `contact` on every port whose channel the
    /// contact has an address for; returns how many messages were queued
    pub fn notify_contact(
        &mut self,
        ports: &[Arc<dyn NotificationPort>],
        contact: &Contact,
        subject: &str,
        body: &str,
    ) -> usize {
        let mut queued = 0;
        for port in ports {
            let channel = port.channel();
            if let Some(address) = contact.address_for(channel) {
                let message = NotificationMessage::new(channel, address, subject, body);
                self.push(Notify::new(Arc::clone(port), message));
                queued += 1;
            }
        }
        queued
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn descriptions(&self) -> Vec<String> {
        self.effects.iter().map(|e| e.describe()).collect()
    }
}

impl std::fmt::Debug for PostCommit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostCommit")
            .field("effects", &self.descriptions())
            .finish()
    }
}

/// Outcome of running one [`PostCommit`] list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub kind: RequestKind,
    pub attempted: usize,
    pub delivered: usize,
    pub dropped: usize,
    /// The request was cancelled before every effect finished
    pub cancelled: bool,
}

/// How one effect ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivery {
    Delivered,
    Dropped,
    Cancelled,
}

fn channel_label(effect: &dyn SideEffect) -> &'static str {
    effect.channel().map_or("task", |c| c.as_str())
}

/// Executes post-commit side effects with bounded retry
#[derive(Debug, Clone)]
pub struct SideEffectRunner {
    mode: DeliveryMode,
    retry: RetryPolicy,
    reports: Option<mpsc::UnboundedSender<DeliveryReport>>,
}

impl SideEffectRunner {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            mode: config.mode,
            retry: config.retry,
            reports: None,
        }
    }

    /// Runner that also publishes a [`DeliveryReport`] per dispatch
    pub fn with_reports(config: &NotificationConfig) -> (Self, mpsc::UnboundedReceiver<DeliveryReport>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = Self {
            reports: Some(tx),
            ..Self::new(config)
        };
        (runner, rx)
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Run the side effects; never fails
    ///
    /// Inline delivery stops at the first attempt or backoff interrupted by
    /// `cancellation` and drops every effect not yet delivered. Detached
    /// delivery outlives the request and ignores the signal. It returns as
    /// soon as the work is spawned, so it must be called from within a
    /// tokio runtime.
    pub async fn run(
        &self,
        kind: RequestKind,
        post_commit: PostCommit,
        cancellation: &CancellationSignal,
    ) {
        if post_commit.is_empty() {
            return;
        }

        match self.mode {
            DeliveryMode::Inline => self.execute(kind, post_commit, cancellation).await,
            DeliveryMode::Detached => {
                let runner = self.clone();
                let span = tracing::Span::current();
                tokio::spawn(
                    async move {
                        runner
                            .execute(kind, post_commit, &CancellationSignal::never())
                            .await
                    }
                    .instrument(span),
                );
            }
        }
    }

    async fn execute(
        &self,
        kind: RequestKind,
        post_commit: PostCommit,
        cancellation: &CancellationSignal,
    ) {
        let started = Instant::now();
        let attempted = post_commit.len();
        let mut delivered = 0;
        let mut cancelled = false;

        let mut effects = post_commit.effects.into_iter();
        while let Some(effect) = effects.next() {
            let delivery = self.deliver(effect.as_ref(), cancellation).await;
            match delivery {
                Delivery::Delivered => delivered += 1,
                Delivery::Dropped => {}
                Delivery::Cancelled => {
                    cancelled = true;
                    let abandoned: Vec<_> = std::iter::once(effect).chain(effects.by_ref()).collect();
                    for effect in &abandoned {
                        debug!(effect = %effect.describe(), "side effect abandoned");
                        telemetry::record_notification(channel_label(effect.as_ref()), "dropped");
                    }
                    warn!(abandoned = abandoned.len(), "request cancelled, dropping side effects");
                    break;
                }
            }
        }

        let report = DeliveryReport {
            kind,
            attempted,
            delivered,
            dropped: attempted - delivered,
            cancelled,
        };

        if report.dropped == 0 {
            info!(
                delivered,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "side effects completed"
            );
        } else {
            warn!(
                delivered,
                dropped = report.dropped,
                cancelled,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "side effects completed with drops"
            );
        }

        if let Some(tx) = &self.reports {
            let _ = tx.send(report);
        }
    }

    /// Attempt one effect until it succeeds, fails permanently, runs out
    /// of attempts or the request is cancelled
    async fn deliver(&self, effect: &dyn SideEffect, cancellation: &CancellationSignal) -> Delivery {
        let label = channel_label(effect);
        let max_attempts = self.retry.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let timed = tokio::select! {
                biased;
                _ = cancellation.cancelled() => return Delivery::Cancelled,
                timed = tokio::time::timeout(self.retry.attempt_timeout(), effect.run()) => timed,
            };
            let outcome = timed.unwrap_or_else(|_| Err(self.timeout_error(effect)));

            match outcome {
                Ok(()) => {
                    debug!(effect = %effect.describe(), attempt, "side effect delivered");
                    telemetry::record_notification(label, "delivered");
                    return Delivery::Delivered;
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.retry.backoff_after(attempt);
                    warn!(
                        effect = %effect.describe(),
                        attempt,
                        error = %err,
                        retry_in_ms = delay.as_millis() as u64,
                        "side effect failed, retrying"
                    );
                    telemetry::record_notification(label, "failed");
                    tokio::select! {
                        biased;
                        _ = cancellation.cancelled() => return Delivery::Cancelled,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                Err(err) => {
                    warn!(
                        effect = %effect.describe(),
                        attempt,
                        error = %err,
                        "dropping side effect"
                    );
                    telemetry::record_notification(label, "failed");
                    telemetry::record_notification(label, "dropped");
                    return Delivery::Dropped;
                }
            }
        }

        Delivery::Dropped
    }

    fn timeout_error(&self, effect: &dyn SideEffect) -> NotificationError {
        let elapsed_ms = self.retry.attempt_timeout_ms;
        match effect.channel() {
            Some(channel) => NotificationError::Timeout {
                channel,
                elapsed_ms,
            },
            None => NotificationError::TaskTimeout { elapsed_ms },
        }
    }
}

impl Default for SideEffectRunner {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}
