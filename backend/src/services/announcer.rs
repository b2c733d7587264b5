//! Merge announcements
//!
//! The webhook path hands announcements to a [`Notifier`], which pushes them
//! into a bounded queue without waiting. A [`ChatLoop`] task owns the other
//! end and delivers them to the chat channel at its own pace. Delivery is
//! best effort: a full queue or a failed send drops the announcement.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::Announcement;
use crate::services::discord::ChatSink;

/// What happened to an announcement handed to [`Notifier::announce`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnounceStatus {
    Queued,
    /// Queue full; the chat loop is behind
    DroppedFull,
    /// Chat loop has stopped
    DroppedClosed,
    /// No announcement channel configured
    Disabled,
}

/// Sending half of the announcement queue
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: Option<mpsc::Sender<Announcement>>,
}

impl Notifier {
    /// Create a queue holding at most `capacity` pending announcements.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Announcement>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier that discards everything, for when Discord is not configured.
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue an announcement. Never blocks.
    pub fn announce(&self, announcement: Announcement) -> AnnounceStatus {
        let Some(tx) = &self.tx else {
            debug!(
                contributor = %announcement.contributor,
                "Announcements disabled; not announcing"
            );
            return AnnounceStatus::Disabled;
        };

        match tx.try_send(announcement) {
            Ok(()) => AnnounceStatus::Queued,
            Err(mpsc::error::TrySendError::Full(a)) => {
                warn!(contributor = %a.contributor, url = %a.url, "Announcement queue full; dropping");
                AnnounceStatus::DroppedFull
            }
            Err(mpsc::error::TrySendError::Closed(a)) => {
                warn!(contributor = %a.contributor, url = %a.url, "Chat loop stopped; dropping announcement");
                AnnounceStatus::DroppedClosed
            }
        }
    }
}

/// Background task delivering queued announcements to one channel
pub struct ChatLoop {
    sink: Arc<dyn ChatSink>,
    channel_id: u64,
    rx: mpsc::Receiver<Announcement>,
}

/// Handle to a running [`ChatLoop`]
pub struct ChatLoopHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ChatLoopHandle {
    /// Stop the loop and wait for the in-flight send, if any.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.task.await;
    }

    /// Wait for the loop to end on its own (all notifiers dropped).
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

impl ChatLoop {
    pub fn new(sink: Arc<dyn ChatSink>, channel_id: u64, rx: mpsc::Receiver<Announcement>) -> Self {
        Self {
            sink,
            channel_id,
            rx,
        }
    }

    pub fn start(self) -> ChatLoopHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let Self {
            sink,
            channel_id,
            mut rx,
        } = self;

        let task = tokio::spawn(async move {
            info!(channel_id, "Starting announcement loop");

            loop {
                tokio::select! {
                    next = rx.recv() => {
                        let Some(announcement) = next else {
                            info!("Announcement queue closed; stopping loop");
                            break;
                        };
                        deliver(sink.as_ref(), channel_id, &announcement).await;
                    }
                    changed = shutdown_rx.changed() => {
                        // A dropped handle counts as a shutdown request
                        if changed.is_err() || *shutdown_rx.borrow() {
                            info!("Announcement loop shutting down");
                            break;
                        }
                    }
                }
            }
        });

        ChatLoopHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

async fn deliver(sink: &dyn ChatSink, channel_id: u64, announcement: &Announcement) {
    match sink.send_message(channel_id, &announcement.to_message()).await {
        Ok(()) => debug!(
            channel_id,
            contributor = %announcement.contributor,
            "Announcement delivered"
        ),
        Err(e) => warn!(
            channel_id,
            contributor = %announcement.contributor,
            error = %e,
            "Failed to deliver announcement"
        ),
    }
}
