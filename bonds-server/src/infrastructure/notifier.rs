use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::domain::like::LikeNotification;

pub(crate) const SUBJECT: &str = "Your post was liked";

/// Delivery boundary for like notifications. SMTP transport lives behind
/// this trait; the default mailer renders the message and writes it to the
/// log.
#[async_trait]
pub(crate) trait Mailer: Send + Sync {
    async fn send(&self, note: &LikeNotification) -> anyhow::Result<()>;
}

pub(crate) struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, note: &LikeNotification) -> anyhow::Result<()> {
        let message = render_message(note);
        info!(
            recipient = %note.author_email,
            subject = SUBJECT,
            %message,
            "like notification delivered"
        );
        Ok(())
    }
}

pub(crate) fn render_message(note: &LikeNotification) -> String {
    format!(
        "Hello {}, your post \"{}\" was liked by {}",
        note.author_username, note.post_title, note.liker_username
    )
}

/// Producer side of the notification queue, held by the like workflow.
#[derive(Clone)]
pub(crate) struct NotifierHandle {
    tx: mpsc::Sender<LikeNotification>,
}

impl NotifierHandle {
    /// Fire-and-forget: the like has already committed, so a full queue
    /// drops the message instead of blocking or failing the request.
    pub(crate) fn dispatch(&self, note: LikeNotification) {
        if let Err(err) = self.tx.try_send(note) {
            warn!(error = %err, "like notification dropped");
        }
    }
}

pub(crate) fn channel(capacity: usize) -> (NotifierHandle, mpsc::Receiver<LikeNotification>) {
    let (tx, rx) = mpsc::channel(capacity);
    (NotifierHandle { tx }, rx)
}

/// Consumes the queue out-of-band. At-most-once: delivery failures are
/// logged and never retried.
pub(crate) fn spawn_worker(mut rx: mpsc::Receiver<LikeNotification>, mailer: Arc<dyn Mailer>) {
    tokio::spawn(async move {
        while let Some(note) = rx.recv().await {
            if let Err(err) = mailer.send(&note).await {
                error!(
                    recipient = %note.author_email,
                    error = %err,
                    "failed to deliver like notification"
                );
            }
        }
    });
}
