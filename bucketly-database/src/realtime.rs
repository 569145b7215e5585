//! Change subscriptions over Postgres `LISTEN`/`NOTIFY`.
//!
//! The `publish_change` trigger sends one JSON payload per row change. A
//! [`Subscription`] owns the listener task and hands events out through a
//! bounded channel; unsubscribing (or dropping it) stops the task.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::postgres::PgListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::database::Database;

/// Channel the migrations' trigger publishes to.
pub const CHANGE_CHANNEL: &str = "bucketly_changes";
pub const DEFAULT_BUFFER: usize = 256;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "op")]
    pub kind: ChangeKind,
    #[serde(default)]
    pub record: Option<Value>,
    #[serde(default)]
    pub old_record: Option<Value>,
}

impl ChangeEvent {
    pub fn parse(payload: &str) -> anyhow::Result<Self> {
        serde_json::from_str(payload).context("malformed change payload")
    }

    pub fn field_i64(&self, name: &str) -> Option<i64> {
        self.record.as_ref()?.get(name)?.as_i64()
    }

    fn flag(record: Option<&Value>, name: &str) -> bool {
        record
            .and_then(|record| record.get(name))
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// An item that was not completed before this change and is now.
    pub fn is_item_completion(&self) -> bool {
        self.table == "bucket_items"
            && matches!(self.kind, ChangeKind::Insert | ChangeKind::Update)
            && Self::flag(self.record.as_ref(), "completed")
            && !Self::flag(self.old_record.as_ref(), "completed")
    }

    pub fn is_new_follow(&self) -> bool {
        self.table == "list_follows" && self.kind == ChangeKind::Insert
    }
}

/// Live stream of change events.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<ChangeEvent>,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl Subscription {
    fn new(
        events: mpsc::Receiver<ChangeEvent>,
        cancel: oneshot::Sender<()>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            events,
            cancel: Some(cancel),
            task,
        }
    }

    /// Next event, or `None` once unsubscribed or the listener has stopped.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        if self.cancel.is_none() {
            return None;
        }
        self.events.recv().await
    }

    /// Stop the listener. Buffered events are discarded; `next` returns `None` afterwards.
    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        self.events.close();
    }

    pub fn is_active(&self) -> bool {
        self.cancel.is_some() && !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
        self.task.abort();
    }
}

/// Start listening on `channel`.
pub async fn subscribe(db: &Database, channel: &str, buffer: usize) -> anyhow::Result<Subscription> {
    let mut listener = PgListener::connect_with(db.pool())
        .await
        .context("failed to open realtime listener connection")?;
    listener
        .listen(channel)
        .await
        .with_context(|| format!("failed to LISTEN on `{channel}`"))?;

    let (event_tx, event_rx) = mpsc::channel(buffer.max(1));
    let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
    let channel_name = channel.to_owned();

    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = &mut cancel_rx => break,
                received = listener.recv() => {
                    let notification = match received {
                        Ok(notification) => notification,
                        Err(err) => {
                            error!(?err, channel = %channel_name, "realtime listener failed");
                            break;
                        }
                    };

                    match ChangeEvent::parse(notification.payload()) {
                        Ok(event) => {
                            if event_tx.send(event).await.is_err() {
                                break;
                            }
                        }
                        Err(err) => warn!(?err, channel = %channel_name, "skipping change event"),
                    }
                }
            }
        }

        debug!(channel = %channel_name, "realtime listener stopped");
    });

    Ok(Subscription::new(event_rx, cancel_tx, task))
}
