//! Media group aggregation.
//!
//! Telegram delivers an album as separate messages sharing a media group id.
//! A single task owns the table of groups being collected; everything else
//! talks to it through a [`MediaGroupHandle`]. Each group has exactly one
//! pending flush timer, reset on every arrival, so a group is dispatched once
//! after the album has gone quiet.

use super::{DispatchGateway, MediaItem, OutboundMedia, RelayError};
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tokio_util::time::{delay_queue, DelayQueue};
use tracing::{debug, error, info, warn};

/// Telegram accepts at most ten items per album.
pub const MAX_MEDIA_GROUP_ITEMS: usize = 10;

/// Quiet interval after the last arrival before a group is flushed.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_secs(1);

const COMMAND_CHANNEL_CAPACITY: usize = 256;

/// Aggregator tuning.
#[derive(Debug, Clone, Copy)]
pub struct AggregatorConfig {
    /// Time without new arrivals after which a group is flushed.
    pub quiet_interval: Duration,
    /// Item count that flushes a group immediately.
    pub max_items: usize,
}

impl AggregatorConfig {
    /// Config with the given quiet interval and the Telegram album limit.
    #[must_use]
    pub const fn new(quiet_interval: Duration) -> Self {
        Self {
            quiet_interval,
            max_items: MAX_MEDIA_GROUP_ITEMS,
        }
    }

    /// Override the item count that triggers an immediate flush.
    #[must_use]
    pub const fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

/// Attachments collected under one media group id.
#[derive(Debug, Clone)]
pub struct MediaGroup {
    /// Platform media group id
    pub group_id: String,
    /// Chat the album arrived in
    pub chat_id: i64,
    /// Items in arrival order
    pub items: Vec<MediaItem>,
    /// When the first item arrived
    pub created_at: DateTime<Utc>,
}

impl MediaGroup {
    fn new(group_id: String, chat_id: i64, first: MediaItem) -> Self {
        Self {
            group_id,
            chat_id,
            items: vec![first],
            created_at: Utc::now(),
        }
    }

    /// Outbound album: the first item keeps its processed caption, the rest
    /// are sent without one.
    #[must_use]
    pub fn into_batch(self) -> Vec<OutboundMedia> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let mut outbound = item.into_outbound();
                if index > 0 {
                    outbound.caption = None;
                }
                outbound
            })
            .collect()
    }
}

/// Counters reported when the aggregator stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    /// Groups handed to the gateway
    pub groups_flushed: usize,
    /// Items across those groups
    pub items_flushed: usize,
    /// Group sends that failed and were discarded
    pub dispatch_failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlushReason {
    Quiet,
    Full,
    Requested,
    Shutdown,
}

enum AggregatorCommand {
    Append {
        chat_id: i64,
        group_id: String,
        item: MediaItem,
    },
    Flush {
        group_id: String,
        reply: oneshot::Sender<bool>,
    },
    Pending {
        reply: oneshot::Sender<usize>,
    },
}

struct PendingGroup {
    group: MediaGroup,
    timer: delay_queue::Key,
}

/// Cloneable handle to the aggregator task.
#[derive(Clone)]
pub struct MediaGroupHandle {
    tx: mpsc::Sender<AggregatorCommand>,
}

impl MediaGroupHandle {
    /// Buffers `item` under `group_id`, (re)starting the group's quiet timer.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::AggregatorClosed` if the task has stopped.
    pub async fn append(
        &self,
        chat_id: i64,
        group_id: impl Into<String>,
        item: MediaItem,
    ) -> Result<(), RelayError> {
        self.tx
            .send(AggregatorCommand::Append {
                chat_id,
                group_id: group_id.into(),
                item,
            })
            .await
            .map_err(|_| RelayError::AggregatorClosed)
    }

    /// Flushes `group_id` now. Returns `false` if no such group is buffered.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::AggregatorClosed` if the task has stopped.
    pub async fn flush(&self, group_id: impl Into<String>) -> Result<bool, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AggregatorCommand::Flush {
                group_id: group_id.into(),
                reply,
            })
            .await
            .map_err(|_| RelayError::AggregatorClosed)?;
        rx.await.map_err(|_| RelayError::AggregatorClosed)
    }

    /// Number of groups currently being collected.
    ///
    /// # Errors
    ///
    /// Returns `RelayError::AggregatorClosed` if the task has stopped.
    pub async fn pending_groups(&self) -> Result<usize, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(AggregatorCommand::Pending { reply })
            .await
            .map_err(|_| RelayError::AggregatorClosed)?;
        rx.await.map_err(|_| RelayError::AggregatorClosed)
    }
}

/// Spawn the aggregator on the Tokio runtime.
///
/// The task stops when `shutdown` is cancelled or every handle is dropped.
/// On the way out it flushes all buffered groups and waits for in-flight
/// sends before returning its counters.
pub fn spawn_media_group_aggregator(
    gateway: Arc<dyn DispatchGateway>,
    config: AggregatorConfig,
    shutdown: CancellationToken,
) -> (MediaGroupHandle, JoinHandle<AggregatorStats>) {
    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let task = tokio::spawn(run_aggregator(gateway, rx, config, shutdown));
    (MediaGroupHandle { tx }, task)
}

struct Aggregator {
    gateway: Arc<dyn DispatchGateway>,
    config: AggregatorConfig,
    groups: HashMap<String, PendingGroup>,
    timers: DelayQueue<String>,
    in_flight: JoinSet<bool>,
    stats: AggregatorStats,
}

async fn run_aggregator(
    gateway: Arc<dyn DispatchGateway>,
    mut rx: mpsc::Receiver<AggregatorCommand>,
    config: AggregatorConfig,
    shutdown: CancellationToken,
) -> AggregatorStats {
    let mut state = Aggregator {
        gateway,
        config,
        groups: HashMap::new(),
        timers: DelayQueue::new(),
        in_flight: JoinSet::new(),
        stats: AggregatorStats::default(),
    };

    loop {
        tokio::select! {
            () = shutdown.cancelled() => break,
            command = rx.recv() => {
                let Some(command) = command else {
                    break;
                };
                state.handle_command(command);
            }
            Some(expired) = state.timers.next() => {
                let group_id = expired.into_inner();
                if let Some(pending) = state.groups.remove(&group_id) {
                    state.dispatch(pending.group, FlushReason::Quiet);
                }
            }
            Some(joined) = state.in_flight.join_next() => state.record(joined),
        }
    }

    state.drain(&mut rx).await;
    info!(
        groups = state.stats.groups_flushed,
        items = state.stats.items_flushed,
        failures = state.stats.dispatch_failures,
        "Media group aggregator stopped"
    );
    state.stats
}

impl Aggregator {
    fn handle_command(&mut self, command: AggregatorCommand) {
        match command {
            AggregatorCommand::Append {
                chat_id,
                group_id,
                item,
            } => self.append(chat_id, group_id, item),
            AggregatorCommand::Flush { group_id, reply } => {
                let flushed = match self.take(&group_id) {
                    Some(group) => {
                        self.dispatch(group, FlushReason::Requested);
                        true
                    }
                    None => {
                        debug!(group_id = %group_id, "Flush requested for unknown media group");
                        false
                    }
                };
                let _ = reply.send(flushed);
            }
            AggregatorCommand::Pending { reply } => {
                let _ = reply.send(self.groups.len());
            }
        }
    }

    fn append(&mut self, chat_id: i64, group_id: String, item: MediaItem) {
        let count = match self.groups.entry(group_id.clone()) {
            Entry::Occupied(mut entry) => {
                let pending = entry.get_mut();
                pending.group.items.push(item);
                self.timers.reset(&pending.timer, self.config.quiet_interval);
                pending.group.items.len()
            }
            Entry::Vacant(entry) => {
                let timer = self
                    .timers
                    .insert(entry.key().clone(), self.config.quiet_interval);
                let group = MediaGroup::new(entry.key().clone(), chat_id, item);
                entry.insert(PendingGroup { group, timer });
                1
            }
        };

        if count >= self.config.max_items {
            // Album is complete as far as the platform is concerned.
            if let Some(group) = self.take(&group_id) {
                self.dispatch(group, FlushReason::Full);
            }
        }
    }

    /// Removes a group and its timer.
    fn take(&mut self, group_id: &str) -> Option<MediaGroup> {
        let pending = self.groups.remove(group_id)?;
        self.timers.try_remove(&pending.timer);
        Some(pending.group)
    }

    fn dispatch(&mut self, group: MediaGroup, reason: FlushReason) {
        let chat_id = group.chat_id;
        let group_id = group.group_id.clone();
        let batch = group.into_batch();
        let items = batch.len();

        self.stats.groups_flushed += 1;
        self.stats.items_flushed += items;
        debug!(group_id = %group_id, items, ?reason, "Flushing media group");

        let gateway = Arc::clone(&self.gateway);
        self.in_flight.spawn(async move {
            match gateway.send_group(chat_id, batch).await {
                Ok(()) => {
                    info!(group_id = %group_id, items, "Sent media group");
                    true
                }
                Err(e) => {
                    warn!(group_id = %group_id, error = %e, "Media group send failed; group discarded");
                    false
                }
            }
        });
    }

    fn record(&mut self, joined: Result<bool, tokio::task::JoinError>) {
        match joined {
            Ok(true) => {}
            Ok(false) => self.stats.dispatch_failures += 1,
            Err(e) => {
                self.stats.dispatch_failures += 1;
                error!(error = %e, "Media group send task failed");
            }
        }
    }

    async fn drain(&mut self, rx: &mut mpsc::Receiver<AggregatorCommand>) {
        rx.close();
        while let Some(command) = rx.recv().await {
            self.handle_command(command);
        }

        let mut remaining: Vec<MediaGroup> = self
            .groups
            .drain()
            .map(|(_, pending)| pending.group)
            .collect();
        self.timers.clear();
        remaining.sort_by_key(|group| group.created_at);
        for group in remaining {
            self.dispatch(group, FlushReason::Shutdown);
        }
        while let Some(joined) = self.in_flight.join_next().await {
            self.record(joined);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::gateway::MockDispatchGateway;
    use crate::relay::MediaKind;

    fn item(content_ref: &str, caption: Option<&str>) -> MediaItem {
        MediaItem {
            kind: MediaKind::Photo,
            content_ref: content_ref.to_string(),
            original_caption: caption.map(str::to_string),
            processed_caption: caption.map(str::to_string),
        }
    }

    #[test]
    fn batch_keeps_only_the_lead_caption() {
        let mut group = MediaGroup::new("g".into(), 1, item("a", Some("first")));
        group.items.push(item("b", Some("second")));
        group.items.push(item("c", None));

        let batch = group.into_batch();
        let refs: Vec<_> = batch.iter().map(|m| m.content_ref.as_str()).collect();
        assert_eq!(refs, vec!["a", "b", "c"]);
        assert_eq!(batch[0].caption.as_deref(), Some("first"));
        assert!(batch[1].caption.is_none());
        assert!(batch[2].caption.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn group_is_sent_once_after_quiet_interval() {
        let mut gateway = MockDispatchGateway::new();
        gateway
            .expect_send_group()
            .withf(|chat_id, items| *chat_id == 7 && items.len() == 3)
            .times(1)
            .returning(|_, _| Ok(()));

        let shutdown = CancellationToken::new();
        let (handle, task) = spawn_media_group_aggregator(
            Arc::new(gateway),
            AggregatorConfig::new(Duration::from_secs(1)),
            shutdown.clone(),
        );

        for name in ["a", "b", "c"] {
            assert!(handle.append(7, "album", item(name, None)).await.is_ok());
            tokio::time::sleep(Duration::from_millis(600)).await;
        }
        assert!(matches!(handle.pending_groups().await, Ok(1)));

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(matches!(handle.pending_groups().await, Ok(0)));

        shutdown.cancel();
        let stats = match task.await {
            Ok(stats) => stats,
            Err(err) => panic!("aggregator join failed: {err}"),
        };
        assert_eq!(stats.groups_flushed, 1);
        assert_eq!(stats.items_flushed, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_send_discards_the_group() {
        let mut gateway = MockDispatchGateway::new();
        gateway
            .expect_send_group()
            .times(1)
            .returning(|_, _| Err(crate::relay::DispatchError::Transport("boom".into())));

        let shutdown = CancellationToken::new();
        let (handle, task) =
            spawn_media_group_aggregator(Arc::new(gateway), AggregatorConfig::default(), shutdown.clone());

        assert!(handle.append(1, "g", item("a", Some("cap"))).await.is_ok());
        assert!(matches!(handle.flush("g").await, Ok(true)));
        assert!(matches!(handle.flush("g").await, Ok(false)));
        assert!(matches!(handle.pending_groups().await, Ok(0)));

        shutdown.cancel();
        let stats = match task.await {
            Ok(stats) => stats,
            Err(err) => panic!("aggregator join failed: {err}"),
        };
        assert_eq!(stats.dispatch_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn full_album_flushes_without_waiting() {
        let mut gateway = MockDispatchGateway::new();
        gateway
            .expect_send_group()
            .withf(|_, items| items.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));

        let shutdown = CancellationToken::new();
        let (handle, task) = spawn_media_group_aggregator(
            Arc::new(gateway),
            AggregatorConfig::new(Duration::from_secs(60)).with_max_items(2),
            shutdown.clone(),
        );

        assert!(handle.append(1, "g", item("a", None)).await.is_ok());
        assert!(handle.append(1, "g", item("b", None)).await.is_ok());
        assert!(matches!(handle.pending_groups().await, Ok(0)));

        shutdown.cancel();
        assert!(task.await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_drains_pending_groups() {
        let mut gateway = MockDispatchGateway::new();
        gateway
            .expect_send_group()
            .times(2)
            .returning(|_, _| Ok(()));

        let shutdown = CancellationToken::new();
        let (handle, task) = spawn_media_group_aggregator(
            Arc::new(gateway),
            AggregatorConfig::new(Duration::from_secs(60)),
            shutdown.clone(),
        );

        assert!(handle.append(1, "g1", item("a", None)).await.is_ok());
        assert!(handle.append(2, "g2", item("b", None)).await.is_ok());
        assert!(matches!(handle.pending_groups().await, Ok(2)));

        drop(handle);
        let stats = match task.await {
            Ok(stats) => stats,
            Err(err) => panic!("aggregator join failed: {err}"),
        };
        assert_eq!(stats.groups_flushed, 2);
    }
}
