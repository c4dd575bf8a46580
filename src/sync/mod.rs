pub mod http;
pub mod merge;
pub mod remote;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{broadcast, mpsc, watch, RwLock};

use crate::config::SyncConfig;
use crate::store::{local_today, ProgressStore, RemoteState};
use self::remote::{
    DailyProgressRow, PhraseProgressRow, ProfileRow, RemoteError, RemoteStore, VocabularyRow,
};

/// 去抖计时器的“永不触发”时长，dirty 事件到来时才会重置到真实的去抖窗口
const DEBOUNCE_IDLE: Duration = Duration::from_secs(86_400);

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("sync attempted while offline")]
    Offline,
    #[error("retries exhausted after {attempts} attempts: {source}")]
    RetriesExhausted { attempts: u32, source: RemoteError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncStatus {
    Offline,
    Pending,
    Syncing,
    Synced,
    Error,
}

/// Operational bookkeeping published to the UI layer; always introspectable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub status: SyncStatus,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
pub enum SyncCommand {
    SetOnline(bool),
    Login,
    SyncNow,
}

/// Cheap clonable handle for the embedding layer: issue commands, observe
/// status.
#[derive(Debug, Clone)]
pub struct SyncHandle {
    cmd_tx: mpsc::UnboundedSender<SyncCommand>,
    state_rx: watch::Receiver<SyncState>,
}

impl SyncHandle {
    pub fn set_online(&self, online: bool) {
        let _ = self.cmd_tx.send(SyncCommand::SetOnline(online));
    }

    pub fn login(&self) {
        let _ = self.cmd_tx.send(SyncCommand::Login);
    }

    pub fn sync_now(&self) {
        let _ = self.cmd_tx.send(SyncCommand::SyncNow);
    }

    pub fn state(&self) -> SyncState {
        *self.state_rx.borrow()
    }

    pub fn status(&self) -> SyncStatus {
        self.state_rx.borrow().status
    }

    /// Watch receiver for UIs that want push-based status updates.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state_rx.clone()
    }
}

/// Reconciles the local [`ProgressStore`] with the remote store: debounced
/// pushes after local mutations, periodic pulls, most-recent-wins merging.
/// Owns its timers; consumed by [`run`](Self::run) and stopped through the
/// shutdown channel.
pub struct SyncCoordinator {
    task: SyncTask,
    cmd_rx: mpsc::UnboundedReceiver<SyncCommand>,
    dirty_rx: mpsc::UnboundedReceiver<()>,
    dirty_tx: mpsc::UnboundedSender<()>,
    shutdown_rx: broadcast::Receiver<()>,
}

struct SyncTask {
    store: Arc<RwLock<ProgressStore>>,
    remote: Arc<dyn RemoteStore>,
    user_id: String,
    config: SyncConfig,
    state_tx: watch::Sender<SyncState>,
    online: bool,
    pending: bool,
    in_flight: AtomicBool,
}

impl SyncCoordinator {
    pub fn new(
        store: Arc<RwLock<ProgressStore>>,
        remote: Arc<dyn RemoteStore>,
        user_id: impl Into<String>,
        config: SyncConfig,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> (Self, SyncHandle) {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (dirty_tx, dirty_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(SyncState {
            status: SyncStatus::Pending,
            last_synced_at: None,
        });

        let coordinator = Self {
            task: SyncTask {
                store,
                remote,
                user_id: user_id.into(),
                config,
                state_tx,
                online: true,
                pending: true,
                in_flight: AtomicBool::new(false),
            },
            cmd_rx,
            dirty_rx,
            dirty_tx,
            shutdown_rx,
        };
        let handle = SyncHandle { cmd_tx, state_rx };
        (coordinator, handle)
    }

    /// Sender to wire into [`ProgressStore::set_dirty_notifier`].
    pub fn dirty_notifier(&self) -> mpsc::UnboundedSender<()> {
        self.dirty_tx.clone()
    }

    /// Event loop: debounced push, periodic reconcile, command handling.
    pub async fn run(self) {
        let Self {
            mut task,
            mut cmd_rx,
            mut dirty_rx,
            // 自持一个 sender，保证 dirty 通道在未接线时也不会关闭
            dirty_tx: _dirty_keepalive,
            mut shutdown_rx,
        } = self;

        let mut interval = tokio::time::interval(Duration::from_secs(task.config.interval_secs));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // 首个 tick 立即完成，先消费掉
        interval.tick().await;

        let debounce = tokio::time::sleep(DEBOUNCE_IDLE);
        tokio::pin!(debounce);
        let mut debounce_armed = false;

        tracing::info!(user_id = %task.user_id, "Sync coordinator started");

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    tracing::info!("Sync coordinator shutting down");
                    break;
                }
                Some(()) = dirty_rx.recv() => {
                    task.note_local_mutation();
                    debounce.as_mut().reset(
                        tokio::time::Instant::now()
                            + Duration::from_millis(task.config.debounce_ms),
                    );
                    debounce_armed = true;
                }
                Some(cmd) = cmd_rx.recv() => match cmd {
                    SyncCommand::SetOnline(online) => task.handle_online_change(online).await,
                    SyncCommand::Login => task.handle_login().await,
                    SyncCommand::SyncNow => task.reconcile().await,
                },
                _ = &mut debounce, if debounce_armed => {
                    debounce_armed = false;
                    task.push().await;
                }
                _ = interval.tick() => {
                    if task.pending || task.is_stale() {
                        task.reconcile().await;
                    }
                }
            }
        }
    }
}

impl SyncTask {
    fn set_status(&self, status: SyncStatus) {
        self.state_tx.send_modify(|state| state.status = status);
    }

    fn record_synced(&self) {
        self.state_tx
            .send_modify(|state| state.last_synced_at = Some(Utc::now()));
    }

    fn is_stale(&self) -> bool {
        match self.state_tx.borrow().last_synced_at {
            None => true,
            Some(t) => {
                (Utc::now() - t).num_seconds() >= i64::try_from(self.config.staleness_secs).unwrap_or(i64::MAX)
            }
        }
    }

    fn note_local_mutation(&mut self) {
        self.pending = true;
        if self.state_tx.borrow().status != SyncStatus::Syncing {
            self.set_status(if self.online {
                SyncStatus::Pending
            } else {
                SyncStatus::Offline
            });
        }
    }

    async fn handle_online_change(&mut self, online: bool) {
        if self.online == online {
            return;
        }
        self.online = online;
        if online {
            tracing::info!("Connectivity restored, reconciling");
            // 先拉后推，避免把离线期间的本地状态直接盖掉远端
            self.reconcile().await;
        } else {
            tracing::info!("Connectivity lost");
            self.set_status(SyncStatus::Offline);
        }
    }

    /// Identity acquired: pull before any push so stale local defaults never
    /// clobber remote state.
    async fn handle_login(&mut self) {
        if self.pull().await.is_ok() && self.pending {
            self.push().await;
        }
    }

    /// Pull, then push whatever is still pending.
    async fn reconcile(&mut self) {
        if self.pull().await.is_err() {
            return;
        }
        if self.pending {
            self.push().await;
        }
    }

    /// Serialize the current store snapshot into remote rows and upsert each
    /// entity type independently; one failing sub-push does not block the
    /// others.
    async fn push(&mut self) {
        if !self.online {
            tracing::debug!("Push skipped: offline");
            self.set_status(SyncStatus::Offline);
            return;
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::warn!("Sync already in flight, dropping push request");
            return;
        }
        self.set_status(SyncStatus::Syncing);

        let payload = self.store.read().await.state_payload();
        let profile_row = ProfileRow::from_stats(&self.user_id, None, &payload.profile);
        let vocab_rows: Vec<VocabularyRow> = payload
            .vocabulary
            .iter()
            .map(|item| VocabularyRow::from_item(&self.user_id, item))
            .collect();
        let phrase_rows: Vec<PhraseProgressRow> = payload
            .phrases
            .iter()
            .map(|progress| PhraseProgressRow::from_progress(&self.user_id, progress))
            .collect();
        let daily_row = DailyProgressRow::from_daily(&self.user_id, &payload.daily);

        let mut failed = 0_u32;
        let retries = self.config.max_retries;
        let base = Duration::from_millis(self.config.retry_base_ms);

        if let Err(e) = retry_with_backoff(retries, base, "profile", || {
            self.remote.upsert_profile(&profile_row)
        })
        .await
        {
            tracing::error!(error = %e, "Profile push failed");
            failed += 1;
        }
        if let Err(e) = retry_with_backoff(retries, base, "vocabulary", || {
            self.remote.upsert_vocabulary(&vocab_rows)
        })
        .await
        {
            tracing::error!(error = %e, "Vocabulary push failed");
            failed += 1;
        }
        if let Err(e) = retry_with_backoff(retries, base, "phrases", || {
            self.remote.upsert_phrase_progress(&phrase_rows)
        })
        .await
        {
            tracing::error!(error = %e, "Phrase progress push failed");
            failed += 1;
        }
        if let Err(e) = retry_with_backoff(retries, base, "daily", || {
            self.remote.upsert_daily_progress(&daily_row)
        })
        .await
        {
            tracing::error!(error = %e, "Daily progress push failed");
            failed += 1;
        }

        if failed == 0 {
            self.pending = false;
            self.record_synced();
            self.set_status(SyncStatus::Synced);
            tracing::debug!(items = vocab_rows.len(), phrases = phrase_rows.len(), "Push complete");
        } else {
            // pending 保持不变，下个周期重试
            self.set_status(SyncStatus::Error);
        }
        self.in_flight.store(false, Ordering::SeqCst);
    }

    /// Fetch remote state and merge it through the store's merge entry point.
    /// A missing remote profile is a first-time user, not an error.
    async fn pull(&mut self) -> Result<(), SyncError> {
        if !self.online {
            self.set_status(SyncStatus::Offline);
            return Err(SyncError::Offline);
        }
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::warn!("Sync already in flight, dropping pull request");
            return Ok(());
        }
        self.set_status(SyncStatus::Syncing);

        let result = self.pull_inner().await;
        match &result {
            Ok(()) => {
                self.record_synced();
                self.set_status(if self.pending {
                    SyncStatus::Pending
                } else {
                    SyncStatus::Synced
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "Pull failed");
                self.set_status(SyncStatus::Error);
            }
        }
        self.in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn pull_inner(&mut self) -> Result<(), SyncError> {
        let retries = self.config.max_retries;
        let base = Duration::from_millis(self.config.retry_base_ms);
        let user_id = self.user_id.clone();
        let today = local_today();

        let profile = retry_with_backoff(retries, base, "profile", || {
            self.remote.fetch_profile(&user_id)
        })
        .await?;
        let vocabulary = retry_with_backoff(retries, base, "vocabulary", || {
            self.remote.fetch_vocabulary(&user_id)
        })
        .await?;
        let phrases = retry_with_backoff(retries, base, "phrases", || {
            self.remote.fetch_phrase_progress(&user_id)
        })
        .await?;
        let daily = retry_with_backoff(retries, base, "daily", || {
            self.remote.fetch_daily_progress(&user_id, today)
        })
        .await?;

        let incoming = RemoteState {
            profile: profile.map(ProfileRow::into_stats),
            vocabulary: vocabulary
                .into_iter()
                .map(VocabularyRow::into_item)
                .collect(),
            phrases: phrases
                .into_iter()
                .map(PhraseProgressRow::into_progress)
                .collect(),
            daily: daily.map(DailyProgressRow::into_daily),
        };

        let local_ahead = self.store.write().await.merge_remote(incoming);
        if local_ahead {
            self.pending = true;
        }
        Ok(())
    }
}

/// Bounded retry with exponential backoff. Never retries forever; the caller
/// surfaces exhaustion as `error` status and waits for the next cycle.
async fn retry_with_backoff<T, F, Fut>(
    max_attempts: u32,
    base_delay: Duration,
    label: &'static str,
    mut op: F,
) -> Result<T, SyncError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    let attempts = max_attempts.max(1);
    let mut delay = base_delay;
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(source) => {
                tracing::warn!(error = %source, attempt, label, "Remote operation failed");
                if attempt >= attempts {
                    return Err(SyncError::RetriesExhausted { attempts, source });
                }
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}
