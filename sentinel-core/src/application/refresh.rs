// sentinel-core/src/application/refresh.rs

// Refresh cycle for one page: clear the cache, rebuild the page, back to
// Idle. Cycles are serialized per controller. The scheduler drives timer
// cycles from a tokio interval instead of a blocking sleep loop.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::application::dashboard::{DashboardService, PageKind};
use crate::domain::quality::QualityFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshState {
    Idle,
    Refreshing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshTrigger {
    Manual,
    Timer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshStatus {
    pub page: PageKind,
    pub state: RefreshState,
    pub auto_refresh: bool,
    pub last_trigger: Option<RefreshTrigger>,
    pub last_completed: Option<DateTime<Utc>>,
    pub cycles: u64,
}

pub struct RefreshController {
    page: PageKind,
    service: Arc<DashboardService>,
    cycle: tokio::sync::Mutex<()>,
    status: Mutex<RefreshStatus>,
    auto: watch::Sender<bool>,
}

impl RefreshController {
    pub fn new(page: PageKind, service: Arc<DashboardService>, auto_refresh: bool) -> Self {
        let (auto, _) = watch::channel(auto_refresh);
        Self {
            page,
            service,
            cycle: tokio::sync::Mutex::new(()),
            status: Mutex::new(RefreshStatus {
                page,
                state: RefreshState::Idle,
                auto_refresh,
                last_trigger: None,
                last_completed: None,
                cycles: 0,
            }),
            auto,
        }
    }

    pub fn page(&self) -> PageKind {
        self.page
    }

    /// Runs one full cycle. A concurrent trigger waits for the running
    /// cycle to finish, then runs its own.
    #[instrument(skip(self), fields(page = %self.page))]
    pub async fn refresh(&self, trigger: RefreshTrigger) -> RefreshStatus {
        let _cycle = self.cycle.lock().await;
        self.lock_status().state = RefreshState::Refreshing;
        let _idle = BackToIdle(&self.status);
        debug!("🔄 Refreshing");

        self.service.clear_cache();
        match self.page {
            PageKind::Quality => {
                self.service.quality_page(QualityFilter::default()).await;
            }
            PageKind::Risk => {
                self.service.risk_page().await;
            }
        }

        let completed = self.service.now();
        let mut status = self.lock_status();
        status.state = RefreshState::Idle;
        status.last_trigger = Some(trigger);
        status.last_completed = Some(completed);
        status.cycles += 1;
        status.clone()
    }

    pub fn status(&self) -> RefreshStatus {
        self.lock_status().clone()
    }

    pub fn auto_refresh(&self) -> bool {
        *self.auto.borrow()
    }

    /// Only an actual change reaches the scheduler, so re-sending the
    /// current value does not restart the interval.
    pub fn set_auto_refresh(&self, enabled: bool) {
        let changed = self.auto.send_if_modified(|current| {
            let changed = *current != enabled;
            *current = enabled;
            changed
        });
        if changed {
            info!(page = %self.page, enabled, "Auto-refresh toggled");
            self.lock_status().auto_refresh = enabled;
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.auto.subscribe()
    }

    fn lock_status(&self) -> MutexGuard<'_, RefreshStatus> {
        lock(&self.status)
    }
}

pub struct RefreshScheduler;

impl RefreshScheduler {
    /// Spawns the timer task for `controller`. While auto-refresh is on a
    /// cycle fires every `interval`; switching it back on restarts the
    /// interval from that moment.
    pub fn spawn(controller: Arc<RefreshController>, interval: Duration) -> RefreshHandle {
        let token = CancellationToken::new();
        let task = tokio::spawn(run(controller, interval, token.clone()));
        RefreshHandle { token, task }
    }
}

async fn run(controller: Arc<RefreshController>, interval: Duration, token: CancellationToken) {
    let mut auto = controller.subscribe();
    let page = controller.page();
    debug!(%page, ?interval, "⏱️ Refresh scheduler started");

    loop {
        // Disabled: park until toggled or cancelled
        while !*auto.borrow_and_update() {
            tokio::select! {
                _ = token.cancelled() => return,
                changed = auto.changed() => if changed.is_err() { return },
            }
        }

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(%page, "Refresh scheduler stopped");
                    return;
                }
                changed = auto.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    break;
                }
                // The cycle runs in the arm body: cancellation only takes
                // effect between cycles.
                _ = ticker.tick() => {
                    controller.refresh(RefreshTrigger::Timer).await;
                }
            }
        }
    }
}

pub struct RefreshHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels and waits for the task, letting an in-flight cycle finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        let _ = self.task.await;
    }
}

fn lock(status: &Mutex<RefreshStatus>) -> MutexGuard<'_, RefreshStatus> {
    status.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Puts the page back to Idle when a cycle ends, including a cycle whose
/// future was dropped before completion.
struct BackToIdle<'a>(&'a Mutex<RefreshStatus>);

impl Drop for BackToIdle<'_> {
    fn drop(&mut self) {
        lock(self.0).state = RefreshState::Idle;
    }
}
