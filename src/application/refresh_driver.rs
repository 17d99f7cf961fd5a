// Auto-refresh driver - timer + callback per session
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const MIN_REFRESH_SECS: u64 = 10;
pub const MAX_REFRESH_SECS: u64 = 120;
pub const DEFAULT_REFRESH_SECS: u64 = 30;

/// Refresh period, always within [10, 120] seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshInterval(u64);

impl RefreshInterval {
    pub fn from_secs(secs: u64) -> Self {
        Self(secs.clamp(MIN_REFRESH_SECS, MAX_REFRESH_SECS))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }
}

impl Default for RefreshInterval {
    fn default() -> Self {
        Self::from_secs(DEFAULT_REFRESH_SECS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Cycling { interval: RefreshInterval },
}

/// Work performed on every tick: drop the cached result, then re-render.
#[async_trait]
pub trait RefreshCycle: Send + Sync {
    async fn invalidate(&self);
    async fn render(&self);
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    state: RefreshState,
    // Bumped on every Idle -> Cycling so a task left over from an earlier enable retires.
    generation: u64,
    // Last interval chosen by the user, kept across disable
    chosen: Option<RefreshInterval>,
}

pub struct RefreshDriver {
    schedule: watch::Sender<Schedule>,
}

impl Default for RefreshDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshDriver {
    pub fn new() -> Self {
        let (schedule, _) = watch::channel(Schedule {
            state: RefreshState::Idle,
            generation: 0,
            chosen: None,
        });
        Self { schedule }
    }

    pub fn state(&self) -> RefreshState {
        self.schedule.borrow().state
    }

    /// The interval most recently passed to `enable` or `remember`, even while idle.
    pub fn chosen_interval(&self) -> Option<RefreshInterval> {
        self.schedule.borrow().chosen
    }

    /// Keep an interval picked while idle without starting a cycle.
    pub fn remember(&self, interval: RefreshInterval) {
        self.schedule.send_modify(|s| s.chosen = Some(interval));
    }

    /// Start cycling, or adopt a new interval at the next scheduling point if already cycling.
    pub fn enable(&self, interval: RefreshInterval, cycle: Arc<dyn RefreshCycle>) {
        let mut started = None;
        self.schedule.send_modify(|s| {
            if s.state == RefreshState::Idle {
                s.generation += 1;
                started = Some(s.generation);
            }
            s.state = RefreshState::Cycling { interval };
            s.chosen = Some(interval);
        });

        match started {
            Some(generation) => {
                tracing::info!(
                    "Auto-refresh enabled every {}s (generation {})",
                    interval.as_secs(),
                    generation
                );
                tokio::spawn(run_cycles(self.schedule.subscribe(), generation, cycle));
            }
            None => {
                tracing::debug!("Auto-refresh interval changed to {}s", interval.as_secs());
            }
        }
    }

    /// Stop cycling. A suspension already in progress still completes, then the task exits.
    pub fn disable(&self) {
        self.schedule.send_modify(|s| {
            if s.state != RefreshState::Idle {
                tracing::info!("Auto-refresh disabled");
            }
            s.state = RefreshState::Idle;
        });
    }
}

impl Drop for RefreshDriver {
    fn drop(&mut self) {
        self.schedule.send_modify(|s| s.state = RefreshState::Idle);
    }
}

fn scheduled_interval(rx: &watch::Receiver<Schedule>, generation: u64) -> Option<RefreshInterval> {
    let schedule = rx.borrow();
    if schedule.generation != generation {
        return None;
    }
    match schedule.state {
        RefreshState::Cycling { interval } => Some(interval),
        RefreshState::Idle => None,
    }
}

async fn run_cycles(
    rx: watch::Receiver<Schedule>,
    generation: u64,
    cycle: Arc<dyn RefreshCycle>,
) {
    while let Some(interval) = scheduled_interval(&rx, generation) {
        tokio::time::sleep(interval.as_duration()).await;

        // Toggle is only observed here, after the suspension
        if scheduled_interval(&rx, generation).is_none() {
            break;
        }

        cycle.invalidate().await;
        cycle.render().await;
    }

    tracing::debug!("Refresh cycle generation {} stopped", generation);
}
