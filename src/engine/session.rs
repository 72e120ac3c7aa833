use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::{self, JoinHandle};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::engine::{
    AccrualSchedule, Clock, DepositSnapshot, LedgerError, Projection, ProjectionSink,
    SnapshotSource, project,
};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// State of one connected user: the cached snapshot and the ticker projecting it.
///
/// At most one ticker runs per session. Loading a snapshot cancels the running
/// ticker before starting the next one, and dropping the session cancels it too.
/// Loading a snapshot spawns on the current tokio runtime.
pub struct Session {
    schedule: AccrualSchedule,
    tick: Duration,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn ProjectionSink>,
    snapshot: Option<DepositSnapshot>,
    ticker: Option<JoinHandle<()>>,
}

impl Session {
    /// A zero `tick` is raised to one millisecond.
    pub fn new(
        schedule: AccrualSchedule,
        tick: Duration,
        clock: Arc<dyn Clock>,
        sink: Arc<dyn ProjectionSink>,
    ) -> Self {
        Session {
            schedule,
            tick: tick.max(MIN_PERIOD),
            clock,
            sink,
            snapshot: None,
            ticker: None,
        }
    }

    pub fn snapshot(&self) -> Option<&DepositSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Projection of the cached snapshot right now, `None` when disconnected.
    pub fn project_now(&self) -> Option<Projection> {
        self.snapshot
            .as_ref()
            .map(|s| project(s, self.clock.now(), &self.schedule))
    }

    /// Replace the cached snapshot, render it once and restart the ticker.
    /// An empty deposit is rendered but not ticked.
    pub fn load_snapshot(&mut self, snapshot: DepositSnapshot) -> Projection {
        self.stop_ticker();
        self.snapshot = Some(snapshot);

        let projection = project(&snapshot, self.clock.now(), &self.schedule);
        log::debug!("Snapshot loaded: {snapshot:?} -> {projection}");
        self.sink.render(&projection);

        if snapshot.is_empty() {
            log::debug!("Empty deposit, projection suspended");
        } else {
            self.ticker = Some(self.spawn_ticker(snapshot));
        }

        projection
    }

    /// Fetch a fresh snapshot. A failed fetch is logged and the cached snapshot kept.
    pub fn refresh<S: SnapshotSource + ?Sized>(&mut self, source: &S) -> bool {
        self.apply_fetch(source.fetch())
    }

    fn apply_fetch(&mut self, fetched: Result<DepositSnapshot, LedgerError>) -> bool {
        match fetched {
            Ok(snapshot) => {
                self.load_snapshot(snapshot);
                true
            }
            Err(e) => {
                log::warn!("Snapshot refresh failed, keeping previous data: {e}");
                false
            }
        }
    }

    /// Safe to call with no ticker running.
    pub fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
            log::debug!("Ticker stopped");
        }
    }

    pub fn disconnect(&mut self) {
        self.stop_ticker();
        self.snapshot = None;
        log::debug!("Session disconnected");
    }

    /// Refresh now and then every `refresh_every` until `shutdown` completes,
    /// then disconnect. Fetches run on the blocking pool.
    ///
    /// Each refresh restarts the ticker, so the tick phase follows the last
    /// refresh. When `refresh_every` is a multiple of the tick, the last tick of
    /// a cycle and the next refresh fall on the same instant and both render.
    pub async fn watch<S, F>(&mut self, source: Arc<S>, refresh_every: Duration, shutdown: F)
    where
        S: SnapshotSource + Send + Sync + 'static,
        F: Future<Output = ()>,
    {
        let mut refresh = time::interval(refresh_every.max(MIN_PERIOD));
        refresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = refresh.tick() => {
                    let source = Arc::clone(&source);
                    match task::spawn_blocking(move || source.fetch()).await {
                        Ok(fetched) => {
                            self.apply_fetch(fetched);
                        }
                        Err(e) => log::warn!("Snapshot fetch task failed: {e}"),
                    }
                }
            }
        }

        self.disconnect();
    }

    fn spawn_ticker(&self, snapshot: DepositSnapshot) -> JoinHandle<()> {
        let schedule = self.schedule;
        let period = self.tick;
        let clock = Arc::clone(&self.clock);
        let sink = Arc::clone(&self.sink);

        tokio::spawn(async move {
            // The load already rendered, first tick is one period later
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                sink.render(&project(&snapshot, clock.now(), &schedule));
            }
        })
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
