use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::core::{error::ConsoleError, gateway::Gateway, types::Incident};
use crate::pipeline::fetch::fetch_incidents;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// User-triggered; shows a loading indicator and surfaces errors.
    Foreground,
    /// Interval tick; silent unless the session is gone.
    Background,
}

#[derive(Debug)]
pub struct PollEvent {
    pub generation: u64,
    pub origin: LoadOrigin,
    pub result: Result<Vec<Incident>, ConsoleError>,
}

/// Owns the incident polling task. Every stop or restart bumps the
/// generation, and consumers drop events carrying an older one. Fetches
/// already in flight are never aborted, only ignored.
pub struct Poller {
    gateway: Gateway,
    interval: Duration,
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<PollEvent>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(gateway: Gateway, interval: Duration) -> (Self, mpsc::UnboundedReceiver<PollEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Self {
            gateway,
            interval,
            generation: Arc::new(AtomicU64::new(0)),
            tx,
            task: None,
        };
        (poller, rx)
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn is_current(&self, event: &PollEvent) -> bool {
        event.generation == self.generation()
    }

    /// Starts ticking under a fresh generation; the first background fetch
    /// happens one interval from now. Returns the new generation.
    pub fn start(&mut self) -> u64 {
        self.halt();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let gateway = self.gateway.clone();
        let tx = self.tx.clone();
        let period = self.interval;
        tracing::debug!("poller started (generation {}, every {:?})", generation, period);

        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }
                spawn_fetch(gateway.clone(), tx.clone(), generation, LoadOrigin::Background);
            }
        }));
        generation
    }

    /// Stops ticking and invalidates everything still in flight.
    pub fn stop(&mut self) {
        self.halt();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::debug!("poller stopped (generation now {})", generation);
    }

    /// One-off fetch under the current generation.
    pub fn load_now(&self, origin: LoadOrigin) {
        spawn_fetch(self.gateway.clone(), self.tx.clone(), self.generation(), origin);
    }

    fn halt(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.halt();
    }
}

fn spawn_fetch(
    gateway: Gateway,
    tx: mpsc::UnboundedSender<PollEvent>,
    generation: u64,
    origin: LoadOrigin,
) {
    tokio::spawn(async move {
        let result = fetch_incidents(&gateway).await;
        if let Err(err) = &result {
            tracing::debug!("{:?} incident fetch failed: {}", origin, err);
        }
        let _ = tx.send(PollEvent {
            generation,
            origin,
            result,
        });
    });
}
