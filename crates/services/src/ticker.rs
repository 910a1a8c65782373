use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Source of one-second countdown signals for a single session.
#[async_trait]
pub trait Ticker: Send {
    /// Waits for the next elapsed second.
    ///
    /// Returns `false` once the source is closed and no more ticks will come.
    async fn tick(&mut self) -> bool;
}

/// Builds a fresh `Ticker` for every session the runner starts.
pub trait TickerSource: Send + Sync {
    fn ticker(&self) -> Box<dyn Ticker>;
}

//
// ─── REAL TIME ─────────────────────────────────────────────────────────────────
//

/// Ticks once per `period`, the first tick one full period after creation.
pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        self.interval.tick().await;
        true
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntervalTickers {
    period: Duration,
}

impl IntervalTickers {
    #[must_use]
    pub fn every(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn every_second() -> Self {
        Self::every(Duration::from_secs(1))
    }
}

impl TickerSource for IntervalTickers {
    fn ticker(&self) -> Box<dyn Ticker> {
        Box::new(IntervalTicker::new(self.period))
    }
}

//
// ─── MANUAL ────────────────────────────────────────────────────────────────────
//

const MANUAL_TICK_CAPACITY: usize = 4096;

/// Virtual-time tickers: nothing happens until `advance` is called.
///
/// Every ticker built from the same source sees the same ticks, so a ticker
/// left over from a replaced session keeps firing. Runners must ignore those.
#[derive(Debug, Clone)]
pub struct ManualTickers {
    sender: broadcast::Sender<()>,
}

impl ManualTickers {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(MANUAL_TICK_CAPACITY);
        Self { sender }
    }

    /// Emits `seconds` ticks to every live ticker.
    pub fn advance(&self, seconds: u32) {
        for _ in 0..seconds {
            // No live tickers is not an error; the ticks simply go nowhere.
            let _ = self.sender.send(());
        }
    }
}

impl Default for ManualTickers {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerSource for ManualTickers {
    fn ticker(&self) -> Box<dyn Ticker> {
        Box::new(ManualTicker {
            receiver: self.sender.subscribe(),
        })
    }
}

pub struct ManualTicker {
    receiver: broadcast::Receiver<()>,
}

#[async_trait]
impl Ticker for ManualTicker {
    async fn tick(&mut self) -> bool {
        match self.receiver.recv().await {
            Ok(()) | Err(broadcast::error::RecvError::Lagged(_)) => true,
            Err(broadcast::error::RecvError::Closed) => false,
        }
    }
}
