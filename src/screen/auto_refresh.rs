//! Fixed-interval refresh ticks.
//!
//! The ticker never fetches by itself. It only posts [`ScreenEvent::Tick`]
//! into the screen's event channel, so ticks go through the same
//! single-outstanding-fetch rule as every other refresh.

use std::time::Duration;

use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use super::ScreenEvent;

pub fn spawn_ticker<R: Send + 'static>(
    tx: Sender<ScreenEvent<R>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = interval(period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately
        ticks.tick().await;
        loop {
            ticks.tick().await;
            match tx.try_send(ScreenEvent::Tick) {
                Ok(()) => {}
                // A backlog of ticks means the owner is behind; one is enough
                Err(TrySendError::Full(_)) => {}
                Err(TrySendError::Closed(_)) => break,
            }
        }
    })
}
