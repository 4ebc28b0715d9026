//! Heartbeat probes for channel sessions
//!
//! A dedicated Tokio task emits the liveness probe payload on a fixed
//! interval and hands it to the session loop over an unbounded crossbeam
//! channel, so probe timing is independent of frame processing. The task is
//! started exactly when a connection is established and shut down exactly
//! when that connection ends; a session lifecycle never leaves a prior
//! heartbeat running when a new one starts.

use crate::traits::Frame;
use crossbeam_channel::{Receiver, Sender};
use std::time::Duration;
use tracing::debug;

/// Heartbeat task body
///
/// 1. Waits for the first interval (skips the immediate first tick)
/// 2. On each tick, sends the probe payload through the channel
/// 3. Exits on shutdown signal or when the channel closes
pub async fn heartbeat_task(
    interval: Duration,
    payload: Frame,
    probe_tx: Sender<Frame>,
    shutdown_rx: Receiver<()>,
) {
    let mut ticker = tokio::time::interval(interval);
    // Skip the first immediate tick - wait for the first interval
    ticker.tick().await;
    // If ticks are missed due to slow processing, skip them rather than burst
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    debug!("Heartbeat task started with interval: {:?}", interval);

    loop {
        match shutdown_rx.try_recv() {
            Ok(_) => {
                debug!("Heartbeat task received shutdown signal");
                break;
            }
            Err(crossbeam_channel::TryRecvError::Disconnected) => {
                debug!("Heartbeat shutdown channel disconnected");
                break;
            }
            Err(crossbeam_channel::TryRecvError::Empty) => {}
        }

        ticker.tick().await;

        debug!("Heartbeat tick - sending probe");
        if probe_tx.send(payload.clone()).is_err() {
            debug!("Heartbeat channel closed, shutting down heartbeat task");
            break;
        }
    }

    debug!("Heartbeat task exiting");
}

/// Spawn a heartbeat task
///
/// Returns the task handle, the shutdown signal sender, and the receiver the
/// session loop drains probes from.
pub fn spawn_heartbeat(
    interval: Duration,
    payload: Frame,
) -> (tokio::task::JoinHandle<()>, Sender<()>, Receiver<Frame>) {
    let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);
    let (probe_tx, probe_rx) = crossbeam_channel::unbounded();

    let handle = tokio::spawn(async move {
        heartbeat_task(interval, payload, probe_tx, shutdown_rx).await;
    });

    (handle, shutdown_tx, probe_rx)
}
