use crate::{
    display::DisplayUpdate,
    session::RunFlag,
    state::EmergencyToggle,
    transport::{Error, Transport},
};
use core::time::Duration;
use log::{debug, error, info, trace, warn};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use vitalsim_protocol::line;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SamplerConfig {
    /// Pause after each reading.
    pub(crate) interval: Duration,

    /// Grace period between opening the transport and the first reading.
    pub(crate) settle: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            settle: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SamplerReport {
    /// Number of readings successfully written.
    pub(crate) ticks: u64,
}

/// Periodically draws a reading, sends it to the board and shows it on the display.
pub(crate) struct Sampler<T, R> {
    transport: T,
    rng: R,
    emergency: Arc<EmergencyToggle>,
    running: RunFlag,
    display: mpsc::Sender<DisplayUpdate>,
    config: SamplerConfig,
}

impl<T: Transport, R: Rng + Send> Sampler<T, R> {
    pub(crate) fn new(
        transport: T,
        rng: R,
        emergency: Arc<EmergencyToggle>,
        running: RunFlag,
        display: mpsc::Sender<DisplayUpdate>,
        config: SamplerConfig,
    ) -> Self {
        Self {
            transport,
            rng,
            emergency,
            running,
            display,
            config,
        }
    }

    /// Runs until the session stops or a write fails, then closes the transport.
    ///
    /// A failed write is never retried; it stops the session and is returned.
    pub(crate) async fn run(mut self) -> Result<SamplerReport, Error> {
        let mut stopped = self.running.subscribe();
        let mut ticks: u64 = 0;

        if !self.config.settle.is_zero() && self.running.is_running() {
            debug!("Waiting {}ms for link to settle", self.config.settle.as_millis());

            tokio::select! {
                _ = tokio::time::sleep(self.config.settle) => {}
                _ = stopped.changed() => {}
            }
        }

        info!("Sampling every {}ms", self.config.interval.as_millis());

        let result = loop {
            if !self.running.is_running() {
                break Ok(SamplerReport { ticks });
            }

            let condition = self.emergency.condition();
            let reading = condition.ranges().draw(&mut self.rng);
            let line = line::encode(&reading);

            if let Err(e) = self.transport.write(line.as_bytes()).await {
                error!("Failed to send reading, sampling stopped: {e}");
                self.running.stop();
                break Err(e);
            }

            ticks += 1;
            debug!("Sent {reading} ({condition})");

            for update in DisplayUpdate::for_reading(&reading) {
                // Only the latest values are shown, a display that has fallen behind or gone away
                // must not hold up the readings sent to the board
                match self.display.try_send(update) {
                    Ok(()) | Err(TrySendError::Closed(_)) => {}
                    Err(TrySendError::Full(update)) => trace!("Display busy, dropped {update:?}"),
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.config.interval) => {}
                _ = stopped.changed() => {}
            }
        };

        if let Err(e) = self.transport.close().await {
            warn!("Failed to close transport: {e}");
        }

        info!("Sampling finished after {ticks} readings");

        result
    }
}
