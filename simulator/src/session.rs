use crate::{
    display::DisplayUpdate,
    sampler::{Sampler, SamplerConfig, SamplerReport},
    state::EmergencyToggle,
    transport::{Error, Transport},
};
use log::{error, info, warn};
use rand::Rng;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// Whether the session is still running.
///
/// Starts set and is cleared exactly once, either on shutdown or when the sampler gives up.
#[derive(Clone)]
pub(crate) struct RunFlag {
    tx: Arc<watch::Sender<bool>>,
}

impl RunFlag {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(true);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn is_running(&self) -> bool {
        *self.tx.borrow()
    }

    /// Clears the flag, returning `true` if this call is the one that cleared it.
    pub(crate) fn stop(&self) -> bool {
        self.tx.send_replace(false)
    }

    /// A receiver that is notified when the flag is cleared.
    pub(crate) fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Everything shared between the user interface and the sampler for the life of the process.
pub(crate) struct Session {
    emergency: Arc<EmergencyToggle>,
    running: RunFlag,
    sampler: Option<JoinHandle<Result<SamplerReport, Error>>>,
}

impl Session {
    /// Starts sampling on `transport`, or leaves the session inert if there is none.
    ///
    /// Must be called from within a Tokio runtime.
    pub(crate) fn start<T, R>(
        transport: Option<T>,
        rng: R,
        config: SamplerConfig,
        display: mpsc::Sender<DisplayUpdate>,
    ) -> Self
    where
        T: Transport + 'static,
        R: Rng + Send + 'static,
    {
        let emergency = Arc::new(EmergencyToggle::default());
        let running = RunFlag::new();

        let sampler = match transport {
            Some(transport) => {
                let sampler = Sampler::new(
                    transport,
                    rng,
                    emergency.clone(),
                    running.clone(),
                    display,
                    config,
                );
                Some(tokio::spawn(sampler.run()))
            }
            None => {
                warn!("No transport available, no readings will be sent");
                None
            }
        };

        Self {
            emergency,
            running,
            sampler,
        }
    }

    pub(crate) fn emergency(&self) -> Arc<EmergencyToggle> {
        self.emergency.clone()
    }

    pub(crate) fn toggle(&self) -> bool {
        self.emergency.toggle()
    }

    pub(crate) fn is_running(&self) -> bool {
        self.running.is_running()
    }

    /// Stops the sampler and waits for it to release the transport.
    ///
    /// Calling this more than once has no further effect.
    pub(crate) async fn shutdown(&mut self) {
        if self.running.stop() {
            info!("Shutting down");
        }

        if let Some(handle) = self.sampler.take() {
            match handle.await {
                Ok(Ok(report)) => info!("Sampler stopped after {} readings", report.ticks),
                Ok(Err(e)) => warn!("Sampler had already stopped: {e}"),
                Err(e) => error!("Sampler task failed: {e}"),
            }
        }
    }
}
