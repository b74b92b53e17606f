//! Stands in for the receiving board when no serial port is used.

use log::{debug, info, warn};
use tokio::{sync::mpsc, task::JoinHandle};
use vitalsim_protocol::line;

/// Decodes and logs every line arriving on `rx`, returning how many were valid once it closes.
pub(super) fn spawn(mut rx: mpsc::Receiver<Vec<u8>>) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut received: usize = 0;

        while let Some(bytes) = rx.recv().await {
            let Ok(text) = std::str::from_utf8(&bytes) else {
                warn!("Board received {} bytes that are not text", bytes.len());
                continue;
            };

            match line::decode(text) {
                Ok(reading) => {
                    received += 1;
                    info!("Board received {reading} ({})", reading.severity());
                }
                Err(e) => warn!("Board could not decode {:?}: {e}", text),
            }
        }

        debug!("Loopback closed after {received} readings");

        received
    })
}
