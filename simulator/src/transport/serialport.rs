use super::{Error, WRITE_TIMEOUT};
use log::{debug, error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio_serial::{SerialPortBuilderExt, SerialStream};

pub struct SerialTransport {
    port: Option<SerialStream>,
}

impl SerialTransport {
    pub fn open(port: &str, baud: u32) -> Result<Self, Error> {
        let stream = tokio_serial::new(port, baud)
            .timeout(WRITE_TIMEOUT)
            .open_native_async()
            .map_err(|e| {
                error!("Failed to open serial port {port} with error {e}");
                Error::Unavailable
            })?;

        info!("Opened serial port {port} at {baud} baud");

        Ok(Self { port: Some(stream) })
    }
}

impl super::Transport for SerialTransport {
    async fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        let port = self.port.as_mut().ok_or(Error::Closed)?;

        match tokio::time::timeout(WRITE_TIMEOUT, port.write_all(data)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                error!("Failed to write to serial port with error {e}");
                Err(Error::WriteFailed)
            }
            Err(_) => {
                error!("Timed out writing {} bytes to serial port", data.len());
                Err(Error::Timeout)
            }
        }
    }

    async fn close(&mut self) -> Result<(), Error> {
        if let Some(mut port) = self.port.take() {
            match tokio::time::timeout(WRITE_TIMEOUT, port.flush()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Failed to flush serial port with error {e}"),
                Err(_) => warn!("Timed out flushing serial port"),
            }
            debug!("Serial port closed");
        }

        Ok(())
    }
}
