use super::{Error, WRITE_TIMEOUT};
use log::{trace, warn};
use tokio::sync::mpsc::{channel, Receiver, Sender};

/// Sends each write as one message over a Tokio channel, in place of a serial port.
pub struct ChannelTransport {
    tx: Option<Sender<Vec<u8>>>,
}

impl ChannelTransport {
    /// Creates a transport along with the receiving end of its channel.
    pub fn new_pair(capacity: usize) -> (Self, Receiver<Vec<u8>>) {
        let (tx, rx) = channel(capacity);
        (Self { tx: Some(tx) }, rx)
    }
}

impl super::Transport for ChannelTransport {
    async fn write(&mut self, data: &[u8]) -> Result<(), Error> {
        let tx = self.tx.as_ref().ok_or(Error::Closed)?;

        match tokio::time::timeout(WRITE_TIMEOUT, tx.send(data.to_vec())).await {
            Ok(Ok(())) => {
                trace!("Sent {} bytes", data.len());
                Ok(())
            }
            Ok(Err(_)) => {
                warn!("Channel closed");
                Err(Error::WriteFailed)
            }
            Err(_) => Err(Error::Timeout),
        }
    }

    async fn close(&mut self) -> Result<(), Error> {
        self.tx = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Transport;

    #[tokio::test]
    async fn write_is_received() {
        let (mut transport, mut rx) = ChannelTransport::new_pair(4);

        transport.write(b"HR:80,SpO2:98\n").await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), b"HR:80,SpO2:98\n".to_vec());
    }

    #[tokio::test]
    async fn write_fails_once_receiver_is_gone() {
        let (mut transport, rx) = ChannelTransport::new_pair(4);
        drop(rx);

        assert_eq!(transport.write(b"x").await, Err(Error::WriteFailed));
    }

    #[tokio::test(start_paused = true)]
    async fn write_times_out_when_nobody_reads() {
        let (mut transport, _rx) = ChannelTransport::new_pair(1);

        transport.write(b"first").await.unwrap();

        assert_eq!(transport.write(b"second").await, Err(Error::Timeout));
    }

    #[tokio::test]
    async fn close_releases_channel() {
        let (mut transport, mut rx) = ChannelTransport::new_pair(4);

        transport.close().await.unwrap();
        transport.close().await.unwrap();

        assert_eq!(rx.recv().await, None);
        assert_eq!(transport.write(b"x").await, Err(Error::Closed));
    }
}
