use core::{future::Future, time::Duration};

pub mod serialport;
pub mod tokio_channels;

/// Longest time a single line may take to be written before the write is abandoned.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Transport is unavailable")]
    Unavailable,

    #[error("Write failed")]
    WriteFailed,

    #[error("Timeout")]
    Timeout,

    #[error("Transport has been closed")]
    Closed,
}

/// A byte channel to the receiving board.
///
/// Writes are fire and forget, the board never replies.
pub trait Transport: Send {
    /// Writes all of `data`, giving up after [`WRITE_TIMEOUT`].
    fn write(&mut self, data: &[u8]) -> impl Future<Output = Result<(), Error>> + Send;

    /// Flushes and releases the underlying device. Further writes fail with [`Error::Closed`].
    fn close(&mut self) -> impl Future<Output = Result<(), Error>> + Send;
}
