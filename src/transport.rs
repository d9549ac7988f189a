//! Async serial transport. The teacher crate drove a blocking `serial`
//! port from an `Interface` callback trait invoked by a polling loop; this
//! system instead awaits on a `tokio-serial` stream from a single
//! current-thread event loop, so the trait below speaks `async fn` through
//! `async-trait` rather than a fill-the-tx-fifo callback.

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;

use crate::error::TransportOpenError;

/// The session's view of the serial link: read whatever bytes are
/// available, write a complete frame. No framing knowledge lives here;
/// that is the codec's job.
#[async_trait]
pub trait SerialTransport: Send {
    async fn read_some(&mut self, buf: &mut [u8]) -> std::io::Result<usize>;
    async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()>;
}

pub struct TokioSerialTransport {
    port: tokio_serial::SerialStream,
}

impl TokioSerialTransport {
    pub fn open(path: &str, baud: u32) -> Result<Self, TransportOpenError> {
        let port = tokio_serial::new(path, baud)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .open_native_async()
            .map_err(|source| TransportOpenError::Open {
                path: path.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, source),
            })?;
        Ok(TokioSerialTransport { port })
    }
}

#[async_trait]
impl SerialTransport for TokioSerialTransport {
    async fn read_some(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf).await
    }

    async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.port.write_all(bytes).await
    }
}
