//! Outbound datagram sinks. The teacher crate has no analogue for this (its
//! job ends at decoded application frames); grounded instead on the
//! corpus's general pattern of a small trait behind `async-trait` with one
//! real implementation per transport, the same shape as `SerialTransport`.

use async_trait::async_trait;
use log::warn;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::net::UdpSocket;

use crate::error::SinkError;

#[async_trait]
pub trait DatagramSink: Send {
    async fn send(&mut self, line: &str) -> Result<(), SinkError>;
}

pub struct UdpSink {
    socket: UdpSocket,
}

impl UdpSink {
    pub async fn connect(collector: &str) -> Result<Self, SinkError> {
        let socket = UdpSocket::bind("0.0.0.0:0")
            .await
            .map_err(SinkError::Udp)?;
        socket.connect(collector).await.map_err(SinkError::Udp)?;
        Ok(UdpSink { socket })
    }
}

#[async_trait]
impl DatagramSink for UdpSink {
    async fn send(&mut self, line: &str) -> Result<(), SinkError> {
        self.socket
            .send(line.as_bytes())
            .await
            .map(|_| ())
            .map_err(SinkError::Udp)
    }
}

pub struct FileSink {
    path: String,
}

impl FileSink {
    pub fn new(path: impl Into<String>) -> Self {
        FileSink { path: path.into() }
    }
}

#[async_trait]
impl DatagramSink for FileSink {
    async fn send(&mut self, line: &str) -> Result<(), SinkError> {
        if let Some(parent) = std::path::Path::new(&self.path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(SinkError::File)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(SinkError::File)?;
        let mut out = line.to_string();
        out.push('\n');
        file.write_all(out.as_bytes())
            .await
            .map_err(SinkError::File)?;
        Ok(())
    }
}

/// Wraps a primary sink so a send failure is logged rather than propagated;
/// the poller's datagram emission is fire-and-forget per the spec.
pub async fn emit_or_log(sink: &mut dyn DatagramSink, line: &str) {
    if let Err(err) = sink.send(line).await {
        warn!(target: "sink", "datagram emission failed: {err}");
    }
}
