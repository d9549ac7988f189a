//! Session protocol (§4.3): handshake, request/reply, keep-alive. Owns the
//! transport and the frame codec for one connection attempt; every public
//! method here is one strictly serialised exchange, matching the spec's
//! "send_request and await_reply are never invoked independently" rule.

use std::time::Duration;

use log::{debug, warn};
use tokio::time::timeout;

use crate::codec::{FrameCodec, HandshakeOutcome};
use crate::error::SessionError;
use crate::frame::{encode_frame, encode_handshake_complete, encode_request, DecodedFrame, ACK};
use crate::transport::SerialTransport;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);
const REPLY_TIMEOUT: Duration = Duration::from_secs(5);
const KEEP_ALIVE_TIMEOUT: Duration = Duration::from_millis(200);
const KEEP_ALIVE_SPACING: Duration = Duration::from_secs(1);

/// Fixed keep-alive payloads, sent back to back with a 1s sleep between
/// cycles until the poll-start condition trips (§4.3).
const KEEP_ALIVE_PAYLOADS: [&[u8]; 4] = [
    &[0x0B, 0x00, 0x02, 0x75, 0x00, 0x00],
    &[0x0B, 0x00, 0x02, 0x66, 0x00, 0x00],
    &[0x2A, 0x0C],
    &[0x0B, 0x01, 0x03, 0x40, 0x00, 0x01],
];

const KEEP_ALIVE_PREFIX_NIBBLE: u8 = 0x4;

pub struct Session {
    transport: Box<dyn SerialTransport>,
    codec: FrameCodec,
}

/// Result of one request/reply/ack exchange.
#[derive(Debug)]
pub struct Exchange {
    pub frame: DecodedFrame,
}

impl Session {
    pub fn new(transport: Box<dyn SerialTransport>) -> Self {
        Session {
            transport,
            codec: FrameCodec::new(),
        }
    }

    /// Reads bytes from the transport until the codec's handshake decoder
    /// reaches a verdict, racing the whole operation against `deadline`.
    pub async fn handshake(&mut self) -> Result<(), SessionError> {
        let outcome = timeout(HANDSHAKE_TIMEOUT, async {
            loop {
                match self.codec.decode_handshake() {
                    HandshakeOutcome::Accepted { counter_byte } => {
                        return Ok(counter_byte);
                    }
                    HandshakeOutcome::CrcMismatch => {
                        return Err(SessionError::HandshakeCrcMismatch);
                    }
                    HandshakeOutcome::Insufficient => {
                        self.read_more().await?;
                    }
                }
            }
        })
        .await
        .map_err(|_| SessionError::HandshakeTimeout)??;

        let counter_byte = outcome;
        self.codec.counter.set_receive_from_handshake(counter_byte);
        self.transport.write_all(&ACK).await?;
        let send_counter = self.codec.counter.advance_send();
        let complete = encode_handshake_complete(send_counter);
        self.transport.write_all(&complete).await?;
        debug!(target: "session", "handshake complete, receive_counter set from 0x{counter_byte:02x}");
        Ok(())
    }

    /// One parameter-request exchange: send, await reply, ACK.
    pub async fn request_reply(&mut self, id_high: u8, id_low: u8) -> Result<Exchange, SessionError> {
        let send_counter = self.codec.counter.advance_send();
        let frame = encode_request(send_counter, id_high, id_low);
        self.transport.write_all(&frame).await?;

        let decoded = self
            .await_frame(REPLY_TIMEOUT)
            .await
            .map_err(|_| SessionError::ReplyTimeout { id_high, id_low })??;

        self.transport.write_all(&ACK).await?;
        Ok(Exchange { frame: decoded })
    }

    /// A raw custom-payload exchange, used by the keep-alive cycle.
    async fn send_custom(&mut self, payload: &[u8], deadline: Duration, step: usize) -> Result<Exchange, SessionError> {
        let send_counter = self.codec.counter.advance_send();
        let frame = encode_frame(KEEP_ALIVE_PREFIX_NIBBLE, send_counter, payload);
        self.transport.write_all(&frame).await?;

        let decoded = self
            .await_frame(deadline)
            .await
            .map_err(|_| SessionError::KeepAliveTimeout { step })??;

        self.transport.write_all(&ACK).await?;
        Ok(Exchange { frame: decoded })
    }

    /// Runs the four fixed keep-alive exchanges back to back.
    pub async fn run_keep_alive_cycle(&mut self) -> Result<(), SessionError> {
        for (step, payload) in KEEP_ALIVE_PAYLOADS.iter().enumerate() {
            self.send_custom(payload, KEEP_ALIVE_TIMEOUT, step).await?;
        }
        Ok(())
    }

    pub fn keep_alive_spacing() -> Duration {
        KEEP_ALIVE_SPACING
    }

    /// Awaits one decoded frame from the codec queue, reading transport
    /// bytes as needed, within `deadline`.
    async fn await_frame(&mut self, deadline: Duration) -> Result<Result<DecodedFrame, SessionError>, tokio::time::error::Elapsed> {
        timeout(deadline, async {
            loop {
                if let Some(frame) = self.codec.pop_frame() {
                    return Ok(frame);
                }
                self.read_more().await?;
                self.codec.decode_steady_state();
            }
        })
        .await
    }

    async fn read_more(&mut self) -> Result<(), SessionError> {
        let mut buf = [0u8; 256];
        let n = self.transport.read_some(&mut buf).await?;
        if n == 0 {
            warn!(target: "session", "transport returned EOF");
            return Err(SessionError::LinkClosed);
        }
        self.codec.push_bytes(&buf[..n]);
        Ok(())
    }
}
