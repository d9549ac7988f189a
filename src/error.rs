use std::io;

use thiserror::Error;

/// Errors that terminate a single link session; the supervisor catches every
/// variant and reconnects rather than propagating it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("handshake failed: no candidate frame within the deadline")]
    HandshakeTimeout,
    #[error("handshake failed: CRC mismatch on the first candidate frame")]
    HandshakeCrcMismatch,
    #[error("reply timeout waiting for channel 0x{id_high:02x}{id_low:02x}")]
    ReplyTimeout { id_high: u8, id_low: u8 },
    #[error("keep-alive step {step} timed out")]
    KeepAliveTimeout { step: usize },
    #[error("counter desynchronised with peer during poll cycle")]
    SyncError,
    #[error("poll cycle incomplete: got {got} of {expected} replies")]
    IncompletePoll { got: usize, expected: usize },
    #[error("integrity check failed: first channel read '{got}', expected '8'")]
    IntegrityCheckFailed { got: String },
    #[error("link closed by peer")]
    LinkClosed,
    #[error("transport I/O error")]
    Transport(#[source] io::Error),
}

impl From<io::Error> for SessionError {
    fn from(e: io::Error) -> Self {
        SessionError::Transport(e)
    }
}

/// Errors raised when the supervisor tries to open the serial transport.
#[derive(Debug, Error)]
pub enum TransportOpenError {
    #[error("failed to open serial port {path}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by a datagram sink; these are logged and dropped, never
/// propagated up to session teardown.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("UDP send failed")]
    Udp(#[source] io::Error),
    #[error("fallback file write failed")]
    File(#[source] io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("backoff-min-secs ({min}) must not exceed backoff-max-secs ({max})")]
    BackoffRangeInverted { min: u64, max: u64 },
}
