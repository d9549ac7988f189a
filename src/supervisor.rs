//! Supervisor (§4.4): the outer reconnect loop. Opens the transport, runs
//! one session to completion, closes it, backs off, and tries again —
//! forever. No error from a session attempt is ever allowed to reach the
//! caller of `run`.

use std::time::Duration;

use log::{error, info, warn};
use rand::Rng;

use crate::config::Config;
use crate::error::SessionError;
use crate::poller;
use crate::session::Session;
use crate::sink::DatagramSink;
use crate::transport::TokioSerialTransport;

fn backoff(config: &Config) -> Duration {
    let secs = rand::thread_rng().gen_range(config.backoff_min_secs..=config.backoff_max_secs);
    Duration::from_secs(secs)
}

/// Runs keep-alive cycles, spaced 1s apart, until at least 1s has elapsed
/// since the last poll started — the KEEPALIVE state of §4.3's machine.
async fn run_until_poll_due(session: &mut Session, last_poll_start: tokio::time::Instant) -> Result<(), SessionError> {
    while last_poll_start.elapsed() < Session::keep_alive_spacing() {
        session.run_keep_alive_cycle().await?;
        tokio::time::sleep(Session::keep_alive_spacing()).await;
    }
    Ok(())
}

async fn run_session(config: &Config, sink: &mut dyn DatagramSink) -> Result<(), SessionError> {
    let transport = TokioSerialTransport::open(&config.port, config.baud)
        .map_err(|err| SessionError::Transport(std::io::Error::new(std::io::ErrorKind::Other, err)))?;
    let mut session = Session::new(Box::new(transport));

    session.handshake().await?;
    info!(target: "supervisor", "handshake succeeded on {}", config.port);

    let mut last_poll_start = tokio::time::Instant::now() - Duration::from_secs(2);
    loop {
        run_until_poll_due(&mut session, last_poll_start).await?;
        last_poll_start = tokio::time::Instant::now();
        poller::poll_cycle(&mut session, sink).await?;
    }
}

/// Runs forever. Every recoverable fault is logged and the connection is
/// retried after a randomised backoff; nothing here ever returns.
pub async fn run(config: Config, mut sink: Box<dyn DatagramSink>) -> ! {
    loop {
        match run_session(&config, sink.as_mut()).await {
            Ok(()) => unreachable!("run_session only returns via Err"),
            Err(err) => warn!(target: "supervisor", "session ended: {err}"),
        }

        let delay = backoff(&config);
        info!(target: "supervisor", "reconnecting to {} in {:?}", config.port, delay);
        tokio::time::sleep(delay).await;
    }
}

#[allow(dead_code)]
fn log_fatal_config(err: &crate::error::ConfigError) {
    error!(target: "supervisor", "invalid configuration: {err}");
}
