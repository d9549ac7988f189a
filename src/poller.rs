//! Poller & Formatter (§4.5): walks the channel catalogue, applies the
//! scaling and formatting rules, and runs the integrity gate before handing
//! the assembled datagram to a sink.

use log::{info, warn};

use crate::channels::{CHANNELS, RESERVOIR_VACUUM_LEVEL_CHANNEL_ID};
use crate::error::SessionError;
use crate::sink::{emit_or_log, DatagramSink};
use crate::session::Session;

struct Reading {
    channel_id: u16,
    formatted: String,
}

fn format_reading(channel_id: u16, multiplier: f64, raw: u32) -> String {
    let scaled = raw as f64 * multiplier;
    if channel_id == RESERVOIR_VACUUM_LEVEL_CHANNEL_ID {
        let final_value = -1000.0 + scaled;
        format!("{}", final_value.round() as i64)
    } else if multiplier < 1.0 {
        format!("{scaled:.2}")
    } else {
        format!("{}", scaled.round() as i64)
    }
}

/// Runs one full poll cycle: one request per catalogue entry, in order.
/// Returns `Ok(())` after a successful emission, or an error describing why
/// the cycle was aborted (the supervisor treats every error identically:
/// tear down the session and reconnect).
pub async fn poll_cycle(session: &mut Session, sink: &mut dyn DatagramSink) -> Result<(), SessionError> {
    let mut readings = Vec::with_capacity(CHANNELS.len());

    for channel in CHANNELS.iter() {
        let exchange = session.request_reply(channel.id_high, channel.id_low).await?;
        let raw = exchange.frame.payload_as_u32();
        let formatted = format_reading(channel.channel_id, channel.multiplier, raw);
        let sync_error = exchange.frame.sync_error;
        readings.push(Reading {
            channel_id: channel.channel_id,
            formatted,
        });
        if sync_error {
            warn!(target: "poller", "sync_error observed while polling channel_id={}; aborting poll", channel.channel_id);
            return Err(SessionError::SyncError);
        }
    }

    if readings.len() < CHANNELS.len() {
        return Err(SessionError::IncompletePoll {
            got: readings.len(),
            expected: CHANNELS.len(),
        });
    }

    let first = &readings[0].formatted;
    if first != "8" {
        return Err(SessionError::IntegrityCheckFailed { got: first.clone() });
    }

    let body = readings[1..]
        .iter()
        .map(|r| r.formatted.as_str())
        .collect::<Vec<_>>()
        .join(";");
    let line = format!("VAC;PUMP1;{body}");

    info!(target: "poller", "poll cycle complete, emitting datagram ({} channels)", readings.len());
    emit_or_log(sink, &line).await;
    Ok(())
}
