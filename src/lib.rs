//! vacuum-link: polls a vacuum pump controller over a half-duplex framed
//! serial protocol and republishes channel readings as UDP datagrams.
//!
//! The crate is organised bottom-up: [`crc8`] and [`frame`] are the wire
//! primitives, [`counter`] and [`codec`] build the frame stream out of raw
//! bytes, [`session`] drives the request/reply/keep-alive protocol over a
//! [`transport`], and [`poller`] walks the [`channels`] catalogue through a
//! session and emits through a [`sink`]. [`supervisor`] ties it all together
//! into the reconnect loop that `main` runs.

pub mod channels;
pub mod codec;
pub mod config;
pub mod counter;
pub mod crc8;
pub mod error;
pub mod frame;
pub mod poller;
pub mod session;
pub mod sink;
pub mod supervisor;
pub mod transport;
