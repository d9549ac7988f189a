//! CLI configuration (ambient, §6). The teacher crate took its serial port
//! path as a hardcoded literal in its example binaries; this system is a
//! long-running daemon, so it gets a proper `clap` derive struct instead.

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum SinkKind {
    Udp,
    File,
}

#[derive(Debug, Parser)]
#[command(name = "vacuum-link", about = "Polls a vacuum pump controller over a serial link and republishes readings over UDP")]
pub struct Config {
    /// Serial device path, e.g. /dev/ttyUSB0 or COM8.
    #[arg(long)]
    pub port: String,

    /// Serial baud rate.
    #[arg(long, default_value_t = 57600)]
    pub baud: u32,

    /// Collector address the UDP sink connects to.
    #[arg(long, default_value = "mtsgwm3ux05ac02.emea.avnet.com:4041")]
    pub collector: String,

    /// Which datagram sink to use.
    #[arg(long, value_enum, default_value_t = SinkKind::Udp)]
    pub sink: SinkKind,

    /// Fallback file path used when `--sink file` is selected.
    #[arg(long, default_value = r"C:\temp\UDPTest\UDP1.txt")]
    pub fallback_path: String,

    /// Minimum reconnect backoff, in seconds.
    #[arg(long, default_value_t = 5)]
    pub backoff_min_secs: u64,

    /// Maximum reconnect backoff, in seconds.
    #[arg(long, default_value_t = 10)]
    pub backoff_max_secs: u64,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backoff_min_secs > self.backoff_max_secs {
            return Err(ConfigError::BackoffRangeInverted {
                min: self.backoff_min_secs,
                max: self.backoff_max_secs,
            });
        }
        Ok(())
    }
}
