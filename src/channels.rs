//! The fixed 19-channel catalogue (§6), reproduced verbatim from the device
//! configuration. Order matters: the poller walks this slice top to bottom,
//! and the first entry is consumed by the integrity gate rather than the
//! emitted datagram.

use crate::frame::ChannelSpec;

/// Channel ID of "Reservoir Vacuum Level", which gets the special
/// `-1000 + scaled` reinterpretation and a "mbar" unit override.
pub const RESERVOIR_VACUUM_LEVEL_CHANNEL_ID: u16 = 14;

pub const CHANNELS: [ChannelSpec; 19] = [
    ChannelSpec { id_high: 0x03, id_low: 0x42, channel_id: 834, name: "Power SW version", unit: "", multiplier: 1.0 },
    ChannelSpec { id_high: 0x00, id_low: 0x01, channel_id: 1, name: "Output Freq", unit: "Hz", multiplier: 0.01 },
    ChannelSpec { id_high: 0x00, id_low: 0x19, channel_id: 25, name: "Freq Ref.", unit: "Hz", multiplier: 0.01 },
    ChannelSpec { id_high: 0x00, id_low: 0x02, channel_id: 2, name: "Motor shaft speed", unit: "rpm", multiplier: 1.0 },
    ChannelSpec { id_high: 0x00, id_low: 0x03, channel_id: 3, name: "Motor Current", unit: "A", multiplier: 0.01 },
    ChannelSpec { id_high: 0x00, id_low: 0x04, channel_id: 4, name: "Motor Torque", unit: "%", multiplier: 0.1 },
    ChannelSpec { id_high: 0x00, id_low: 0x05, channel_id: 5, name: "Motor Power", unit: "%", multiplier: 0.1 },
    ChannelSpec { id_high: 0x00, id_low: 0x06, channel_id: 6, name: "Motor Voltage", unit: "V", multiplier: 0.1 },
    ChannelSpec { id_high: 0x00, id_low: 0x09, channel_id: 9, name: "Motor Temperature", unit: "\u{b0}C", multiplier: 1.0 },
    ChannelSpec { id_high: 0x00, id_low: 0x07, channel_id: 7, name: "DC-link Voltage", unit: "V", multiplier: 1.0 },
    ChannelSpec { id_high: 0x00, id_low: 0x08, channel_id: 8, name: "Unit Temperature", unit: "\u{b0}C", multiplier: 1.0 },
    ChannelSpec { id_high: 0x07, id_low: 0x21, channel_id: 1825, name: "Board Temp", unit: "\u{b0}C", multiplier: 1.0 },
    ChannelSpec { id_high: 0x07, id_low: 0x6B, channel_id: 1899, name: "Service counter", unit: "h", multiplier: 1.0 },
    ChannelSpec { id_high: 0x00, id_low: 0x0E, channel_id: 14, name: "Reservoir Vacuum Level", unit: "%", multiplier: 1.0 },
    ChannelSpec { id_high: 0x03, id_low: 0x3B, channel_id: 827, name: "MWh Counter", unit: "MW", multiplier: 0.001 },
    ChannelSpec { id_high: 0x03, id_low: 0x3C, channel_id: 828, name: "Power On Time:Days", unit: "Days", multiplier: 1.0 },
    ChannelSpec { id_high: 0x03, id_low: 0x3D, channel_id: 829, name: "Power On Time:Hours", unit: "Hours", multiplier: 1.0 },
    ChannelSpec { id_high: 0x03, id_low: 0x48, channel_id: 840, name: "Unit Run Time:Days", unit: "Days", multiplier: 1.0 },
    ChannelSpec { id_high: 0x03, id_low: 0x49, channel_id: 841, name: "Unit Run Time:Hours", unit: "Hours", multiplier: 1.0 },
];
