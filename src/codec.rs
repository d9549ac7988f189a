//! Frame codec: turns an append-only byte buffer into a queue of validated
//! [`DecodedFrame`]s, and constructs outbound frames. Mirrors the structure
//! of the teacher crate's `rx_byte` state machine, but decodes whole frames
//! against in-band delimiters (`ACK`/`HDR`/`EOM`) instead of a byte-stuffed
//! SOF/EOF scheme.

use std::collections::VecDeque;

use log::warn;

use crate::counter::CounterState;
use crate::crc8::crc8_maxim;
use crate::frame::{DecodedFrame, ACK, DATA_TYPE_BYTE_MAX, DATA_TYPE_BYTE_MIN, EOM, HDR};

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Outcome of one handshake decode attempt.
pub enum HandshakeOutcome {
    /// A CRC-valid candidate frame was found; `counter_byte` is the byte
    /// immediately following HDR.
    Accepted { counter_byte: u8 },
    /// A candidate frame was found but its CRC did not match.
    CrcMismatch,
    /// Not enough buffered bytes yet to decide either way.
    Insufficient,
}

pub struct FrameCodec {
    buffer: Vec<u8>,
    queue: VecDeque<DecodedFrame>,
    pub counter: CounterState,
}

impl FrameCodec {
    pub fn new() -> Self {
        FrameCodec {
            buffer: Vec::new(),
            queue: VecDeque::new(),
            counter: CounterState::new(),
        }
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn pop_frame(&mut self) -> Option<DecodedFrame> {
        self.queue.pop_front()
    }

    /// Runs the handshake-mode decode rule once against the current
    /// buffer contents. Consumes bytes up to and including the CRC byte
    /// on both acceptance and CRC-mismatch outcomes.
    pub fn decode_handshake(&mut self) -> HandshakeOutcome {
        let Some(hdr_pos) = find_subsequence(&self.buffer, &HDR) else {
            return HandshakeOutcome::Insufficient;
        };
        let body_start = hdr_pos + HDR.len();
        let Some(eom_rel) = find_subsequence(&self.buffer[body_start..], &EOM) else {
            return HandshakeOutcome::Insufficient;
        };
        let eom_pos = body_start + eom_rel;
        let crc_pos = eom_pos + EOM.len();
        if self.buffer.len() <= crc_pos {
            return HandshakeOutcome::Insufficient;
        }

        let body = self.buffer[body_start..eom_pos].to_vec();
        let crc_byte = self.buffer[crc_pos];
        let expected = crc8_maxim(&body);

        if body.is_empty() {
            // No counter byte to read; treat like any other malformed
            // candidate and drop it so the scan can resume past it.
            self.buffer.drain(0..=crc_pos);
            return HandshakeOutcome::CrcMismatch;
        }

        if expected != crc_byte {
            warn!(target: "codec", "handshake CRC mismatch: body={body:02x?} expected={expected:#04x} got={crc_byte:#04x}");
            self.buffer.drain(0..=crc_pos);
            return HandshakeOutcome::CrcMismatch;
        }

        let counter_byte = body[0];
        self.buffer.drain(0..=crc_pos);
        HandshakeOutcome::Accepted { counter_byte }
    }

    /// Runs the steady-state decode loop (§4.1) to exhaustion against the
    /// current buffer, enqueuing every complete, CRC-valid frame found.
    pub fn decode_steady_state(&mut self) {
        loop {
            let Some(ack_pos) = find_subsequence(&self.buffer, &ACK) else {
                return;
            };

            let hdr_start = ack_pos + ACK.len();
            if self.buffer.len() < hdr_start + HDR.len() {
                return;
            }
            if self.buffer[hdr_start..hdr_start + HDR.len()] != HDR {
                self.buffer.drain(0..=ack_pos);
                continue;
            }

            let type_pos = hdr_start + HDR.len();
            if self.buffer.len() <= type_pos {
                return;
            }
            let type_byte = self.buffer[type_pos];
            if !(DATA_TYPE_BYTE_MIN..=DATA_TYPE_BYTE_MAX).contains(&type_byte) {
                self.buffer.drain(0..=ack_pos);
                continue;
            }

            let Some(eom_rel) = find_subsequence(&self.buffer[hdr_start..], &EOM) else {
                return;
            };
            let eom_pos = hdr_start + eom_rel;

            let crc_pos = eom_pos + EOM.len();
            if self.buffer.len() <= crc_pos {
                return;
            }
            let crc_byte = self.buffer[crc_pos];

            let body = self.buffer[type_pos..eom_pos].to_vec();
            if body.len() < 3 {
                // Not enough room for type_byte + byte6 + byte7: garbage.
                self.buffer.drain(0..=ack_pos);
                continue;
            }

            let computed = crc8_maxim(&body);
            if computed != crc_byte {
                warn!(
                    target: "codec",
                    "steady-state CRC mismatch: body={body:02x?} expected={computed:#04x} got={crc_byte:#04x}"
                );
                self.buffer.drain(0..=crc_pos);
                continue;
            }

            let (receive_counter, sync_error) = self.counter.advance_receive(type_byte);
            let decoded = DecodedFrame {
                type_byte,
                byte6: body[1],
                byte7: body[2],
                payload: body[3..].to_vec(),
                full_frame: self.buffer[ack_pos..=crc_pos].to_vec(),
                receive_counter,
                is_valid_type: true,
                sync_error,
            };
            self.queue.push_back(decoded);
            self.buffer.drain(0..=crc_pos);
        }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::encode_request;

    fn peer_reply(type_byte: u8, byte6: u8, byte7: u8, payload: &[u8]) -> Vec<u8> {
        let mut body = vec![type_byte, byte6, byte7];
        body.extend_from_slice(payload);
        let crc = crc8_maxim(&body);
        let mut frame = ACK.to_vec();
        frame.extend_from_slice(&HDR);
        frame.extend_from_slice(&body);
        frame.extend_from_slice(&EOM);
        frame.push(crc);
        frame
    }

    #[test]
    fn decode_encode_round_trip_preserves_payload() {
        let mut codec = FrameCodec::new();
        codec.counter.set_receive_from_handshake(0xC4);

        let wire = peer_reply(0xC5, 0x00, 0x01, &[0x12, 0x34]);
        codec.push_bytes(&wire);
        codec.decode_steady_state();

        let decoded = codec.pop_frame().expect("frame decoded");
        assert_eq!(decoded.payload, vec![0x12, 0x34]);
        assert!(!decoded.sync_error);
    }

    #[test]
    fn partial_frame_delivered_once_complete() {
        let mut codec = FrameCodec::new();
        codec.counter.set_receive_from_handshake(0xC4);
        let wire = peer_reply(0xC5, 0xAA, 0xBB, &[0x00, 0x01]);

        codec.push_bytes(&wire[0..4]);
        codec.decode_steady_state();
        assert!(codec.pop_frame().is_none());

        codec.push_bytes(&wire[4..6]);
        codec.decode_steady_state();
        assert!(codec.pop_frame().is_none());

        codec.push_bytes(&wire[6..]);
        codec.decode_steady_state();
        assert!(codec.pop_frame().is_some());
        assert!(codec.pop_frame().is_none());
    }

    #[test]
    fn crc_mismatch_is_dropped_and_decoding_continues() {
        let mut codec = FrameCodec::new();
        codec.counter.set_receive_from_handshake(0xC4);

        let mut bad = peer_reply(0xC5, 0x00, 0x00, &[0x00, 0x00]);
        let last = bad.len() - 1;
        bad[last] ^= 0xFF; // corrupt the CRC byte
        let good = peer_reply(0xC5, 0x00, 0x00, &[0x00, 0x02]);

        codec.push_bytes(&bad);
        codec.push_bytes(&good);
        codec.decode_steady_state();

        let decoded = codec.pop_frame().expect("second frame decoded despite first CRC error");
        assert_eq!(decoded.payload, vec![0x00, 0x02]);
    }

    #[test]
    fn handshake_accepts_first_candidate_and_sets_receive_counter() {
        let mut codec = FrameCodec::new();
        let body = [0xC4u8, 0xAA, 0xBB];
        let crc = crc8_maxim(&body);
        let mut wire = HDR.to_vec();
        wire.extend_from_slice(&body);
        wire.extend_from_slice(&EOM);
        wire.push(crc);

        codec.push_bytes(&wire);
        match codec.decode_handshake() {
            HandshakeOutcome::Accepted { counter_byte } => assert_eq!(counter_byte, 0xC4),
            _ => panic!("expected acceptance"),
        }
    }

    #[test]
    fn handshake_aborts_on_crc_mismatch_without_retry() {
        let mut codec = FrameCodec::new();
        let body = [0xC4u8, 0xAA, 0xBB];
        let mut wire = HDR.to_vec();
        wire.extend_from_slice(&body);
        wire.extend_from_slice(&EOM);
        wire.push(crc8_maxim(&body) ^ 0xFF);

        codec.push_bytes(&wire);
        match codec.decode_handshake() {
            HandshakeOutcome::CrcMismatch => {}
            _ => panic!("expected CRC mismatch"),
        }
    }

    #[test]
    fn garbage_byte_is_dropped_one_at_a_time() {
        let mut codec = FrameCodec::new();
        codec.counter.set_receive_from_handshake(0xC4);
        let mut wire = vec![0xFF, 0xFF, 0xFF];
        wire.extend_from_slice(&ACK);
        wire.extend_from_slice(&peer_reply(0xC5, 0, 0, &[1, 2])[0..]);
        codec.push_bytes(&wire);
        codec.decode_steady_state();
        assert!(codec.pop_frame().is_some());
    }

    #[test]
    fn encode_then_decode_request_body_is_consistent() {
        let encoded = encode_request(4, 0x00, 0x01);
        let body = &encoded[2..encoded.len() - 3];
        let crc = encoded[encoded.len() - 1];
        assert_eq!(crc8_maxim(body), crc);
    }
}
