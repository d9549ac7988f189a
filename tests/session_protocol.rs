//! Integration tests for the session protocol against an in-memory mock
//! transport, in place of the teacher's `Uart` mock in
//! `no_transport_test.rs` (no real hardware, no real sockets).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use vacuum_link::crc8::crc8_maxim;
use vacuum_link::frame::{ACK, EOM, HDR};
use vacuum_link::session::Session;
use vacuum_link::transport::SerialTransport;

struct MockTransport {
    inbound: VecDeque<u8>,
    outbound: Arc<Mutex<Vec<u8>>>,
}

impl MockTransport {
    fn new(inbound: Vec<u8>) -> (Self, Arc<Mutex<Vec<u8>>>) {
        let outbound = Arc::new(Mutex::new(Vec::new()));
        (
            MockTransport {
                inbound: inbound.into(),
                outbound: outbound.clone(),
            },
            outbound,
        )
    }
}

#[async_trait]
impl SerialTransport for MockTransport {
    async fn read_some(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.inbound.is_empty() {
            // Simulate a link that never sends more; the caller's timeout
            // will fire instead of this read returning EOF.
            std::future::pending::<()>().await;
        }
        let mut n = 0;
        while n < buf.len() {
            match self.inbound.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        Ok(n)
    }

    async fn write_all(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.outbound.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }
}

fn handshake_frame(counter_byte: u8) -> Vec<u8> {
    let body = [counter_byte, 0xAA, 0xBB];
    let crc = crc8_maxim(&body);
    let mut frame = HDR.to_vec();
    frame.extend_from_slice(&body);
    frame.extend_from_slice(&EOM);
    frame.push(crc);
    frame
}

fn steady_state_reply(type_byte: u8, payload: &[u8]) -> Vec<u8> {
    let mut body = vec![type_byte, 0x00, 0x01];
    body.extend_from_slice(payload);
    let crc = crc8_maxim(&body);
    let mut frame = ACK.to_vec();
    frame.extend_from_slice(&HDR);
    frame.extend_from_slice(&body);
    frame.extend_from_slice(&EOM);
    frame.push(crc);
    frame
}

#[tokio::test]
async fn handshake_accepts_first_frame_and_sends_ack_then_completion() {
    let inbound = handshake_frame(0xC4);
    let (transport, outbound) = MockTransport::new(inbound);
    let mut session = Session::new(Box::new(transport));

    session.handshake().await.expect("handshake succeeds");

    // Scenario 2 (SPEC_FULL.md §8): ACK, then a handshake-completion frame
    // with prefix nibble 8, counter 4, payload {0x00, 0x00}.
    let expected_completion_body = [0x84u8, 0x00, 0x00];
    let expected_crc = crc8_maxim(&expected_completion_body);
    let mut expected = ACK.to_vec();
    expected.extend_from_slice(&HDR);
    expected.extend_from_slice(&expected_completion_body);
    expected.extend_from_slice(&EOM);
    expected.push(expected_crc);

    assert_eq!(*outbound.lock().unwrap(), expected);
}

#[tokio::test(start_paused = true)]
async fn handshake_times_out_with_no_bytes() {
    let (transport, _outbound) = MockTransport::new(Vec::new());
    let mut session = Session::new(Box::new(transport));

    let err = session.handshake().await.unwrap_err();
    assert!(matches!(err, vacuum_link::error::SessionError::HandshakeTimeout));
}

#[tokio::test]
async fn handshake_rejects_crc_mismatch_without_retrying_next_candidate() {
    let mut bad = handshake_frame(0xC4);
    let last = bad.len() - 1;
    bad[last] ^= 0xFF;

    let (transport, _outbound) = MockTransport::new(bad);
    let mut session = Session::new(Box::new(transport));

    let err = session.handshake().await.unwrap_err();
    assert!(matches!(err, vacuum_link::error::SessionError::HandshakeCrcMismatch));
}

#[tokio::test]
async fn request_reply_returns_decoded_payload_after_handshake() {
    let mut inbound = handshake_frame(0xC4);
    inbound.extend_from_slice(&steady_state_reply(0xC5, &[0x00, 0x2A]));

    let (transport, _outbound) = MockTransport::new(inbound);
    let mut session = Session::new(Box::new(transport));

    session.handshake().await.expect("handshake succeeds");
    let exchange = session.request_reply(0x00, 0x01).await.expect("reply arrives");

    assert_eq!(exchange.frame.payload, vec![0x00, 0x2A]);
    assert!(!exchange.frame.sync_error);
}

#[tokio::test]
async fn request_reply_surfaces_sync_error_on_counter_mismatch() {
    let mut inbound = handshake_frame(0xC4);
    // Correct counter after handshake would be 0xC5; send 0xC7 instead.
    inbound.extend_from_slice(&steady_state_reply(0xC7, &[0x00, 0x01]));

    let (transport, _outbound) = MockTransport::new(inbound);
    let mut session = Session::new(Box::new(transport));

    session.handshake().await.expect("handshake succeeds");
    let exchange = session.request_reply(0x00, 0x01).await.expect("reply still delivered");

    assert!(exchange.frame.sync_error);
}

#[tokio::test]
async fn keep_alive_cycle_completes_four_exchanges() {
    let mut inbound = handshake_frame(0xC4);
    for type_byte in [0xC5u8, 0xC6, 0xC7, 0xC4] {
        inbound.extend_from_slice(&steady_state_reply(type_byte, &[0x00, 0x00]));
    }

    let (transport, _outbound) = MockTransport::new(inbound);
    let mut session = Session::new(Box::new(transport));

    session.handshake().await.expect("handshake succeeds");
    session.run_keep_alive_cycle().await.expect("keep-alive cycle completes");
}

#[tokio::test(start_paused = true)]
async fn reply_timeout_is_reported_when_peer_never_replies() {
    let inbound = handshake_frame(0xC4);
    let (transport, _outbound) = MockTransport::new(inbound);
    let mut session = Session::new(Box::new(transport));

    session.handshake().await.expect("handshake succeeds");
    let err = session.request_reply(0x00, 0x01).await.unwrap_err();
    assert!(matches!(
        err,
        vacuum_link::error::SessionError::ReplyTimeout { id_high: 0x00, id_low: 0x01 }
    ));
}
