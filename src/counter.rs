//! The rolling 4..=7 send/receive counters. The receive side is modelled as
//! `Unset | Set(u8)` per the Design Notes, rather than the nullable integer
//! the original device driver used — every steady-state operation below
//! only makes sense once the handshake has produced a `Set` value.

pub const COUNTER_MIN: u8 = 4;
pub const COUNTER_MAX: u8 = 7;

fn wrapping_increment(c: u8) -> u8 {
    if c == COUNTER_MAX {
        COUNTER_MIN
    } else {
        c + 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiveCounter {
    Unset,
    Set(u8),
}

#[derive(Debug)]
pub struct CounterState {
    send: u8,
    receive: ReceiveCounter,
}

impl CounterState {
    pub fn new() -> Self {
        CounterState {
            send: COUNTER_MIN,
            receive: ReceiveCounter::Unset,
        }
    }

    pub fn send_counter(&self) -> u8 {
        self.send
    }

    pub fn receive_counter(&self) -> ReceiveCounter {
        self.receive
    }

    /// Returns the counter value used for this send, then advances.
    pub fn advance_send(&mut self) -> u8 {
        let used = self.send;
        self.send = wrapping_increment(self.send);
        used
    }

    /// Derives the receive counter from the handshake's first accepted
    /// frame. `counter_byte` is the raw byte seen on the wire.
    pub fn set_receive_from_handshake(&mut self, counter_byte: u8) {
        self.receive = ReceiveCounter::Set(counter_byte & 0x0F);
    }

    /// Advances the receive counter against an observed `type_byte`,
    /// returning `(new_receive_counter, sync_error)`. Panics if called
    /// before the handshake has set the receive counter — a programmer
    /// error, since the codec never reaches steady-state decoding before
    /// the session has completed its handshake.
    pub fn advance_receive(&mut self, type_byte: u8) -> (u8, bool) {
        let current = match self.receive {
            ReceiveCounter::Set(c) => c,
            ReceiveCounter::Unset => {
                panic!("advance_receive called before handshake set the receive counter")
            }
        };
        let expected = wrapping_increment(current);
        let sync_error = type_byte != (0xC0 | expected);
        let new_receive = if sync_error {
            type_byte & 0x0F
        } else {
            expected
        };
        self.receive = ReceiveCounter::Set(new_receive);
        (new_receive, sync_error)
    }
}

impl Default for CounterState {
    fn default() -> Self {
        Self::new()
    }
}
