// Byte-fed receiver for pan/tilt command frames.
// Hunts for the sync byte, collects a full frame, validates it and hands back a
// clamped AngleState. A rejected frame never changes the stored angles.

use crate::controller::angles::AngleState;
use crate::protocol::frame::{decode, FrameError, FRAME_LEN, SYNC};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverState {
    Idle,
    Collecting(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiveEvent {
    Accepted(AngleState),
    Rejected(FrameError),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub accepted: u32,
    pub bad_sync: u32,
    pub checksum_mismatch: u32,
    pub truncated: u32,
    pub discarded_bytes: u32,
}

pub struct FrameReceiver {
    buf: [u8; FRAME_LEN],
    len: usize,
    hunting: bool,
    stats: ReceiverStats,
}

impl FrameReceiver {
    pub fn new() -> FrameReceiver {
        FrameReceiver {
            buf: [0; FRAME_LEN],
            len: 0,
            hunting: false,
            stats: ReceiverStats::default(),
        }
    }

    pub fn state(&self) -> ReceiverState {
        match self.len {
            0 => ReceiverState::Idle,
            n => ReceiverState::Collecting(n),
        }
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    pub fn push(&mut self, byte: u8) -> Option<ReceiveEvent> {
        if self.len == 0 && byte != SYNC {
            self.stats.discarded_bytes = self.stats.discarded_bytes.wrapping_add(1);
            // report a run of line noise once, not once per byte
            if self.hunting {
                return None;
            }
            self.hunting = true;
            self.stats.bad_sync = self.stats.bad_sync.wrapping_add(1);
            return Some(ReceiveEvent::Rejected(FrameError::BadSync));
        }
        self.hunting = false;

        self.buf[self.len] = byte;
        self.len += 1;
        if self.len < FRAME_LEN {
            return None;
        }

        match decode(&self.buf) {
            Ok((pan, tilt)) => {
                self.len = 0;
                self.stats.accepted = self.stats.accepted.wrapping_add(1);
                Some(ReceiveEvent::Accepted(AngleState::new(pan, tilt)))
            }
            Err(e) => {
                self.stats.checksum_mismatch = self.stats.checksum_mismatch.wrapping_add(1);
                self.resync();
                Some(ReceiveEvent::Rejected(e))
            }
        }
    }

    // Line went idle: whatever is buffered can no longer become a frame.
    pub fn flush_partial(&mut self) -> bool {
        if self.len == 0 {
            return false;
        }
        self.len = 0;
        self.stats.truncated = self.stats.truncated.wrapping_add(1);
        true
    }

    // keep the buffered tail from the next sync byte onwards, if any
    fn resync(&mut self) {
        let next_sync = self.buf[1..self.len].iter().position(|&b| b == SYNC);
        match next_sync {
            Some(offset) => {
                let start = offset + 1;
                self.buf.copy_within(start..self.len, 0);
                self.len -= start;
            }
            None => self.len = 0,
        }
    }
}

impl Default for FrameReceiver {
    fn default() -> FrameReceiver {
        FrameReceiver::new()
    }
}
