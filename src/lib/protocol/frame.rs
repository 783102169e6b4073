// Pan/tilt command frame
// byte 0: sync (0xA5), byte 1: pan deg, byte 2: tilt deg, byte 3: 8-bit sum of bytes 0..3
//
// The checksum is a plain 8-bit sum: it misses errors that cancel out across
// bytes, e.g. bit 7 flipped in a payload byte and in the checksum byte.

use core::fmt;

pub const SYNC: u8 = 0xA5;
pub const FRAME_LEN: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    BadSync,
    ChecksumMismatch,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::BadSync => write!(f, "bad sync byte"),
            FrameError::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

pub fn checksum(sync: u8, pan: u8, tilt: u8) -> u8 {
    sync.wrapping_add(pan).wrapping_add(tilt)
}

pub fn encode(pan: u8, tilt: u8) -> [u8; FRAME_LEN] {
    [SYNC, pan, tilt, checksum(SYNC, pan, tilt)]
}

// Range checks are left to the receiver, which clamps before storing.
pub fn decode(bytes: &[u8; FRAME_LEN]) -> Result<(u8, u8), FrameError> {
    if bytes[0] != SYNC {
        return Err(FrameError::BadSync);
    }
    if checksum(bytes[0], bytes[1], bytes[2]) != bytes[3] {
        return Err(FrameError::ChecksumMismatch);
    }
    Ok((bytes[1], bytes[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_reference_command() {
        assert_eq!(encode(104, 140), [0xA5, 0x68, 0x8C, 0x99]);
    }

    #[test]
    fn every_pair_survives_the_link() {
        for pan in 0..=255u8 {
            for tilt in 0..=255u8 {
                assert_eq!(decode(&encode(pan, tilt)), Ok((pan, tilt)));
            }
        }
    }

    #[test]
    fn rejects_wrong_sync_before_checksum() {
        let mut frame = encode(90, 140);
        frame[0] = 0x5A;
        assert_eq!(decode(&frame), Err(FrameError::BadSync));
    }

    #[test]
    fn checksum_bit_flips_are_detected() {
        let frame = encode(104, 140);
        for bit in 0..8 {
            let mut corrupted = frame;
            corrupted[3] ^= 1 << bit;
            assert_eq!(decode(&corrupted), Err(FrameError::ChecksumMismatch));
        }
    }

    #[test]
    fn compensating_flips_go_unnoticed() {
        // bit 7 of the payload and bit 7 of the checksum cancel mod 256
        let mut corrupted = encode(104, 140);
        corrupted[1] ^= 0x80;
        corrupted[3] ^= 0x80;
        assert_eq!(decode(&corrupted), Ok((104 ^ 0x80, 140)));

        // +1 on pan, -1 on tilt keeps the sum
        let mut corrupted = encode(104, 140);
        corrupted[1] += 1;
        corrupted[2] -= 1;
        assert_eq!(decode(&corrupted), Ok((105, 139)));
    }

    #[test]
    fn decode_does_not_range_check() {
        assert_eq!(decode(&encode(0, 255)), Ok((0, 255)));
    }
}
