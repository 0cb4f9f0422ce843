//! Per-frame input encoding.
//!
//! One byte per tick carries the sampled set of held controls. Continuous
//! actions (turn, thrust) act every tick their bit is held; fire acts on the
//! rising edge of its bit, which is how a key-down event looks after
//! sampling.

/// Controls held during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub thrust: bool,
    pub reverse: bool,
    pub fire: bool,
}

/// Bits 5..7 are reserved and must be zero in recorded tapes.
pub const INPUT_RESERVED_MASK: u8 = 0xE0;

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.left { 0x01 } else { 0 })
        | (if input.right { 0x02 } else { 0 })
        | (if input.thrust { 0x04 } else { 0 })
        | (if input.reverse { 0x08 } else { 0 })
        | (if input.fire { 0x10 } else { 0 })
}

#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        left: (byte & 0x01) != 0,
        right: (byte & 0x02) != 0,
        thrust: (byte & 0x04) != 0,
        reverse: (byte & 0x08) != 0,
        fire: (byte & 0x10) != 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_for_all_valid_bit_patterns() {
        for byte in 0u8..=0x1F {
            assert_eq!(encode_input_byte(decode_input_byte(byte)), byte);
        }
    }

    #[test]
    fn decode_ignores_reserved_bits() {
        assert_eq!(decode_input_byte(0x80), FrameInput::default());
        assert!(decode_input_byte(0xE0 | 0x11).left);
        assert!(decode_input_byte(0xE0 | 0x11).fire);
    }
}
