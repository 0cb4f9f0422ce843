//! Recorded-run tapes.
//!
//! Layout: 16-byte header (magic, version, 3 reserved bytes, seed, frame
//! count), one input byte per frame, 12-byte footer (final score, final RNG
//! state, CRC32 over header + inputs). All integers little-endian.
//! `verify_tape` re-runs the inputs through the simulation and cross-checks
//! the footer, so a tape is a self-contained, tamper-evident score claim.

use crate::constants::{TAPE_FOOTER_SIZE, TAPE_HEADER_SIZE, TAPE_MAGIC, TAPE_VERSION};
use crate::error::TapeError;
use crate::input::INPUT_RESERVED_MASK;
use crate::sim::{replay, ReplayResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapeHeader {
    pub magic: u32,
    pub version: u8,
    pub seed: u32,
    pub frame_count: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TapeFooter {
    pub final_score: u32,
    pub final_rng_state: u32,
    pub checksum: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TapeView<'a> {
    pub header: TapeHeader,
    pub inputs: &'a [u8],
    pub footer: TapeFooter,
}

pub fn parse_tape(bytes: &[u8], max_frames: u32) -> Result<TapeView<'_>, TapeError> {
    let min_len = TAPE_HEADER_SIZE + TAPE_FOOTER_SIZE;
    if bytes.len() < min_len {
        return Err(TapeError::TooShort {
            actual: bytes.len(),
            min: min_len,
        });
    }

    let magic = read_u32_le(bytes, 0);
    if magic != TAPE_MAGIC {
        return Err(TapeError::BadMagic { found: magic });
    }

    let version = bytes[4];
    if version != TAPE_VERSION {
        return Err(TapeError::UnsupportedVersion { found: version });
    }

    if bytes[5] != 0 || bytes[6] != 0 || bytes[7] != 0 {
        return Err(TapeError::ReservedHeaderNonZero);
    }

    let seed = read_u32_le(bytes, 8);
    let frame_count = read_u32_le(bytes, 12);

    if frame_count == 0 || frame_count > max_frames {
        return Err(TapeError::FrameCountOutOfRange {
            frame_count,
            max_frames,
        });
    }

    let expected_len = TAPE_HEADER_SIZE + frame_count as usize + TAPE_FOOTER_SIZE;
    if bytes.len() != expected_len {
        return Err(TapeError::LengthMismatch {
            expected: expected_len,
            actual: bytes.len(),
        });
    }

    let inputs_start = TAPE_HEADER_SIZE;
    let inputs_end = inputs_start + frame_count as usize;
    let inputs = &bytes[inputs_start..inputs_end];

    let final_score = read_u32_le(bytes, inputs_end);
    let final_rng_state = read_u32_le(bytes, inputs_end + 4);
    let checksum = read_u32_le(bytes, inputs_end + 8);

    let computed = crc32_and_validate_inputs(bytes, inputs_start, inputs_end)?;
    if checksum != computed {
        return Err(TapeError::CrcMismatch {
            stored: checksum,
            computed,
        });
    }

    Ok(TapeView {
        header: TapeHeader {
            magic,
            version,
            seed,
            frame_count,
        },
        inputs,
        footer: TapeFooter {
            final_score,
            final_rng_state,
            checksum,
        },
    })
}

pub fn serialize_tape(seed: u32, inputs: &[u8], final_score: u32, final_rng_state: u32) -> Vec<u8> {
    let total_len = TAPE_HEADER_SIZE + inputs.len() + TAPE_FOOTER_SIZE;
    let mut data = vec![0u8; total_len];

    write_u32_le(&mut data, 0, TAPE_MAGIC);
    data[4] = TAPE_VERSION;
    write_u32_le(&mut data, 8, seed);
    write_u32_le(&mut data, 12, inputs.len() as u32);

    let body_start = TAPE_HEADER_SIZE;
    let body_end = body_start + inputs.len();
    data[body_start..body_end].copy_from_slice(inputs);

    write_u32_le(&mut data, body_end, final_score);
    write_u32_le(&mut data, body_end + 4, final_rng_state);

    let checksum = crc32(&data[..body_end]);
    write_u32_le(&mut data, body_end + 8, checksum);

    data
}

/// Parse, replay, and cross-check the footer against the computed result.
pub fn verify_tape(bytes: &[u8], max_frames: u32) -> Result<ReplayResult, TapeError> {
    let tape = parse_tape(bytes, max_frames)?;
    let result = replay(tape.header.seed, tape.inputs);

    if result.final_score != tape.footer.final_score {
        return Err(TapeError::ScoreMismatch {
            claimed: tape.footer.final_score,
            computed: result.final_score,
        });
    }

    if result.final_rng_state != tape.footer.final_rng_state {
        return Err(TapeError::RngMismatch {
            claimed: tape.footer.final_rng_state,
            computed: result.final_rng_state,
        });
    }

    Ok(result)
}

#[inline]
fn read_u32_le(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

#[inline]
fn write_u32_le(bytes: &mut [u8], offset: usize, value: u32) {
    bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

const CRC_TABLE: [u32; 256] = build_crc_table();

const fn build_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut c = i as u32;
        let mut j = 0;

        while j < 8 {
            c = if (c & 1) != 0 {
                0xEDB8_8320u32 ^ (c >> 1)
            } else {
                c >> 1
            };
            j += 1;
        }

        table[i] = c;
        i += 1;
    }

    table
}

pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = 0xFFFF_FFFFu32;

    for byte in data {
        let idx = ((crc ^ (*byte as u32)) & 0xFF) as usize;
        crc = CRC_TABLE[idx] ^ (crc >> 8);
    }

    crc ^ 0xFFFF_FFFF
}

/// Single pass over header + inputs: accumulates the CRC and rejects any
/// input byte with reserved bits set.
fn crc32_and_validate_inputs(
    bytes: &[u8],
    inputs_start: usize,
    inputs_end: usize,
) -> Result<u32, TapeError> {
    let mut crc = 0xFFFF_FFFFu32;

    for (i, byte) in bytes[..inputs_end].iter().enumerate() {
        if i >= inputs_start && (byte & INPUT_RESERVED_MASK) != 0 {
            return Err(TapeError::ReservedInputBitsNonZero {
                frame: (i - inputs_start) as u32,
                byte: *byte,
            });
        }

        let idx = ((crc ^ *byte as u32) & 0xFF) as usize;
        crc = CRC_TABLE[idx] ^ (crc >> 8);
    }

    Ok(crc ^ 0xFFFF_FFFF)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn footer_offset(frame_count: usize) -> usize {
        TAPE_HEADER_SIZE + frame_count
    }

    fn valid_tape(seed: u32, inputs: &[u8]) -> Vec<u8> {
        let result = replay(seed, inputs);
        serialize_tape(seed, inputs, result.final_score, result.final_rng_state)
    }

    #[test]
    fn crc_matches_known_vector() {
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn roundtrip_small_tape() {
        let inputs = [0x00u8, 0x11, 0x06];
        let bytes = serialize_tape(0xABCD_1234, &inputs, 7, 0x1111_2222);
        let tape = parse_tape(&bytes, 100).unwrap();

        assert_eq!(tape.header.seed, 0xABCD_1234);
        assert_eq!(tape.header.frame_count, 3);
        assert_eq!(tape.inputs, inputs);
        assert_eq!(tape.footer.final_score, 7);
        assert_eq!(tape.footer.final_rng_state, 0x1111_2222);
    }

    #[test]
    fn rejects_tape_too_short() {
        let bytes = [0u8; TAPE_HEADER_SIZE + TAPE_FOOTER_SIZE - 1];
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::TooShort { .. })
        ));
    }

    #[test]
    fn rejects_invalid_magic() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        bytes[0] ^= 0x01;
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::BadMagic { .. })
        ));
    }

    #[test]
    fn rejects_unsupported_version() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        bytes[4] = TAPE_VERSION + 1;
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn rejects_nonzero_reserved_header_bytes() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        bytes[6] = 1;
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::ReservedHeaderNonZero)
        ));
    }

    #[test]
    fn rejects_zero_frame_count() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        bytes[12..16].copy_from_slice(&0u32.to_le_bytes());
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::FrameCountOutOfRange {
                frame_count: 0,
                max_frames: 100
            })
        ));
    }

    #[test]
    fn rejects_frame_count_above_max() {
        let bytes = valid_tape(0xABCD_1234, &[0x00]);
        assert!(matches!(
            parse_tape(&bytes, 0),
            Err(TapeError::FrameCountOutOfRange {
                frame_count: 1,
                max_frames: 0
            })
        ));
    }

    #[test]
    fn rejects_trailing_bytes_beyond_declared_frame_count() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        bytes.push(0);
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_reserved_input_bits() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00, 0x00]);
        bytes[TAPE_HEADER_SIZE + 1] = 0x80;
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::ReservedInputBitsNonZero {
                frame: 1,
                byte: 0x80
            })
        ));
    }

    #[test]
    fn rejects_crc_mismatch() {
        let mut bytes = valid_tape(0xABCD_1234, &[0x00]);
        let checksum_offset = footer_offset(1) + 8;
        bytes[checksum_offset] ^= 0x01;
        assert!(matches!(
            parse_tape(&bytes, 100),
            Err(TapeError::CrcMismatch { .. })
        ));
    }

    #[test]
    fn verify_accepts_honest_tape() {
        let inputs = [0x00u8, 0x10, 0x04, 0x00, 0x01, 0x12];
        let tape = valid_tape(0xFEED_BEEF, &inputs);
        let result = verify_tape(&tape, 100).unwrap();
        assert_eq!(result.frame_count, inputs.len() as u32);
    }

    #[test]
    fn detects_score_tampering() {
        let inputs = [0x00u8; 32];
        let mut tape = valid_tape(0x1234_5678, &inputs);
        let offset = footer_offset(inputs.len());
        let claimed = read_u32_le(&tape, offset).wrapping_add(1);
        tape[offset..offset + 4].copy_from_slice(&claimed.to_le_bytes());
        // CRC does not cover the footer, so this is caught by the replay.
        let err = verify_tape(&tape, 100).unwrap_err();
        assert!(matches!(err, TapeError::ScoreMismatch { .. }));
    }

    #[test]
    fn detects_rng_state_tampering() {
        let inputs = [0x00u8; 16];
        let mut tape = valid_tape(0x1234_5678, &inputs);
        let offset = footer_offset(inputs.len()) + 4;
        tape[offset..offset + 4].copy_from_slice(&0xFFFF_FFFFu32.to_le_bytes());
        let err = verify_tape(&tape, 100).unwrap_err();
        assert!(matches!(err, TapeError::RngMismatch { .. }));
    }

    #[test]
    fn input_byte_tampering_is_rejected() {
        let inputs = [0x01u8, 0x02, 0x04, 0x10, 0x03, 0x14, 0x00, 0x07];
        let good_tape = valid_tape(0xFEED_BEEF, &inputs);
        assert!(verify_tape(&good_tape, 100).is_ok());

        for idx in TAPE_HEADER_SIZE..TAPE_HEADER_SIZE + inputs.len() {
            let mut tampered = good_tape.clone();
            tampered[idx] ^= 0x01;
            assert!(
                verify_tape(&tampered, 100).is_err(),
                "tampering input byte {idx} must fail verification"
            );
        }
    }
}
