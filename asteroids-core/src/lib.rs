pub mod constants;
pub mod error;
pub mod input;
pub mod math;
pub mod rng;
pub mod sim;
pub mod tape;

pub use error::TapeError;
pub use input::{decode_input_byte, encode_input_byte, FrameInput};
pub use sim::{LiveGame, ReplayResult, SpawnConfig, WorldSnapshot};
pub use tape::{parse_tape, serialize_tape, verify_tape};
