pub mod buffer;
pub mod wav;

pub use buffer::{AudioChunk, AudioIngestBuffer, BufferConfig};
pub use wav::encode_wav;
