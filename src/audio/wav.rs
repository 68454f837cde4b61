//! In-memory WAV container encoding for speech-to-text uploads.

use anyhow::{Context, Result};
use std::io::Cursor;

/// Wrap raw 16-bit little-endian PCM in a WAV container.
///
/// A trailing odd byte (half a sample) is discarded.
pub fn encode_wav(pcm: &[u8], sample_rate: u32, channels: u16) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .context("Failed to create WAV writer")?;

        for sample in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([sample[0], sample[1]]))
                .context("Failed to write sample to WAV")?;
        }

        writer.finalize().context("Failed to finalize WAV buffer")?;
    }

    Ok(cursor.into_inner())
}
