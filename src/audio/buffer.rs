use std::time::Duration;

/// Ingest buffer configuration
#[derive(Debug, Clone)]
pub struct BufferConfig {
    /// Sample rate of the inbound PCM stream
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Accumulated duration that completes a chunk (default: 3 seconds)
    pub chunk_duration: Duration,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            chunk_duration: Duration::from_secs(3),
        }
    }
}

/// A fixed-duration slice of accumulated audio, ready for transcription.
///
/// Consumed exactly once by the transcription stage, then discarded.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    /// Monotonically increasing per session, assigned when the chunk is cut
    pub sequence: u64,
    /// Raw 16-bit little-endian PCM, interleaved
    pub pcm: Vec<u8>,
    /// Duration represented by `pcm` at the configured format
    pub duration: Duration,
}

/// Accumulates inbound audio fragments into fixed-duration chunks.
///
/// `push` never blocks and never emits a chunk below the threshold; a
/// sub-threshold chunk only ever leaves via an explicit `flush` (e.g. on
/// stop-recording). An empty buffer flush yields nothing, so no zero-length
/// chunk reaches the pipeline.
pub struct AudioIngestBuffer {
    config: BufferConfig,
    pending: Vec<u8>,
    next_sequence: u64,
}

impl AudioIngestBuffer {
    pub fn new(config: BufferConfig) -> Self {
        Self {
            config,
            pending: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Bytes of PCM per second at the configured format (16-bit samples).
    fn bytes_per_second(&self) -> u64 {
        self.config.sample_rate as u64 * self.config.channels as u64 * 2
    }

    /// Duration currently accumulated and not yet cut into a chunk.
    pub fn pending_duration(&self) -> Duration {
        Duration::from_secs_f64(self.pending.len() as f64 / self.bytes_per_second() as f64)
    }

    /// Append a fragment; returns a completed chunk once the accumulated
    /// duration reaches the threshold. The chunk carries everything
    /// accumulated so far, and accumulation restarts from empty.
    pub fn push(&mut self, bytes: &[u8]) -> Option<AudioChunk> {
        self.pending.extend_from_slice(bytes);

        if self.pending_duration() >= self.config.chunk_duration {
            Some(self.cut_chunk())
        } else {
            None
        }
    }

    /// Cut whatever is accumulated into a chunk, threshold or not.
    pub fn flush(&mut self) -> Option<AudioChunk> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.cut_chunk())
        }
    }

    /// Number of chunks emitted so far (also the next sequence number).
    pub fn chunks_emitted(&self) -> u64 {
        self.next_sequence
    }

    fn cut_chunk(&mut self) -> AudioChunk {
        let pcm = std::mem::take(&mut self.pending);
        let duration =
            Duration::from_secs_f64(pcm.len() as f64 / self.bytes_per_second() as f64);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        AudioChunk {
            sequence,
            pcm,
            duration,
        }
    }
}
