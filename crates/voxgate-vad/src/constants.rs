//! Audio format constants for VAD processing

/// Default sample rate for VAD processing (Hz)
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;

/// Default frame duration (ms)
/// At 16kHz, 20ms frames = 320 samples
pub const DEFAULT_FRAME_DURATION_MS: u32 = 20;

/// Default frame size in samples (derived constant)
pub const DEFAULT_FRAME_SIZE_SAMPLES: usize =
    (DEFAULT_SAMPLE_RATE_HZ as usize * DEFAULT_FRAME_DURATION_MS as usize) / 1000;

/// Standard number of channels for mono audio processing
pub const CHANNELS_MONO: u16 = 1;
