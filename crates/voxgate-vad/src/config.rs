use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FRAME_DURATION_MS, DEFAULT_SAMPLE_RATE_HZ};
use crate::error::ConfigError;

/// Detector configuration, immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VadConfig {
    /// Classifier strictness, 0 (most permissive) to 3 (strictest).
    pub aggressiveness: u8,
    /// Milliseconds of audio retained before a detected onset.
    /// Zero disables pre-roll capture.
    pub pre_roll_ms: u32,
    /// Milliseconds of continued silence before a segment is declared ended.
    pub hangover_ms: u32,
    pub sample_rate_hz: u32,
    pub frame_duration_ms: u32,
}

impl Default for VadConfig {
    fn default() -> Self {
        Self {
            aggressiveness: 2,
            pre_roll_ms: 200,
            hangover_ms: 300,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
        }
    }
}

impl VadConfig {
    /// Rejects configurations the state machine cannot run on. Invalid
    /// values fail here rather than being clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.aggressiveness > 3 {
            return Err(ConfigError::InvalidAggressiveness(self.aggressiveness));
        }
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::InvalidSampleRate);
        }
        if self.frame_duration_ms == 0 {
            return Err(ConfigError::InvalidFrameDuration);
        }
        if self.hangover_ms == 0 {
            return Err(ConfigError::InvalidHangover);
        }
        Ok(())
    }

    /// Nominal frame length in samples.
    pub fn frame_size_samples(&self) -> usize {
        (self.sample_rate_hz as usize * self.frame_duration_ms as usize) / 1000
    }

    /// Pre-roll capacity in samples.
    pub fn pre_roll_samples(&self) -> usize {
        (self.sample_rate_hz as usize * self.pre_roll_ms as usize) / 1000
    }
}
