use thiserror::Error;

/// Construction-time configuration failures.
///
/// Frame processing itself never errors: malformed frames degrade to
/// silence. Anything that would make the state machine arithmetic
/// meaningless is rejected here instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("aggressiveness must be in 0..=3, got {0}")]
    InvalidAggressiveness(u8),

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("frame duration must be positive")]
    InvalidFrameDuration,

    #[error("hangover must be positive")]
    InvalidHangover,
}
