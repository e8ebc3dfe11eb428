pub mod classifier;
pub mod config;
pub mod constants;
pub mod detector;
pub mod energy;
pub mod error;
pub mod preroll;

// Core exports - grouped and sorted alphabetically
pub use classifier::{EnergyClassifier, FrameClass, FrameClassifier};
pub use config::VadConfig;
pub use constants::{DEFAULT_FRAME_DURATION_MS, DEFAULT_FRAME_SIZE_SAMPLES, DEFAULT_SAMPLE_RATE_HZ};
pub use detector::{DetectionState, VadDetector, VadDetectorBuilder, VadMetrics};
pub use error::ConfigError;
