pub mod vad_processor;

pub use vad_processor::{AudioFrame, SpeechEvent, VadProcessor};
