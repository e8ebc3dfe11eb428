use crate::classifier::{EnergyClassifier, FrameClass, FrameClassifier};
use crate::config::VadConfig;
use crate::error::ConfigError;
use crate::preroll::PreRollBuffer;

/// Snapshot of the detector's speaking/silence state.
///
/// This is an owned value copied out on every call; mutating it has no
/// effect on the detector.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DetectionState {
    pub is_speaking: bool,
    /// Set on the most recent silence-to-speech transition; persists after
    /// the segment ends, cleared only by `reset()`.
    pub speech_start_ms: Option<u64>,
    /// Set when a segment ends after hangover expiry; cleared on the next
    /// onset so a snapshot never spans two segments.
    pub speech_end_ms: Option<u64>,
    /// Milliseconds of silence still tolerated before the current segment
    /// is declared over. Nonzero implies `is_speaking`.
    pub hangover_remaining_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct VadMetrics {
    pub frames_processed: u64,
    pub speech_segments: u64,
    pub total_speech_ms: u64,
    pub total_silence_ms: u64,
    pub last_rms: f32,
}

/// Voice activity detector: a per-frame classifier in front of a
/// hysteresis state machine with pre-roll capture.
///
/// One detector serves exactly one audio stream. It is `Send` so it can be
/// moved into a worker task, but it is not `Sync`; concurrent callers must
/// hold their own instance.
pub struct VadDetector {
    config: VadConfig,
    classifier: Box<dyn FrameClassifier>,
    state: DetectionState,
    pre_roll: PreRollBuffer,
    lead_in: Vec<i16>,
    metrics: VadMetrics,
}

impl VadDetector {
    /// Builds a detector with the reference energy classifier selected by
    /// `config.aggressiveness`.
    pub fn new(config: VadConfig) -> Result<Self, ConfigError> {
        let classifier = EnergyClassifier::from_aggressiveness(config.aggressiveness)?;
        Self::with_classifier(config, Box::new(classifier))
    }

    /// Builds a detector around a caller-supplied classifier. The state
    /// machine contract is identical regardless of classifier.
    pub fn with_classifier(
        config: VadConfig,
        classifier: Box<dyn FrameClassifier>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            pre_roll: PreRollBuffer::new(config.pre_roll_samples()),
            classifier,
            state: DetectionState::default(),
            lead_in: Vec::new(),
            metrics: VadMetrics::default(),
            config,
        })
    }

    pub fn builder() -> VadDetectorBuilder {
        VadDetectorBuilder::new()
    }

    /// Classifies one frame and advances the state machine.
    ///
    /// `timestamp_ms` is caller-supplied and must be non-decreasing across
    /// calls; this is not validated. Frames of any length are accepted --
    /// an empty or truncated frame classifies on its actual contents, which
    /// for the energy classifier means unvoiced.
    pub fn process_frame(&mut self, frame: &[i16], timestamp_ms: u64) -> DetectionState {
        let class = self.classifier.classify(frame);

        match (self.state.is_speaking, class) {
            (false, FrameClass::Voiced) => {
                // Onset: freeze the buffered lead-in for the caller. The
                // onset frame itself is not part of the pre-roll.
                self.lead_in = self.pre_roll.drain();
                self.state.is_speaking = true;
                self.state.speech_start_ms = Some(timestamp_ms);
                self.state.speech_end_ms = None;
                self.state.hangover_remaining_ms = 0;
                self.metrics.speech_segments += 1;
            }
            (false, FrameClass::Unvoiced) => {
                self.pre_roll.push_frame(frame);
            }
            (true, FrameClass::Voiced) => {
                // Speech resumed; any running hangover is cancelled, not
                // paused.
                self.state.hangover_remaining_ms = 0;
            }
            (true, FrameClass::Unvoiced) => {
                if self.state.hangover_remaining_ms == 0 {
                    self.state.hangover_remaining_ms = self.config.hangover_ms;
                }
                // The arming frame counts against the hangover too, so a
                // hangover shorter than one frame expires immediately.
                self.state.hangover_remaining_ms = self
                    .state
                    .hangover_remaining_ms
                    .saturating_sub(self.config.frame_duration_ms);
                if self.state.hangover_remaining_ms == 0 {
                    self.state.is_speaking = false;
                    self.state.speech_end_ms = Some(timestamp_ms);
                }
            }
        }

        self.metrics.frames_processed += 1;
        self.metrics.last_rms = self.classifier.last_rms();
        if self.state.is_speaking {
            self.metrics.total_speech_ms += self.config.frame_duration_ms as u64;
        } else {
            self.metrics.total_silence_ms += self.config.frame_duration_ms as u64;
        }

        self.state.clone()
    }

    /// Snapshot of the current state, no side effects.
    pub fn state(&self) -> DetectionState {
        self.state.clone()
    }

    /// Consumes the lead-in audio captured at the most recent onset.
    /// Returns an empty buffer if no onset is pending consumption.
    pub fn take_pre_roll(&mut self) -> Vec<i16> {
        std::mem::take(&mut self.lead_in)
    }

    /// Returns to the initial all-silence state for a new logical session
    /// on the same instance.
    pub fn reset(&mut self) {
        self.state = DetectionState::default();
        self.pre_roll.clear();
        self.lead_in.clear();
        self.metrics = VadMetrics::default();
    }

    pub fn metrics(&self) -> &VadMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &VadConfig {
        &self.config
    }
}

pub struct VadDetectorBuilder {
    config: VadConfig,
    classifier: Option<Box<dyn FrameClassifier>>,
}

impl VadDetectorBuilder {
    pub fn new() -> Self {
        Self {
            config: VadConfig::default(),
            classifier: None,
        }
    }

    pub fn aggressiveness(mut self, level: u8) -> Self {
        self.config.aggressiveness = level;
        self
    }

    pub fn pre_roll_ms(mut self, ms: u32) -> Self {
        self.config.pre_roll_ms = ms;
        self
    }

    pub fn hangover_ms(mut self, ms: u32) -> Self {
        self.config.hangover_ms = ms;
        self
    }

    pub fn sample_rate(mut self, hz: u32) -> Self {
        self.config.sample_rate_hz = hz;
        self
    }

    pub fn frame_duration_ms(mut self, ms: u32) -> Self {
        self.config.frame_duration_ms = ms;
        self
    }

    pub fn classifier(mut self, classifier: Box<dyn FrameClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn build(self) -> Result<VadDetector, ConfigError> {
        match self.classifier {
            Some(classifier) => VadDetector::with_classifier(self.config, classifier),
            None => VadDetector::new(self.config),
        }
    }
}

impl Default for VadDetectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
