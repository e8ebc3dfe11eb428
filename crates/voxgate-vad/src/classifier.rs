use crate::energy::EnergyCalculator;
use crate::error::ConfigError;

/// Per-frame voiced/unvoiced decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClass {
    Voiced,
    Unvoiced,
}

/// A trait for per-frame voice classifiers.
///
/// This is the seam for swapping the reference energy classifier for a
/// model-based one without touching the detector's state machine. The
/// classifier must tolerate empty and wrong-length frames; it may never
/// fail, only classify.
pub trait FrameClassifier: Send {
    fn classify(&mut self, frame: &[i16]) -> FrameClass;

    /// Normalized RMS of the last classified frame, for metrics.
    fn last_rms(&self) -> f32 {
        0.0
    }
}

/// RMS thresholds per aggressiveness level, normalized to full scale.
/// Level 2 is the 0.01 reference threshold; higher levels clip quiet
/// speech, lower levels admit it.
const RMS_THRESHOLDS: [f32; 4] = [0.004, 0.007, 0.010, 0.016];

/// Reference classifier: frame RMS strictly above a fixed threshold.
///
/// A frame exactly at the threshold is unvoiced. Empty frames have zero
/// RMS and are always unvoiced.
pub struct EnergyClassifier {
    threshold: f32,
    energy: EnergyCalculator,
    last_rms: f32,
}

impl EnergyClassifier {
    pub fn from_aggressiveness(aggressiveness: u8) -> Result<Self, ConfigError> {
        let threshold = RMS_THRESHOLDS
            .get(aggressiveness as usize)
            .copied()
            .ok_or(ConfigError::InvalidAggressiveness(aggressiveness))?;
        Ok(Self {
            threshold,
            energy: EnergyCalculator::new(),
            last_rms: 0.0,
        })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl FrameClassifier for EnergyClassifier {
    fn classify(&mut self, frame: &[i16]) -> FrameClass {
        let rms = self.energy.calculate_rms(frame);
        self.last_rms = rms;
        if rms > self.threshold {
            FrameClass::Voiced
        } else {
            FrameClass::Unvoiced
        }
    }

    fn last_rms(&self) -> f32 {
        self.last_rms
    }
}
