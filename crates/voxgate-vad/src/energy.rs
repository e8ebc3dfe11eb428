pub struct EnergyCalculator {
    epsilon: f32,
}

impl EnergyCalculator {
    pub fn new() -> Self {
        Self { epsilon: 1e-10 }
    }

    /// RMS of a frame normalized to full scale, so 1.0 corresponds to a
    /// constant i16::MIN signal. Empty frames have zero energy.
    pub fn calculate_rms(&self, frame: &[i16]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }

        let sum_squares: i64 = frame
            .iter()
            .map(|&sample| {
                let s = sample as i64;
                s * s
            })
            .sum();

        let mean_square = sum_squares as f64 / frame.len() as f64;
        (mean_square.sqrt() / 32768.0) as f32
    }

    pub fn rms_to_dbfs(&self, rms: f32) -> f32 {
        if rms <= self.epsilon {
            return -100.0;
        }
        20.0 * rms.log10()
    }

    pub fn calculate_dbfs(&self, frame: &[i16]) -> f32 {
        let rms = self.calculate_rms(frame);
        self.rms_to_dbfs(rms)
    }
}

impl Default for EnergyCalculator {
    fn default() -> Self {
        Self::new()
    }
}
