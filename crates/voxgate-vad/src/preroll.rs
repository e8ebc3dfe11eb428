use std::collections::VecDeque;

/// Sample-bounded FIFO holding the most recent lead-in audio.
///
/// While the detector sits in silence, every frame is pushed here and old
/// samples fall off the front, so the buffer always covers at most the
/// configured pre-roll window. On speech onset the detector drains it in
/// one call.
pub struct PreRollBuffer {
    samples: VecDeque<i16>,
    capacity: usize,
}

impl PreRollBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push_frame(&mut self, frame: &[i16]) {
        if self.capacity == 0 {
            return;
        }
        if frame.len() >= self.capacity {
            // Frame alone overflows the window; keep only its tail.
            self.samples.clear();
            self.samples
                .extend(frame[frame.len() - self.capacity..].iter().copied());
            return;
        }
        let overflow = (self.samples.len() + frame.len()).saturating_sub(self.capacity);
        self.samples.drain(..overflow);
        self.samples.extend(frame.iter().copied());
    }

    pub fn drain(&mut self) -> Vec<i16> {
        self.samples.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
