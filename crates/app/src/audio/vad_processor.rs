use tokio::sync::broadcast;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use voxgate_vad::{ConfigError, VadConfig, VadDetector};

#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub data: Vec<i16>,
    pub timestamp_ms: u64,
}

/// Speaking-state transitions derived from detector snapshots. The core
/// detector only returns state; this is where it becomes an event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Started {
        timestamp_ms: u64,
        /// Audio buffered before the onset, already drained from the
        /// detector's pre-roll window.
        lead_in: Vec<i16>,
    },
    Ended {
        timestamp_ms: u64,
        duration_ms: u64,
    },
}

/// Drives one detector from a broadcast audio feed and forwards speech
/// events downstream. One processor per audio stream; the detector is
/// owned by the task and never shared.
pub struct VadProcessor {
    detector: VadDetector,
    audio_rx: broadcast::Receiver<AudioFrame>,
    event_tx: Sender<SpeechEvent>,
    frames_processed: u64,
    events_generated: u64,
}

impl VadProcessor {
    pub fn new(
        config: VadConfig,
        audio_rx: broadcast::Receiver<AudioFrame>,
        event_tx: Sender<SpeechEvent>,
    ) -> Result<Self, ConfigError> {
        let detector = VadDetector::new(config)?;

        Ok(Self {
            detector,
            audio_rx,
            event_tx,
            frames_processed: 0,
            events_generated: 0,
        })
    }

    pub async fn run(mut self) {
        info!("VAD processor task started");

        loop {
            match self.audio_rx.recv().await {
                Ok(frame) => self.process_frame(frame).await,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("VAD processor lagged, skipped {} frames", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }

        info!(
            "VAD processor task shutting down. Frames processed: {}, Events generated: {}",
            self.frames_processed, self.events_generated
        );
    }

    async fn process_frame(&mut self, frame: AudioFrame) {
        let was_speaking = self.detector.state().is_speaking;
        let state = self.detector.process_frame(&frame.data, frame.timestamp_ms);
        self.frames_processed += 1;

        let event = match (was_speaking, state.is_speaking) {
            (false, true) => Some(SpeechEvent::Started {
                timestamp_ms: state.speech_start_ms.unwrap_or(frame.timestamp_ms),
                lead_in: self.detector.take_pre_roll(),
            }),
            (true, false) => {
                let end = state.speech_end_ms.unwrap_or(frame.timestamp_ms);
                let duration_ms = end.saturating_sub(state.speech_start_ms.unwrap_or(end));
                Some(SpeechEvent::Ended {
                    timestamp_ms: end,
                    duration_ms,
                })
            }
            _ => None,
        };

        if let Some(event) = event {
            self.events_generated += 1;
            if let Err(e) = self.event_tx.send(event).await {
                error!("Failed to send speech event: {}", e);
            }
        }

        if self.frames_processed % 1000 == 0 {
            debug!(
                "VAD processor: {} frames processed, {} events generated, speaking: {}",
                self.frames_processed, self.events_generated, state.is_speaking
            );
        }
    }

    pub fn spawn(
        config: VadConfig,
        audio_rx: broadcast::Receiver<AudioFrame>,
        event_tx: Sender<SpeechEvent>,
    ) -> Result<JoinHandle<()>, ConfigError> {
        let processor = VadProcessor::new(config, audio_rx, event_tx)?;

        let handle = tokio::spawn(async move {
            processor.run().await;
        });

        Ok(handle)
    }
}
