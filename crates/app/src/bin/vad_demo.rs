use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::info;
use voxgate_app::audio::{AudioFrame, SpeechEvent, VadProcessor};
use voxgate_vad::VadConfig;

/// Feeds a synthetic silence/speech pattern through the VAD processor and
/// logs the detected segments. Usage: `vad_demo [aggressiveness]`.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut config = VadConfig::default();
    if let Some(level) = std::env::args().nth(1) {
        config.aggressiveness = level.parse()?;
        info!("Using aggressiveness level {}", config.aggressiveness);
    }

    info!(
        "Starting VAD demo: {} Hz, {}ms frames, {}ms hangover, {}ms pre-roll",
        config.sample_rate_hz, config.frame_duration_ms, config.hangover_ms, config.pre_roll_ms
    );

    let (audio_tx, audio_rx) = broadcast::channel::<AudioFrame>(256);
    let (event_tx, mut event_rx) = mpsc::channel::<SpeechEvent>(64);

    let vad_handle = VadProcessor::spawn(config, audio_rx, event_tx)?;

    let generator_handle = tokio::spawn(async move {
        generate_pattern(audio_tx, config);
    });

    while let Some(event) = event_rx.recv().await {
        match event {
            SpeechEvent::Started {
                timestamp_ms,
                lead_in,
            } => {
                info!(
                    "Speech started at {}ms ({} lead-in samples)",
                    timestamp_ms,
                    lead_in.len()
                );
            }
            SpeechEvent::Ended {
                timestamp_ms,
                duration_ms,
            } => {
                info!(
                    "Speech ended at {}ms (duration {}ms)",
                    timestamp_ms, duration_ms
                );
            }
        }
    }

    generator_handle.await?;
    vad_handle.await?;

    info!("Demo completed");
    Ok(())
}

/// Pattern: 500ms silence, 800ms of 440Hz tone, a 200ms pause bridged by
/// the hangover, a 100ms blip, then 600ms silence to let the hangover run
/// out. Expect exactly one Started/Ended pair.
fn generate_pattern(tx: broadcast::Sender<AudioFrame>, config: VadConfig) {
    let frame_ms = config.frame_duration_ms as u64;
    let mut timestamp_ms = 0u64;

    let mut send = |voiced: bool, duration_ms: u64, tx: &broadcast::Sender<AudioFrame>| {
        let frames = duration_ms / frame_ms;
        for _ in 0..frames {
            let data = if voiced {
                sine_frame(&config, 440.0, 0.5)
            } else {
                vec![0i16; config.frame_size_samples()]
            };
            if tx.send(AudioFrame { data, timestamp_ms }).is_err() {
                return;
            }
            timestamp_ms += frame_ms;
        }
    };

    send(false, 500, &tx);
    send(true, 800, &tx);
    send(false, 200, &tx);
    send(true, 100, &tx);
    send(false, 600, &tx);

    info!("Generated {}ms of synthetic audio", timestamp_ms);
}

fn sine_frame(config: &VadConfig, freq_hz: f32, amplitude: f32) -> Vec<i16> {
    (0..config.frame_size_samples())
        .map(|i| {
            let phase =
                2.0 * std::f32::consts::PI * freq_hz * i as f32 / config.sample_rate_hz as f32;
            (phase.sin() * amplitude * 32767.0) as i16
        })
        .collect()
}
