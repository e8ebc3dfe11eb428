//! Comprehensive VAD detector tests
//!
//! Tests cover:
//! - Initial / reset state guarantees
//! - Hangover bounds and hysteresis invariants
//! - Snapshot semantics (idempotence, caller isolation)
//! - Onset, hangover hold/expiry, hangover cancellation scenarios
//! - Quiet-signal and empty-frame robustness
//! - Pre-roll lead-in delivery

use rand::Rng;
use voxgate_vad::{DetectionState, VadConfig, VadDetector};

const FRAME_MS: u64 = 20;

fn scenario_config() -> VadConfig {
    VadConfig {
        aggressiveness: 2,
        pre_roll_ms: 200,
        hangover_ms: 300,
        sample_rate_hz: 16_000,
        frame_duration_ms: FRAME_MS as u32,
    }
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

fn voiced_frame(config: &VadConfig) -> Vec<i16> {
    sine_frame(config, 440.0, 0.5)
}

fn silent_frame(config: &VadConfig) -> Vec<i16> {
    vec![0i16; config.frame_size_samples()]
}

// ─── Initial / Reset State ───────────────────────────────────────────

#[test]
fn fresh_detector_reports_all_silence() {
    let detector = VadDetector::new(scenario_config()).unwrap();
    let state = detector.state();
    assert!(!state.is_speaking);
    assert_eq!(state.speech_start_ms, None);
    assert_eq!(state.speech_end_ms, None);
    assert_eq!(state.hangover_remaining_ms, 0);
}

#[test]
fn reset_is_indistinguishable_from_fresh() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    detector.process_frame(&silent_frame(&config), 0);
    detector.process_frame(&voiced_frame(&config), 20);
    detector.process_frame(&silent_frame(&config), 40);

    detector.reset();

    let fresh = VadDetector::new(config).unwrap();
    assert_eq!(detector.state(), fresh.state());
    assert_eq!(detector.metrics(), fresh.metrics());
}

// ─── Invariants Over Arbitrary Sequences ─────────────────────────────

#[test]
fn hangover_stays_within_configured_bound() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();
    let mut rng = rand::thread_rng();

    for i in 0u64..500 {
        let frame = if rng.gen_bool(0.5) {
            voiced_frame(&config)
        } else {
            silent_frame(&config)
        };
        let state = detector.process_frame(&frame, i * FRAME_MS);
        assert!(state.hangover_remaining_ms <= config.hangover_ms);
    }
}

#[test]
fn speaking_whenever_hangover_is_running() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();
    let mut rng = rand::thread_rng();

    for i in 0u64..500 {
        let frame = if rng.gen_bool(0.3) {
            voiced_frame(&config)
        } else {
            silent_frame(&config)
        };
        let state = detector.process_frame(&frame, i * FRAME_MS);
        if state.hangover_remaining_ms > 0 {
            assert!(state.is_speaking, "hysteresis broken at frame {}", i);
        }
    }
}

// ─── Snapshot Semantics ──────────────────────────────────────────────

#[test]
fn state_is_idempotent_without_processing() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();
    detector.process_frame(&voiced_frame(&config), 0);

    assert_eq!(detector.state(), detector.state());
}

#[test]
fn mutating_a_snapshot_does_not_touch_the_detector() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    let mut snapshot = detector.process_frame(&voiced_frame(&config), 0);
    snapshot.is_speaking = false;
    snapshot.speech_start_ms = Some(999);
    snapshot.hangover_remaining_ms = 42;

    let state = detector.state();
    assert!(state.is_speaking);
    assert_eq!(state.speech_start_ms, Some(0));
    assert_eq!(state.hangover_remaining_ms, 0);

    // And processing continues from the real state, not the mangled copy.
    let next = detector.process_frame(&silent_frame(&config), 20);
    assert!(next.is_speaking);
    assert_eq!(next.hangover_remaining_ms, 280);
}

// ─── Scenario A: Onset ───────────────────────────────────────────────

#[test]
fn onset_on_first_voiced_frame() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    let state = detector.process_frame(&voiced_frame(&config), 0);
    assert!(state.is_speaking);
    assert_eq!(state.speech_start_ms, Some(0));
    assert_eq!(state.hangover_remaining_ms, 0);
}

// ─── Scenario B: Hangover Hold Then Expiry ───────────────────────────

#[test]
fn hangover_holds_through_silence_then_expires() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    detector.process_frame(&voiced_frame(&config), 0);

    let state = detector.process_frame(&silent_frame(&config), 20);
    assert!(state.is_speaking);
    assert_eq!(state.hangover_remaining_ms, 280);

    // ceil(300/20) = 15 silent frames in total; the last lands at t=300.
    for i in 2u64..=14 {
        let state = detector.process_frame(&silent_frame(&config), i * FRAME_MS);
        assert!(state.is_speaking, "cut off early at frame {}", i);
    }

    let state = detector.process_frame(&silent_frame(&config), 300);
    assert!(!state.is_speaking);
    assert_eq!(state.speech_end_ms, Some(300));
    assert_eq!(state.hangover_remaining_ms, 0);
}

// ─── Scenario C: Hangover Cancellation ───────────────────────────────

#[test]
fn voiced_frame_cancels_hangover_completely() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    detector.process_frame(&voiced_frame(&config), 0);
    let state = detector.process_frame(&silent_frame(&config), 20);
    assert_eq!(state.hangover_remaining_ms, 280);

    let state = detector.process_frame(&voiced_frame(&config), 40);
    assert!(state.is_speaking);
    assert_eq!(state.hangover_remaining_ms, 0);

    // The next silence run restarts from the full hangover, not from 280.
    let state = detector.process_frame(&silent_frame(&config), 60);
    assert_eq!(state.hangover_remaining_ms, 280);
}

// ─── Scenario D: Quiet Signal Stays Silence ──────────────────────────

#[test]
fn sub_threshold_signal_never_starts_speech() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    let quiet = sine_frame(&config, 440.0, 0.001);
    for i in 0u64..50 {
        let state = detector.process_frame(&quiet, i * FRAME_MS);
        assert!(!state.is_speaking);
        assert_eq!(state.speech_start_ms, None);
    }
}

// ─── Scenario E: Empty Frame Robustness ──────────────────────────────

#[test]
fn empty_frame_on_fresh_detector_is_harmless() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    let state = detector.process_frame(&[], 0);
    assert!(!state.is_speaking);
    assert_eq!(detector.state(), state);
}

#[test]
fn wrong_length_frames_are_processed_without_error() {
    let config = scenario_config();
    let mut detector = VadDetector::new(config).unwrap();

    // Half a frame of loud sine still classifies on its contents.
    let half: Vec<i16> = voiced_frame(&config)
        .into_iter()
        .take(config.frame_size_samples() / 2)
        .collect();
    let state = detector.process_frame(&half, 0);
    assert!(state.is_speaking);

    let state = detector.process_frame(&[0i16; 7], 20);
    assert!(state.is_speaking);
    assert_eq!(state.hangover_remaining_ms, 280);
}

// ─── Hangover Length Comparison ──────────────────────────────────────

fn frames_until_speech_end(hangover_ms: u32) -> u64 {
    let config = VadConfig {
        hangover_ms,
        ..scenario_config()
    };
    let mut detector = VadDetector::new(config).unwrap();
    detector.process_frame(&voiced_frame(&config), 0);

    let mut frames = 0u64;
    loop {
        frames += 1;
        let state = detector.process_frame(&silent_frame(&config), frames * FRAME_MS);
        if !state.is_speaking {
            return frames;
        }
        assert!(frames < 100, "speech never ended");
    }
}

#[test]
fn shorter_hangover_ends_speech_sooner() {
    let short = frames_until_speech_end(100);
    let long = frames_until_speech_end(300);

    assert_eq!(short, 5); // ceil(100/20)
    assert_eq!(long, 15); // ceil(300/20)
    assert!(short < long);
}

// ─── Pre-Roll Delivery ───────────────────────────────────────────────

#[test]
fn onset_delivers_the_buffered_lead_in() {
    let config = scenario_config(); // 200ms pre-roll = 10 frames
    let mut detector = VadDetector::new(config).unwrap();

    let quiet = sine_frame(&config, 440.0, 0.001);
    for i in 0u64..20 {
        detector.process_frame(&quiet, i * FRAME_MS);
    }
    let state = detector.process_frame(&voiced_frame(&config), 400);
    assert!(state.is_speaking);

    let lead_in = detector.take_pre_roll();
    assert_eq!(lead_in.len(), config.pre_roll_samples());
    assert_eq!(&lead_in[..config.frame_size_samples()], &quiet[..]);
}

#[test]
fn initial_state_equals_default_detection_state() {
    let detector = VadDetector::new(scenario_config()).unwrap();
    assert_eq!(detector.state(), DetectionState::default());
}
