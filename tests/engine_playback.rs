use fretsynth::{
    engine::{SingleVoice, VoiceState},
    io::{AudioSink, OfflineSink, SinkError},
    sequencing::{ArpeggioPattern, ChordShape, StrumDirection},
    Engine, EngineConfig, EngineError,
};

const SR: f32 = 8_000.0;

fn engine() -> Engine<OfflineSink> {
    let config = EngineConfig {
        seed: Some(2024),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(OfflineSink::new(SR), config).unwrap();
    engine.initialize().unwrap();
    engine
}

fn e_major() -> ChordShape {
    ChordShape::from_frets([0, 2, 2, 1, 0, 0])
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |max, s| max.max(s.abs()))
}

#[test]
fn e_major_strum_is_evenly_spaced() {
    let mut engine = engine();
    let playback = engine.play_chord(&e_major(), StrumDirection::Down).unwrap();

    assert_eq!(playback.notes.len(), 6);
    for (n, note) in playback.notes.iter().enumerate() {
        assert_eq!(note.string, n);
        let expected = 0.05 + n as f64 * 0.04;
        assert!((note.start_time - expected).abs() < 1e-9);
        assert_eq!(note.duration, Some(engine.note_duration()));
    }
    assert!((playback.duration() - 0.34).abs() < 1e-9);
    assert_eq!(engine.sink().scheduled_count(), 6);
}

#[test]
fn muted_strings_are_not_played() {
    let mut engine = engine();
    let playback = engine
        .play_chord(&ChordShape::from_frets([-1, -1, 2, 2, 2, 0]), StrumDirection::Up)
        .unwrap();

    let strings: Vec<usize> = playback.notes.iter().map(|n| n.string).collect();
    assert_eq!(strings, vec![5, 4, 3, 2]);
    assert!((playback.notes[3].start_time - (0.05 + 3.0 * 0.04)).abs() < 1e-9);
}

#[test]
fn down_up_strum_plays_both_passes() {
    let mut engine = engine();
    assert_eq!(engine.set_strum_style("down-up"), "down-up");

    let playback = engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
    assert_eq!(playback.notes.len(), 12);
    assert_eq!(playback.notes[5].string, 5);
    assert_eq!(playback.notes[6].string, 5);
    assert_eq!(playback.notes[11].string, 0);

    // second pass: base + 6 * 0.03 + 0.15
    assert!((playback.notes[6].start_time - (0.05 + 0.33)).abs() < 1e-9);
    assert!((playback.duration() - 0.61).abs() < 1e-9);
}

#[test]
fn arpeggio_resolves_durations() {
    let mut engine = engine();
    let pattern: ArpeggioPattern = "5:0:R 4:2:3 3:2:5~ 2:1:R".parse().unwrap();
    let playback = engine.play_arpeggio(&pattern, None).unwrap();

    let starts: Vec<f64> = playback.notes.iter().map(|n| n.start_time).collect();
    for (idx, start) in starts.iter().enumerate() {
        assert!((start - (0.05 + idx as f64 * 0.25)).abs() < 1e-9);
    }
    assert_eq!(playback.notes[0].duration, Some(engine.note_duration()));
    assert!((playback.notes[2].duration.unwrap() - 0.3).abs() < 1e-6);
    assert!((playback.duration() - 1.5).abs() < 1e-9);
}

#[test]
fn concurrent_requests_are_ignored_until_finished() {
    let mut engine = engine();
    let pattern: ArpeggioPattern = "0:0:R 1:2:5".parse().unwrap();

    let first = engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
    assert!(engine.play_chord(&e_major(), StrumDirection::Up).is_none());
    assert!(engine.play_arpeggio(&pattern, Some(90.0)).is_none());
    assert_eq!(engine.sink().scheduled_count(), 6);

    engine.sink_mut().render_seconds(0.2);
    assert!(engine.play_chord(&e_major(), StrumDirection::Down).is_none());

    engine.sink_mut().render_seconds(0.2);
    engine.poll();
    assert_eq!(engine.voice_state(first.voice.unwrap()), VoiceState::Idle);
    assert!(!engine.is_playing());
    assert!(engine.play_chord(&e_major(), StrumDirection::Down).is_some());
}

#[test]
fn voice_moves_from_scheduled_to_playing() {
    let mut engine = engine();
    let voice = engine
        .play_chord(&e_major(), StrumDirection::Down)
        .unwrap()
        .voice
        .unwrap();

    assert_eq!(engine.voice_state(voice), VoiceState::Scheduled);
    engine.sink_mut().render_seconds(0.1);
    assert_eq!(engine.voice_state(voice), VoiceState::Playing);
}

#[test]
fn stop_mutes_then_restores() {
    let mut engine = engine();
    engine.play_chord(&e_major(), StrumDirection::Down).unwrap();

    let before = engine.sink_mut().render_seconds(0.2);
    assert!(peak(&before) > 0.01);

    engine.stop();
    assert_eq!(engine.sink().master_gain(), 0.0);
    assert_eq!(engine.pending_tasks(), 0);
    assert!(!engine.is_playing());

    let muted = engine.sink_mut().render_seconds(0.09);
    assert!(muted.iter().all(|&s| s == 0.0));

    // Notes were never retracted, so they come back with the gain
    let restored = engine.sink_mut().render_seconds(0.1);
    assert!(peak(&restored) > 0.01);
    assert_eq!(engine.sink().master_gain(), engine.volume());
}

#[test]
fn stop_cancels_the_pending_release() {
    let mut engine = engine();
    engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
    engine.sink_mut().render_seconds(0.2);
    engine.stop();

    let second = engine.play_chord(&e_major(), StrumDirection::Down).unwrap();

    // Past the first strum's end but before the second's
    engine.sink_mut().render_seconds(0.2);
    engine.poll();
    assert!(engine.is_playing());
    assert_ne!(engine.voice_state(second.voice.unwrap()), VoiceState::Idle);
}

#[test]
fn distortion_curve_is_reused_for_the_same_amount() {
    let mut engine = engine();

    engine.set_distortion(50.0);
    engine.set_distortion(50.0);
    assert_eq!(engine.curve_cache().generations(), 1);

    engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
    assert_eq!(engine.curve_cache().generations(), 1);

    engine.set_distortion(51.0);
    assert_eq!(engine.curve_cache().generations(), 2);

    engine.set_distortion(50.0);
    assert_eq!(engine.curve_cache().generations(), 3);

    engine.set_distortion(0.0);
    assert_eq!(engine.curve_cache().cached_amount(), Some(50.0));
}

#[test]
fn suspended_output_is_silent() {
    let config = EngineConfig {
        seed: Some(5),
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(OfflineSink::new(SR), config).unwrap();

    assert!(engine.play_chord(&e_major(), StrumDirection::Down).is_some());
    let silent = engine.sink_mut().render_seconds(1.0);
    assert!(silent.iter().all(|&s| s == 0.0));
    assert_eq!(engine.sink().current_time(), 0.0);

    engine.initialize().unwrap();
    let audible = engine.sink_mut().render_seconds(1.0);
    assert!(peak(&audible) > 0.01);
    assert!(audible.iter().all(|s| s.is_finite()));
}

#[test]
fn unavailable_output_fails_initialization() {
    let mut engine = Engine::new(OfflineSink::unavailable(SR), EngineConfig::default()).unwrap();

    assert_eq!(
        engine.initialize(),
        Err(EngineError::Initialization(SinkError::Unavailable))
    );
    assert!(!engine.is_initialized());
    assert_eq!(
        engine.resume(),
        Err(EngineError::Initialization(SinkError::Unavailable))
    );
}

#[test]
fn seeded_engines_render_identically() {
    let render = || {
        let mut engine = engine();
        engine.set_strum_style("natural");
        engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
        engine.sink_mut().render_seconds(0.5)
    };

    assert_eq!(render(), render());
}

#[test]
fn volume_scales_output() {
    let render = |volume: f32| {
        let mut engine = engine();
        engine.set_volume(volume);
        engine.play_single_note(0, 3).unwrap();
        peak(&engine.sink_mut().render_seconds(0.5))
    };

    let loud = render(1.0);
    let quiet = render(0.5);
    assert!(loud > 0.0);
    assert!((quiet - loud * 0.5).abs() < 1e-4);
}

#[test]
fn guard_can_be_swapped_back_to_single_voice() {
    let mut engine = engine().with_guard(Box::new(SingleVoice::new()));
    assert!(engine.play_chord(&e_major(), StrumDirection::Down).is_some());
    assert!(engine.play_chord(&e_major(), StrumDirection::Down).is_none());
}

#[test]
fn dispose_returns_a_closed_sink() {
    let mut engine = engine();
    engine.play_chord(&e_major(), StrumDirection::Down).unwrap();
    let mut sink = engine.dispose();

    assert!(sink.resume().is_err());
    assert!(sink.render(100).iter().all(|&s| s == 0.0));
}
