use serde::{Deserialize, Serialize};

use crate::{
    bands::{self, BandEnergy},
    beat::{self, BeatState},
    config::{EngineConfig, ResetPolicy, Resolution},
    loudness::LoudnessTracker,
    tempo, BeatscopeError, Result,
};

/// Feature set emitted once per processing tick; the only value that crosses
/// the engine's output boundary. Immutable by convention: the consumer may
/// retain it for delta comparisons but must not feed it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisFrame {
    pub spectrum: Vec<f32>,
    pub bass: f32,
    pub mid: f32,
    pub treble: f32,
    pub rms: f32,
    pub bpm: u32,
    pub beat: bool,
}

/// Per-session streaming analyser: one frequency snapshot in, one
/// [`AnalysisFrame`] out.
///
/// The engine owns every piece of cross-tick state (loudness average, beat
/// history, held tempo) and mutates it only inside [`AnalysisEngine::tick`],
/// which runs synchronously to completion. It is a plain owned value: hosts
/// can instantiate as many independent sessions as they like, and dropping
/// one releases everything. Ticks must be strictly sequential; the engine is
/// driven by the host's render loop and never schedules work of its own.
#[derive(Debug)]
pub struct AnalysisEngine {
    config: EngineConfig,
    loudness: LoudnessTracker,
    beat_state: BeatState,
    previous_bpm: u32,
}

impl AnalysisEngine {
    /// Creates an engine with the default tunables.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default()).expect("default configuration is valid")
    }

    /// Creates an engine from an explicit, validated configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let loudness = LoudnessTracker::new(config.smoothing, config.magnitude_full_scale);
        let beat_state = BeatState::new(&config);
        let previous_bpm = config.fallback_bpm;
        Ok(Self {
            config,
            loudness,
            beat_state,
            previous_bpm,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Processes one snapshot and returns the frame for this tick.
    ///
    /// `snapshot` holds linearly spaced magnitude bins from 0 Hz up to
    /// `nyquist_hz`; `now_ms` comes from the host's monotonic clock. The
    /// per-tick sequence is fixed: band energies, loudness update, beat
    /// detection (against the pre-update loudness), tempo estimate, frame
    /// assembly. Only a snapshot of the wrong length errors; degenerate
    /// audio degrades to neutral output.
    pub fn tick(&mut self, snapshot: &[f32], nyquist_hz: f32, now_ms: f64) -> Result<AnalysisFrame> {
        let expected = self.config.resolution.bins();
        if snapshot.len() != expected {
            return Err(BeatscopeError::SnapshotLength {
                expected,
                actual: snapshot.len(),
            });
        }

        let energy = bands::extract_band_energy(snapshot, nyquist_hz, &self.config);

        let prev_rms = self.loudness.smoothed();
        let rms = self.loudness.update(snapshot);

        let beat = beat::detect_beat(&energy, rms, prev_rms, now_ms, &mut self.beat_state, &self.config);

        let bpm = tempo::estimate_bpm(
            self.beat_state.history(),
            self.previous_bpm,
            self.config.min_tempo_samples,
        );
        self.previous_bpm = bpm;

        Ok(AnalysisFrame {
            spectrum: snapshot.to_vec(),
            bass: energy.bass,
            mid: energy.mid,
            treble: energy.treble,
            rms,
            bpm,
            beat,
        })
    }

    /// Switches the expected snapshot resolution mid-session.
    ///
    /// The configured [`ResetPolicy`] decides whether accumulated analysis
    /// state survives the switch; the default clears it so statistics from
    /// different bin resolutions are never mixed.
    pub fn reconfigure(&mut self, resolution: Resolution) {
        self.config.resolution = resolution;
        if self.config.reset_policy == ResetPolicy::ResetAnalysis {
            self.reset();
        }
    }

    /// Clears all accumulated state while preserving the configuration.
    pub fn reset(&mut self) {
        self.loudness.reset();
        self.beat_state = BeatState::new(&self.config);
        self.previous_bpm = self.config.fallback_bpm;
    }

    /// Band energies for a snapshot without advancing any state. Useful for
    /// hosts that want a preview while paused.
    pub fn peek_bands(&self, snapshot: &[f32], nyquist_hz: f32) -> BandEnergy {
        bands::extract_band_energy(snapshot, nyquist_hz, &self.config)
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColdStart;

    const NYQUIST_HZ: f32 = 3200.0;

    fn engine_128() -> AnalysisEngine {
        let config = EngineConfig {
            resolution: Resolution::Bins128,
            ..EngineConfig::default()
        };
        AnalysisEngine::with_config(config).unwrap()
    }

    fn bass_heavy_snapshot() -> Vec<f32> {
        let mut snapshot = vec![0.0; 128];
        for bin in snapshot.iter_mut().take(10) {
            *bin = 250.0;
        }
        snapshot
    }

    #[test]
    fn rejects_snapshot_length_mismatch() {
        let mut engine = engine_128();
        let err = engine.tick(&[0.0; 64], NYQUIST_HZ, 0.0).unwrap_err();
        assert!(matches!(
            err,
            BeatscopeError::SnapshotLength {
                expected: 128,
                actual: 64
            }
        ));
    }

    #[test]
    fn end_to_end_beat_and_refractory() {
        let mut engine = engine_128();
        let snapshot = bass_heavy_snapshot();

        let first = engine.tick(&snapshot, NYQUIST_HZ, 1000.0).unwrap();
        assert!((first.bass - 250.0 / 255.0).abs() < 1e-4);
        assert!(first.mid.abs() < 1e-6);
        assert!(first.treble.abs() < 1e-6);
        assert!(first.beat, "cold start frame should beat");

        let second = engine.tick(&snapshot, NYQUIST_HZ, 1100.0).unwrap();
        assert!(!second.beat, "100 ms later is inside the refractory window");

        let third = engine.tick(&snapshot, NYQUIST_HZ, 1250.0).unwrap();
        assert!(third.beat, "250 ms after the first beat fires again");
    }

    #[test]
    fn all_outputs_stay_within_unit_range() {
        let mut engine = engine_128();
        let snapshots = [vec![0.0; 128], vec![255.0; 128], bass_heavy_snapshot()];

        for (tick, snapshot) in snapshots.iter().enumerate() {
            let frame = engine.tick(snapshot, NYQUIST_HZ, tick as f64 * 16.0).unwrap();
            for value in [frame.bass, frame.mid, frame.treble, frame.rms] {
                assert!((0.0..=1.0).contains(&value));
            }
        }
    }

    #[test]
    fn bpm_holds_the_fallback_until_enough_beats_accumulate() {
        let mut engine = engine_128();
        let snapshot = bass_heavy_snapshot();

        let mut last_frame = None;
        for tick in 0..4 {
            let frame = engine.tick(&snapshot, NYQUIST_HZ, tick as f64 * 500.0).unwrap();
            assert_eq!(frame.bpm, 120);
            last_frame = Some(frame);
        }
        assert!(last_frame.unwrap().beat);

        // The fifth beat completes the sample floor: 500 ms intervals.
        let frame = engine.tick(&snapshot, NYQUIST_HZ, 2000.0).unwrap();
        assert!(frame.beat);
        assert_eq!(frame.bpm, 120);

        // Speed up to 400 ms intervals and watch the estimate move.
        let mut now = 2000.0;
        let mut bpm = frame.bpm;
        for _ in 0..20 {
            now += 400.0;
            bpm = engine.tick(&snapshot, NYQUIST_HZ, now).unwrap().bpm;
        }
        assert_eq!(bpm, 150);
    }

    #[test]
    fn reconfigure_resets_analysis_state_by_default() {
        let mut engine = engine_128();
        let snapshot = bass_heavy_snapshot();
        for tick in 0..6 {
            engine.tick(&snapshot, NYQUIST_HZ, tick as f64 * 300.0).unwrap();
        }

        engine.reconfigure(Resolution::Bins256);

        let quiet = vec![0.0; 256];
        let frame = engine.tick(&quiet, NYQUIST_HZ, 10_000.0).unwrap();
        assert_eq!(frame.bpm, 120, "held tempo reverts to the fallback");
        assert_eq!(frame.rms, 0.0, "loudness average starts over");
        assert!(!frame.beat);
    }

    #[test]
    fn reconfigure_can_preserve_state() {
        let config = EngineConfig {
            resolution: Resolution::Bins128,
            reset_policy: ResetPolicy::Preserve,
            ..EngineConfig::default()
        };
        let mut engine = AnalysisEngine::with_config(config).unwrap();
        let snapshot = bass_heavy_snapshot();
        for tick in 0..6 {
            engine.tick(&snapshot, NYQUIST_HZ, tick as f64 * 400.0).unwrap();
        }

        engine.reconfigure(Resolution::Bins256);

        let quiet = vec![0.0; 256];
        let frame = engine.tick(&quiet, NYQUIST_HZ, 10_000.0).unwrap();
        assert_eq!(frame.bpm, 150, "400 ms intervals survive the switch");
    }

    #[test]
    fn hold_refractory_cold_start_is_honoured() {
        let config = EngineConfig {
            resolution: Resolution::Bins128,
            cold_start: ColdStart::HoldRefractory,
            ..EngineConfig::default()
        };
        let mut engine = AnalysisEngine::with_config(config).unwrap();
        let snapshot = bass_heavy_snapshot();

        let early = engine.tick(&snapshot, NYQUIST_HZ, 100.0).unwrap();
        assert!(!early.beat);
        let later = engine.tick(&snapshot, NYQUIST_HZ, 300.0).unwrap();
        assert!(later.beat);
    }
}
