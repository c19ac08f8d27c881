use std::collections::VecDeque;

use crate::{config::ColdStart, BandEnergy, EngineConfig};

/// Mutable beat-tracking state threaded through the engine tick by tick.
///
/// `history` is a strict FIFO of beat timestamps (milliseconds) capped at the
/// configured capacity; the oldest entry is evicted on overflow. The recorded
/// `last_beat_ms` only ever moves forward because timestamps are supplied by
/// a monotonic clock.
#[derive(Debug, Clone)]
pub struct BeatState {
    last_beat_ms: Option<f64>,
    history: VecDeque<f64>,
    capacity: usize,
}

impl BeatState {
    pub fn new(config: &EngineConfig) -> Self {
        let last_beat_ms = match config.cold_start {
            ColdStart::FireImmediately => None,
            ColdStart::HoldRefractory => Some(0.0),
        };
        Self {
            last_beat_ms,
            history: VecDeque::with_capacity(config.beat_history_capacity),
            capacity: config.beat_history_capacity,
        }
    }

    /// Timestamp of the most recent detected beat, if any.
    pub fn last_beat_ms(&self) -> Option<f64> {
        self.last_beat_ms
    }

    /// Recorded beat timestamps, oldest first.
    pub fn history(&self) -> &VecDeque<f64> {
        &self.history
    }

    fn record(&mut self, now_ms: f64) {
        self.last_beat_ms = Some(now_ms);
        self.history.push_back(now_ms);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
    }

    fn elapsed_since_beat(&self, now_ms: f64) -> f64 {
        match self.last_beat_ms {
            Some(last) => now_ms - last,
            None => f64::INFINITY,
        }
    }
}

/// Runs both beat heuristics against the current frame and updates `state`
/// when either fires.
///
/// The two heuristics are independent and OR-combined; each applies its own
/// refractory window to the time elapsed since the last recorded beat.
/// `prev_rms` must be the smoothed loudness from *before* this tick's update.
pub fn detect_beat(
    bands: &BandEnergy,
    rms: f32,
    prev_rms: f32,
    now_ms: f64,
    state: &mut BeatState,
    config: &EngineConfig,
) -> bool {
    let elapsed = state.elapsed_since_beat(now_ms);

    let beat = bass_dominant(bands, elapsed, config) || loudness_jump(rms, prev_rms, elapsed, config);
    if beat {
        state.record(now_ms);
    }
    beat
}

/// A frame whose bass energy is both strong and the dominant band.
fn bass_dominant(bands: &BandEnergy, elapsed_ms: f64, config: &EngineConfig) -> bool {
    bands.bass > config.bass_threshold
        && bands.bass >= bands.mid
        && bands.bass >= bands.treble
        && elapsed_ms > config.bass_refractory_ms
}

/// A sudden jump in smoothed loudness above the audibility floor.
fn loudness_jump(rms: f32, prev_rms: f32, elapsed_ms: f64, config: &EngineConfig) -> bool {
    rms > prev_rms * config.rms_jump_ratio && rms > config.rms_floor && elapsed_ms > config.rms_refractory_ms
}
