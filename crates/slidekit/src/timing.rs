use crate::model::{Slide, SlideDuration, SlideKind, TimingConfig, VideoDuration};

/// Legal range for fixed durations, in seconds.
const MIN_FIXED_SECS: f64 = 0.5;
const MAX_FIXED_SECS: f64 = 999.0;

/// "auto" heuristic: 50 ms per weighted content character, bounded.
const AUTO_MS_PER_CHAR: u64 = 50;
const AUTO_FLOOR_MS: u64 = 3_000;
const AUTO_CEIL_MS: u64 = 30_000;

/// Default min/max overrides for "auto", in seconds, when none are given.
const AUTO_DEFAULT_MIN_SECS: f64 = 3.0;
const AUTO_DEFAULT_MAX_SECS: f64 = 30.0;

/// What the scheduler should do with the current slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDuration {
    /// Arm a single-shot timer for this many milliseconds.
    Millis(u64),
    /// No timer: advance when the host reports the video's `ended` event.
    UntilVideoEnd,
}

impl ResolvedDuration {
    pub fn as_millis(&self) -> Option<u64> {
        match self {
            ResolvedDuration::Millis(ms) => Some(*ms),
            ResolvedDuration::UntilVideoEnd => None,
        }
    }
}

/// Resolve a slide's effective autoplay duration.
///
/// Source order: the slide's own timing, then the global default, then the
/// built-in default (5 s, immediate, pause on hover and interaction). Raw
/// configs are never mutated; clamping happens here, lazily.
pub fn resolve(slide: &Slide, global: Option<&TimingConfig>) -> ResolvedDuration {
    if slide.kind == SlideKind::Video {
        if let Some(video) = &slide.video {
            if video.duration == VideoDuration::Full {
                return ResolvedDuration::UntilVideoEnd;
            }
        }
    }

    let fallback;
    let timing = match slide.timing.as_ref().or(global) {
        Some(t) => t,
        None => {
            fallback = TimingConfig::default();
            &fallback
        }
    };

    match timing.duration {
        SlideDuration::Seconds(secs) => {
            let clamped = secs.clamp(MIN_FIXED_SECS, MAX_FIXED_SECS);
            ResolvedDuration::Millis(secs_to_millis(clamped))
        }
        SlideDuration::Auto(_) => {
            let estimate = slide.content_length_estimate() as u64;
            let raw = (estimate * AUTO_MS_PER_CHAR).clamp(AUTO_FLOOR_MS, AUTO_CEIL_MS);
            let floor = secs_to_millis(timing.min_duration.unwrap_or(AUTO_DEFAULT_MIN_SECS));
            let ceil = secs_to_millis(timing.max_duration.unwrap_or(AUTO_DEFAULT_MAX_SECS));
            if floor > ceil {
                // Contradictory overrides; the floor wins.
                return ResolvedDuration::Millis(floor);
            }
            ResolvedDuration::Millis(raw.clamp(floor, ceil))
        }
    }
}

fn secs_to_millis(secs: f64) -> u64 {
    (secs.max(0.0) * 1000.0).round() as u64
}
