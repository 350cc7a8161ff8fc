use std::time::{Duration, Instant};

use log::trace;
use serde::{Deserialize, Serialize};

/// What an input channel wants the engine to do. Channels never touch the
/// position themselves; they emit one of these and the engine funnels it
/// through the navigation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
    TogglePlay,
}

/// Tunable thresholds for wheel and touch handling. Serializable so hosts
/// can persist them with the rest of the playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Wheel deltas arriving within this window coalesce into one gesture.
    pub wheel_debounce_ms: u64,
    /// Accumulated |delta_y| needed before a wheel gesture navigates.
    pub wheel_threshold: f64,
    /// Displacement below this is still a tap (px).
    pub tap_slop_px: f64,
    /// A touch longer than this is not a tap (ms).
    pub tap_max_ms: u64,
    /// Two taps within this window make a double-tap (ms).
    pub double_tap_ms: u64,
    /// Dominant-axis displacement needed for a swipe (px).
    pub swipe_threshold_px: f64,
    /// Minimum implied velocity for a swipe (px/ms).
    pub swipe_min_velocity: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            wheel_debounce_ms: 300,
            wheel_threshold: 50.0,
            tap_slop_px: 10.0,
            tap_max_ms: 200,
            double_tap_ms: 300,
            swipe_threshold_px: 50.0,
            swipe_min_velocity: 0.3,
        }
    }
}

/// Coalesces rapid wheel ticks into a single navigation per gesture.
///
/// Deltas accumulate while events keep arriving inside the debounce window;
/// once the window elapses (observed via `flush` from the engine's tick) the
/// accumulated total either clears the threshold and fires, or is discarded.
#[derive(Debug)]
pub struct WheelTracker {
    accumulated: f64,
    window_start: Option<Instant>,
    debounce: Duration,
    threshold: f64,
}

impl WheelTracker {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            accumulated: 0.0,
            window_start: None,
            debounce: Duration::from_millis(config.wheel_debounce_ms),
            threshold: config.wheel_threshold,
        }
    }

    /// Feed one wheel event. If a previous window already elapsed, it is
    /// flushed first so the new event starts a fresh gesture.
    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) -> Option<NavCommand> {
        let flushed = match self.window_start {
            Some(start) if now.saturating_duration_since(start) >= self.debounce => {
                self.flush(now)
            }
            _ => None,
        };
        if self.window_start.is_none() {
            self.window_start = Some(now);
        }
        self.accumulated += delta_y;
        flushed
    }

    /// Poll for an elapsed window. Called from the engine's tick.
    pub fn flush(&mut self, now: Instant) -> Option<NavCommand> {
        let start = self.window_start?;
        if now.saturating_duration_since(start) < self.debounce {
            return None;
        }
        let total = self.accumulated;
        self.accumulated = 0.0;
        self.window_start = None;
        if total.abs() < self.threshold {
            return None;
        }
        trace!("wheel gesture: accumulated {total:.0}");
        Some(if total > 0.0 {
            NavCommand::Next
        } else {
            NavCommand::Prev
        })
    }
}

/// What a completed touch sequence turned out to be.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Tap,
    DoubleTap,
    SwipeNext,
    SwipePrev,
    /// Two simultaneous touch points; routed to the host's pinch callback
    /// and excluded from tap/swipe classification.
    Pinch,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    start_pos: (f64, f64),
    last_pos: (f64, f64),
    started: Instant,
    pinching: bool,
}

/// Classifies a touch sequence at release time, mirroring the pending /
/// confirmed split used for mouse drags: nothing is decided until the
/// finger lifts or a second finger lands.
#[derive(Debug)]
pub struct TouchTracker {
    active: Option<ActiveTouch>,
    last_tap: Option<Instant>,
    config: TouchThresholds,
}

#[derive(Debug, Clone, Copy)]
struct TouchThresholds {
    tap_slop_px: f64,
    tap_max: Duration,
    double_tap: Duration,
    swipe_threshold_px: f64,
    swipe_min_velocity: f64,
}

impl TouchTracker {
    pub fn new(config: &InteractionConfig) -> Self {
        Self {
            active: None,
            last_tap: None,
            config: TouchThresholds {
                tap_slop_px: config.tap_slop_px,
                tap_max: Duration::from_millis(config.tap_max_ms),
                double_tap: Duration::from_millis(config.double_tap_ms),
                swipe_threshold_px: config.swipe_threshold_px,
                swipe_min_velocity: config.swipe_min_velocity,
            },
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64, now: Instant) {
        match &mut self.active {
            // A second finger turns the whole sequence into a pinch.
            Some(touch) => touch.pinching = true,
            None => {
                self.active = Some(ActiveTouch {
                    start_pos: (x, y),
                    last_pos: (x, y),
                    started: now,
                    pinching: false,
                });
            }
        }
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) {
        if let Some(touch) = &mut self.active {
            touch.last_pos = (x, y);
        }
    }

    /// Classify on release. Returns the recognized gesture, if any.
    pub fn on_touch_end(&mut self, now: Instant) -> Option<Gesture> {
        let touch = self.active.take()?;
        if touch.pinching {
            self.last_tap = None;
            return Some(Gesture::Pinch);
        }

        let dx = touch.last_pos.0 - touch.start_pos.0;
        let dy = touch.last_pos.1 - touch.start_pos.1;
        let displacement = (dx * dx + dy * dy).sqrt();
        let elapsed = now.saturating_duration_since(touch.started);

        // Tap: barely moved, barely held.
        if displacement < self.config.tap_slop_px && elapsed < self.config.tap_max {
            let double = self
                .last_tap
                .is_some_and(|t| now.saturating_duration_since(t) <= self.config.double_tap);
            if double {
                self.last_tap = None;
                return Some(Gesture::DoubleTap);
            }
            self.last_tap = Some(now);
            return Some(Gesture::Tap);
        }
        self.last_tap = None;

        // Swipe: dominant-axis displacement plus enough velocity. Only
        // horizontal swipes navigate.
        let dominant = if dx.abs() >= dy.abs() { dx } else { dy };
        let elapsed_ms = (elapsed.as_millis() as f64).max(1.0);
        let velocity = dominant.abs() / elapsed_ms;
        if dx.abs() >= dy.abs()
            && dominant.abs() >= self.config.swipe_threshold_px
            && velocity >= self.config.swipe_min_velocity
        {
            trace!("swipe: dx {dx:.0} in {elapsed_ms:.0} ms");
            return Some(if dominant < 0.0 {
                Gesture::SwipeNext
            } else {
                Gesture::SwipePrev
            });
        }
        None
    }
}

/// Host-agnostic key set, mapped to commands the way the app layer maps
/// keys to actions. The engine does not read a keyboard; the host translates
/// its own key events into these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Right,
    Left,
    Space,
    Home,
    End,
    PageDown,
    PageUp,
}

pub fn key_command(key: Key) -> NavCommand {
    match key {
        Key::Right | Key::PageDown => NavCommand::Next,
        Key::Left | Key::PageUp => NavCommand::Prev,
        Key::Space => NavCommand::TogglePlay,
        Key::Home => NavCommand::First,
        Key::End => NavCommand::Last,
    }
}
