use std::time::{Duration, Instant};

use log::{debug, trace};

use crate::timing::ResolvedDuration;

/// Playback intent, separate from whether a deadline is currently armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// No autoplay.
    Idle,
    /// Autoplay running; a deadline (or a video-end wait) is armed.
    Playing,
    /// Autoplay intent retained but suspended by one or more pause reasons.
    Paused,
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    deadline: Instant,
    generation: u64,
}

/// Owns the single-shot autoplay deadline and the pause-reason counter.
///
/// Poll-driven: the host calls `tick(now)` from its event loop and advances
/// the presentation when it returns true. A generation token guards every
/// armed deadline; any cancel, pause, stop, or rearm bumps the generation,
/// so a deadline from before a state change can never fire late
/// (stale-timer advancement).
///
/// Pause is reference-counted, not boolean. Each independent reason (hover,
/// explicit user pause, interaction) contributes one `pause()` and one
/// `resume()`; playback only re-enters `Playing` when every reason has
/// cleared. `resume()` restarts the current slide's full duration — there is
/// no partial-elapsed bookkeeping, by contract.
#[derive(Debug)]
pub struct Scheduler {
    state: PlayState,
    pause_reasons: u32,
    armed: Option<Armed>,
    /// Set instead of a deadline when the current slide plays until its
    /// video ends.
    waiting_for_video: bool,
    generation: u64,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            state: PlayState::Idle,
            pause_reasons: 0,
            armed: None,
            waiting_for_video: false,
            generation: 0,
        }
    }

    pub fn state(&self) -> PlayState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn pause_reasons(&self) -> u32 {
        self.pause_reasons
    }

    /// True when the current slide waits for a video-end signal instead of a
    /// deadline.
    pub fn is_waiting_for_video(&self) -> bool {
        self.state == PlayState::Playing && self.waiting_for_video
    }

    /// Begin (or continue) autoplay and arm for the current slide.
    pub fn start(&mut self, now: Instant, duration: ResolvedDuration) {
        self.state = if self.pause_reasons > 0 {
            PlayState::Paused
        } else {
            PlayState::Playing
        };
        if self.state == PlayState::Playing {
            self.arm(now, duration);
        }
    }

    /// Drop autoplay intent entirely and cancel any pending deadline.
    pub fn stop(&mut self) {
        self.cancel();
        self.state = PlayState::Idle;
        debug!("scheduler stopped");
    }

    /// Register one pause reason. The pending deadline is cancelled but the
    /// playing intent survives for `resume()`.
    pub fn pause(&mut self) {
        self.pause_reasons += 1;
        self.cancel();
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
        trace!("pause: {} reason(s) held", self.pause_reasons);
    }

    /// Clear one pause reason. Returns to `Playing` and rearms only once the
    /// last reason clears; the slide restarts from its full duration.
    pub fn resume(&mut self, now: Instant, duration: ResolvedDuration) {
        self.pause_reasons = self.pause_reasons.saturating_sub(1);
        trace!("resume: {} reason(s) remaining", self.pause_reasons);
        if self.pause_reasons == 0 && self.state == PlayState::Paused {
            self.state = PlayState::Playing;
            self.arm(now, duration);
        }
    }

    /// Cancel and replace the armed deadline for a new slide or duration
    /// source. Only meaningful while playing.
    pub fn rearm(&mut self, now: Instant, duration: ResolvedDuration) {
        self.cancel();
        if self.state == PlayState::Playing {
            self.arm(now, duration);
        }
    }

    /// Invalidate whatever is armed without touching intent. Every position
    /// change or deck mutation goes through here before anything else.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.armed = None;
        self.waiting_for_video = false;
    }

    /// Poll the deadline. Returns true exactly once, when an armed deadline
    /// from the current generation has expired; the caller then advances and
    /// rearms.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(armed) = self.armed else {
            return false;
        };
        if armed.generation != self.generation {
            // Stale deadline from before a cancel; drop it.
            self.armed = None;
            return false;
        }
        if self.state != PlayState::Playing || now < armed.deadline {
            return false;
        }
        self.armed = None;
        trace!("deadline fired (generation {})", armed.generation);
        true
    }

    /// Milliseconds until the armed deadline, if any. Exposed for progress
    /// indicators.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.armed
            .filter(|a| a.generation == self.generation)
            .map(|a| a.deadline.saturating_duration_since(now))
    }

    fn arm(&mut self, now: Instant, duration: ResolvedDuration) {
        self.generation += 1;
        match duration {
            ResolvedDuration::Millis(ms) => {
                self.waiting_for_video = false;
                self.armed = Some(Armed {
                    deadline: now + Duration::from_millis(ms),
                    generation: self.generation,
                });
                debug!("armed {ms} ms (generation {})", self.generation);
            }
            ResolvedDuration::UntilVideoEnd => {
                self.armed = None;
                self.waiting_for_video = true;
                debug!("waiting for video end (generation {})", self.generation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE_SECS: ResolvedDuration = ResolvedDuration::Millis(5_000);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn test_deadline_fires_once_after_duration() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, FIVE_SECS);
        assert!(!sched.tick(t0 + secs(4)));
        assert!(sched.tick(t0 + secs(5)));
        // Fired and disarmed; does not fire again until rearmed.
        assert!(!sched.tick(t0 + secs(60)));
    }

    #[test]
    fn test_cancel_prevents_stale_fire() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, FIVE_SECS);
        sched.cancel();
        assert!(!sched.tick(t0 + secs(10)));
        assert!(sched.is_playing());
    }

    #[test]
    fn test_pause_is_reference_counted() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, FIVE_SECS);

        sched.pause();
        sched.pause();
        assert_eq!(sched.state(), PlayState::Paused);

        // One resume alone must not restart playback.
        sched.resume(t0, FIVE_SECS);
        assert_eq!(sched.state(), PlayState::Paused);
        assert!(!sched.tick(t0 + secs(10)));

        sched.resume(t0 + secs(1), FIVE_SECS);
        assert!(sched.is_playing());
        // Restart-per-slide: full duration from the resume instant.
        assert!(!sched.tick(t0 + secs(5)));
        assert!(sched.tick(t0 + secs(6)));
    }

    #[test]
    fn test_resume_underflow_is_harmless() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.resume(t0, FIVE_SECS);
        assert_eq!(sched.pause_reasons(), 0);
        assert_eq!(sched.state(), PlayState::Idle);
    }

    #[test]
    fn test_start_under_held_pause_stays_paused() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.pause();
        sched.start(t0, FIVE_SECS);
        assert_eq!(sched.state(), PlayState::Paused);
        assert!(!sched.tick(t0 + secs(10)));
        sched.resume(t0, FIVE_SECS);
        assert!(sched.is_playing());
    }

    #[test]
    fn test_stop_clears_intent_and_deadline() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, FIVE_SECS);
        sched.stop();
        assert_eq!(sched.state(), PlayState::Idle);
        assert!(!sched.tick(t0 + secs(10)));
    }

    #[test]
    fn test_video_slides_arm_no_deadline() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, ResolvedDuration::UntilVideoEnd);
        assert!(sched.is_waiting_for_video());
        assert!(!sched.tick(t0 + secs(600)));
        // Moving on to a timed slide swaps the wait for a deadline.
        sched.rearm(t0, FIVE_SECS);
        assert!(!sched.is_waiting_for_video());
        assert!(sched.tick(t0 + secs(5)));
    }

    #[test]
    fn test_remaining_reports_time_left() {
        let t0 = Instant::now();
        let mut sched = Scheduler::new();
        sched.start(t0, FIVE_SECS);
        assert_eq!(sched.remaining(t0 + secs(2)), Some(secs(3)));
        sched.cancel();
        assert_eq!(sched.remaining(t0), None);
    }
}
