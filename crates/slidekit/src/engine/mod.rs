#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use log::debug;

use crate::conditional::{self, RuntimeContext};
use crate::interaction::{
    Gesture, InteractionConfig, Key, NavCommand, TouchTracker, WheelTracker, key_command,
};
use crate::model::{Slide, TimingConfig};
use crate::navigation::Navigator;
use crate::scheduler::{PlayState, Scheduler};
use crate::settings::Settings;
use crate::store::Deck;
use crate::timing::{self, ResolvedDuration};

/// Emitted after every successful transition and play-state change, for an
/// accessibility announcer collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub current_index: usize,
    pub total_count: usize,
    pub slide_title: Option<String>,
    pub is_playing: bool,
}

/// One presentation instance: the deck view, runtime context, navigation
/// state machine, playback scheduler, and input trackers, wired together.
///
/// Every external trigger (timer expiry, wheel, touch, keyboard, hover)
/// funnels through the same entry points here, so position mutations are
/// strictly serialized; no channel reads or writes the index directly.
/// Time never comes from a hidden clock: the host passes `now` into every
/// time-sensitive call.
#[derive(Debug)]
pub struct SlidePlayer {
    deck: Deck,
    context: RuntimeContext,
    global_timing: Option<TimingConfig>,
    navigator: Navigator,
    scheduler: Scheduler,
    wheel: WheelTracker,
    touch: TouchTracker,
    /// Nesting depth of hover-enter signals.
    hover_depth: u32,
    /// How many of those enters were forwarded to the scheduler as pause
    /// reasons (pause-on-hover can be off for the current slide).
    hover_forwarded: u32,
    user_paused: bool,
    interaction: InteractionConfig,
    announcements: Vec<Announcement>,
}

impl SlidePlayer {
    pub fn new(deck: Deck, context: RuntimeContext, settings: &Settings) -> Self {
        Self {
            deck,
            context,
            global_timing: settings.global_timing.clone(),
            navigator: Navigator::new(settings.loop_slides),
            scheduler: Scheduler::new(),
            wheel: WheelTracker::new(&settings.interaction),
            touch: TouchTracker::new(&settings.interaction),
            hover_depth: 0,
            hover_forwarded: 0,
            user_paused: false,
            interaction: settings.interaction.clone(),
            announcements: Vec::new(),
        }
    }

    // --- derived views -----------------------------------------------------

    /// The navigable subset of the deck under the current context, in order.
    /// Recomputed on every call; never cached across context changes.
    pub fn visible_slides(&self) -> Vec<&Slide> {
        conditional::filter_visible(self.deck.slides(), &self.context)
    }

    pub fn visible_count(&self) -> usize {
        self.visible_slides().len()
    }

    pub fn current_index(&self) -> usize {
        self.navigator.position()
    }

    pub fn current_slide(&self) -> Option<&Slide> {
        self.visible_slides()
            .get(self.navigator.position())
            .copied()
    }

    pub fn play_state(&self) -> PlayState {
        self.scheduler.state()
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.is_playing()
    }

    /// Time left on the armed autoplay deadline, for progress indicators.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.scheduler.remaining(now)
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn context(&self) -> &RuntimeContext {
        &self.context
    }

    /// Drain announcements accumulated since the last call.
    pub fn take_announcements(&mut self) -> Vec<Announcement> {
        std::mem::take(&mut self.announcements)
    }

    // --- host-driven mutation ---------------------------------------------

    /// Mutate the deck. The armed deadline is cancelled up front so a timer
    /// from before the mutation can never fire against the new shape, and
    /// the position is pulled back into range afterwards.
    pub fn mutate_deck<R>(&mut self, now: Instant, f: impl FnOnce(&mut Deck) -> R) -> R {
        self.scheduler.cancel();
        let result = f(&mut self.deck);
        self.after_shape_change(now);
        result
    }

    /// Swap in a fresh runtime context (resize, clock tick, role change).
    /// Visibility is recomputed, so the current position may move.
    pub fn set_context(&mut self, now: Instant, context: RuntimeContext) {
        self.scheduler.cancel();
        self.context = context;
        self.after_shape_change(now);
    }

    fn after_shape_change(&mut self, now: Instant) {
        let len = self.visible_count();
        if self.navigator.clamp_to(len) {
            self.announce();
        }
        if self.current_slide().is_some() {
            let duration = self.resolve_current();
            self.scheduler.rearm(now, duration);
        }
    }

    // --- navigation entry points ------------------------------------------

    pub fn next(&mut self, now: Instant) -> bool {
        let len = self.visible_count();
        let moved = self.navigator.next(len);
        self.finish_move(moved, now)
    }

    pub fn prev(&mut self, now: Instant) -> bool {
        let len = self.visible_count();
        let moved = self.navigator.prev(len);
        self.finish_move(moved, now)
    }

    pub fn goto(&mut self, index: usize, now: Instant) -> bool {
        let len = self.visible_count();
        let moved = self.navigator.goto(index, len);
        self.finish_move(moved, now)
    }

    pub fn first(&mut self, now: Instant) -> bool {
        let len = self.visible_count();
        let moved = self.navigator.first(len);
        self.finish_move(moved, now)
    }

    pub fn last(&mut self, now: Instant) -> bool {
        let len = self.visible_count();
        let moved = self.navigator.last(len);
        self.finish_move(moved, now)
    }

    fn finish_move(&mut self, moved: bool, now: Instant) -> bool {
        if moved {
            let duration = self.resolve_current();
            self.scheduler.rearm(now, duration);
            self.announce();
        }
        moved
    }

    // --- playback controls -------------------------------------------------

    pub fn play(&mut self, now: Instant) {
        if self.current_slide().is_none() {
            debug!("play ignored: no visible slides");
            return;
        }
        self.user_paused = false;
        let duration = self.resolve_current();
        self.scheduler.start(now, duration);
        self.announce();
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
        self.user_paused = false;
        self.announce();
    }

    /// Explicit user pause/resume, one reference-counted reason of its own.
    /// Toggling from idle starts playback.
    pub fn toggle_play(&mut self, now: Instant) {
        match self.scheduler.state() {
            PlayState::Idle => self.play(now),
            _ if self.user_paused => {
                self.user_paused = false;
                let duration = self.resolve_current();
                self.scheduler.resume(now, duration);
                self.announce();
            }
            _ => {
                self.user_paused = true;
                self.scheduler.pause();
                self.announce();
            }
        }
    }

    /// Advance the engine's clock. Flushes an elapsed wheel debounce window
    /// and fires the autoplay deadline when due.
    pub fn tick(&mut self, now: Instant) {
        if let Some(cmd) = self.wheel.flush(now) {
            self.apply_input_command(cmd, now);
        }
        if self.scheduler.tick(now) {
            self.next(now);
        }
    }

    /// The host reports the current video finished. Only meaningful while
    /// the scheduler is waiting on it.
    pub fn video_ended(&mut self, now: Instant) {
        if self.scheduler.is_waiting_for_video() {
            self.next(now);
        }
    }

    // --- input channels ----------------------------------------------------

    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) {
        if let Some(cmd) = self.wheel.on_wheel(delta_y, now) {
            self.apply_input_command(cmd, now);
        }
    }

    pub fn on_touch_start(&mut self, x: f64, y: f64, now: Instant) {
        self.touch.on_touch_start(x, y, now);
    }

    pub fn on_touch_move(&mut self, x: f64, y: f64) {
        self.touch.on_touch_move(x, y);
    }

    /// Classify the finished touch sequence and apply it. The gesture is
    /// also returned so the host can route pinches to its zoom handling.
    pub fn on_touch_end(&mut self, now: Instant) -> Option<Gesture> {
        let gesture = self.touch.on_touch_end(now)?;
        match gesture {
            Gesture::SwipeNext => self.apply_input_command(NavCommand::Next, now),
            Gesture::SwipePrev => self.apply_input_command(NavCommand::Prev, now),
            Gesture::DoubleTap => self.apply_input_command(NavCommand::TogglePlay, now),
            Gesture::Tap | Gesture::Pinch => {}
        }
        Some(gesture)
    }

    pub fn on_key(&mut self, key: Key, now: Instant) {
        self.apply_input_command(key_command(key), now);
    }

    /// Mouse entered the viewport. One pause reason while the current
    /// slide's timing asks for pause-on-hover.
    pub fn hover_enter(&mut self) {
        self.hover_depth += 1;
        if self.effective_timing().pause_on_hover {
            self.hover_forwarded += 1;
            self.scheduler.pause();
        }
    }

    /// Mouse left the viewport. Releases this hover's reason only; an
    /// explicit user pause keeps its own reason, so leaving never un-pauses
    /// a presentation the user stopped on purpose.
    pub fn hover_leave(&mut self, now: Instant) {
        if self.hover_depth == 0 {
            return;
        }
        self.hover_depth -= 1;
        if self.hover_forwarded > self.hover_depth {
            self.hover_forwarded -= 1;
            let duration = self.resolve_current();
            self.scheduler.resume(now, duration);
        }
    }

    /// All input channels land here, so wheel flushes, swipe releases, and
    /// key presses arriving in the same tick still serialize through the one
    /// navigator.
    fn apply_input_command(&mut self, cmd: NavCommand, now: Instant) {
        match cmd {
            NavCommand::TogglePlay => {
                self.toggle_play(now);
                return;
            }
            NavCommand::Next | NavCommand::Prev | NavCommand::First | NavCommand::Last => {}
        }
        if self.is_playing() && self.effective_timing().pause_on_interaction {
            // Manual navigation drops autoplay intent rather than fighting
            // the timer.
            self.scheduler.stop();
            self.announce();
        }
        match cmd {
            NavCommand::Next => self.next(now),
            NavCommand::Prev => self.prev(now),
            NavCommand::First => self.first(now),
            NavCommand::Last => self.last(now),
            NavCommand::TogglePlay => false,
        };
    }

    // --- internals ----------------------------------------------------------

    fn resolve_current(&self) -> ResolvedDuration {
        match self.current_slide() {
            Some(slide) => timing::resolve(slide, self.global_timing.as_ref()),
            // No visible slide: an effectively infinite deadline that the
            // next shape change will cancel anyway.
            None => ResolvedDuration::UntilVideoEnd,
        }
    }

    fn effective_timing(&self) -> TimingConfig {
        self.current_slide()
            .and_then(|s| s.timing.clone())
            .or_else(|| self.global_timing.clone())
            .unwrap_or_default()
    }

    fn announce(&mut self) {
        let visible = self.visible_slides();
        let index = self.navigator.position();
        self.announcements.push(Announcement {
            current_index: index,
            total_count: visible.len(),
            slide_title: visible.get(index).and_then(|s| s.title.clone()),
            is_playing: self.scheduler.is_playing(),
        });
    }

    /// Tunables the trackers were built with.
    pub fn interaction_config(&self) -> &InteractionConfig {
        &self.interaction
    }
}
