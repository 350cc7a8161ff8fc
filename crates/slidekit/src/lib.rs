//! Timing, navigation, and conditional-visibility engine for slide
//! presentations.
//!
//! The host owns the slides and groups, supplies a [`conditional::RuntimeContext`],
//! and drives a [`engine::SlidePlayer`] from its event loop: input events go
//! in through the player's entry points, `tick(now)` advances autoplay, and
//! announcements come back out for accessibility. The engine never reads a
//! clock, never touches the network or filesystem (settings I/O excepted),
//! and never creates or destroys slides on its own.

pub mod conditional;
pub mod engine;
pub mod interaction;
pub mod model;
pub mod navigation;
pub mod scheduler;
pub mod settings;
pub mod store;
pub mod timing;

pub use conditional::{RuntimeContext, evaluate, filter_visible};
pub use engine::{Announcement, SlidePlayer};
pub use interaction::{Gesture, InteractionConfig, Key, NavCommand};
pub use model::{
    Condition, ConditionKind, ConditionOperator, ConditionValue, ConditionalConfig, DeviceType,
    LogicOp, Slide, SlideDuration, SlideGroup, SlideKind, TimingConfig, TransitionPolicy,
    VideoConfig, VideoDuration,
};
pub use navigation::Navigator;
pub use scheduler::{PlayState, Scheduler};
pub use settings::Settings;
pub use store::Deck;
pub use timing::{ResolvedDuration, resolve};
