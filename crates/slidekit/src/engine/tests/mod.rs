mod playback;

use std::time::{Duration, Instant};

use chrono::{NaiveDate, NaiveTime};

use crate::conditional::RuntimeContext;
use crate::engine::SlidePlayer;
use crate::model::{Slide, SlideDuration, TimingConfig};
use crate::settings::Settings;
use crate::store::Deck;

/// Helper: a fixed context (no device/width/role set).
fn ctx() -> RuntimeContext {
    RuntimeContext::new(
        NaiveDate::from_ymd_opt(2026, 8, 27).unwrap(),
        NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
    )
}

/// Helper: a slide with a fixed duration in seconds and a title.
fn timed_slide(id: &str, secs: f64) -> Slide {
    let mut slide = Slide::new(id, 0);
    slide.title = Some(format!("Slide {id}"));
    slide.timing = Some(TimingConfig {
        duration: SlideDuration::Seconds(secs),
        ..TimingConfig::default()
    });
    slide
}

/// Helper: a deck of `n` slides (ids s0..s{n-1}), each `secs` long.
fn deck_of(n: usize, secs: f64) -> Deck {
    let mut deck = Deck::new();
    for i in 0..n {
        deck.insert(timed_slide(&format!("s{i}"), secs));
    }
    deck
}

/// Helper: a looping player over `n` five-second slides.
fn player(n: usize) -> SlidePlayer {
    SlidePlayer::new(deck_of(n, 5.0), ctx(), &Settings::default())
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// Helper: current slide id, for terse assertions.
fn current_id(player: &SlidePlayer) -> String {
    player
        .current_slide()
        .map(|s| s.id.clone())
        .unwrap_or_default()
}
