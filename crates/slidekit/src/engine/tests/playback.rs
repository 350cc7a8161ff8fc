use super::*;

use crate::model::{SlideKind, VideoConfig, VideoDuration};
use crate::scheduler::PlayState;

#[test]
fn test_autoplay_advances_when_the_deadline_fires() {
    let t0 = Instant::now();
    let mut player = player(3);
    player.play(t0);
    assert!(player.is_playing());

    player.tick(t0 + secs(4));
    assert_eq!(player.current_index(), 0);

    player.tick(t0 + secs(5));
    assert_eq!(player.current_index(), 1);

    // The next slide's full duration starts at the transition.
    player.tick(t0 + secs(9));
    assert_eq!(player.current_index(), 1);
    player.tick(t0 + secs(10));
    assert_eq!(player.current_index(), 2);
}

#[test]
fn test_manual_navigation_rearms_from_the_new_slide() {
    let t0 = Instant::now();
    let mut deck = Deck::new();
    deck.insert(timed_slide("s0", 5.0));
    deck.insert(timed_slide("s1", 2.0));
    deck.insert(timed_slide("s2", 5.0));
    let mut player = SlidePlayer::new(deck, ctx(), &Settings::default());
    // Interaction stop is not under test here; drive goto directly.
    player.play(t0);
    player.goto(1, t0 + secs(1));

    // s1 is 2 s long, counted from the goto.
    player.tick(t0 + secs(2));
    assert_eq!(player.current_index(), 1);
    player.tick(t0 + secs(3));
    assert_eq!(player.current_index(), 2);
}

#[test]
fn test_hover_pause_is_reference_counted() {
    let t0 = Instant::now();
    let mut player = player(3);
    player.play(t0);

    player.hover_enter();
    player.hover_enter();
    assert_eq!(player.play_state(), PlayState::Paused);

    // One leave alone must not resume.
    player.hover_leave(t0 + secs(1));
    assert_eq!(player.play_state(), PlayState::Paused);
    player.tick(t0 + secs(20));
    assert_eq!(player.current_index(), 0);

    player.hover_leave(t0 + secs(2));
    assert!(player.is_playing());
}

#[test]
fn test_resume_restarts_the_full_slide_duration() {
    let t0 = Instant::now();
    let mut player = player(3);
    player.play(t0);

    player.hover_enter();
    player.hover_leave(t0 + secs(4));

    // Restart-per-slide: the deadline is 5 s from the resume, not 1 s.
    player.tick(t0 + secs(5));
    assert_eq!(player.current_index(), 0);
    player.tick(t0 + secs(9));
    assert_eq!(player.current_index(), 1);
}

#[test]
fn test_hover_leave_never_unpauses_an_explicit_user_pause() {
    let t0 = Instant::now();
    let mut player = player(3);
    player.play(t0);
    player.toggle_play(t0 + secs(1)); // user pause
    assert_eq!(player.play_state(), PlayState::Paused);

    player.hover_enter();
    player.hover_leave(t0 + secs(2));
    assert_eq!(player.play_state(), PlayState::Paused);
    player.tick(t0 + secs(30));
    assert_eq!(player.current_index(), 0);

    // The user's own toggle is what resumes.
    player.toggle_play(t0 + secs(3));
    assert!(player.is_playing());
    player.tick(t0 + secs(8));
    assert_eq!(player.current_index(), 1);
}

#[test]
fn test_stale_timer_cannot_fire_after_slide_deletion() {
    let t0 = Instant::now();
    let mut player = player(3);
    player.play(t0);

    // Delete the current slide one second in.
    player.mutate_deck(t0 + secs(1), |deck| {
        assert!(deck.remove("s0"));
    });
    assert_eq!(current_id(&player), "s1");

    // The original 5 s deadline is dead; nothing fires, nothing panics.
    player.tick(t0 + secs(5));
    assert_eq!(current_id(&player), "s1");

    // The replacement deadline runs from the mutation.
    player.tick(t0 + secs(6));
    assert_eq!(current_id(&player), "s2");
}

#[test]
fn test_deleting_every_slide_mid_playback_is_safe() {
    let t0 = Instant::now();
    let mut player = player(2);
    player.play(t0);
    player.mutate_deck(t0 + secs(1), |deck| {
        deck.remove("s0");
        deck.remove("s1");
    });
    player.tick(t0 + secs(10));
    assert!(player.current_slide().is_none());
    assert_eq!(player.visible_count(), 0);
}

#[test]
fn test_full_video_slide_waits_for_ended_signal() {
    let t0 = Instant::now();
    let mut deck = Deck::new();
    let mut video = timed_slide("v0", 5.0);
    video.kind = SlideKind::Video;
    video.video = Some(VideoConfig {
        url: "https://example.com/v.mp4".to_string(),
        duration: VideoDuration::Full,
        muted: true,
        loop_video: false,
    });
    deck.insert(video);
    deck.insert(timed_slide("s1", 5.0));
    let mut player = SlidePlayer::new(deck, ctx(), &Settings::default());

    player.play(t0);
    // No deadline: even minutes later nothing advances on its own.
    player.tick(t0 + secs(300));
    assert_eq!(current_id(&player), "v0");

    player.video_ended(t0 + secs(301));
    assert_eq!(current_id(&player), "s1");

    // A stray ended signal on a timed slide is ignored.
    player.video_ended(t0 + secs(302));
    assert_eq!(current_id(&player), "s1");
}

#[test]
fn test_manual_input_stops_autoplay_when_pause_on_interaction() {
    let t0 = Instant::now();
    let mut player = player(3); // default timing: pause_on_interaction = true
    player.play(t0);

    player.on_key(crate::interaction::Key::Right, t0 + secs(1));
    assert_eq!(player.current_index(), 1);
    assert_eq!(player.play_state(), PlayState::Idle);

    // No deadline survives the stop.
    player.tick(t0 + secs(30));
    assert_eq!(player.current_index(), 1);
}

#[test]
fn test_interaction_keeps_playing_when_pause_on_interaction_is_off() {
    let t0 = Instant::now();
    let mut deck = Deck::new();
    for i in 0..3 {
        let mut slide = timed_slide(&format!("s{i}"), 5.0);
        slide.timing.as_mut().unwrap().pause_on_interaction = false;
        deck.insert(slide);
    }
    let mut player = SlidePlayer::new(deck, ctx(), &Settings::default());
    player.play(t0);

    player.on_key(crate::interaction::Key::Right, t0 + secs(1));
    assert_eq!(player.current_index(), 1);
    assert!(player.is_playing());
    player.tick(t0 + secs(6));
    assert_eq!(player.current_index(), 2);
}

#[test]
fn test_hover_is_ignored_when_pause_on_hover_is_off() {
    let t0 = Instant::now();
    let mut deck = Deck::new();
    for i in 0..2 {
        let mut slide = timed_slide(&format!("s{i}"), 5.0);
        slide.timing.as_mut().unwrap().pause_on_hover = false;
        deck.insert(slide);
    }
    let mut player = SlidePlayer::new(deck, ctx(), &Settings::default());
    player.play(t0);

    player.hover_enter();
    assert!(player.is_playing());
    player.tick(t0 + secs(5));
    assert_eq!(player.current_index(), 1);
    player.hover_leave(t0 + secs(5));
    assert!(player.is_playing());
}

#[test]
fn test_play_on_empty_deck_is_a_noop() {
    let t0 = Instant::now();
    let mut player = SlidePlayer::new(Deck::new(), ctx(), &Settings::default());
    player.play(t0);
    assert_eq!(player.play_state(), PlayState::Idle);
}

#[test]
fn test_remaining_reports_progress() {
    let t0 = Instant::now();
    let mut player = player(2);
    player.play(t0);
    assert_eq!(player.remaining(t0 + secs(2)), Some(secs(3)));
    player.stop();
    assert_eq!(player.remaining(t0 + secs(2)), None);
}

#[test]
fn test_announcements_reflect_play_state_changes() {
    let t0 = Instant::now();
    let mut player = player(2);
    player.take_announcements();

    player.play(t0);
    let events = player.take_announcements();
    assert_eq!(events.len(), 1);
    assert!(events[0].is_playing);

    player.toggle_play(t0 + secs(1));
    let events = player.take_announcements();
    assert_eq!(events.len(), 1);
    assert!(!events[0].is_playing);
}
