use log::trace;

/// Position state machine over the visible slide sequence.
///
/// The navigator only ever holds an index; the visible sequence itself is
/// recomputed by the caller and its length passed into every transition, so
/// a stale cached list can never be indexed here. All transitions report
/// whether the position actually changed so the caller can cancel and rearm
/// its timer and emit an announcement.
#[derive(Debug, Clone)]
pub struct Navigator {
    position: usize,
    loop_enabled: bool,
}

impl Navigator {
    pub fn new(loop_enabled: bool) -> Self {
        Self {
            position: 0,
            loop_enabled,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_enabled
    }

    pub fn set_loop(&mut self, loop_enabled: bool) {
        self.loop_enabled = loop_enabled;
    }

    /// Pull the position back into range after the visible sequence shrank.
    /// Returns true if the position moved.
    pub fn clamp_to(&mut self, visible_len: usize) -> bool {
        let max = visible_len.saturating_sub(1);
        if self.position > max {
            self.position = max;
            true
        } else {
            false
        }
    }

    /// Advance one slide. Wraps when looping, saturates at the end otherwise.
    pub fn next(&mut self, visible_len: usize) -> bool {
        if visible_len < 2 {
            return false;
        }
        let old = self.position;
        if self.position + 1 >= visible_len {
            if self.loop_enabled {
                self.position = 0;
            }
        } else {
            self.position += 1;
        }
        self.log_move("next", old);
        old != self.position
    }

    /// Step back one slide. Wraps when looping, saturates at zero otherwise.
    pub fn prev(&mut self, visible_len: usize) -> bool {
        if visible_len < 2 {
            return false;
        }
        let old = self.position;
        if self.position == 0 {
            if self.loop_enabled {
                self.position = visible_len - 1;
            }
        } else {
            self.position -= 1;
        }
        self.log_move("prev", old);
        old != self.position
    }

    /// Jump to an index. Out of range is not an error: the target silently
    /// clamps to `[0, visible_len - 1]`.
    pub fn goto(&mut self, index: usize, visible_len: usize) -> bool {
        if visible_len == 0 {
            return false;
        }
        let old = self.position;
        self.position = index.min(visible_len - 1);
        self.log_move("goto", old);
        old != self.position
    }

    pub fn first(&mut self, visible_len: usize) -> bool {
        self.goto(0, visible_len)
    }

    pub fn last(&mut self, visible_len: usize) -> bool {
        if visible_len == 0 {
            return false;
        }
        self.goto(visible_len - 1, visible_len)
    }

    fn log_move(&self, op: &str, old: usize) {
        if old != self.position {
            trace!("navigation {op}: {old} -> {}", self.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loop_wrap_forward_and_backward() {
        let mut nav = Navigator::new(true);
        nav.goto(2, 3);
        assert!(nav.next(3));
        assert_eq!(nav.position(), 0);
        assert!(nav.prev(3));
        assert_eq!(nav.position(), 2);
    }

    #[test]
    fn test_no_loop_saturates_at_edges() {
        let mut nav = Navigator::new(false);
        nav.goto(2, 3);
        assert!(!nav.next(3));
        assert_eq!(nav.position(), 2);
        nav.goto(0, 3);
        assert!(!nav.prev(3));
        assert_eq!(nav.position(), 0);
    }

    #[test]
    fn test_goto_out_of_range_clamps_silently() {
        let mut nav = Navigator::new(true);
        assert!(nav.goto(99, 3));
        assert_eq!(nav.position(), 2);
        // Clamped target equal to current position is not a change.
        assert!(!nav.goto(99, 3));
    }

    #[test]
    fn test_single_or_empty_sequence_never_moves() {
        let mut nav = Navigator::new(true);
        assert!(!nav.next(1));
        assert!(!nav.prev(1));
        assert!(!nav.next(0));
        assert!(!nav.goto(5, 0));
        assert_eq!(nav.position(), 0);
    }

    #[test]
    fn test_first_and_last() {
        let mut nav = Navigator::new(false);
        assert!(nav.last(4));
        assert_eq!(nav.position(), 3);
        assert!(nav.first(4));
        assert_eq!(nav.position(), 0);
    }

    #[test]
    fn test_clamp_after_shrink() {
        let mut nav = Navigator::new(true);
        nav.goto(4, 5);
        assert!(nav.clamp_to(2));
        assert_eq!(nav.position(), 1);
        assert!(!nav.clamp_to(2));
    }
}
