//! Logical page slots and the canonical left index.
//!
//! The book only ever shows two resting pages, or four faces while a
//! leaf is turning: the static left page, the two faces of the moving
//! leaf, and the static right page. All slots derive from a single
//! `left_index`; `-1` is the blank cover before the first page.

use log::debug;

use crate::turn::{Direction, TurnError};

/// Clamp a page index into `[-1, page_count - 1]`.
pub fn clamp_index(value: i32, page_count: u32) -> i32 {
    value.clamp(-1, page_count as i32 - 1)
}

/// The set of visible page indices, pushed to the host whenever it
/// changes so image lookups can be refreshed. Out-of-range indices never
/// appear here; a host lookup for `-1` yields a blank face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageLayout {
    Resting {
        left: i32,
        right: i32,
    },
    Turning {
        left_static: i32,
        left_moving: i32,
        right_moving: i32,
        right_static: i32,
    },
}

#[derive(Clone, Debug)]
pub struct PageTracker {
    left_index: i32,
    page_count: u32,
    turning: bool,
}

impl PageTracker {
    pub fn new(page_count: u32) -> Self {
        Self {
            left_index: -1,
            page_count,
            turning: false,
        }
    }

    pub fn left_index(&self) -> i32 {
        self.left_index
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn is_turning(&self) -> bool {
        self.turning
    }

    /// Jump straight to a resting position. Ignored while a turn is
    /// live; the index is clamped into range.
    pub fn open_at(&mut self, index: i32) {
        if !self.turning {
            self.set_left_index(index);
        }
    }

    pub fn layout(&self) -> PageLayout {
        if self.turning {
            PageLayout::Turning {
                left_static: self.left_index,
                left_moving: self.left_index + 1,
                right_moving: self.left_index + 2,
                right_static: self.left_index + 3,
            }
        } else {
            PageLayout::Resting {
                left: self.left_index,
                right: self.left_index + 1,
            }
        }
    }

    /// Expand to the four-slot turning layout. A left turn reveals pages
    /// to the left, so the canonical index steps back by two before the
    /// expansion. Rejected when any slot would fall outside
    /// `[-1, page_count - 1]` or a turn is already live.
    pub fn begin(&mut self, direction: Direction) -> Result<(), TurnError> {
        if self.turning {
            return Err(TurnError::AlreadyTurning);
        }
        let expanded_from = match direction {
            Direction::Right => self.left_index,
            Direction::Left => self.left_index - 2,
        };
        if expanded_from < -1 || expanded_from + 3 > self.page_count as i32 - 1 {
            return Err(TurnError::NoFurtherPages);
        }
        self.left_index = expanded_from;
        self.turning = true;
        debug!(
            "turn begin: {direction:?}, slots {}..={}",
            expanded_from,
            expanded_from + 3
        );
        Ok(())
    }

    /// Collapse back to the resting layout after the settle finishes.
    /// The canonical index shifts by +2 iff the gesture landed right of
    /// the spine; for a left turn (already stepped back at `begin`) that
    /// shift restores the pre-turn index, i.e. the turn was cancelled.
    /// Returns whether the resting index changed relative to `before`.
    pub fn settle(&mut self, ended_right: bool, before: i32) -> bool {
        if ended_right {
            self.set_left_index(self.left_index + 2);
        }
        self.turning = false;
        let advanced = self.left_index != before;
        debug!(
            "turn settled: ended_right={ended_right}, left_index={}, advanced={advanced}",
            self.left_index
        );
        advanced
    }

    fn set_left_index(&mut self, value: i32) {
        self.left_index = clamp_index(value, self.page_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_clamps_to_valid_range() {
        assert_eq!(clamp_index(-5, 8), -1);
        assert_eq!(clamp_index(3, 8), 3);
        assert_eq!(clamp_index(12, 8), 7);
        assert_eq!(clamp_index(0, 0), -1);
    }

    #[test]
    fn resting_layout_shows_two_pages() {
        let tracker = PageTracker::new(8);
        assert_eq!(
            tracker.layout(),
            PageLayout::Resting { left: -1, right: 0 }
        );
    }

    #[test]
    fn right_turn_expands_to_four_slots() {
        let mut tracker = PageTracker::new(8);
        tracker.begin(Direction::Right).unwrap();
        assert_eq!(
            tracker.layout(),
            PageLayout::Turning {
                left_static: -1,
                left_moving: 0,
                right_moving: 1,
                right_static: 2,
            }
        );
    }

    #[test]
    fn left_turn_steps_back_before_expanding() {
        let mut tracker = PageTracker::new(8);
        tracker.begin(Direction::Right).unwrap();
        tracker.settle(true, -1);
        assert_eq!(tracker.left_index(), 1);

        tracker.begin(Direction::Left).unwrap();
        assert_eq!(
            tracker.layout(),
            PageLayout::Turning {
                left_static: -1,
                left_moving: 0,
                right_moving: 1,
                right_static: 2,
            }
        );
    }

    #[test]
    fn cancelled_turn_round_trips_to_resting_state() {
        let mut tracker = PageTracker::new(8);
        tracker.begin(Direction::Right).unwrap();
        tracker.settle(true, -1);
        let resting = tracker.layout();
        let before = tracker.left_index();

        // A right turn released left of the spine springs back.
        tracker.begin(Direction::Right).unwrap();
        assert!(!tracker.settle(false, before));
        assert_eq!(tracker.layout(), resting);

        // A left turn released right of the spine springs back too.
        tracker.begin(Direction::Left).unwrap();
        assert!(!tracker.settle(true, before));
        assert_eq!(tracker.layout(), resting);
    }

    #[test]
    fn begin_rejected_when_slots_would_leave_range() {
        // Four-page book open at left_index = 2: slots 2..=5 don't fit.
        let mut tracker = PageTracker::new(4);
        tracker.open_at(2);
        assert_eq!(tracker.left_index(), 2);
        assert_eq!(
            tracker.begin(Direction::Right),
            Err(TurnError::NoFurtherPages)
        );
        assert!(!tracker.is_turning());
    }

    #[test]
    fn begin_rejected_at_front_cover() {
        let mut tracker = PageTracker::new(8);
        assert_eq!(
            tracker.begin(Direction::Left),
            Err(TurnError::NoFurtherPages)
        );
    }

    #[test]
    fn begin_rejected_while_turning() {
        let mut tracker = PageTracker::new(8);
        tracker.begin(Direction::Right).unwrap();
        assert_eq!(
            tracker.begin(Direction::Right),
            Err(TurnError::AlreadyTurning)
        );
    }
}
