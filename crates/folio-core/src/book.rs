//! Book dimensions, per-frame drag state, and the session orchestrator.
//!
//! Coordinates are book-local: y-up, origin at the center of the open
//! spread, spine at x = 0. A leaf of `width x height` gives a spread of
//! `2*width x height`.

use log::debug;

use crate::animation::DEFAULT_SETTLE_DURATION;
use crate::geometry::{self, Vec2};
use crate::pages::{PageLayout, PageTracker};
use crate::turn::{BookHost, Direction, TurnController, TurnError, TurnPhase, TurnStatus};

/// Dimensions of a single leaf, in book-local units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeafSize {
    pub width: f32,
    pub height: f32,
}

/// Fixed reference geometry of the open book plus the transient drag
/// state, mutated every frame while a turn is live.
///
/// Invariants: `page_width > 0`, `page_diagonal >= page_width`;
/// `fold_corner` always lies within (or on) the radius-`page_width` disk
/// around `bottom_center`.
#[derive(Clone, Copy, Debug)]
pub struct BookModel {
    pub page_width: f32,
    pub page_diagonal: f32,
    pub bottom_center: Vec2,
    pub top_center: Vec2,
    pub left_corner: Vec2,
    pub right_corner: Vec2,
    /// Live (or animated) pointer position in book-local space.
    pub drag_point: Vec2,
    /// `drag_point` clamped into the reachable envelope.
    pub fold_corner: Vec2,
}

impl BookModel {
    pub fn new(leaf: LeafSize) -> Self {
        let half_h = leaf.height * 0.5;
        Self {
            page_width: leaf.width,
            page_diagonal: (leaf.width * leaf.width + leaf.height * leaf.height).sqrt(),
            bottom_center: Vec2::new(0.0, -half_h),
            top_center: Vec2::new(0.0, half_h),
            left_corner: Vec2::new(-leaf.width, -half_h),
            right_corner: Vec2::new(leaf.width, -half_h),
            drag_point: Vec2::default(),
            fold_corner: Vec2::default(),
        }
    }

    /// Fraction along the clip mask's long axis where the crease sits.
    pub fn clip_pivot_fraction(&self) -> f32 {
        self.page_width / (self.page_diagonal + self.page_width)
    }

    /// Width and height of the rectangular clip mask.
    pub fn clip_mask_size(&self) -> (f32, f32) {
        (self.page_diagonal, self.page_diagonal + self.page_width)
    }

    pub fn clamp_drag_point(&self, point: Vec2) -> Vec2 {
        geometry::clamp_drag_point(
            point,
            self.bottom_center,
            self.top_center,
            self.page_width,
            self.page_diagonal,
        )
    }
}

/// Outcome of a fully settled turn, reported exactly once from
/// [`Book::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Whether the resting page index changed.
    pub advanced: bool,
}

/// One open book view: the model, the page slots, and at most one live
/// turn controller. The host feeds it pointer events and a per-frame
/// tick and receives poses through its [`BookHost`].
pub struct Book {
    model: BookModel,
    tracker: PageTracker,
    turn: Option<TurnController>,
    settle_duration: f32,
    pre_turn_index: i32,
}

impl Book {
    pub fn new(page_count: u32, leaf: LeafSize) -> Self {
        Self {
            model: BookModel::new(leaf),
            tracker: PageTracker::new(page_count),
            turn: None,
            settle_duration: DEFAULT_SETTLE_DURATION,
            pre_turn_index: -1,
        }
    }

    pub fn model(&self) -> &BookModel {
        &self.model
    }

    pub fn layout(&self) -> PageLayout {
        self.tracker.layout()
    }

    pub fn page_count(&self) -> u32 {
        self.tracker.page_count()
    }

    pub fn is_turning(&self) -> bool {
        self.turn.is_some()
    }

    pub fn phase(&self) -> Option<TurnPhase> {
        self.turn.as_ref().map(|t| t.phase())
    }

    pub fn settle_duration(&self) -> f32 {
        self.settle_duration
    }

    pub fn set_settle_duration(&mut self, seconds: f32) {
        self.settle_duration = seconds.max(1e-3);
    }

    /// Jump to a resting position without animating. Ignored while a
    /// turn is live.
    pub fn open_at<H: BookHost>(&mut self, index: i32, host: &mut H) {
        self.tracker.open_at(index);
        host.pages_changed(self.tracker.layout());
    }

    /// Start a turn gesture at `world_point`. Rejected while another
    /// turn is live (settling included) or at the extremal index; a
    /// rejection changes nothing.
    pub fn begin_turn<H: BookHost>(
        &mut self,
        direction: Direction,
        world_point: Vec2,
        host: &mut H,
    ) -> Result<(), TurnError> {
        if self.turn.is_some() {
            return Err(TurnError::AlreadyTurning);
        }
        let before = self.tracker.left_index();
        self.tracker.begin(direction)?;
        self.pre_turn_index = before;

        let point = host.world_to_local(world_point);
        let controller = TurnController::begin(direction, point, &mut self.model, host);
        host.pages_changed(self.tracker.layout());
        self.turn = Some(controller);
        Ok(())
    }

    /// Feed the latest pointer position. A no-op unless a turn is in
    /// its dragging phase.
    pub fn drag_to<H: BookHost>(&mut self, world_point: Vec2, host: &mut H) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        if turn.phase() != TurnPhase::Dragging {
            return;
        }
        let point = host.world_to_local(world_point);
        turn.update(point, &mut self.model, host);
    }

    /// The pointer was released; the corner starts gliding toward the
    /// side it ended on. A no-op unless dragging.
    pub fn release(&mut self) {
        if let Some(turn) = self.turn.as_mut() {
            turn.end(&self.model, self.settle_duration);
        }
    }

    /// Advance the settle animation by `dt` seconds. Returns the
    /// outcome exactly once, on the frame the turn fully settles.
    pub fn tick<H: BookHost>(&mut self, dt: f32, host: &mut H) -> Option<TurnOutcome> {
        let turn = self.turn.as_mut()?;
        match turn.tick(dt, &mut self.model, host) {
            TurnStatus::Idle | TurnStatus::Settling => None,
            TurnStatus::Settled => {
                let advanced = self.tracker.settle(turn.ended_right(), self.pre_turn_index);
                self.turn = None;
                host.end_turn();
                host.pages_changed(self.tracker.layout());
                debug!("turn outcome: advanced={advanced}");
                Some(TurnOutcome { advanced })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ClipPose;

    const LEAF: LeafSize = LeafSize {
        width: 100.0,
        height: 200.0,
    };

    #[derive(Default)]
    struct MockHost {
        began: Vec<(Direction, Vec2, Vec2, Vec2)>,
        clip_poses: Vec<ClipPose>,
        back_faces: Vec<(Vec2, f32)>,
        raised: usize,
        shadows: usize,
        ended: usize,
        layouts: Vec<PageLayout>,
    }

    impl BookHost for MockHost {
        fn world_to_local(&self, point: Vec2) -> Vec2 {
            point
        }
        fn local_to_world(&self, point: Vec2) -> Vec2 {
            point
        }
        fn begin_turn(
            &mut self,
            direction: Direction,
            leaf_origin: Vec2,
            leaf_pivot: Vec2,
            clip_pivot: Vec2,
        ) {
            self.began.push((direction, leaf_origin, leaf_pivot, clip_pivot));
        }
        fn set_clip_pose(&mut self, pose: &ClipPose) {
            self.clip_poses.push(*pose);
        }
        fn set_back_face(&mut self, position_world: Vec2, rotation_deg: f32) {
            self.back_faces.push((position_world, rotation_deg));
        }
        fn raise_front_face(&mut self) {
            self.raised += 1;
        }
        fn follow_shadow(&mut self) {
            self.shadows += 1;
        }
        fn end_turn(&mut self) {
            self.ended += 1;
        }
        fn pages_changed(&mut self, layout: PageLayout) {
            self.layouts.push(layout);
        }
    }

    fn settle_out(book: &mut Book, host: &mut MockHost) -> TurnOutcome {
        for _ in 0..240 {
            if let Some(outcome) = book.tick(1.0 / 60.0, host) {
                return outcome;
            }
        }
        panic!("turn never settled");
    }

    #[test]
    fn model_reference_points_follow_leaf_size() {
        let model = BookModel::new(LEAF);
        assert_eq!(model.bottom_center, Vec2::new(0.0, -100.0));
        assert_eq!(model.top_center, Vec2::new(0.0, 100.0));
        assert_eq!(model.left_corner, Vec2::new(-100.0, -100.0));
        assert_eq!(model.right_corner, Vec2::new(100.0, -100.0));
        assert!((model.page_diagonal - 223.6068).abs() < 1e-3);
        let (w, h) = model.clip_mask_size();
        assert!((w - model.page_diagonal).abs() < 1e-4);
        assert!((h - (model.page_diagonal + 100.0)).abs() < 1e-4);
        assert!(
            (model.clip_pivot_fraction() - 100.0 / (model.page_diagonal + 100.0)).abs() < 1e-5
        );
    }

    #[test]
    fn committed_right_turn_advances_by_two() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host)
            .unwrap();
        assert_eq!(
            book.layout(),
            PageLayout::Turning {
                left_static: -1,
                left_moving: 0,
                right_moving: 1,
                right_static: 2,
            }
        );
        book.drag_to(Vec2::new(60.0, -40.0), &mut host);
        assert!(!host.clip_poses.is_empty());
        assert_eq!(host.raised, host.clip_poses.len());

        // Released right of the spine: the index advances.
        book.release();
        let outcome = settle_out(&mut book, &mut host);
        assert!(outcome.advanced);
        assert_eq!(book.layout(), PageLayout::Resting { left: 1, right: 2 });
        assert_eq!(host.ended, 1);
        assert!(!book.is_turning());
    }

    #[test]
    fn right_turn_released_left_settles_to_left_corner_without_advance() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host)
            .unwrap();
        book.drag_to(Vec2::new(-40.0, -30.0), &mut host);
        book.release();

        let outcome = settle_out(&mut book, &mut host);
        assert!(!outcome.advanced);
        assert_eq!(book.layout(), PageLayout::Resting { left: -1, right: 0 });

        // The glide converged on the left outer corner.
        let final_point = book.model.drag_point;
        assert!(final_point.x <= -100.0 + 1e-2);
    }

    #[test]
    fn left_turn_released_left_reveals_previous_pages() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        // Get to a spread that has pages on the left.
        book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host)
            .unwrap();
        book.release();
        assert!(settle_out(&mut book, &mut host).advanced);
        assert_eq!(book.layout(), PageLayout::Resting { left: 1, right: 2 });

        book.begin_turn(Direction::Left, Vec2::new(-95.0, -95.0), &mut host)
            .unwrap();
        book.drag_to(Vec2::new(-60.0, -50.0), &mut host);
        book.release();
        let outcome = settle_out(&mut book, &mut host);
        assert!(outcome.advanced);
        assert_eq!(book.layout(), PageLayout::Resting { left: -1, right: 0 });
    }

    #[test]
    fn begin_rejected_while_settling() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host)
            .unwrap();
        book.release();
        book.tick(1.0 / 60.0, &mut host);
        assert_eq!(book.phase(), Some(TurnPhase::Settling));
        assert_eq!(
            book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host),
            Err(TurnError::AlreadyTurning)
        );
    }

    #[test]
    fn begin_rejected_at_extremity_changes_nothing() {
        let mut book = Book::new(4, LEAF);
        let mut host = MockHost::default();
        book.open_at(2, &mut host);
        host.layouts.clear();

        assert_eq!(
            book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host),
            Err(TurnError::NoFurtherPages)
        );
        assert!(host.began.is_empty());
        assert!(host.layouts.is_empty());
        assert_eq!(book.layout(), PageLayout::Resting { left: 2, right: 3 });
    }

    #[test]
    fn drag_ignored_outside_dragging_phase() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        book.drag_to(Vec2::new(10.0, 10.0), &mut host);
        assert!(host.clip_poses.is_empty());

        book.begin_turn(Direction::Right, Vec2::new(95.0, -95.0), &mut host)
            .unwrap();
        book.release();
        let settling_poses = host.clip_poses.len();
        book.drag_to(Vec2::new(10.0, 10.0), &mut host);
        assert_eq!(host.clip_poses.len(), settling_poses);
    }

    #[test]
    fn poses_stay_finite_through_a_full_gesture() {
        let mut book = Book::new(8, LEAF);
        let mut host = MockHost::default();

        book.begin_turn(Direction::Right, Vec2::new(100.0, -100.0), &mut host)
            .unwrap();
        // Sweep across the spread, including the exact book corner and
        // points far outside the reach envelope.
        for p in [
            Vec2::new(100.0, -100.0),
            Vec2::new(400.0, 300.0),
            Vec2::new(0.0, -100.0),
            Vec2::new(-250.0, 80.0),
        ] {
            book.drag_to(p, &mut host);
        }
        book.release();
        settle_out(&mut book, &mut host);

        for pose in &host.clip_poses {
            assert!(pose.rotation_deg.is_finite());
            assert!(pose.position.is_finite());
        }
        for (pos, rot) in &host.back_faces {
            assert!(pos.is_finite());
            assert!(rot.is_finite());
        }
    }
}
