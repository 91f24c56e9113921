//! The per-gesture turn controller and the host-facing contracts.
//!
//! One controller exists per active gesture and walks
//! `Dragging -> Settling -> Done`. Both turn directions share the same
//! geometry and pose update; a [`Direction`] value supplies the four
//! side-specific parameters (clip pivot, leaf pivot, book corner, back
//! face angle sign) instead of two divergent code paths.

use log::debug;

use crate::animation::{SettleAnimation, SettleStatus};
use crate::book::BookModel;
use crate::geometry::{self, ClipPose, FoldLine, Vec2};
use crate::pages::PageLayout;

/// Which leaf the gesture is pulling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// The fixed corner the dragged corner folds against.
    pub(crate) fn book_corner(self, model: &BookModel) -> Vec2 {
        match self {
            Direction::Right => model.right_corner,
            Direction::Left => model.left_corner,
        }
    }

    /// Clip-mask pivot in unit rect coordinates, biased toward the
    /// bottom outer corner of the turning side. The vertical fraction
    /// puts the crease on the mask's long axis.
    pub(crate) fn clip_pivot(self, model: &BookModel) -> Vec2 {
        let y = model.clip_pivot_fraction();
        match self {
            Direction::Right => Vec2::new(1.0, y),
            Direction::Left => Vec2::new(0.0, y),
        }
    }

    /// Pivot of the moving leaf, on its outer edge.
    pub(crate) fn leaf_pivot(self) -> Vec2 {
        match self {
            Direction::Right => Vec2::new(1.0, 0.5),
            Direction::Left => Vec2::new(0.0, 0.5),
        }
    }

    /// Resting center of the moving leaf in book-local space.
    pub(crate) fn leaf_origin(self, model: &BookModel) -> Vec2 {
        let half = model.page_width * 0.5;
        match self {
            Direction::Right => Vec2::new(half, 0.0),
            Direction::Left => Vec2::new(-half, 0.0),
        }
    }

    /// Normalize the raw back-face rotation for this side. The left
    /// turn mirrors the angle; this is the one place the two sides
    /// differ beyond parameter substitution.
    pub(crate) fn back_face_angle(self, raw_deg: f32) -> f32 {
        match self {
            Direction::Right => raw_deg,
            Direction::Left => -raw_deg,
        }
    }
}

/// Rejections surfaced at the gesture boundary. Nothing here mutates
/// shared state; a rejected begin leaves the book exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnError {
    /// A controller is already live for this book, possibly mid-settle.
    AlreadyTurning,
    /// The turn would need a page slot outside the valid index range.
    NoFurtherPages,
}

impl std::fmt::Display for TurnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnError::AlreadyTurning => write!(f, "a page turn is already in progress"),
            TurnError::NoFurtherPages => write!(f, "no further pages in that direction"),
        }
    }
}

impl std::error::Error for TurnError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnPhase {
    Dragging,
    Settling,
    Done,
}

/// What a frame tick did with the live controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TurnStatus {
    Idle,
    Settling,
    Settled,
}

/// The rendering and resource collaborators the core pushes to. The
/// core never draws; it hands the host poses in book-local degrees and
/// positions and lets the host composite them.
pub trait BookHost {
    /// Map a pointer position from host space into book-local space.
    fn world_to_local(&self, point: Vec2) -> Vec2;
    /// Map a book-local position back into host space.
    fn local_to_world(&self, point: Vec2) -> Vec2;

    /// A turn gesture started: show the moving faces, park them at the
    /// resting pose of the turning leaf, and set the pivots for this
    /// side.
    fn begin_turn(&mut self, direction: Direction, leaf_origin: Vec2, leaf_pivot: Vec2, clip_pivot: Vec2);
    /// Rotation and position of the clip mask for this frame.
    fn set_clip_pose(&mut self, pose: &ClipPose);
    /// Host-space position and rotation of the folded-over back face.
    fn set_back_face(&mut self, position_world: Vec2, rotation_deg: f32);
    /// Re-parent the moving leaf's front face under the clip mask as the
    /// top-most sibling so it draws over the revealed page.
    fn raise_front_face(&mut self);
    /// Keep the drop shadow tracking the clip mask.
    fn follow_shadow(&mut self);
    /// The turn fully settled: hide the moving faces again.
    fn end_turn(&mut self);

    /// The set of visible page indices changed; refresh image lookups.
    fn pages_changed(&mut self, layout: PageLayout);
}

/// State machine for one page-turn gesture. Created by
/// [`crate::book::Book::begin_turn`] and dropped once the settle
/// completes.
#[derive(Debug)]
pub struct TurnController {
    direction: Direction,
    phase: TurnPhase,
    start_position: Vec2,
    last_fold: Option<FoldLine>,
    settle: Option<SettleAnimation>,
    ended_right: bool,
}

impl TurnController {
    pub(crate) fn begin<H: BookHost>(
        direction: Direction,
        point: Vec2,
        model: &mut BookModel,
        host: &mut H,
    ) -> Self {
        let start_position = direction.leaf_origin(model);
        host.begin_turn(direction, start_position, direction.leaf_pivot(), direction.clip_pivot(model));
        model.drag_point = point;
        Self {
            direction,
            phase: TurnPhase::Dragging,
            start_position,
            last_fold: None,
            settle: None,
            ended_right: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Where the moving leaf rests when the gesture cancels.
    pub fn start_position(&self) -> Vec2 {
        self.start_position
    }

    pub(crate) fn ended_right(&self) -> bool {
        self.ended_right
    }

    /// Recompute the fold from `point` and push all poses to the host.
    /// Called once per frame while dragging, and re-entered by the
    /// settle animation with synthetic points.
    pub(crate) fn update<H: BookHost>(&mut self, point: Vec2, model: &mut BookModel, host: &mut H) {
        model.drag_point = point;
        model.fold_corner = model.clamp_drag_point(point);

        let fold = geometry::fold_line(
            model.fold_corner,
            self.direction.book_corner(model),
            model.bottom_center,
        );
        // A degenerate drag position can blow up the crease intercept;
        // hold the last valid pose instead of pushing non-finite values.
        let fold = if fold.is_finite() {
            self.last_fold = Some(fold);
            fold
        } else {
            match self.last_fold {
                Some(held) => held,
                None => return,
            }
        };

        host.set_clip_pose(&geometry::clip_pose(&fold));

        let raw = geometry::back_face_rotation(model.fold_corner, fold.cross);
        let world = host.local_to_world(model.fold_corner);
        host.set_back_face(world, self.direction.back_face_angle(raw));

        host.raise_front_face();
        host.follow_shadow();
    }

    /// The pointer was released: resolve the destination corner from the
    /// last drag point and start the settle glide toward it.
    pub(crate) fn end(&mut self, model: &BookModel, duration: f32) {
        if self.phase != TurnPhase::Dragging {
            return;
        }
        self.ended_right = model.drag_point.x > model.bottom_center.x;
        let target = if self.ended_right {
            model.right_corner
        } else {
            model.left_corner
        };
        debug!(
            "drag released at {:?}, settling toward {target:?}",
            model.drag_point
        );
        self.settle = Some(SettleAnimation::new(model.drag_point, target, duration));
        self.phase = TurnPhase::Settling;
    }

    pub(crate) fn tick<H: BookHost>(
        &mut self,
        dt: f32,
        model: &mut BookModel,
        host: &mut H,
    ) -> TurnStatus {
        match self.phase {
            TurnPhase::Dragging | TurnPhase::Done => TurnStatus::Idle,
            TurnPhase::Settling => {
                let Some(anim) = self.settle.as_mut() else {
                    return TurnStatus::Idle;
                };
                let status = anim.tick(dt);
                let point = anim.point();
                self.update(point, model, host);
                if status == SettleStatus::Done {
                    self.phase = TurnPhase::Done;
                    TurnStatus::Settled
                } else {
                    TurnStatus::Settling
                }
            }
        }
    }
}
