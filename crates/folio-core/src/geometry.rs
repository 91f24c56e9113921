//! Fold geometry for the page-turn effect.
//!
//! Everything in this module is a pure function over book-local
//! coordinates: y-up, origin at the center of the open spread, spine at
//! x = 0. The dragged corner is first clamped into the reachable
//! envelope of the paper, then the fold crease is the perpendicular
//! bisector of the segment between the dragged corner and the resting
//! book corner: any point on that line is equidistant from both, which
//! is exactly the condition for a paper fold mapping one onto the other.

/// 2D point / vector in book-local space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn from_angle(radians: f32) -> Self {
        Self {
            x: radians.cos(),
            y: radians.sin(),
        }
    }

    /// Bearing of this vector from the +x axis, in radians.
    #[inline]
    pub fn bearing(self) -> f32 {
        self.y.atan2(self.x)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

/// The fold crease at the book's bottom edge.
///
/// `cross` is where the crease meets the bottom edge; `angle_deg` is the
/// orientation of the crease line through the midpoint of the dragged
/// corner and the book corner.
#[derive(Clone, Copy, Debug)]
pub struct FoldLine {
    pub angle_deg: f32,
    pub cross: Vec2,
}

impl FoldLine {
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.angle_deg.is_finite() && self.cross.is_finite()
    }
}

/// Rotation and position of the rectangular clip mask that separates the
/// still-flat part of the turning page from the folded triangle.
#[derive(Clone, Copy, Debug)]
pub struct ClipPose {
    pub rotation_deg: f32,
    pub position: Vec2,
}

/// Clamp a raw pointer position into the reachable envelope of the page
/// corner: within `page_width` of the bottom center, then within
/// `page_diagonal` of the top center. The clamps are applied in that
/// order, the second to the result of the first.
///
/// The second test measures the distance from `bottom_center` even
/// though the projection is anchored at `top_center`. That asymmetry is
/// kept as shipped behavior; see DESIGN.md.
pub fn clamp_drag_point(
    point: Vec2,
    bottom_center: Vec2,
    top_center: Vec2,
    page_width: f32,
    page_diagonal: f32,
) -> Vec2 {
    let near = limit_reach(point, bottom_center, bottom_center, page_width);
    limit_reach(near, top_center, bottom_center, page_diagonal)
}

/// Project `point` onto the circle of `radius` around `origin` along its
/// current bearing, unless its distance from `measure_from` is already
/// inside `radius`.
fn limit_reach(point: Vec2, origin: Vec2, measure_from: Vec2, radius: f32) -> Vec2 {
    if point.distance(measure_from) < radius {
        return point;
    }
    let bearing = (point - origin).bearing();
    origin + Vec2::from_angle(bearing) * radius
}

/// Compute the fold crease from the clamped drag corner and the resting
/// book corner.
///
/// The crease is the perpendicular bisector of `fold_corner <-> book_corner`;
/// its x-intercept at the bottom edge is clamped to the spine so that the
/// crease never crosses to the far page when the drag passes the midline.
pub fn fold_line(fold_corner: Vec2, book_corner: Vec2, bottom_center: Vec2) -> FoldLine {
    let mid = (fold_corner + book_corner) * 0.5;
    let bearing = (book_corner - mid).bearing();

    let mut cross_x = mid.x - (bottom_center.y - mid.y) * bearing.tan();
    cross_x = limit_cross_x(cross_x, book_corner.x, bottom_center.x);
    let cross = Vec2::new(cross_x, bottom_center.y);

    let angle_deg = (cross - mid).bearing().to_degrees();
    FoldLine { angle_deg, cross }
}

/// Snap the crease intercept to the spine when it lands on the opposite
/// side of it from the book corner.
fn limit_cross_x(cross_x: f32, book_corner_x: f32, spine_x: f32) -> f32 {
    if (cross_x < spine_x && book_corner_x > spine_x)
        || (cross_x > spine_x && book_corner_x < spine_x)
    {
        spine_x
    } else {
        cross_x
    }
}

/// Pose of the clip mask for a given crease. The mask is rotated so the
/// crease becomes its local up axis and positioned at the bottom-edge
/// intercept.
pub fn clip_pose(fold: &FoldLine) -> ClipPose {
    let rotation_deg = if fold.angle_deg > 0.0 {
        fold.angle_deg - 90.0
    } else {
        fold.angle_deg + 90.0
    };
    ClipPose {
        rotation_deg,
        position: fold.cross,
    }
}

/// Raw rotation of the folded-over back face, before the per-direction
/// normalization applied by [`crate::turn::Direction`].
pub fn back_face_rotation(fold_corner: Vec2, cross: Vec2) -> f32 {
    (cross - fold_corner).bearing().to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOTTOM: Vec2 = Vec2::new(0.0, 0.0);
    const TOP: Vec2 = Vec2::new(0.0, 200.0);
    const PAGE_WIDTH: f32 = 100.0;
    const PAGE_DIAGONAL: f32 = 141.4;

    fn clamp(p: Vec2) -> Vec2 {
        clamp_drag_point(p, BOTTOM, TOP, PAGE_WIDTH, PAGE_DIAGONAL)
    }

    fn assert_close(a: f32, b: f32, tol: f32) {
        assert!((a - b).abs() <= tol, "{a} !~ {b}");
    }

    #[test]
    fn point_inside_reach_passes_through() {
        let p = Vec2::new(90.0, 10.0);
        assert_eq!(clamp(p), p);
    }

    #[test]
    fn point_beyond_width_projects_onto_circle() {
        let clamped = clamp(Vec2::new(150.0, 10.0));
        assert_close(clamped.distance(BOTTOM), PAGE_WIDTH, 1e-3);
        // Bearing from the bottom center is preserved.
        assert_close(
            clamped.bearing(),
            Vec2::new(150.0, 10.0).bearing(),
            1e-5,
        );
        assert_close(clamped.x, 99.4, 0.5);
        assert_close(clamped.y, 6.6, 0.5);
    }

    #[test]
    fn clamp_is_idempotent() {
        let samples = [
            Vec2::new(150.0, 10.0),
            Vec2::new(-300.0, 250.0),
            Vec2::new(20.0, -5.0),
            Vec2::new(0.0, 400.0),
            Vec2::new(-95.0, 30.0),
        ];
        for p in samples {
            let once = clamp(p);
            let twice = clamp(once);
            assert_close(once.x, twice.x, 1e-3);
            assert_close(once.y, twice.y, 1e-3);
        }
    }

    #[test]
    fn crease_stays_between_spine_and_book_corner() {
        let book_corner = Vec2::new(100.0, 0.0);
        for i in 0..40 {
            let raw = Vec2::new(-140.0 + 7.0 * i as f32, 5.0 + 2.0 * i as f32);
            let corner = clamp(raw);
            let fold = fold_line(corner, book_corner, BOTTOM);
            assert!(fold.cross.x >= BOTTOM.x - 1e-3, "crossed spine: {fold:?}");
            assert!(
                fold.cross.x <= book_corner.x + 1e-3,
                "overshot corner: {fold:?}"
            );
        }
    }

    #[test]
    fn crease_is_equidistant_from_both_corners() {
        let book_corner = Vec2::new(100.0, 0.0);
        let corner = Vec2::new(40.0, 60.0);
        let fold = fold_line(corner, book_corner, BOTTOM);
        assert_close(
            fold.cross.distance(corner),
            fold.cross.distance(book_corner),
            1e-2,
        );
    }

    #[test]
    fn crease_snaps_to_spine_past_midline() {
        // Dragged all the way to the far page: the intercept would land
        // left of the spine and gets snapped onto it.
        let book_corner = Vec2::new(100.0, 0.0);
        let corner = clamp(Vec2::new(-100.0, 5.0));
        let fold = fold_line(corner, book_corner, BOTTOM);
        assert_close(fold.cross.x, 0.0, 1e-4);
    }

    #[test]
    fn clip_rotation_normalizes_toward_vertical() {
        let up = FoldLine {
            angle_deg: 120.0,
            cross: BOTTOM,
        };
        assert_close(clip_pose(&up).rotation_deg, 30.0, 1e-5);
        let down = FoldLine {
            angle_deg: -45.0,
            cross: BOTTOM,
        };
        assert_close(clip_pose(&down).rotation_deg, 45.0, 1e-5);
    }

    #[test]
    fn back_face_rotation_points_at_cross() {
        let deg = back_face_rotation(Vec2::new(50.0, 50.0), Vec2::new(100.0, 0.0));
        assert_close(deg, -45.0, 1e-4);
    }
}
