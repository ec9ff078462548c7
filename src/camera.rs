use crate::vec2::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub pos: Vec2,   // position in map-cell units
    pub dir: Vec2,   // unit-length heading
    pub plane: Vec2, // half-width of the view plane, |plane| / |dir| = tan(fov / 2)
}

impl Camera {
    pub fn new(pos: Vec2, dir: Vec2, plane: Vec2) -> Self {
        Self { pos, dir, plane }
    }

    /// Camera looking along `dir` with a horizontal field of view of `fov_deg`.
    /// The plane points to the right of `dir` in screen terms (+90 degrees).
    ///
    /// `dir` must be non-zero.
    pub fn with_fov(pos: Vec2, dir: Vec2, fov_deg: f64) -> Self {
        let dir = dir.normalize();
        let half = 0.5 * fov_deg.to_radians();
        let plane = dir.rotated(std::f64::consts::FRAC_PI_2) * half.tan();
        Self { pos, dir, plane }
    }

    /// Rigid rotation of both `dir` and `plane` by `angle` radians.
    #[inline]
    pub fn rotated(&self, angle: f64) -> Self {
        Self {
            pos: self.pos,
            dir: self.dir.rotated(angle),
            plane: self.plane.rotated(angle),
        }
    }

    /// Translate along `dir`; negative distances move backwards. No collision checks.
    #[inline]
    pub fn moved(&self, distance: f64) -> Self {
        Self {
            pos: self.pos + self.dir * distance,
            ..*self
        }
    }

    pub fn fov_degrees(&self) -> f64 {
        2.0 * (self.plane.length() / self.dir.length()).atan().to_degrees()
    }

    /// Horizontal screen offset of `column`, from -1 at the left edge towards +1.
    #[inline]
    pub fn camera_x(column: usize, width: usize) -> f64 {
        2.0 * (column as f64 / width as f64) - 1.0
    }

    /// Ray direction through `column`. Deliberately left unnormalized: the
    /// perpendicular distance formula in the raycaster depends on it.
    #[inline]
    pub fn ray_dir(&self, column: usize, width: usize) -> Vec2 {
        self.dir + self.plane * Self::camera_x(column, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_camera() -> Camera {
        Camera::new(
            Vec2::new(5.0, 5.0),
            Vec2::new(-1.0, 0.1).normalize(),
            Vec2::new(0.0, 0.66),
        )
    }

    fn close(a: Vec2, b: Vec2, eps: f64) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn rotation_is_rigid() {
        let cam = start_camera();
        let angle_between = |c: &Camera| c.dir.dot(c.plane) / (c.dir.length() * c.plane.length());
        for step in [-0.12, 0.12, 1.0, -3.0, 7.5] {
            let r = cam.rotated(step);
            assert!((r.dir.length() - cam.dir.length()).abs() < 1e-12);
            assert!((r.plane.length() - cam.plane.length()).abs() < 1e-12);
            assert!((angle_between(&r) - angle_between(&cam)).abs() < 1e-12);
            assert_eq!(r.pos, cam.pos);
        }
    }

    #[test]
    fn rotations_compose() {
        let cam = start_camera();
        for (a, b) in [(0.12, 0.12), (-0.3, 1.1), (2.0, -5.0)] {
            let stepwise = cam.rotated(a).rotated(b);
            let direct = cam.rotated(a + b);
            assert!(close(stepwise.dir, direct.dir, 1e-12));
            assert!(close(stepwise.plane, direct.plane, 1e-12));
        }
    }

    #[test]
    fn many_small_turns_keep_magnitude() {
        let mut cam = start_camera();
        for _ in 0..1000 {
            cam = cam.rotated(0.12);
        }
        assert!((cam.dir.length() - 1.0).abs() < 1e-9);
        assert!((cam.plane.length() - 0.66).abs() < 1e-9);
    }

    #[test]
    fn move_follows_direction() {
        let cam = Camera::new(Vec2::new(5.0, 5.0), Vec2::new(0.0, 1.0), Vec2::new(-0.66, 0.0));
        let fwd = cam.moved(0.1);
        assert!(close(fwd.pos, Vec2::new(5.0, 5.1), 1e-12));
        let back = fwd.moved(-0.1);
        assert!(close(back.pos, cam.pos, 1e-12));
        assert_eq!(back.dir, cam.dir);
    }

    #[test]
    fn fov_round_trips() {
        let cam = Camera::with_fov(Vec2::new(2.5, 2.5), Vec2::new(3.0, 0.0), 90.0);
        assert!(close(cam.dir, Vec2::new(1.0, 0.0), 1e-12));
        assert!(close(cam.plane, Vec2::new(0.0, 1.0), 1e-12));
        assert!((cam.fov_degrees() - 90.0).abs() < 1e-9);
        assert!((start_camera().fov_degrees() - 66.8).abs() < 0.1);
    }

    #[test]
    fn edge_and_center_rays() {
        let cam = start_camera();
        for width in [320usize, 321, 4, 5] {
            let left = cam.ray_dir(0, width);
            assert!(close(left, cam.dir - cam.plane, 1e-12));

            // the last column sits one step short of +1
            let step = 2.0 / width as f64;
            let right = cam.ray_dir(width - 1, width);
            assert!(close(right, cam.dir + cam.plane, step * cam.plane.length() + 1e-12));

            let center = cam.ray_dir(width / 2, width);
            if width % 2 == 0 {
                assert!(close(center, cam.dir, 1e-12));
            } else {
                assert!(close(center, cam.dir, 0.5 * step * cam.plane.length() + 1e-12));
            }
        }
    }
}
