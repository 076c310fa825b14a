// Orbit camera: spherical coordinates around a target point plus the pointer
// bookkeeping for orbit/pan drags.
use std::ops::{Add, Mul, Sub};

pub const MIN_DISTANCE: f64 = 1.0;
pub const MAX_DISTANCE: f64 = 500.0;
pub const INITIAL_EYE: [f64; 3] = [5.0, 5.0, 5.0];
const FOV_Y_DEG: f64 = 75.0;
const NEAR: f64 = 0.1;
const MAX_PITCH: f64 = 89.0 * std::f64::consts::PI / 180.0;
const ORBIT_RAD_PER_PX: f64 = 0.005;
const DOLLY_PER_WHEEL_UNIT: f64 = 0.001;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    pub const UP: Vec3 = Vec3 {
        x: 0.0,
        y: 1.0,
        z: 0.0,
    };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
    pub fn dot(self, o: Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }
    pub fn cross(self, o: Vec3) -> Vec3 {
        Vec3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
    pub fn normalize(self) -> Vec3 {
        let l = self.length();
        if l > 0.0 { self * (1.0 / l) } else { self }
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub viewport_w: f64,
    pub viewport_h: f64,
    pub orbiting: bool,
    pub panning: bool,
    pub last_x: f64,
    pub last_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        let [x, y, z] = INITIAL_EYE;
        Self::looking_at(Vec3::new(x, y, z), Vec3::ZERO)
    }
}

impl Camera {
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().clamp(MIN_DISTANCE, MAX_DISTANCE);
        let yaw = offset.x.atan2(offset.z);
        let pitch = (offset.y / offset.length().max(f64::EPSILON))
            .clamp(-1.0, 1.0)
            .asin()
            .clamp(-MAX_PITCH, MAX_PITCH);
        Self {
            target,
            distance,
            yaw,
            pitch,
            viewport_w: 800.0,
            viewport_h: 600.0,
            orbiting: false,
            panning: false,
            last_x: 0.0,
            last_y: 0.0,
        }
    }

    pub fn reset(&mut self) {
        let (w, h) = (self.viewport_w, self.viewport_h);
        *self = Self::default();
        self.set_viewport(w, h);
    }

    pub fn set_viewport(&mut self, w: f64, h: f64) {
        self.viewport_w = w.max(1.0);
        self.viewport_h = h.max(1.0);
    }

    pub fn eye(&self) -> Vec3 {
        let (sp, cp) = self.pitch.sin_cos();
        let (sy, cy) = self.yaw.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// What the grid LOD keys on: distance from the eye to the world origin,
    /// not to the orbit target.
    pub fn distance_to_origin(&self) -> f64 {
        self.eye().length()
    }

    /// (right, up, forward) unit vectors.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(Vec3::UP).normalize();
        let up = right.cross(forward);
        (right, up, forward)
    }

    fn focal_px(&self) -> f64 {
        (self.viewport_h * 0.5) / (FOV_Y_DEG.to_radians() * 0.5).tan()
    }

    fn to_view(&self, p: Vec3) -> Vec3 {
        let (right, up, forward) = self.basis();
        let rel = p - self.eye();
        Vec3::new(rel.dot(right), rel.dot(up), rel.dot(forward))
    }

    fn view_to_screen(&self, v: Vec3) -> (f64, f64) {
        let f = self.focal_px();
        (
            self.viewport_w * 0.5 + f * v.x / v.z,
            self.viewport_h * 0.5 - f * v.y / v.z,
        )
    }

    /// Screen position of a world point, `None` when it is behind the near plane.
    pub fn project(&self, p: Vec3) -> Option<(f64, f64)> {
        let v = self.to_view(p);
        if v.z < NEAR {
            return None;
        }
        Some(self.view_to_screen(v))
    }

    /// Project a world segment, clipped against the near plane.
    pub fn project_segment(&self, a: Vec3, b: Vec3) -> Option<((f64, f64), (f64, f64))> {
        let mut va = self.to_view(a);
        let mut vb = self.to_view(b);
        if va.z < NEAR && vb.z < NEAR {
            return None;
        }
        if va.z < NEAR {
            let t = (NEAR - va.z) / (vb.z - va.z);
            va = va + (vb - va) * t;
        } else if vb.z < NEAR {
            let t = (NEAR - vb.z) / (va.z - vb.z);
            vb = vb + (va - vb) * t;
        }
        Some((self.view_to_screen(va), self.view_to_screen(vb)))
    }

    /// Unit ray through a screen pixel, starting at the eye.
    pub fn ray(&self, sx: f64, sy: f64) -> (Vec3, Vec3) {
        let (right, up, forward) = self.basis();
        let f = self.focal_px();
        let dx = (sx - self.viewport_w * 0.5) / f;
        let dy = -(sy - self.viewport_h * 0.5) / f;
        (self.eye(), (forward + right * dx + up * dy).normalize())
    }

    /// Where the pixel's ray meets the horizontal plane `y = plane_y`.
    pub fn pick_on_plane_y(&self, sx: f64, sy: f64, plane_y: f64) -> Option<Vec3> {
        let (origin, dir) = self.ray(sx, sy);
        if dir.y.abs() < 1e-9 {
            return None;
        }
        let t = (plane_y - origin.y) / dir.y;
        if t <= 0.0 {
            return None;
        }
        Some(origin + dir * t)
    }

    /// World units covered by one screen pixel at the depth of `p`.
    pub fn world_per_pixel_at(&self, p: Vec3) -> f64 {
        let depth = self.to_view(p).z.max(NEAR);
        depth / self.focal_px()
    }

    /// Screen-space bounding box (min_x, min_y, max_x, max_y) of an axis-aligned
    /// cube, `None` if any corner is behind the camera.
    pub fn cube_screen_bounds(&self, center: Vec3, half: f64) -> Option<(f64, f64, f64, f64)> {
        let mut bounds = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for corner in cube_corners(center, half) {
            let (x, y) = self.project(corner)?;
            bounds.0 = bounds.0.min(x);
            bounds.1 = bounds.1.min(y);
            bounds.2 = bounds.2.max(x);
            bounds.3 = bounds.3.max(y);
        }
        Some(bounds)
    }

    pub fn orbit(&mut self, dx_px: f64, dy_px: f64) {
        self.yaw -= dx_px * ORBIT_RAD_PER_PX;
        self.pitch = (self.pitch + dy_px * ORBIT_RAD_PER_PX).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn pan(&mut self, dx_px: f64, dy_px: f64) {
        let (right, up, _) = self.basis();
        let scale = self.distance / self.focal_px();
        self.target = self.target - right * (dx_px * scale) + up * (dy_px * scale);
    }

    /// Wheel dolly: positive delta moves away.
    pub fn dolly(&mut self, wheel_delta: f64) {
        self.zoom_by((wheel_delta * DOLLY_PER_WHEEL_UNIT).exp());
    }

    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }
}

pub fn cube_corners(center: Vec3, half: f64) -> [Vec3; 8] {
    let mut out = [Vec3::ZERO; 8];
    for (i, slot) in out.iter_mut().enumerate() {
        let sx = if i & 1 == 0 { -half } else { half };
        let sy = if i & 2 == 0 { -half } else { half };
        let sz = if i & 4 == 0 { -half } else { half };
        *slot = center + Vec3::new(sx, sy, sz);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn near(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn default_eye_matches_initial_position() {
        let cam = Camera::default();
        let eye = cam.eye();
        assert!(near(eye.x, 5.0, 1e-9) && near(eye.y, 5.0, 1e-9) && near(eye.z, 5.0, 1e-9));
        assert!(near(cam.distance_to_origin(), 75f64.sqrt(), 1e-9));
    }

    #[test]
    fn target_projects_to_viewport_center() {
        let mut cam = Camera::default();
        cam.set_viewport(1024.0, 768.0);
        let (x, y) = cam.project(Vec3::ZERO).unwrap();
        assert!(near(x, 512.0, 1e-6) && near(y, 384.0, 1e-6));
    }

    #[test]
    fn points_behind_eye_do_not_project() {
        let cam = Camera::default();
        assert!(cam.project(Vec3::new(20.0, 20.0, 20.0)).is_none());
    }

    #[test]
    fn segment_crossing_near_plane_is_clipped() {
        let cam = Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        // runs from in front of the camera to far behind it
        let seg = cam.project_segment(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, -1.0, 50.0));
        assert!(seg.is_some());
        let both_behind =
            cam.project_segment(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 12.0));
        assert!(both_behind.is_none());
    }

    #[test]
    fn ground_pick_inverts_projection() {
        let mut cam = Camera::default();
        cam.set_viewport(900.0, 700.0);
        let p = Vec3::new(1.25, 0.0, -0.75);
        let (sx, sy) = cam.project(p).unwrap();
        let hit = cam.pick_on_plane_y(sx, sy, 0.0).unwrap();
        assert!(near(hit.x, p.x, 1e-6) && near(hit.y, 0.0, 1e-9) && near(hit.z, p.z, 1e-6));
    }

    #[test]
    fn pick_above_horizon_misses_ground() {
        let cam = Camera::default();
        assert!(cam.pick_on_plane_y(400.0, -5000.0, 0.0).is_none());
    }

    #[test]
    fn dolly_and_zoom_clamp_distance() {
        let mut cam = Camera::default();
        cam.dolly(100_000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
        cam.zoom_by(1e-9);
        assert_eq!(cam.distance, MIN_DISTANCE);
        cam.zoom_by(f64::NAN);
        assert_eq!(cam.distance, MIN_DISTANCE);
    }

    #[test]
    fn orbit_clamps_pitch_and_keeps_distance() {
        let mut cam = Camera::default();
        let d = cam.distance;
        cam.orbit(120.0, 10_000.0);
        assert!(cam.pitch <= MAX_PITCH);
        assert!(near((cam.eye() - cam.target).length(), d, 1e-9));
    }

    #[test]
    fn pan_moves_target_and_origin_distance() {
        let mut cam = Camera::default();
        let before = cam.distance_to_origin();
        cam.pan(200.0, 0.0);
        assert!(cam.target.length() > 0.0);
        assert!(near(cam.distance, 75f64.sqrt(), 1e-9));
        assert!(!near(cam.distance_to_origin(), before, 1e-6));
    }

    #[test]
    fn cube_bounds_contain_center_projection() {
        let cam = Camera::default();
        let (min_x, min_y, max_x, max_y) = cam.cube_screen_bounds(Vec3::ZERO, 0.5).unwrap();
        let (cx, cy) = cam.project(Vec3::ZERO).unwrap();
        assert!(min_x < cx && cx < max_x && min_y < cy && cy < max_y);
    }

    #[test]
    fn reset_keeps_viewport_size() {
        let mut cam = Camera::default();
        cam.set_viewport(300.0, 200.0);
        cam.orbit(50.0, 50.0);
        cam.reset();
        assert_eq!((cam.viewport_w, cam.viewport_h), (300.0, 200.0));
        assert!(near(cam.eye().x, 5.0, 1e-9));
    }
}
