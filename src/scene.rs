//! Canvas scene: the render surface the viewport controller drives, plus the
//! screen-to-world mapping used to drag the cube.

use web_sys::CanvasRenderingContext2d;

use crate::model::Transform3;
use crate::state::camera::{Camera, Vec3, cube_corners};
use crate::state::lod::{GridLayout, GridTier, TierOpacities};
use crate::state::viewport::RenderSurface;

pub const CUBE_HALF: f64 = 0.5;
const AXIS_LENGTH: f64 = 500.0;
const BACKGROUND: &str = "#0e1116";
/// Tiers below this opacity are skipped entirely.
const MIN_VISIBLE_OPACITY: f64 = 0.002;

// corner indices follow `cube_corners`: bit 0 = +x, bit 1 = +y, bit 2 = +z
const CUBE_FACES: [([usize; 4], Vec3); 6] = [
    ([0, 2, 6, 4], Vec3::new(-1.0, 0.0, 0.0)),
    ([1, 5, 7, 3], Vec3::new(1.0, 0.0, 0.0)),
    ([0, 4, 5, 1], Vec3::new(0.0, -1.0, 0.0)),
    ([2, 3, 7, 6], Vec3::new(0.0, 1.0, 0.0)),
    ([0, 1, 3, 2], Vec3::new(0.0, 0.0, -1.0)),
    ([4, 6, 7, 5], Vec3::new(0.0, 0.0, 1.0)),
];

pub struct Scene {
    pub camera: Camera,
    pub opacities: TierOpacities,
    pub object: Transform3,
    pub show_axes: bool,
    pub highlight: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            opacities: TierOpacities::default(),
            object: Transform3::ORIGIN,
            show_axes: true,
            highlight: false,
        }
    }
}

impl RenderSurface for Scene {
    fn camera_distance(&self) -> f64 {
        self.camera.distance_to_origin()
    }

    fn set_tier_opacity(&mut self, tier: GridTier, opacity: f64) {
        self.opacities.set(tier, opacity.clamp(0.0, 1.0));
    }

    fn set_object_transform(&mut self, transform: Transform3) {
        self.object = transform;
    }
}

fn to_vec(t: Transform3) -> Vec3 {
    Vec3::new(t.x(), t.y(), t.z())
}

impl Scene {
    /// Whether a canvas pixel lands on the cube's screen footprint.
    pub fn hit_object(&self, sx: f64, sy: f64) -> bool {
        match self.camera.cube_screen_bounds(to_vec(self.object), CUBE_HALF) {
            Some((min_x, min_y, max_x, max_y)) => {
                sx >= min_x && sx <= max_x && sy >= min_y && sy <= max_y
            }
            None => false,
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        let w = self.camera.viewport_w;
        let h = self.camera.viewport_h;
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str(BACKGROUND);
        ctx.fill_rect(0.0, 0.0, w, h);

        // finest first so the coarse blue reference grid ends up on top
        for tier in GridTier::ALL.iter().rev() {
            let alpha = self.opacities.get(*tier);
            if alpha < MIN_VISIBLE_OPACITY {
                continue;
            }
            self.draw_grid(ctx, tier.layout(), alpha);
        }
        ctx.set_global_alpha(1.0);
        if self.show_axes {
            self.draw_axes(ctx);
        }
        self.draw_cube(ctx);
    }

    fn draw_grid(&self, ctx: &CanvasRenderingContext2d, layout: GridLayout, alpha: f64) {
        let half = layout.size * 0.5;
        let step = layout.step();
        ctx.set_global_alpha(alpha);
        ctx.set_stroke_style_str(layout.color);
        ctx.set_line_width(1.0);
        ctx.begin_path();
        for i in 0..=layout.divisions {
            let v = -half + i as f64 * step;
            self.path_segment(ctx, Vec3::new(v, 0.0, -half), Vec3::new(v, 0.0, half));
            self.path_segment(ctx, Vec3::new(-half, 0.0, v), Vec3::new(half, 0.0, v));
        }
        ctx.stroke();
    }

    fn path_segment(&self, ctx: &CanvasRenderingContext2d, a: Vec3, b: Vec3) {
        if let Some(((x0, y0), (x1, y1))) = self.camera.project_segment(a, b) {
            ctx.move_to(x0, y0);
            ctx.line_to(x1, y1);
        }
    }

    fn draw_axes(&self, ctx: &CanvasRenderingContext2d) {
        let axes = [
            (Vec3::new(AXIS_LENGTH, 0.0, 0.0), "#ff3b30"),
            (Vec3::new(0.0, AXIS_LENGTH, 0.0), "#34c759"),
            (Vec3::new(0.0, 0.0, AXIS_LENGTH), "#0a84ff"),
        ];
        ctx.set_line_width(1.5);
        for (end, color) in axes {
            ctx.set_stroke_style_str(color);
            ctx.begin_path();
            self.path_segment(ctx, Vec3::ZERO, end);
            ctx.stroke();
        }
    }

    fn draw_cube(&self, ctx: &CanvasRenderingContext2d) {
        let center = to_vec(self.object);
        let corners = cube_corners(center, CUBE_HALF);
        let eye = self.camera.eye();
        let light = Vec3::new(2.0, 2.0, 2.0).normalize();
        for (idx, normal) in CUBE_FACES.iter() {
            let face_center = center + *normal * CUBE_HALF;
            if normal.dot(eye - face_center) <= 0.0 {
                continue;
            }
            let mut pts = [(0.0, 0.0); 4];
            let mut visible = true;
            for (slot, &i) in pts.iter_mut().zip(idx.iter()) {
                match self.camera.project(corners[i]) {
                    Some(p) => *slot = p,
                    None => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }
            let shade = 0.45 + 0.55 * normal.dot(light).max(0.0);
            ctx.set_fill_style_str(&format!(
                "rgb({}, {}, {})",
                (235.0 * shade) as u8,
                (40.0 * shade) as u8,
                (40.0 * shade) as u8
            ));
            ctx.begin_path();
            ctx.move_to(pts[0].0, pts[0].1);
            for p in &pts[1..] {
                ctx.line_to(p.0, p.1);
            }
            ctx.close_path();
            ctx.fill();
            ctx.set_stroke_style_str(if self.highlight { "#f2cc60" } else { "#5a1010" });
            ctx.set_line_width(if self.highlight { 2.0 } else { 1.0 });
            ctx.stroke();
        }
    }
}

/// Pointer-to-world mapping for one cube drag. A plain drag slides the cube on
/// the horizontal plane through its centre; a vertical drag moves it along Y by
/// screen-space distance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGrip {
    pub anchor: Transform3,
    grab: Vec3,
    vertical: bool,
    start_sy: f64,
    units_per_px: f64,
}

impl DragGrip {
    pub fn begin(camera: &Camera, object: Transform3, sx: f64, sy: f64, vertical: bool) -> Option<Self> {
        let pos = to_vec(object);
        if vertical {
            return Some(Self {
                anchor: object,
                grab: pos,
                vertical,
                start_sy: sy,
                units_per_px: camera.world_per_pixel_at(pos),
            });
        }
        let grab = camera.pick_on_plane_y(sx, sy, object.y())?;
        Some(Self {
            anchor: object,
            grab,
            vertical,
            start_sy: sy,
            units_per_px: 0.0,
        })
    }

    pub fn transform_at(&self, camera: &Camera, sx: f64, sy: f64) -> Option<Transform3> {
        let a = self.anchor;
        if self.vertical {
            let dy = (self.start_sy - sy) * self.units_per_px;
            return Some(Transform3::new(a.x(), a.y() + dy, a.z()));
        }
        let hit = camera.pick_on_plane_y(sx, sy, a.y())?;
        Some(Transform3::new(
            a.x() + hit.x - self.grab.x,
            a.y(),
            a.z() + hit.z - self.grab.z,
        ))
    }
}
