//! Distance-driven grid level of detail.
//!
//! Four nested grid tiers cross-fade with linear ramps as the camera moves in,
//! on top of an always-present major grid. Each tier is a pure function of the
//! camera's distance to the world origin so it can be evaluated every frame.

/// Distance at which the major grid switches between its near and far opacity.
pub const MAJOR_NEAR_DISTANCE: f64 = 10.0;
pub const LEVEL0_THRESHOLD: f64 = 100.0;
pub const LEVEL1_THRESHOLD: f64 = 40.0;
pub const LEVEL2_THRESHOLD: f64 = 15.0;
pub const LEVEL3_THRESHOLD: f64 = 5.0;

const MAJOR_FAR_OPACITY: f64 = 0.7;
const MAJOR_NEAR_OPACITY: f64 = 0.4;
const LEVEL0_MAX: f64 = 0.6;
const LEVEL1_MAX: f64 = 0.5;
const LEVEL2_MAX: f64 = 0.4;
const LEVEL3_MAX: f64 = 0.3;

const LEVEL1_FADE_IN_BAND: f64 = 20.0;
const LEVEL1_FADE_OUT_BAND: f64 = 5.0;
/// Tier 1 fades out over this band above the level-2 threshold, so it is gone
/// before tier 3 starts fading in.
const LEVEL1_HANDOFF_BAND: f64 = 5.0;
/// Tier 2 fades out between the level-3 threshold and this distance, below
/// which tier 3 is already at full opacity.
const LEVEL2_HANDOFF_FLOOR: f64 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GridTier {
    Major,
    Level0,
    Level1,
    Level2,
    Level3,
}

impl GridTier {
    pub const ALL: [GridTier; 5] = [
        GridTier::Major,
        GridTier::Level0,
        GridTier::Level1,
        GridTier::Level2,
        GridTier::Level3,
    ];

    pub fn label(self) -> &'static str {
        match self {
            GridTier::Major => "Major",
            GridTier::Level0 => "Level 0",
            GridTier::Level1 => "Level 1",
            GridTier::Level2 => "Level 2",
            GridTier::Level3 => "Level 3",
        }
    }

    pub fn max_opacity(self) -> f64 {
        match self {
            GridTier::Major => MAJOR_FAR_OPACITY,
            GridTier::Level0 => LEVEL0_MAX,
            GridTier::Level1 => LEVEL1_MAX,
            GridTier::Level2 => LEVEL2_MAX,
            GridTier::Level3 => LEVEL3_MAX,
        }
    }

    /// Opacity of this tier at camera distance `d`.
    pub fn opacity_at(self, d: f64) -> f64 {
        match self {
            GridTier::Major => major_opacity(d),
            GridTier::Level0 => level0_opacity(d),
            GridTier::Level1 => level1_opacity(d),
            GridTier::Level2 => level2_opacity(d),
            GridTier::Level3 => level3_opacity(d),
        }
    }

    /// Square grid drawn for this tier: (total size, divisions, stroke colour).
    pub fn layout(self) -> GridLayout {
        match self {
            GridTier::Major => GridLayout::new(1000.0, 10, "#3471eb"),
            GridTier::Level0 => GridLayout::new(1000.0, 100, "#606060"),
            GridTier::Level1 => GridLayout::new(100.0, 50, "#808080"),
            GridTier::Level2 => GridLayout::new(100.0, 250, "#666666"),
            GridTier::Level3 => GridLayout::new(100.0, 1250, "#dddddd"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    pub size: f64,
    pub divisions: u32,
    pub color: &'static str,
}

impl GridLayout {
    const fn new(size: f64, divisions: u32, color: &'static str) -> Self {
        Self {
            size,
            divisions,
            color,
        }
    }

    pub fn step(&self) -> f64 {
        self.size / self.divisions as f64
    }
}

/// 0 at `zero_at`, 1 at `full_at`, linear between and clamped outside. Works in
/// either direction.
fn ramp(d: f64, zero_at: f64, full_at: f64) -> f64 {
    ((d - zero_at) / (full_at - zero_at)).clamp(0.0, 1.0)
}

pub fn major_opacity(d: f64) -> f64 {
    if d < MAJOR_NEAR_DISTANCE {
        MAJOR_NEAR_OPACITY
    } else {
        MAJOR_FAR_OPACITY
    }
}

pub fn level0_opacity(d: f64) -> f64 {
    LEVEL0_MAX * ramp(d, LEVEL1_THRESHOLD, LEVEL0_THRESHOLD)
}

/// Fade-in from the level-0 threshold and fade-out just above the level-1
/// threshold are independent; the tier shows the smaller of the two.
pub fn level1_opacity(d: f64) -> f64 {
    let fade_in = ramp(d, LEVEL0_THRESHOLD, LEVEL0_THRESHOLD - LEVEL1_FADE_IN_BAND);
    let fade_out = ramp(d, LEVEL1_THRESHOLD + LEVEL1_FADE_OUT_BAND, LEVEL1_THRESHOLD);
    let handoff = ramp(d, LEVEL2_THRESHOLD, LEVEL2_THRESHOLD + LEVEL1_HANDOFF_BAND);
    LEVEL1_MAX * fade_in.min(fade_out).min(handoff)
}

pub fn level2_opacity(d: f64) -> f64 {
    let fade_in = ramp(d, LEVEL1_THRESHOLD, LEVEL2_THRESHOLD);
    let handoff = ramp(d, LEVEL2_HANDOFF_FLOOR, LEVEL3_THRESHOLD);
    LEVEL2_MAX * fade_in.min(handoff)
}

/// Finest tier: nothing beneath it, so it stays at full opacity all the way in.
pub fn level3_opacity(d: f64) -> f64 {
    LEVEL3_MAX * ramp(d, LEVEL2_THRESHOLD, LEVEL3_THRESHOLD)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TierOpacities {
    pub major: f64,
    pub level0: f64,
    pub level1: f64,
    pub level2: f64,
    pub level3: f64,
}

impl TierOpacities {
    pub fn get(&self, tier: GridTier) -> f64 {
        match tier {
            GridTier::Major => self.major,
            GridTier::Level0 => self.level0,
            GridTier::Level1 => self.level1,
            GridTier::Level2 => self.level2,
            GridTier::Level3 => self.level3,
        }
    }

    pub fn set(&mut self, tier: GridTier, opacity: f64) {
        let slot = match tier {
            GridTier::Major => &mut self.major,
            GridTier::Level0 => &mut self.level0,
            GridTier::Level1 => &mut self.level1,
            GridTier::Level2 => &mut self.level2,
            GridTier::Level3 => &mut self.level3,
        };
        *slot = opacity;
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridTier, f64)> + '_ {
        GridTier::ALL.iter().map(move |&t| (t, self.get(t)))
    }
}

/// Per-frame evaluator. Holds the last result so callers can skip work when the
/// camera did not move.
#[derive(Clone, Debug, Default)]
pub struct LodGrid {
    last_distance: Option<f64>,
    last: TierOpacities,
}

impl LodGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(d: f64) -> TierOpacities {
        let d = if d.is_finite() { d.max(0.0) } else { f64::MAX };
        TierOpacities {
            major: major_opacity(d),
            level0: level0_opacity(d),
            level1: level1_opacity(d),
            level2: level2_opacity(d),
            level3: level3_opacity(d),
        }
    }

    pub fn update(&mut self, d: f64) -> TierOpacities {
        if self.last_distance != Some(d) {
            self.last = Self::compute(d);
            self.last_distance = Some(d);
        }
        self.last
    }

    pub fn last(&self) -> TierOpacities {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn far_camera_shows_only_coarse_grids() {
        let o = LodGrid::compute(200.0);
        assert!(close(o.major, 0.7));
        assert!(close(o.level0, 0.6));
        assert_eq!((o.level1, o.level2, o.level3), (0.0, 0.0, 0.0));
    }

    #[test]
    fn near_camera_shows_only_finest_grid() {
        let o = LodGrid::compute(3.0);
        assert!(close(o.major, 0.4));
        assert!(close(o.level3, 0.3));
        assert_eq!((o.level0, o.level1, o.level2), (0.0, 0.0, 0.0));
    }

    #[test]
    fn between_level3_and_level2_both_contribute() {
        let o = LodGrid::compute(7.5);
        assert!(o.level2 > 0.0 && o.level2 <= GridTier::Level2.max_opacity());
        assert!(o.level3 > 0.0 && o.level3 < GridTier::Level3.max_opacity());
        assert!(close(o.level3, 0.3 * 0.75));
        assert_eq!((o.level0, o.level1), (0.0, 0.0));
    }

    #[test]
    fn level1_fades_in_and_out_around_level1_threshold() {
        assert!(close(level1_opacity(40.0), 0.5));
        assert!(close(level1_opacity(42.5), 0.25));
        assert_eq!(level1_opacity(45.0), 0.0);
        assert_eq!(level1_opacity(70.0), 0.0);
        assert_eq!(level1_opacity(120.0), 0.0);
        assert!(close(level1_opacity(25.0), 0.5));
    }

    #[test]
    fn level0_ramps_linearly_between_thresholds() {
        assert!(close(level0_opacity(70.0), 0.3));
        assert_eq!(level0_opacity(40.0), 0.0);
        assert!(close(level0_opacity(100.0), 0.6));
    }

    #[test]
    fn opacities_stay_within_tier_maxima() {
        let mut d = 0.0;
        while d < 600.0 {
            let o = LodGrid::compute(d);
            for (tier, v) in o.iter() {
                assert!(v >= 0.0 && v <= tier.max_opacity() + 1e-12, "{:?} at {}", tier, d);
            }
            d += 0.37;
        }
    }

    #[test]
    fn opacity_is_continuous_except_major_step() {
        let step = 0.001;
        let mut d: f64 = 0.0;
        let mut prev = LodGrid::compute(d);
        while d < 250.0 {
            d += step;
            let next = LodGrid::compute(d);
            for tier in GridTier::ALL {
                let jump = (next.get(tier) - prev.get(tier)).abs();
                if tier == GridTier::Major {
                    let crosses_step = (d - step) < MAJOR_NEAR_DISTANCE && d >= MAJOR_NEAR_DISTANCE;
                    if !crosses_step {
                        assert_eq!(jump, 0.0, "major moved at {}", d);
                    }
                    continue;
                }
                // steepest ramp is 0.4 over 2 units
                assert!(jump <= 0.2 * step + 1e-9, "{:?} jumped {} at {}", tier, jump, d);
            }
            prev = next;
        }
    }

    #[test]
    fn only_adjacent_tiers_are_partially_visible() {
        let rank = |t: GridTier| GridTier::ALL.iter().position(|x| *x == t).unwrap_or(0);
        let mut d = 0.0;
        while d < 300.0 {
            let o = LodGrid::compute(d);
            let partial: Vec<GridTier> = o
                .iter()
                .filter(|(t, v)| *t != GridTier::Major && *v > 0.0 && *v < t.max_opacity())
                .map(|(t, _)| t)
                .collect();
            assert!(partial.len() <= 2, "{:?} partial at {}", partial, d);
            if let &[a, b] = partial.as_slice() {
                assert_eq!(rank(b) - rank(a), 1, "non-adjacent partial tiers {:?} at {}", partial, d);
            }
            d += 0.05;
        }
    }

    #[test]
    fn level1_is_gone_before_level3_fades_in() {
        let o = LodGrid::compute(12.0);
        assert_eq!(o.level1, 0.0);
        assert!(close(o.level2, 0.4));
        assert!(o.level3 > 0.0 && o.level3 < 0.3);

        let o = LodGrid::compute(17.5);
        assert!(close(o.level1, 0.25));
        assert_eq!(o.level3, 0.0);
        assert!(close(level1_opacity(20.0), 0.5));
        assert_eq!(level1_opacity(15.0), 0.0);
    }

    #[test]
    fn negative_or_nan_distance_is_sanitized() {
        assert_eq!(LodGrid::compute(-5.0), LodGrid::compute(0.0));
        assert_eq!(LodGrid::compute(f64::NAN), LodGrid::compute(1e9));
    }

    #[test]
    fn update_caches_by_distance() {
        let mut lod = LodGrid::new();
        let a = lod.update(12.0);
        assert_eq!(a, LodGrid::compute(12.0));
        assert_eq!(lod.last(), a);
        let b = lod.update(80.0);
        assert!(close(b.level0, 0.4));
    }

    #[test]
    fn layouts_match_grid_densities() {
        assert_eq!(GridTier::Major.layout().step(), 100.0);
        assert_eq!(GridTier::Level0.layout().step(), 10.0);
        assert_eq!(GridTier::Level1.layout().step(), 2.0);
        assert!((GridTier::Level3.layout().step() - 0.08).abs() < 1e-12);
    }
}
