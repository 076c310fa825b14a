//! Core data models for the viewport.
//! `Transform3` is the unit of undo history; `HudState` mirrors controller state for the overlay panels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;
use yew::Reducible;

use crate::state::lod::TierOpacities;

/// Number of decimal places kept for stored and compared transforms.
pub const TRANSFORM_DECIMALS: i32 = 5;

/// Object translation in world units. Values are rounded to `TRANSFORM_DECIMALS`
/// on construction, so equality is fixed-precision.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Transform3 {
    x: f64,
    y: f64,
    z: f64,
}

fn round_fixed(v: f64) -> f64 {
    let scale = 10f64.powi(TRANSFORM_DECIMALS);
    // `+ 0.0` folds negative zero so "-0" never reaches storage
    (v * scale).round() / scale + 0.0
}

impl Transform3 {
    pub const ORIGIN: Transform3 = Transform3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: round_fixed(x),
            y: round_fixed(y),
            z: round_fixed(z),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }
    pub fn y(&self) -> f64 {
        self.y
    }
    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// True when any axis differs from `other` by strictly more than `threshold`.
    pub fn exceeds_dead_zone(&self, other: &Transform3, threshold: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .any(|(a, b)| (a - b).abs() > threshold)
    }
}

impl Default for Transform3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl From<[f64; 3]> for Transform3 {
    fn from(v: [f64; 3]) -> Self {
        Transform3::new(v[0], v[1], v[2])
    }
}

impl From<Transform3> for [f64; 3] {
    fn from(t: Transform3) -> Self {
        t.to_array()
    }
}

impl fmt::Display for Transform3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.x, self.y, self.z)
    }
}

/// Values shown by the overlay panels. Camera distance is kept at two decimals so
/// a frame only re-renders the HUD when something visible changed.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudSnapshot {
    pub history_len: usize,
    pub cursor: usize,
    pub current: Transform3,
    pub dragging: bool,
    /// Whether the undo/redo controls act right now; both are off mid-drag.
    pub can_undo: bool,
    pub can_redo: bool,
    pub camera_distance: f64,
    pub opacities: TierOpacities,
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct HudState {
    pub snapshot: HudSnapshot,
    pub notice: Option<String>,
}

pub enum HudAction {
    Sync(HudSnapshot),
    Notice(String),
    DismissNotice,
}

impl Reducible for HudState {
    type Action = HudAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use HudAction::*;
        match action {
            Sync(snapshot) => {
                if snapshot == self.snapshot {
                    return self;
                }
                Rc::new(HudState {
                    snapshot,
                    notice: self.notice.clone(),
                })
            }
            Notice(msg) => Rc::new(HudState {
                snapshot: self.snapshot.clone(),
                notice: Some(msg),
            }),
            DismissNotice => {
                if self.notice.is_none() {
                    return self;
                }
                Rc::new(HudState {
                    snapshot: self.snapshot.clone(),
                    notice: None,
                })
            }
        }
    }
}
