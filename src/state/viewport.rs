//! Per-frame orchestration between the render surface, the grid LOD, the drag
//! gesture and the undo history.
//!
//! The controller owns the history. Outside a drag it keeps the rendered object
//! on `history.current()`; during a drag the object follows the pointer and the
//! controller never writes its transform.

use crate::model::{HudSnapshot, Transform3};
use crate::state::gesture::{DragOutcome, DragPhase, GestureController};
use crate::state::history::HistoryStore;
use crate::state::lod::{GridTier, LodGrid, TierOpacities};
use crate::state::shortcuts::{self, KeyInput, ShortcutAction};
use crate::storage::StorageError;
use crate::util::clog;

/// What the controller drives: the canvas scene in the app, a recorder in tests.
pub trait RenderSurface {
    /// Camera-to-origin distance, >= 0.
    fn camera_distance(&self) -> f64;
    fn set_tier_opacity(&mut self, tier: GridTier, opacity: f64);
    fn set_object_transform(&mut self, transform: Transform3);
}

pub struct ViewportController {
    history: HistoryStore,
    gesture: GestureController,
    lod: LodGrid,
}

impl ViewportController {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            history,
            gesture: GestureController::new(),
            lod: LodGrid::new(),
        }
    }

    /// Show the persisted pose right away instead of an origin default.
    pub fn mount(&mut self, surface: &mut dyn RenderSurface) {
        clog(&format!("Mount at {}", self.history.current()));
        surface.set_object_transform(self.history.current());
        self.frame(surface);
    }

    pub fn frame(&mut self, surface: &mut dyn RenderSurface) -> TierOpacities {
        let opacities = self.lod.update(surface.camera_distance());
        for (tier, opacity) in opacities.iter() {
            surface.set_tier_opacity(tier, opacity);
        }
        self.apply_current(surface);
        opacities
    }

    /// Returns false while a drag owns the object's transform.
    fn apply_current(&self, surface: &mut dyn RenderSurface) -> bool {
        if self.gesture.is_dragging() {
            return false;
        }
        surface.set_object_transform(self.history.current());
        true
    }

    /// Edge-triggered undo/redo. `None` when the key is not a bound chord, is a
    /// repeat, or a drag is running; otherwise the action, whether or not the
    /// history moved.
    pub fn key_down(&mut self, input: &KeyInput, surface: &mut dyn RenderSurface) -> Option<ShortcutAction> {
        if self.gesture.is_dragging() {
            return None;
        }
        let action = shortcuts::on_press(input)?;
        clog(&format!(
            "Shortcut {:?} at index {} of {}",
            action,
            self.history.cursor(),
            self.history.len()
        ));
        match action {
            ShortcutAction::Undo => self.undo(surface),
            ShortcutAction::Redo => self.redo(surface),
        };
        Some(action)
    }

    pub fn undo(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if self.gesture.is_dragging() || !self.history.undo() {
            return false;
        }
        self.apply_current(surface);
        true
    }

    pub fn redo(&mut self, surface: &mut dyn RenderSurface) -> bool {
        if self.gesture.is_dragging() || !self.history.redo() {
            return false;
        }
        self.apply_current(surface);
        true
    }

    pub fn begin_drag(&mut self) -> bool {
        self.gesture.on_drag_start(&self.history)
    }

    pub fn drag_to(&mut self, candidate: Transform3, surface: &mut dyn RenderSurface) {
        if let Some(live) = self.gesture.on_drag_move(candidate) {
            surface.set_object_transform(live);
        }
    }

    pub fn end_drag(&mut self, final_transform: Transform3, surface: &mut dyn RenderSurface) -> DragOutcome {
        let outcome = self.gesture.on_drag_end(final_transform, &mut self.history);
        self.apply_current(surface);
        outcome
    }

    /// Focus loss or a lost pointer: finish any drag at its last preview.
    pub fn abandon_drag(&mut self, surface: &mut dyn RenderSurface) -> DragOutcome {
        let outcome = self.gesture.abandon(&mut self.history);
        self.apply_current(surface);
        outcome
    }

    pub fn reset_history(&mut self, surface: &mut dyn RenderSurface) {
        if self.gesture.is_dragging() {
            return;
        }
        self.history.reset();
        self.apply_current(surface);
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_dragging()
    }

    /// Live transform during a drag.
    pub fn drag_preview(&self) -> Option<Transform3> {
        match self.gesture.phase() {
            DragPhase::Dragging(session) => Some(session.preview),
            DragPhase::Idle => None,
        }
    }

    /// Where the object is shown right now.
    pub fn displayed_transform(&self) -> Transform3 {
        self.drag_preview().unwrap_or_else(|| self.history.current())
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    pub fn take_storage_error(&mut self) -> Option<StorageError> {
        self.history.take_error()
    }

    pub fn hud_snapshot(&self, camera_distance: f64) -> HudSnapshot {
        let idle = !self.is_dragging();
        HudSnapshot {
            history_len: self.history.len(),
            cursor: self.history.cursor(),
            current: self.history.current(),
            dragging: !idle,
            can_undo: idle && self.history.can_undo(),
            can_redo: idle && self.history.can_redo(),
            camera_distance: (camera_distance * 100.0).round() / 100.0,
            opacities: self.lod.last(),
        }
    }
}
