// Drag gesture state machine: Idle -> Dragging -> Idle. A whole drag becomes at
// most one history entry, and only if it moved past the dead-zone.
use crate::model::Transform3;
use crate::state::history::HistoryStore;
use crate::util::clog;

/// Per-axis movement a drag must exceed to be committed.
pub const DRAG_DEAD_ZONE: f64 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    /// History value when the drag started; the comparison baseline.
    pub baseline: Transform3,
    /// Last pointer-driven transform shown on the object.
    pub preview: Transform3,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragOutcome {
    Committed(Transform3),
    /// Click or sub-threshold jitter; history untouched.
    Unchanged,
    /// End without a matching start.
    NotDragging,
}

#[derive(Debug, Default)]
pub struct GestureController {
    phase: DragPhase,
}

impl GestureController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    /// Returns false (and keeps the running session) if a drag is already active.
    pub fn on_drag_start(&mut self, history: &HistoryStore) -> bool {
        if let DragPhase::Dragging(session) = self.phase {
            clog(&format!(
                "Ignoring re-entrant drag start (baseline {})",
                session.baseline
            ));
            return false;
        }
        let baseline = history.current();
        clog(&format!("Drag start from {}", baseline));
        self.phase = DragPhase::Dragging(DragSession {
            baseline,
            preview: baseline,
        });
        true
    }

    /// Record the live transform. Returns it for the caller to put on the object,
    /// or `None` when no drag is active.
    pub fn on_drag_move(&mut self, candidate: Transform3) -> Option<Transform3> {
        match &mut self.phase {
            DragPhase::Dragging(session) => {
                session.preview = candidate;
                Some(candidate)
            }
            DragPhase::Idle => None,
        }
    }

    pub fn on_drag_end(&mut self, final_transform: Transform3, history: &mut HistoryStore) -> DragOutcome {
        let session = match std::mem::take(&mut self.phase) {
            DragPhase::Dragging(session) => session,
            DragPhase::Idle => return DragOutcome::NotDragging,
        };
        // Transform3 is already at fixed precision, so noise below 1e-5 is gone here
        if final_transform.exceeds_dead_zone(&session.baseline, DRAG_DEAD_ZONE) {
            history.commit(final_transform);
            clog(&format!("Drag end at {}, committed", final_transform));
            DragOutcome::Committed(final_transform)
        } else {
            clog(&format!("Drag end at {}, unchanged", final_transform));
            DragOutcome::Unchanged
        }
    }

    /// Implicit end for drags that lose their pointer (window blur, pointer
    /// released outside the page): finish at the last previewed transform.
    pub fn abandon(&mut self, history: &mut HistoryStore) -> DragOutcome {
        match self.phase {
            DragPhase::Dragging(session) => self.on_drag_end(session.preview, history),
            DragPhase::Idle => DragOutcome::NotDragging,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::history::HistoryKeys;
    use crate::storage::MemoryStore;
    use std::rc::Rc;

    fn history() -> HistoryStore {
        HistoryStore::load(Rc::new(MemoryStore::new()), HistoryKeys::global())
    }

    #[test]
    fn drag_past_dead_zone_commits_once() {
        let mut h = history();
        let mut g = GestureController::new();
        assert!(g.on_drag_start(&h));
        for i in 1..=20 {
            let step = Transform3::new(i as f64 * 0.1, 0.0, 0.0);
            assert_eq!(g.on_drag_move(step), Some(step));
        }
        assert_eq!(h.len(), 1);
        let end = Transform3::new(2.0, 0.0, 0.0);
        assert_eq!(g.on_drag_end(end, &mut h), DragOutcome::Committed(end));
        assert_eq!(h.len(), 2);
        assert_eq!(h.cursor(), h.len() - 1);
        assert!(!g.is_dragging());
    }

    #[test]
    fn jitter_inside_dead_zone_is_not_committed() {
        let mut h = history();
        h.commit(Transform3::new(1.0, 1.0, 1.0));
        let mut g = GestureController::new();
        g.on_drag_start(&h);
        let jitter = Transform3::new(1.00005, 0.99996, 1.0);
        assert_eq!(g.on_drag_end(jitter, &mut h), DragOutcome::Unchanged);
        assert_eq!(h.len(), 2);
        assert_eq!(h.cursor(), 1);
        assert_eq!(g.phase(), DragPhase::Idle);
    }

    #[test]
    fn single_axis_beyond_threshold_is_enough() {
        let mut h = history();
        let mut g = GestureController::new();
        g.on_drag_start(&h);
        let end = Transform3::new(0.0, 0.0, -0.0002);
        assert_eq!(g.on_drag_end(end, &mut h), DragOutcome::Committed(end));
    }

    #[test]
    fn baseline_is_history_value_at_drag_start() {
        let mut h = history();
        h.commit(Transform3::new(3.0, 0.0, 0.0));
        h.undo();
        let mut g = GestureController::new();
        g.on_drag_start(&h);
        match g.phase() {
            DragPhase::Dragging(s) => assert_eq!(s.baseline, Transform3::ORIGIN),
            DragPhase::Idle => panic!("expected dragging"),
        }
        // dropping back onto the baseline is a no-op even though redo data exists
        assert_eq!(g.on_drag_end(Transform3::ORIGIN, &mut h), DragOutcome::Unchanged);
        assert!(h.can_redo());
    }

    #[test]
    fn reentrant_start_keeps_first_session() {
        let mut h = history();
        let mut g = GestureController::new();
        assert!(g.on_drag_start(&h));
        g.on_drag_move(Transform3::new(4.0, 0.0, 0.0));
        h.commit(Transform3::new(9.0, 9.0, 9.0));
        assert!(!g.on_drag_start(&h));
        match g.phase() {
            DragPhase::Dragging(s) => {
                assert_eq!(s.baseline, Transform3::ORIGIN);
                assert_eq!(s.preview, Transform3::new(4.0, 0.0, 0.0));
            }
            DragPhase::Idle => panic!("expected dragging"),
        }
    }

    #[test]
    fn end_and_move_without_start_are_ignored() {
        let mut h = history();
        let mut g = GestureController::new();
        assert_eq!(g.on_drag_move(Transform3::new(1.0, 0.0, 0.0)), None);
        assert_eq!(
            g.on_drag_end(Transform3::new(1.0, 0.0, 0.0), &mut h),
            DragOutcome::NotDragging
        );
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn abandon_commits_last_preview() {
        let mut h = history();
        let mut g = GestureController::new();
        g.on_drag_start(&h);
        g.on_drag_move(Transform3::new(0.5, 0.0, 0.5));
        assert_eq!(
            g.abandon(&mut h),
            DragOutcome::Committed(Transform3::new(0.5, 0.0, 0.5))
        );
        assert_eq!(h.current(), Transform3::new(0.5, 0.0, 0.5));
        assert_eq!(g.abandon(&mut h), DragOutcome::NotDragging);
    }

    #[test]
    fn abandon_without_movement_commits_nothing() {
        let mut h = history();
        let mut g = GestureController::new();
        g.on_drag_start(&h);
        assert_eq!(g.abandon(&mut h), DragOutcome::Unchanged);
        assert_eq!(h.len(), 1);
    }
}
