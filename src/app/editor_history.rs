use std::cell::RefCell;
use std::rc::Rc;

use crate::scene::{HistoryStep, Scene, SceneHistory, SceneItem};
use crate::state::StateMachine;

#[derive(Clone)]
pub(super) struct EditorHistoryRuntime {
    pub(super) scene: Rc<RefCell<Scene>>,
    pub(super) history: Rc<RefCell<SceneHistory>>,
    pub(super) machine: Rc<RefCell<StateMachine>>,
}

impl EditorHistoryRuntime {
    pub(super) fn snapshot(&self) -> Vec<SceneItem> {
        SceneHistory::snapshot(&self.scene.borrow())
    }

    /// Pushes `snapshot` when the scene differs from it. Returns whether it did.
    pub(super) fn record_if_changed(&self, snapshot: Vec<SceneItem>) -> bool {
        let scene = self.scene.borrow();
        self.history
            .borrow_mut()
            .record_if_changed(snapshot, &scene)
    }

    /// Runs an undo or redo step and returns the status message to show.
    pub(super) fn apply(&self, step: HistoryStep) -> &'static str {
        let applied = {
            let mut scene = self.scene.borrow_mut();
            self.history.borrow_mut().apply(step, &mut scene)
        };
        if applied {
            self.machine.borrow_mut().reset();
            tracing::debug!(?step, "history step applied");
            step.applied_message()
        } else {
            step.empty_message()
        }
    }
}
