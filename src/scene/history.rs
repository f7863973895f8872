use super::{Scene, SceneItem};

/// Oldest snapshots are dropped past this depth.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryStep {
    Undo,
    Redo,
}

impl HistoryStep {
    pub const fn applied_message(self) -> &'static str {
        match self {
            Self::Undo => "undo applied",
            Self::Redo => "redo applied",
        }
    }

    pub const fn empty_message(self) -> &'static str {
        match self {
            Self::Undo => "nothing to undo",
            Self::Redo => "nothing to redo",
        }
    }
}

/// Whole-item-list snapshots taken before each mutating action.
#[derive(Debug, Clone, Default)]
pub struct SceneHistory {
    undo_stack: Vec<Vec<SceneItem>>,
    redo_stack: Vec<Vec<SceneItem>>,
}

impl SceneHistory {
    pub fn snapshot(scene: &Scene) -> Vec<SceneItem> {
        scene.items().to_vec()
    }

    /// Pushes the state before a change and invalidates redo.
    pub fn record(&mut self, snapshot: Vec<SceneItem>) {
        self.undo_stack.push(snapshot);
        if self.undo_stack.len() > HISTORY_LIMIT {
            let overflow = self.undo_stack.len() - HISTORY_LIMIT;
            self.undo_stack.drain(..overflow);
        }
        self.redo_stack.clear();
    }

    /// Records only when the scene actually changed since `snapshot` was taken.
    pub fn record_if_changed(&mut self, snapshot: Vec<SceneItem>, scene: &Scene) -> bool {
        if snapshot.as_slice() == scene.items() {
            return false;
        }
        self.record(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Swaps the scene with the top of the source stack. Returns false when it is empty.
    pub fn apply(&mut self, step: HistoryStep, scene: &mut Scene) -> bool {
        let (source, target) = match step {
            HistoryStep::Undo => (&mut self.undo_stack, &mut self.redo_stack),
            HistoryStep::Redo => (&mut self.redo_stack, &mut self.undo_stack),
        };
        let Some(snapshot) = source.pop() else {
            return false;
        };
        target.push(Self::snapshot(scene));
        scene.replace_items(snapshot);
        true
    }

}
