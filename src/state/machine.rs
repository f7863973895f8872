use super::error::{StateError, StateResult};
use super::{InteractionEvent, InteractionState, StateTransition};

const TRANSITION_HISTORY_LIMIT: usize = 256;

#[derive(Debug)]
pub struct StateMachine {
    state: InteractionState,
    transition_history: Vec<StateTransition>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            transition_history: Vec::new(),
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn can_transition(&self, event: InteractionEvent) -> bool {
        self.next_state(event).is_some()
    }

    pub fn next_state(&self, event: InteractionEvent) -> Option<InteractionState> {
        use InteractionEvent::*;
        use InteractionState::*;
        match (self.state, event) {
            (Idle, PressItem) => Some(DraggingItems),
            (Idle, PressHandle) => Some(ResizingImage),
            (Idle, PressEmpty) => Some(RubberBand),
            (DraggingItems | ResizingImage | RubberBand, Release) => Some(Idle),
            (Idle | DraggingItems, BeginTextEdit) => Some(EditingText),
            (EditingText, BeginTextEdit) => Some(EditingText),
            (EditingText, Release) => Some(EditingText),
            (EditingText, EndTextEdit) => Some(Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: InteractionEvent) -> StateResult<InteractionState> {
        tracing::debug!(from = ?self.state, event = ?event, "request state transition");
        let next = self.next_state(event).ok_or_else(|| {
            let from = self.state;
            tracing::warn!(from = ?from, event = ?event, "invalid state transition requested");
            StateError::InvalidStateTransition { from, event }
        })?;

        let record = StateTransition::new(Some(self.state), event, next);
        self.state = next;
        self.transition_history.push(record);
        if self.transition_history.len() > TRANSITION_HISTORY_LIMIT {
            self.transition_history.remove(0);
        }

        Ok(self.state)
    }

    /// Drops back to idle from any state, e.g. when a gesture is cancelled or the scene
    /// is replaced underneath an interaction.
    pub fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }

    pub fn history(&self) -> &[StateTransition] {
        &self.transition_history
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StateMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InteractionState::{:?}", self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_transition_tracks_valid_and_invalid_events() {
        let mut machine = StateMachine::new();
        assert!(machine.can_transition(InteractionEvent::PressItem));
        assert!(machine.can_transition(InteractionEvent::PressHandle));
        assert!(!machine.can_transition(InteractionEvent::Release));
        assert!(!machine.can_transition(InteractionEvent::EndTextEdit));

        let _ = machine
            .transition(InteractionEvent::PressEmpty)
            .expect("idle -> rubber band should transition");

        assert!(machine.can_transition(InteractionEvent::Release));
        assert!(!machine.can_transition(InteractionEvent::PressItem));
        assert!(!machine.can_transition(InteractionEvent::BeginTextEdit));
    }

    #[test]
    fn transition_records_history_with_ordered_entries() {
        let mut machine = StateMachine::new();
        let _ = machine
            .transition(InteractionEvent::PressItem)
            .expect("press item should work");
        let _ = machine
            .transition(InteractionEvent::BeginTextEdit)
            .expect("double click should enter edit mode");
        let _ = machine
            .transition(InteractionEvent::Release)
            .expect("release keeps edit mode");
        let _ = machine
            .transition(InteractionEvent::EndTextEdit)
            .expect("end edit should work");

        assert_eq!(machine.state(), InteractionState::Idle);
        assert_eq!(machine.history().len(), 4);
        assert_eq!(
            machine.history()[0],
            StateTransition::new(
                Some(InteractionState::Idle),
                InteractionEvent::PressItem,
                InteractionState::DraggingItems
            )
        );
        assert_eq!(
            machine.history()[1],
            StateTransition::new(
                Some(InteractionState::DraggingItems),
                InteractionEvent::BeginTextEdit,
                InteractionState::EditingText
            )
        );
        assert_eq!(
            machine.history()[2],
            StateTransition::new(
                Some(InteractionState::EditingText),
                InteractionEvent::Release,
                InteractionState::EditingText
            )
        );
        assert_eq!(
            machine.history()[3],
            StateTransition::new(
                Some(InteractionState::EditingText),
                InteractionEvent::EndTextEdit,
                InteractionState::Idle
            )
        );
    }

    #[test]
    fn invalid_transition_returns_error_without_mutating_history() {
        let mut machine = StateMachine::new();

        let err = machine
            .transition(InteractionEvent::EndTextEdit)
            .expect_err("idle -> end text edit should fail");
        assert!(matches!(
            err,
            StateError::InvalidStateTransition {
                from: InteractionState::Idle,
                event: InteractionEvent::EndTextEdit
            }
        ));
        assert_eq!(machine.state(), InteractionState::Idle);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn editing_text_blocks_new_pointer_gestures_until_edit_ends() {
        let mut machine = StateMachine::new();
        machine
            .transition(InteractionEvent::BeginTextEdit)
            .expect("idle -> editing should work");
        assert!(machine.state().captures_keyboard());
        assert!(machine.transition(InteractionEvent::PressItem).is_err());
        assert!(machine.transition(InteractionEvent::PressEmpty).is_err());

        machine.reset();
        assert_eq!(machine.state(), InteractionState::Idle);
        assert!(!machine.state().is_pointer_gesture());
    }

    #[test]
    fn history_is_bounded() {
        let mut machine = StateMachine::new();
        for _ in 0..(TRANSITION_HISTORY_LIMIT + 10) {
            machine
                .transition(InteractionEvent::PressItem)
                .expect("press should work");
            machine
                .transition(InteractionEvent::Release)
                .expect("release should work");
        }
        assert_eq!(machine.history().len(), TRANSITION_HISTORY_LIMIT);
    }
}
