use super::model::InteractionState;

/// Pointer and focus events that drive the canvas interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    PressItem,
    PressHandle,
    PressEmpty,
    Release,
    BeginTextEdit,
    EndTextEdit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: Option<InteractionState>,
    pub event: InteractionEvent,
    pub to: InteractionState,
}

impl StateTransition {
    pub const fn new(
        from: Option<InteractionState>,
        event: InteractionEvent,
        to: InteractionState,
    ) -> Self {
        Self { from, event, to }
    }
}
