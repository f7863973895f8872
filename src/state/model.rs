#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    DraggingItems,
    ResizingImage,
    RubberBand,
    EditingText,
}

impl InteractionState {
    /// A pointer button is held and the canvas is tracking its motion.
    pub const fn is_pointer_gesture(self) -> bool {
        matches!(
            self,
            Self::DraggingItems | Self::ResizingImage | Self::RubberBand
        )
    }

    /// Keyboard shortcuts other than text editing keys are suspended.
    pub const fn captures_keyboard(self) -> bool {
        matches!(self, Self::EditingText)
    }
}
