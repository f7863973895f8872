pub mod style;
pub mod widgets;

pub use style::{CanvasPalette, StyleTokens, CANVAS_PALETTE, LAYOUT_TOKENS};
pub use widgets::{icon_button, icon_toggle_button, labeled_spin_button};
