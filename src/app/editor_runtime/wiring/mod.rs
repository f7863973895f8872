mod dialog;
mod gestures;
mod shortcuts;

pub(super) use dialog::{
    export_html_dialog, insert_image_dialog, open_layout_dialog, save_layout_dialog,
};
pub(super) use gestures::{connect_canvas_gestures, connect_context_menu};
pub(super) use shortcuts::connect_key_handling;
