use gtk4::gio;
use gtk4::prelude::*;
use gtk4::PopoverMenuBar;

use super::{EditorCommand, EditorSession};

const COMMAND_ACTIONS: [(&str, EditorCommand); 13] = [
    ("open", EditorCommand::OpenLayout),
    ("save", EditorCommand::SaveLayout),
    ("export-html", EditorCommand::ExportHtml),
    ("quit", EditorCommand::Quit),
    ("insert-image", EditorCommand::InsertImage),
    ("insert-text", EditorCommand::InsertText),
    ("undo", EditorCommand::Undo),
    ("redo", EditorCommand::Redo),
    ("group", EditorCommand::Group),
    ("ungroup", EditorCommand::Ungroup),
    ("delete", EditorCommand::DeleteSelection),
    ("select-all", EditorCommand::SelectAll),
    ("select-none", EditorCommand::ClearSelection),
];

const SHOW_GRID_ACTION: &str = "show-grid";
const SNAP_TO_GRID_ACTION: &str = "snap-to-grid";

fn menu_section(entries: &[(&str, &str)]) -> gio::Menu {
    let section = gio::Menu::new();
    for (label, action) in entries {
        section.append(Some(label), Some(action));
    }
    section
}

fn submenu(sections: &[&[(&str, &str)]]) -> gio::Menu {
    let menu = gio::Menu::new();
    for entries in sections {
        menu.append_section(None, &menu_section(entries));
    }
    menu
}

pub(super) fn build_menu_bar() -> PopoverMenuBar {
    let model = gio::Menu::new();
    model.append_submenu(
        Some("_File"),
        &submenu(&[
            &[
                ("_Open Layout…", "win.open"),
                ("_Save Layout…", "win.save"),
                ("_Export HTML…", "win.export-html"),
            ],
            &[("_Quit", "win.quit")],
        ]),
    );
    model.append_submenu(
        Some("_Insert"),
        &submenu(&[&[("_Image…", "win.insert-image"), ("_Text", "win.insert-text")]]),
    );
    model.append_submenu(
        Some("_Edit"),
        &submenu(&[
            &[("_Undo", "win.undo"), ("_Redo", "win.redo")],
            &[("_Group", "win.group"), ("U_ngroup", "win.ungroup")],
            &[
                ("_Delete", "win.delete"),
                ("Select _All", "win.select-all"),
                ("Select _None", "win.select-none"),
            ],
        ]),
    );
    model.append_submenu(
        Some("_View"),
        &submenu(&[&[
            ("Show _Grid", "win.show-grid"),
            ("_Snap to Grid", "win.snap-to-grid"),
        ]]),
    );
    PopoverMenuBar::from_model(Some(&model))
}

/// Context menu for the canvas, using the same window actions as the menu bar.
pub(super) fn build_context_menu_model() -> gio::Menu {
    submenu(&[
        &[("_Group", "win.group"), ("U_ngroup", "win.ungroup")],
        &[("_Delete", "win.delete")],
    ])
}

fn toggle_action(
    name: &str,
    initial: bool,
    on_change: impl Fn(bool) + 'static,
) -> gio::SimpleAction {
    let action = gio::SimpleAction::new_stateful(name, None, &initial.to_variant());
    action.connect_activate(move |action, _| {
        let current = action
            .state()
            .and_then(|state| state.get::<bool>())
            .unwrap_or(initial);
        let next = !current;
        action.set_state(&next.to_variant());
        tracing::debug!(action = %action.name(), enabled = next, "view option toggled");
        on_change(next);
    });
    action
}

pub(super) fn install_window_actions(session: &EditorSession) {
    for (name, command) in COMMAND_ACTIONS {
        let action = gio::SimpleAction::new(name, None);
        {
            let session = session.clone();
            action.connect_activate(move |_, _| session.run(command));
        }
        session.window.add_action(&action);
    }

    let options = session.scene.borrow().options();
    {
        let session_for_toggle = session.clone();
        session.window.add_action(&toggle_action(
            SHOW_GRID_ACTION,
            options.show_grid,
            move |enabled| session_for_toggle.set_show_grid(enabled),
        ));
    }
    {
        let session_for_toggle = session.clone();
        session.window.add_action(&toggle_action(
            SNAP_TO_GRID_ACTION,
            options.snap_to_grid,
            move |enabled| session_for_toggle.set_snap_to_grid(enabled),
        ));
    }
}
