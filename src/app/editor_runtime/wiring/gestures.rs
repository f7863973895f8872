use gtk4::prelude::*;
use gtk4::{EventControllerMotion, GestureClick, GestureDrag, PopoverMenu};

use crate::scene::{Point, Rect, Scene, SceneItem, Size, SnapGuides};
use crate::state::InteractionEvent;

use super::super::window::build_context_menu_model;
use super::super::{EditorSession, PointerGesture};

/// Text leaf under `point`, looking inside groups.
fn text_at(scene: &Scene, point: Point) -> Option<u64> {
    let top = scene.item_at(point)?;
    scene
        .top_level(top)?
        .leaves()
        .into_iter()
        .rev()
        .filter_map(SceneItem::as_text)
        .find(|text| text.bounds().contains(point))
        .map(|text| text.id)
}

pub(in crate::app::editor_runtime) fn connect_canvas_gestures(session: &EditorSession) {
    let drag = GestureDrag::new();
    drag.set_button(gtk4::gdk::BUTTON_PRIMARY);
    {
        let session = session.clone();
        drag.connect_drag_begin(move |gesture, x, y| {
            handle_drag_begin(&session, gesture, Point::new(x, y));
        });
    }
    {
        let session = session.clone();
        drag.connect_drag_update(move |_, dx, dy| handle_drag_update(&session, dx, dy));
    }
    {
        let session = session.clone();
        drag.connect_drag_end(move |_, _, _| handle_drag_end(&session));
    }
    session.canvas.add_controller(drag);

    let double_click = GestureClick::new();
    double_click.set_button(gtk4::gdk::BUTTON_PRIMARY);
    {
        let session = session.clone();
        double_click.connect_pressed(move |_, n_press, x, y| {
            if n_press < 2 {
                return;
            }
            let hit = text_at(&session.scene.borrow(), Point::new(x, y));
            if let Some(id) = hit {
                session.begin_text_edit(id);
            }
        });
    }
    session.canvas.add_controller(double_click);

    let motion = EventControllerMotion::new();
    {
        let session = session.clone();
        motion.connect_motion(move |_, x, y| update_hover(&session, Some(Point::new(x, y))));
    }
    {
        let session = session.clone();
        motion.connect_leave(move |_| update_hover(&session, None));
    }
    session.canvas.add_controller(motion);
}

fn handle_drag_begin(session: &EditorSession, gesture: &GestureDrag, point: Point) {
    session.canvas.grab_focus();
    session.pointer.set(PointerGesture::Idle);

    let on_edited_text = session
        .scene
        .borrow()
        .editing_text()
        .is_some_and(|text| text.bounds().contains(point));
    if on_edited_text {
        return;
    }
    session.finish_text_edit();

    let extend = gesture
        .current_event_state()
        .contains(gtk4::gdk::ModifierType::CONTROL_MASK);
    *session.press_snapshot.borrow_mut() = Some(session.history.snapshot());

    let handle_hit = session.scene.borrow().resize_handle_at(point);
    let handle_target =
        handle_hit.and_then(|id| session.scene.borrow().image(id).map(|image| (id, image.size())));
    if let Some((id, original)) = handle_target {
        session.scene.borrow_mut().select_only(id);
        session.pointer.set(PointerGesture::Resize { id, original });
        session.transition(InteractionEvent::PressHandle);
        session.refresh();
        return;
    }

    let item_hit = session.scene.borrow().item_at(point);
    match item_hit {
        Some(id) => {
            let origin = {
                let mut scene = session.scene.borrow_mut();
                if extend {
                    scene.toggle_selection(id);
                } else if !scene.is_selected(id) {
                    scene.select_only(id);
                }
                scene
                    .is_selected(id)
                    .then(|| scene.top_level(id).map(SceneItem::position))
                    .flatten()
            };
            if let Some(origin) = origin {
                session.pointer.set(PointerGesture::Drag { id, origin });
                session.transition(InteractionEvent::PressItem);
            }
        }
        None => {
            if !extend {
                session.scene.borrow_mut().clear_selection();
            }
            session.pointer.set(PointerGesture::RubberBand {
                anchor: point,
                extend,
            });
            session.transition(InteractionEvent::PressEmpty);
        }
    }
    session.refresh();
}

fn handle_drag_update(session: &EditorSession, dx: f64, dy: f64) {
    match session.pointer.get() {
        PointerGesture::Idle => return,
        PointerGesture::Drag { id, origin } => {
            if session.scene.borrow().is_editing_text() {
                return;
            }
            let snap = session.scene.borrow().options().snap();
            let dragged = session
                .scene
                .borrow_mut()
                .drag_item_to(id, origin.offset(dx, dy), snap);
            match dragged {
                Ok(guides) => session.guides.set(guides),
                Err(err) => tracing::debug!(%err, "drag step ignored"),
            }
        }
        PointerGesture::Resize { id, original } => {
            let requested = Size::new(original.width + dx, original.height + dy);
            let resized = session.scene.borrow_mut().resize_image(id, requested);
            if let Err(err) = resized {
                tracing::trace!(%err, "resize step ignored");
            }
        }
        PointerGesture::RubberBand { anchor, .. } => {
            let band = Rect::from_corners(anchor, anchor.offset(dx, dy));
            session.rubber_band.set(Some(band));
        }
    }
    session.canvas.queue_draw();
}

fn handle_drag_end(session: &EditorSession) {
    let gesture = session.pointer.replace(PointerGesture::Idle);
    if let PointerGesture::RubberBand { extend, .. } = gesture {
        if let Some(band) = session.rubber_band.take() {
            let count = session.scene.borrow_mut().select_in_rect(band, extend);
            tracing::debug!(count, "rubber band selection");
        }
    }
    session.guides.set(SnapGuides::default());
    session.rubber_band.set(None);

    let snapshot = session.press_snapshot.borrow_mut().take();
    if let Some(snapshot) = snapshot {
        if session.history.record_if_changed(snapshot) {
            tracing::debug!(?gesture, "gesture recorded in history");
        }
    }
    if session.machine.borrow().state().is_pointer_gesture() {
        session.transition(InteractionEvent::Release);
    }
    session.refresh();
}

fn update_hover(session: &EditorSession, point: Option<Point>) {
    let hovered = point.and_then(|point| {
        let scene = session.scene.try_borrow().ok()?;
        text_at(&scene, point)
    });
    if session.hovered_text.replace(hovered) != hovered {
        session.canvas.queue_draw();
    }
}

/// Right click selects the item under the pointer, when needed, and opens the
/// group/ungroup/delete menu.
pub(in crate::app::editor_runtime) fn connect_context_menu(session: &EditorSession) {
    let popover = PopoverMenu::from_model(Some(&build_context_menu_model()));
    popover.set_parent(&session.canvas);
    popover.set_has_arrow(false);
    {
        let popover = popover.clone();
        session.window.connect_destroy(move |_| popover.unparent());
    }

    let click = GestureClick::new();
    click.set_button(gtk4::gdk::BUTTON_SECONDARY);
    let press_session = session.clone();
    click.connect_pressed(move |gesture, _, x, y| {
        let session = &press_session;
        if session.machine.borrow().state().is_pointer_gesture() {
            return;
        }
        session.finish_text_edit();
        let hit = session.scene.borrow().item_at(Point::new(x, y));
        if let Some(id) = hit {
            let mut scene = session.scene.borrow_mut();
            if !scene.is_selected(id) {
                scene.select_only(id);
            }
        }
        session.refresh();
        popover.set_pointing_to(Some(&gtk4::gdk::Rectangle::new(x as i32, y as i32, 1, 1)));
        popover.popup();
        gesture.set_state(gtk4::EventSequenceState::Claimed);
    });
    session.canvas.add_controller(click);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured_text(scene: &mut Scene, content: &str) -> u64 {
        let id = scene.add_text(content);
        scene.set_text_measured_size(id, Size::new(60.0, 20.0));
        id
    }

    #[test]
    fn text_at_finds_text_inside_a_group() {
        let mut scene = Scene::default();
        let text = measured_text(&mut scene, "inside");
        let other = scene.add_text("far");
        scene
            .set_item_position(other, Point::new(10.0, 10.0))
            .expect("move other text");
        scene.select_all();
        scene.group_selected().expect("group");

        let center = scene.text(text).expect("text").bounds().center();
        assert_eq!(text_at(&scene, center), Some(text));
    }

    #[test]
    fn text_at_ignores_images_and_empty_space() {
        let mut scene = Scene::default();
        let image = scene.add_image("photo.png", Size::new(80.0, 80.0));
        let center = scene.image(image).expect("image").bounds().center();
        assert_eq!(text_at(&scene, center), None);
        assert_eq!(text_at(&scene, Point::new(1.0, 1.0)), None);
    }
}
