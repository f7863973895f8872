use super::*;
use crate::input::{resolve_text_input, TextInputAction, TextInputEvent};

fn as_item_mut(item: &mut SceneItem) -> Option<&mut SceneItem> {
    Some(item)
}

impl Scene {
    /// Inserts an image with its top-left at the scene center.
    pub fn add_image(&mut self, source: impl Into<String>, natural_size: Size) -> u64 {
        let id = self.allocate_id();
        let image = ImageItem::new(id, self.rect.center(), source, natural_size);
        self.items.push(SceneItem::Image(image));
        id
    }

    /// Inserts a text box in the default font with its top-left at the scene center.
    pub fn add_text(&mut self, content: impl Into<String>) -> u64 {
        let id = self.allocate_id();
        let text = TextItem::new(
            id,
            self.rect.center(),
            content,
            self.text_defaults.clone(),
        );
        self.items.push(SceneItem::Text(text));
        id
    }

    pub fn set_item_position(&mut self, id: u64, position: Point) -> Result<(), SceneError> {
        if !position.is_finite() {
            return Err(SceneError::NonFinitePosition);
        }
        let item = self
            .find_item_mut(id, as_item_mut)
            .ok_or(SceneError::ItemNotFound(id))?;
        item.set_position(position);
        Ok(())
    }

    /// Arrow-key nudge of every selected item.
    pub fn move_selected_by(&mut self, dx: f64, dy: f64) -> bool {
        if !dx.is_finite() || !dy.is_finite() || self.selected.is_empty() {
            return false;
        }
        let selected = &self.selected;
        let mut moved = false;
        for item in self
            .items
            .iter_mut()
            .filter(|item| selected.contains(&item.id()))
        {
            item.move_by(dx, dy);
            moved = true;
        }
        moved
    }

    /// Moves the dragged top-level item toward `raw_position`, aligning it to the other
    /// items' edges and centers and then to the grid. Other selected items follow by the
    /// same offset. Unselected items are the only snap candidates.
    pub fn drag_item_to(
        &mut self,
        id: u64,
        raw_position: Point,
        options: SnapOptions,
    ) -> Result<SnapGuides, SceneError> {
        if !raw_position.is_finite() {
            return Err(SceneError::NonFinitePosition);
        }
        let index = self.find_item_index(id).ok_or(SceneError::ItemNotFound(id))?;
        let previous = self.items[index].position();
        let local_bounds = self.items[index].local_bounds();

        let mut excluded = self.selected.clone();
        excluded.push(id);
        let candidates = self.snap_candidates(&excluded);
        let (snapped, guides) =
            snap_to_guides(local_bounds, raw_position, &candidates, options.threshold);
        let target = match options.grid_size {
            Some(grid_size) => snap_to_grid(snapped, grid_size),
            None => snapped,
        };

        let (dx, dy) = previous.delta_to(target);
        for item in self.items.iter_mut() {
            let item_id = item.id();
            if item_id == id || self.selected.contains(&item_id) {
                item.move_by(dx, dy);
            }
        }
        Ok(guides)
    }

    /// Removes the selected items. A selected group is dissolved and its children stay.
    pub fn delete_selected(&mut self) -> usize {
        if self.selected.is_empty() {
            return 0;
        }
        let selected = std::mem::take(&mut self.selected);
        let mut affected = 0_usize;
        let mut kept = Vec::with_capacity(self.items.len());
        for item in std::mem::take(&mut self.items) {
            if !selected.contains(&item.id()) {
                kept.push(item);
                continue;
            }
            affected = affected.saturating_add(1);
            if let SceneItem::Group(group) = item {
                kept.extend(group.into_children());
            }
        }
        self.items = kept;
        if let Some(editing) = self.editing_text {
            if self.text(editing).is_none() {
                self.editing_text = None;
            }
        }
        affected
    }

    /// Collects at least two selected top-level items into a new group, which becomes
    /// the selection.
    pub fn group_selected(&mut self) -> Result<u64, SceneError> {
        let count = self
            .items
            .iter()
            .filter(|item| self.selected.contains(&item.id()))
            .count();
        if count < 2 {
            return Err(SceneError::GroupNeedsTwoItems(count));
        }

        let (members, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|item| self.selected.contains(&item.id()));
        self.items = rest;
        let id = self.allocate_id();
        self.items.push(SceneItem::Group(GroupItem::new(id, members)));
        self.selected = vec![id];
        Ok(id)
    }

    /// Dissolves every selected group in place; the former children become the selection.
    pub fn ungroup_selected(&mut self) -> Vec<u64> {
        let selected = &self.selected;
        if !self
            .items
            .iter()
            .any(|item| selected.contains(&item.id()) && item.as_group().is_some())
        {
            return Vec::new();
        }

        let mut released = Vec::new();
        let mut items = Vec::with_capacity(self.items.len());
        for item in std::mem::take(&mut self.items) {
            match item {
                SceneItem::Group(group) if self.selected.contains(&group.id) => {
                    let children = group.into_children();
                    released.extend(children.iter().map(SceneItem::id));
                    items.extend(children);
                }
                other => items.push(other),
            }
        }
        self.items = items;
        self.selected = released.clone();
        released
    }

    pub fn resize_image(&mut self, id: u64, requested: Size) -> Result<Size, SceneError> {
        if self.item(id).is_none() {
            return Err(SceneError::ItemNotFound(id));
        }
        self.image_mut(id)
            .ok_or(SceneError::NotAnImage(id))?
            .resize_to(requested)
    }

    /// Records the toolkit-measured extent of a text box's content.
    pub fn set_text_measured_size(&mut self, id: u64, size: Size) {
        if let Some(text) = self.text_mut(id) {
            text.set_measured_size(size);
        }
    }

    fn first_selected_text_id(&self) -> Option<u64> {
        self.first_selected_text().map(|text| text.id)
    }

    fn update_first_selected_text(&mut self, apply: impl FnOnce(&mut TextItem)) -> Option<u64> {
        let id = self.first_selected_text_id()?;
        let text = self.text_mut(id)?;
        apply(text);
        Some(id)
    }

    pub fn set_selected_font_family(&mut self, family: &str) -> Option<u64> {
        self.update_first_selected_text(|text| {
            let mut font = text.font.clone();
            font.set_family(family);
            text.set_font(font);
        })
    }

    pub fn set_selected_font_size(&mut self, point_size: u32) -> Option<u64> {
        self.update_first_selected_text(|text| {
            let mut font = text.font.clone();
            font.set_point_size(point_size);
            text.set_font(font);
        })
    }

    pub fn set_selected_font_bold(&mut self, bold: bool) -> Option<u64> {
        self.update_first_selected_text(|text| {
            let mut font = text.font.clone();
            font.bold = bold;
            text.set_font(font);
        })
    }

    pub fn set_selected_text_color(&mut self, color: Color) -> Option<u64> {
        self.update_first_selected_text(|text| text.color = color)
    }

    /// Routes a key to the text box in edit mode. Escape leaves edit mode.
    pub fn apply_text_input(&mut self, event: TextInputEvent) -> TextInputAction {
        let action = resolve_text_input(event, self.editing_text.is_some());

        let Some(target_id) = self.editing_text else {
            return action;
        };
        let Some(text) = self.text_mut(target_id) else {
            self.editing_text = None;
            return TextInputAction::NoTextTarget;
        };

        match action {
            TextInputAction::InsertCharacter(c) => {
                text.insert_char(c);
                action
            }
            TextInputAction::DeleteBackward => {
                if text.delete_backward() {
                    action
                } else {
                    TextInputAction::NoAction
                }
            }
            TextInputAction::InsertLineBreak => {
                text.insert_newline();
                action
            }
            TextInputAction::MoveCursor => {
                let moved = match event {
                    TextInputEvent::CursorLeft => text.move_cursor_left(),
                    TextInputEvent::CursorRight => text.move_cursor_right(),
                    TextInputEvent::CursorUp => text.move_cursor_up(),
                    TextInputEvent::CursorDown => text.move_cursor_down(),
                    _ => false,
                };
                if moved {
                    action
                } else {
                    TextInputAction::NoAction
                }
            }
            TextInputAction::ExitFocus => {
                self.editing_text = None;
                action
            }
            TextInputAction::NoTextTarget | TextInputAction::NoAction => action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::default()
    }

    fn place(scene: &mut Scene, id: u64, x: f64, y: f64) {
        scene
            .set_item_position(id, Point::new(x, y))
            .expect("item should exist");
    }

    #[test]
    fn new_items_land_at_scene_center_with_default_font() {
        let mut scene = scene();
        let image = scene.add_image("a.png", Size::new(40.0, 30.0));
        let text = scene.add_text(DEFAULT_TEXT_PLACEHOLDER);
        assert_eq!(
            scene.image(image).map(ImageItem::position),
            Some(Point::new(960.0, 540.0))
        );
        let text = scene.text(text).expect("text should exist");
        assert_eq!(text.position(), Point::new(960.0, 540.0));
        assert_eq!(text.font, TextFont::default());
        assert_eq!(text.color, Color::BLACK);
        assert_eq!(text.content, "Double-click to edit");
    }

    #[test]
    fn ids_are_never_reused_after_delete() {
        let mut scene = scene();
        let first = scene.add_text("a");
        scene.select_only(first);
        scene.delete_selected();
        let second = scene.add_text("b");
        assert_ne!(first, second);
    }

    #[test]
    fn drag_snaps_to_unselected_item_edge_and_reports_guides() {
        let mut scene = scene();
        let target = scene.add_image("t.png", Size::new(100.0, 100.0));
        let moving = scene.add_image("m.png", Size::new(50.0, 50.0));
        place(&mut scene, target, 200.0, 200.0);
        place(&mut scene, moving, 0.0, 0.0);
        scene.select_only(moving);

        let guides = scene
            .drag_item_to(moving, Point::new(203.0, 700.0), SnapOptions::default())
            .expect("drag should apply");
        assert_eq!(scene.item(moving).map(SceneItem::position), Some(Point::new(200.0, 700.0)));
        assert_eq!(guides.vertical, Some(200.0));
        assert_eq!(guides.horizontal, None);

        let guides = scene
            .drag_item_to(moving, Point::new(206.0, 700.0), SnapOptions::default())
            .expect("drag should apply");
        assert!(guides.is_empty(), "6 px away is outside the threshold");
        assert_eq!(scene.item(moving).map(SceneItem::position), Some(Point::new(206.0, 700.0)));
    }

    #[test]
    fn drag_carries_selection_and_ignores_it_as_snap_target() {
        let mut scene = scene();
        let a = scene.add_image("a.png", Size::new(50.0, 50.0));
        let b = scene.add_image("b.png", Size::new(50.0, 50.0));
        place(&mut scene, a, 0.0, 0.0);
        place(&mut scene, b, 100.0, 0.0);
        scene.select_only(a);
        scene.toggle_selection(b);

        let guides = scene
            .drag_item_to(a, Point::new(10.0, 13.0), SnapOptions::default())
            .expect("drag should apply");
        assert!(guides.is_empty());
        assert_eq!(scene.item(a).map(SceneItem::position), Some(Point::new(10.0, 13.0)));
        assert_eq!(scene.item(b).map(SceneItem::position), Some(Point::new(110.0, 13.0)));
    }

    #[test]
    fn drag_applies_grid_after_guides() {
        let mut scene = scene();
        let id = scene.add_image("a.png", Size::new(50.0, 50.0));
        scene.select_only(id);
        let options = SnapOptions {
            threshold: 5.0,
            grid_size: Some(20.0),
        };
        scene
            .drag_item_to(id, Point::new(29.0, 51.0), options)
            .expect("drag should apply");
        assert_eq!(scene.item(id).map(SceneItem::position), Some(Point::new(20.0, 60.0)));
    }

    #[test]
    fn arrow_nudge_moves_only_selection() {
        let mut scene = scene();
        let a = scene.add_text("a");
        let b = scene.add_text("b");
        assert!(!scene.move_selected_by(1.0, 0.0));
        scene.select_only(a);
        assert!(scene.move_selected_by(0.0, -10.0));
        assert_eq!(scene.item(a).map(SceneItem::position), Some(Point::new(960.0, 530.0)));
        assert_eq!(scene.item(b).map(SceneItem::position), Some(Point::new(960.0, 540.0)));
    }

    #[test]
    fn group_needs_two_items_and_ungroup_restores_children() {
        let mut scene = scene();
        let a = scene.add_image("a.png", Size::new(10.0, 10.0));
        let b = scene.add_text("b");
        let c = scene.add_text("c");

        scene.select_only(a);
        assert_eq!(scene.group_selected(), Err(SceneError::GroupNeedsTwoItems(1)));
        assert_eq!(scene.item_count(), 3);

        scene.toggle_selection(c);
        let group = scene.group_selected().expect("two items should group");
        assert_eq!(scene.selected_ids(), &[group]);
        assert_eq!(scene.item_count(), 2);
        assert_eq!(scene.draw_order().last().map(|item| item.id()), Some(group));
        assert_eq!(scene.top_level_id_for(a), Some(group));

        let released = scene.ungroup_selected();
        assert_eq!(released, vec![a, c]);
        assert_eq!(scene.selected_ids(), &[a, c]);
        let ids = scene.items().iter().map(SceneItem::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![b, a, c]);
    }

    #[test]
    fn setting_a_group_position_moves_its_children() {
        let mut scene = scene();
        let a = scene.add_image("a.png", Size::new(10.0, 10.0));
        let b = scene.add_image("b.png", Size::new(10.0, 10.0));
        place(&mut scene, a, 300.0, 200.0);
        place(&mut scene, b, 340.0, 260.0);
        scene.select_only(a);
        scene.toggle_selection(b);
        let group = scene.group_selected().expect("two items should group");

        scene
            .set_item_position(group, Point::new(100.0, 100.0))
            .expect("group should be found by its own id");
        assert_eq!(scene.item(a).map(SceneItem::position), Some(Point::new(100.0, 100.0)));
        assert_eq!(scene.item(b).map(SceneItem::position), Some(Point::new(140.0, 160.0)));
        assert_eq!(scene.top_level_id_for(b), Some(group));
    }

    #[test]
    fn deleting_a_group_keeps_its_children() {
        let mut scene = scene();
        let a = scene.add_text("a");
        let b = scene.add_text("b");
        let lone = scene.add_text("lone");
        scene.select_only(a);
        scene.toggle_selection(b);
        let group = scene.group_selected().expect("two items should group");
        scene.toggle_selection(lone);

        assert_eq!(scene.delete_selected(), 2);
        assert!(scene.top_level(group).is_none());
        assert!(scene.item(lone).is_none());
        assert!(scene.top_level(a).is_some());
        assert!(scene.top_level(b).is_some());
        assert!(!scene.has_selection());
    }

    #[test]
    fn resize_targets_images_only() {
        let mut scene = scene();
        let image = scene.add_image("a.png", Size::new(200.0, 100.0));
        let text = scene.add_text("t");
        assert_eq!(
            scene.resize_image(image, Size::new(50.0, 50.0)),
            Ok(Size::new(50.0, 25.0))
        );
        assert_eq!(
            scene.resize_image(text, Size::new(50.0, 50.0)),
            Err(SceneError::NotAnImage(text))
        );
        assert_eq!(
            scene.resize_image(99, Size::new(50.0, 50.0)),
            Err(SceneError::ItemNotFound(99))
        );
    }

    #[test]
    fn style_changes_hit_first_selected_text() {
        let mut scene = scene();
        let image = scene.add_image("a.png", Size::new(10.0, 10.0));
        let text = scene.add_text("t");
        assert_eq!(scene.set_selected_font_size(30), None);

        scene.select_only(image);
        scene.toggle_selection(text);
        assert_eq!(scene.set_selected_font_size(30), Some(text));
        assert_eq!(scene.set_selected_font_bold(true), Some(text));
        assert_eq!(scene.set_selected_font_family("Serif"), Some(text));
        assert_eq!(scene.set_selected_text_color(Color::new(255, 0, 0)), Some(text));

        let text = scene.text(text).expect("text should exist");
        assert_eq!(text.font, TextFont::new("Serif", 30, true));
        assert_eq!(text.color, Color::new(255, 0, 0));
    }

    #[test]
    fn text_input_edits_focused_box_until_escape() {
        let mut scene = scene();
        let id = scene.add_text("ab");
        assert_eq!(
            scene.apply_text_input(TextInputEvent::Character('x')),
            TextInputAction::NoTextTarget
        );

        scene.begin_text_edit(id).expect("text should enter edit mode");
        scene.apply_text_input(TextInputEvent::Character('c'));
        scene.apply_text_input(TextInputEvent::Enter);
        scene.apply_text_input(TextInputEvent::Character('d'));
        assert_eq!(
            scene.apply_text_input(TextInputEvent::Backspace),
            TextInputAction::DeleteBackward
        );
        assert_eq!(scene.text(id).map(|t| t.content.as_str()), Some("abc\n"));

        assert_eq!(
            scene.apply_text_input(TextInputEvent::Escape),
            TextInputAction::ExitFocus
        );
        assert!(!scene.is_editing_text());
    }

    #[test]
    fn non_finite_positions_are_rejected() {
        let mut scene = scene();
        let id = scene.add_text("t");
        assert_eq!(
            scene.set_item_position(id, Point::new(f64::NAN, 0.0)),
            Err(SceneError::NonFinitePosition)
        );
        assert_eq!(
            scene.drag_item_to(id, Point::new(0.0, f64::INFINITY), SnapOptions::default()),
            Err(SceneError::NonFinitePosition)
        );
    }
}
