use super::*;

impl Scene {
    /// Id of the top-level item that is or contains `id`.
    pub fn top_level_id_for(&self, id: u64) -> Option<u64> {
        self.items.iter().find_map(|item| match item {
            _ if item.id() == id => Some(id),
            SceneItem::Group(group) if group.contains(id) => Some(group.id),
            _ => None,
        })
    }

    pub fn selected_ids(&self) -> &[u64] {
        &self.selected
    }

    pub fn is_selected(&self, id: u64) -> bool {
        self.selected.contains(&id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn select_only(&mut self, id: u64) -> bool {
        let Some(top) = self.top_level_id_for(id) else {
            return false;
        };
        self.selected.clear();
        self.selected.push(top);
        true
    }

    /// Ctrl+click: adds or removes one item while keeping the rest of the selection.
    pub fn toggle_selection(&mut self, id: u64) -> bool {
        let Some(top) = self.top_level_id_for(id) else {
            return false;
        };
        if let Some(index) = self.selected.iter().position(|selected| *selected == top) {
            self.selected.remove(index);
        } else {
            self.selected.push(top);
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected = self.items.iter().map(SceneItem::id).collect();
    }

    /// Rubber band selection: every top-level item whose bounds intersect `rect`.
    pub fn select_in_rect(&mut self, rect: Rect, extend: bool) -> usize {
        if !extend {
            self.selected.clear();
        }
        let hits = self
            .items
            .iter()
            .filter(|item| item.bounds().intersects(&rect))
            .map(SceneItem::id)
            .collect::<Vec<_>>();
        for id in hits {
            if !self.selected.contains(&id) {
                self.selected.push(id);
            }
        }
        self.selected.len()
    }

    pub(super) fn prune_selection(&mut self) {
        let items = &self.items;
        self.selected
            .retain(|id| items.iter().any(|item| item.id() == *id));
    }

    /// Enters edit mode on a text box; it stops being draggable until editing ends.
    pub fn begin_text_edit(&mut self, id: u64) -> Result<(), SceneError> {
        if self.item(id).is_none() {
            return Err(SceneError::ItemNotFound(id));
        }
        let text = self.text_mut(id).ok_or(SceneError::NotAText(id))?;
        text.move_cursor_to_end();
        self.editing_text = Some(id);
        Ok(())
    }

    pub fn end_text_edit(&mut self) -> Option<u64> {
        self.editing_text.take()
    }

    pub fn is_editing_text(&self) -> bool {
        self.editing_text.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with_three() -> (Scene, [u64; 3]) {
        let mut scene = Scene::default();
        let a = scene.add_image("a.png", Size::new(50.0, 50.0));
        let b = scene.add_text("b");
        let c = scene.add_image("c.png", Size::new(50.0, 50.0));
        scene
            .set_item_position(a, Point::new(0.0, 0.0))
            .expect("a should move");
        scene
            .set_item_position(b, Point::new(300.0, 0.0))
            .expect("b should move");
        scene
            .set_item_position(c, Point::new(600.0, 600.0))
            .expect("c should move");
        (scene, [a, b, c])
    }

    #[test]
    fn toggle_adds_and_removes_preserving_order() {
        let (mut scene, [a, b, c]) = scene_with_three();
        scene.select_only(b);
        scene.toggle_selection(a);
        scene.toggle_selection(c);
        assert_eq!(scene.selected_ids(), &[b, a, c]);
        scene.toggle_selection(a);
        assert_eq!(scene.selected_ids(), &[b, c]);
        assert!(!scene.toggle_selection(999));
    }

    #[test]
    fn rubber_band_selects_intersecting_items() {
        let (mut scene, [a, b, c]) = scene_with_three();
        let count = scene.select_in_rect(Rect::new(-5.0, -5.0, 320.0, 40.0), false);
        assert_eq!(count, 2);
        assert!(scene.is_selected(a));
        assert!(scene.is_selected(b));
        assert!(!scene.is_selected(c));

        scene.select_in_rect(Rect::new(590.0, 590.0, 5.0, 5.0), true);
        assert_eq!(scene.selected_ids(), &[a, b]);
        scene.select_in_rect(Rect::new(610.0, 610.0, 5.0, 5.0), true);
        assert_eq!(scene.selected_ids(), &[a, b, c]);
    }

    #[test]
    fn selecting_a_child_selects_its_group() {
        let (mut scene, [a, b, _]) = scene_with_three();
        scene.select_only(a);
        scene.toggle_selection(b);
        let group = scene.group_selected().expect("two items should group");
        scene.clear_selection();
        assert!(scene.select_only(b));
        assert_eq!(scene.selected_ids(), &[group]);
    }

    #[test]
    fn text_edit_requires_a_text_item() {
        let (mut scene, [a, b, _]) = scene_with_three();
        assert_eq!(scene.begin_text_edit(a), Err(SceneError::NotAText(a)));
        assert_eq!(scene.begin_text_edit(77), Err(SceneError::ItemNotFound(77)));
        scene.begin_text_edit(b).expect("text should enter edit mode");
        assert_eq!(scene.editing_text_id(), Some(b));
        assert_eq!(scene.end_text_edit(), Some(b));
        assert!(!scene.is_editing_text());
    }

    #[test]
    fn select_all_covers_top_level_items() {
        let (mut scene, ids) = scene_with_three();
        scene.select_all();
        assert_eq!(scene.selected_ids(), &ids);
    }
}
