use super::*;

impl Scene {
    pub fn item(&self, id: u64) -> Option<&SceneItem> {
        self.items.iter().find_map(|item| match item {
            _ if item.id() == id => Some(item),
            SceneItem::Group(group) => group.children().iter().find(|child| child.id() == id),
            _ => None,
        })
    }

    pub fn top_level(&self, id: u64) -> Option<&SceneItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn image(&self, id: u64) -> Option<&ImageItem> {
        self.item(id).and_then(SceneItem::as_image)
    }

    pub fn text(&self, id: u64) -> Option<&TextItem> {
        self.item(id).and_then(SceneItem::as_text)
    }

    pub(super) fn image_mut(&mut self, id: u64) -> Option<&mut ImageItem> {
        self.find_item_mut(id, SceneItem::as_image_mut)
    }

    pub(super) fn text_mut(&mut self, id: u64) -> Option<&mut TextItem> {
        self.find_item_mut(id, SceneItem::as_text_mut)
    }

    /// Top-level items sorted bottom to top: ascending z, insertion order within a z.
    pub fn draw_order(&self) -> Vec<&SceneItem> {
        let mut ordered = self.items.iter().collect::<Vec<_>>();
        ordered.sort_by(|a, b| a.z_value().total_cmp(&b.z_value()));
        ordered
    }

    /// Every image and text item in draw order with groups expanded.
    pub fn leaves_in_draw_order(&self) -> Vec<&SceneItem> {
        self.draw_order()
            .into_iter()
            .flat_map(SceneItem::leaves)
            .collect()
    }

    /// Top-most top-level item whose bounds contain `point`. Groups hit as a whole.
    pub fn item_at(&self, point: Point) -> Option<u64> {
        self.draw_order()
            .into_iter()
            .rev()
            .find(|item| item.bounds().contains(point))
            .map(SceneItem::id)
    }

    /// Ungrouped image whose resize handle contains `point`.
    pub fn resize_handle_at(&self, point: Point) -> Option<u64> {
        self.draw_order()
            .into_iter()
            .rev()
            .filter_map(SceneItem::as_image)
            .find(|image| image.handle_rect().contains(point))
            .map(|image| image.id)
    }

    /// Scene bounds of top-level items other than `excluded`, used as snap candidates.
    pub fn snap_candidates(&self, excluded: &[u64]) -> Vec<Rect> {
        self.items
            .iter()
            .filter(|item| !excluded.contains(&item.id()))
            .map(SceneItem::bounds)
            .collect()
    }

    pub fn first_selected(&self) -> Option<&SceneItem> {
        self.selected.first().and_then(|id| self.top_level(*id))
    }

    pub fn first_selected_text(&self) -> Option<&TextItem> {
        self.selected
            .iter()
            .filter_map(|id| self.top_level(*id))
            .find_map(SceneItem::as_text)
    }

    pub fn editing_text_id(&self) -> Option<u64> {
        self.editing_text
    }

    pub fn editing_text(&self) -> Option<&TextItem> {
        self.editing_text.and_then(|id| self.text(id))
    }
}
