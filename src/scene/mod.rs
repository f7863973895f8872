mod group;
mod history;
mod image;
mod operations;
mod query;
mod selection;
mod snap;
mod text;

use thiserror::Error;

pub use crate::geometry::{Color, Point, Rect, Size};
pub use group::{GroupItem, GROUP_Z_VALUE};
pub use history::{HistoryStep, SceneHistory, HISTORY_LIMIT};
pub use image::{ImageItem, MIN_IMAGE_SIZE, RESIZE_HANDLE_SIZE};
pub use snap::{snap_to_grid, snap_to_guides, SnapGuides, SnapOptions};
pub use text::{TextFont, TextItem, TEXT_BOUNDS_PADDING, TEXT_FONT_SIZE_MAX, TEXT_FONT_SIZE_MIN};

pub const DEFAULT_SCENE_WIDTH: f64 = 1920.0;
pub const DEFAULT_SCENE_HEIGHT: f64 = 1080.0;
pub const DEFAULT_TEXT_PLACEHOLDER: &str = "Double-click to edit";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("scene item {0} not found")]
    ItemNotFound(u64),
    #[error("scene item {0} is not an image")]
    NotAnImage(u64),
    #[error("scene item {0} is not a text box")]
    NotAText(u64),
    #[error("grouping needs at least two top-level items, got {0}")]
    GroupNeedsTwoItems(usize),
    #[error("requested image size {width}x{height} is below the minimum")]
    ResizeTooSmall { width: f64, height: f64 },
    #[error("position must be finite")]
    NonFinitePosition,
}

/// A top-level entry in the scene. Groups own their children; children are never groups.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneItem {
    Image(ImageItem),
    Text(TextItem),
    Group(GroupItem),
}

impl SceneItem {
    pub fn id(&self) -> u64 {
        match self {
            Self::Image(image) => image.id,
            Self::Text(text) => text.id,
            Self::Group(group) => group.id,
        }
    }

    /// Top-left of the item's reference frame. For groups this is the top-left of the
    /// union of their children.
    pub fn position(&self) -> Point {
        match self {
            Self::Image(image) => image.position(),
            Self::Text(text) => text.position(),
            Self::Group(group) => group.position(),
        }
    }

    /// Bounds relative to `position()`.
    pub fn local_bounds(&self) -> Rect {
        let position = self.position();
        self.bounds().translated(-position.x, -position.y)
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Self::Image(image) => image.bounds(),
            Self::Text(text) => text.bounds(),
            Self::Group(group) => group.bounds(),
        }
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        match self {
            Self::Image(image) => {
                image.x += dx;
                image.y += dy;
            }
            Self::Text(text) => {
                text.x += dx;
                text.y += dy;
            }
            Self::Group(group) => group.move_by(dx, dy),
        }
    }

    pub fn set_position(&mut self, position: Point) {
        let (dx, dy) = self.position().delta_to(position);
        self.move_by(dx, dy);
    }

    pub fn z_value(&self) -> f64 {
        match self {
            Self::Group(_) => GROUP_Z_VALUE,
            Self::Image(_) | Self::Text(_) => 0.0,
        }
    }

    pub fn as_image(&self) -> Option<&ImageItem> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    fn as_image_mut(&mut self) -> Option<&mut ImageItem> {
        match self {
            Self::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextItem> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    fn as_text_mut(&mut self) -> Option<&mut TextItem> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupItem> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// The item itself, or a group's children, in order. Groups flatten to their members.
    pub fn leaves(&self) -> Vec<&SceneItem> {
        match self {
            Self::Group(group) => group.children().iter().collect(),
            other => vec![other],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneOptions {
    pub show_grid: bool,
    pub snap_to_grid: bool,
    pub grid_size: f64,
    pub snap_threshold: f64,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            show_grid: true,
            snap_to_grid: false,
            grid_size: 20.0,
            snap_threshold: 5.0,
        }
    }
}

impl SceneOptions {
    pub fn snap(&self) -> SnapOptions {
        SnapOptions {
            threshold: self.snap_threshold,
            grid_size: self.snap_to_grid.then_some(self.grid_size),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    rect: Rect,
    items: Vec<SceneItem>,
    next_id: u64,
    selected: Vec<u64>,
    editing_text: Option<u64>,
    text_defaults: TextFont,
    options: SceneOptions,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(Size::new(DEFAULT_SCENE_WIDTH, DEFAULT_SCENE_HEIGHT))
    }
}

impl Scene {
    pub fn new(size: Size) -> Self {
        Self {
            rect: Rect::from_origin_size(Point::default(), size),
            items: Vec::new(),
            next_id: 1,
            selected: Vec::new(),
            editing_text: None,
            text_defaults: TextFont::default(),
            options: SceneOptions::default(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    fn find_item_index(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    fn find_item_mut<T>(
        &mut self,
        id: u64,
        projector: fn(&mut SceneItem) -> Option<&mut T>,
    ) -> Option<&mut T> {
        self.items.iter_mut().find_map(|item| match item {
            other if other.id() == id => projector(other),
            SceneItem::Group(group) => group
                .children_mut()
                .iter_mut()
                .find(|child| child.id() == id)
                .and_then(projector),
            _ => None,
        })
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn items(&self) -> &[SceneItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn options(&self) -> SceneOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SceneOptions) {
        self.options = options;
    }

    pub fn set_show_grid(&mut self, show_grid: bool) {
        self.options.show_grid = show_grid;
    }

    pub fn set_snap_to_grid(&mut self, snap_to_grid: bool) {
        self.options.snap_to_grid = snap_to_grid;
    }

    pub fn text_defaults(&self) -> &TextFont {
        &self.text_defaults
    }

    pub fn set_text_defaults(&mut self, font: TextFont) {
        self.text_defaults = font;
    }

    /// Swaps in a whole item list (undo/redo, load). Selection and edit focus are
    /// pruned to ids that still exist and id allocation continues past the new items.
    pub fn replace_items(&mut self, items: Vec<SceneItem>) {
        let max_id = items
            .iter()
            .flat_map(|item| {
                let mut ids = vec![item.id()];
                ids.extend(item.leaves().iter().map(|leaf| leaf.id()));
                ids
            })
            .max()
            .unwrap_or(0);
        self.items = items;
        self.next_id = self.next_id.max(max_id.saturating_add(1));
        self.prune_selection();
        if let Some(editing) = self.editing_text {
            if self.text(editing).is_none() {
                self.editing_text = None;
            }
        }
    }

    /// Replaces the scene with externally built items (a loaded layout), giving each
    /// item and group child a fresh id. Selection and edit focus are cleared.
    pub fn adopt_items(&mut self, items: Vec<SceneItem>) {
        let items = items
            .into_iter()
            .map(|mut item| {
                self.reassign_ids(&mut item);
                item
            })
            .collect();
        self.items = items;
        self.selected.clear();
        self.editing_text = None;
    }

    fn reassign_ids(&mut self, item: &mut SceneItem) {
        match item {
            SceneItem::Image(image) => image.id = self.allocate_id(),
            SceneItem::Text(text) => text.id = self.allocate_id(),
            SceneItem::Group(group) => {
                for child in group.children_mut() {
                    self.reassign_ids(child);
                }
                group.id = self.allocate_id();
            }
        }
    }
}

#[cfg(test)]
impl Scene {
    pub(crate) fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_full_hd_with_grid_shown_and_snap_off() {
        let scene = Scene::default();
        assert_eq!(scene.rect(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
        let options = scene.options();
        assert!(options.show_grid);
        assert!(!options.snap_to_grid);
        assert_eq!(options.grid_size, 20.0);
        assert_eq!(options.snap().grid_size, None);
    }

    #[test]
    fn replace_items_continues_ids_after_highest_child() {
        let mut scene = Scene::default();
        let image = ImageItem::new(3, Point::new(0.0, 0.0), "a.png", Size::new(10.0, 10.0));
        let text = TextItem::new(9, Point::new(0.0, 0.0), "t", TextFont::default());
        let group = GroupItem::new(4, vec![SceneItem::Image(image), SceneItem::Text(text)]);
        scene.replace_items(vec![SceneItem::Group(group)]);

        let id = scene.add_text("next");
        assert_eq!(id, 10);
    }

    #[test]
    fn adopted_items_get_fresh_ids_past_existing_ones() {
        let mut scene = Scene::default();
        let old = scene.add_text("old");
        scene.select_only(old);

        let loaded = vec![
            SceneItem::Text(TextItem::new(0, Point::new(1.0, 2.0), "a", TextFont::default())),
            SceneItem::Image(ImageItem::new(
                0,
                Point::new(3.0, 4.0),
                "b.png",
                Size::new(5.0, 5.0),
            )),
        ];
        scene.adopt_items(loaded);

        let ids = scene.items().iter().map(SceneItem::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![old + 1, old + 2]);
        assert!(!scene.has_selection());
        assert_eq!(scene.items()[1].position(), Point::new(3.0, 4.0));
    }

    #[test]
    fn set_position_on_group_moves_children_together() {
        let a = ImageItem::new(1, Point::new(10.0, 10.0), "a.png", Size::new(10.0, 10.0));
        let b = ImageItem::new(2, Point::new(50.0, 30.0), "b.png", Size::new(10.0, 10.0));
        let mut item = SceneItem::Group(GroupItem::new(
            3,
            vec![SceneItem::Image(a), SceneItem::Image(b)],
        ));
        assert_eq!(item.position(), Point::new(10.0, 10.0));

        item.set_position(Point::new(0.0, 0.0));
        let children = item.leaves();
        assert_eq!(children[0].position(), Point::new(0.0, 0.0));
        assert_eq!(children[1].position(), Point::new(40.0, 20.0));
        assert_eq!(item.z_value(), GROUP_Z_VALUE);
    }
}
