use super::{Point, Rect, SceneItem};

/// Groups are drawn above ungrouped items.
pub const GROUP_Z_VALUE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupItem {
    pub id: u64,
    children: Vec<SceneItem>,
}

impl GroupItem {
    /// Nested groups are flattened into their members so groups never nest.
    pub fn new(id: u64, children: Vec<SceneItem>) -> Self {
        let children = children
            .into_iter()
            .flat_map(|child| match child {
                SceneItem::Group(group) => group.into_children(),
                other => vec![other],
            })
            .collect();
        Self { id, children }
    }

    pub fn children(&self) -> &[SceneItem] {
        &self.children
    }

    pub(super) fn children_mut(&mut self) -> &mut [SceneItem] {
        &mut self.children
    }

    pub fn into_children(self) -> Vec<SceneItem> {
        self.children
    }

    pub fn contains(&self, id: u64) -> bool {
        self.children.iter().any(|child| child.id() == id)
    }

    pub fn bounds(&self) -> Rect {
        let mut rects = self.children.iter().map(SceneItem::bounds);
        match rects.next() {
            Some(first) => rects.fold(first, |acc, rect| acc.union(&rect)),
            None => Rect::default(),
        }
    }

    pub fn position(&self) -> Point {
        self.bounds().origin()
    }

    pub fn move_by(&mut self, dx: f64, dy: f64) {
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{ImageItem, Size};

    fn image(id: u64, x: f64, y: f64) -> SceneItem {
        SceneItem::Image(ImageItem::new(
            id,
            Point::new(x, y),
            "a.png",
            Size::new(20.0, 10.0),
        ))
    }

    #[test]
    fn bounds_are_union_of_children() {
        let group = GroupItem::new(9, vec![image(1, 0.0, 0.0), image(2, 100.0, 50.0)]);
        assert_eq!(group.bounds(), Rect::new(0.0, 0.0, 120.0, 60.0));
        assert!(group.contains(2));
        assert!(!group.contains(9));
    }

    #[test]
    fn nested_groups_are_flattened() {
        let inner = GroupItem::new(5, vec![image(1, 0.0, 0.0), image(2, 10.0, 0.0)]);
        let outer = GroupItem::new(6, vec![SceneItem::Group(inner), image(3, 20.0, 0.0)]);
        let ids = outer.children().iter().map(SceneItem::id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn empty_group_has_empty_bounds() {
        assert_eq!(GroupItem::new(1, Vec::new()).bounds(), Rect::default());
    }
}
