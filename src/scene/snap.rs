use super::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Distance below which an edge or center aligns. Strictly less than.
    pub threshold: f64,
    /// Grid pitch applied after guide snapping, when grid snapping is on.
    pub grid_size: Option<f64>,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            threshold: 5.0,
            grid_size: None,
        }
    }
}

/// Alignment guides to draw while dragging: a vertical line at `vertical` (an x) and a
/// horizontal line at `horizontal` (a y).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapGuides {
    pub vertical: Option<f64>,
    pub horizontal: Option<f64>,
}

impl SnapGuides {
    pub fn is_empty(&self) -> bool {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Aligns a moving item against `candidates` (scene bounds of the other items).
///
/// `local_bounds` is the moving item's bounds relative to its position. For each
/// candidate the top edge wins over the vertical center and the left edge over the
/// horizontal center; across candidates the last match on an axis wins. Comparisons use
/// the unsnapped rectangle.
pub fn snap_to_guides(
    local_bounds: Rect,
    raw_position: Point,
    candidates: &[Rect],
    threshold: f64,
) -> (Point, SnapGuides) {
    let moving = local_bounds.translated(raw_position.x, raw_position.y);
    let moving_center = moving.center();
    let mut position = raw_position;
    let mut guides = SnapGuides::default();

    for other in candidates {
        let other_center = other.center();

        if (moving.top() - other.top()).abs() < threshold {
            position.y = other.top() - local_bounds.top();
            guides.horizontal = Some(other.top());
        } else if (moving_center.y - other_center.y).abs() < threshold {
            position.y = other_center.y - local_bounds.top() - local_bounds.height / 2.0;
            guides.horizontal = Some(other_center.y);
        }

        if (moving.left() - other.left()).abs() < threshold {
            position.x = other.left() - local_bounds.left();
            guides.vertical = Some(other.left());
        } else if (moving_center.x - other_center.x).abs() < threshold {
            position.x = other_center.x - local_bounds.left() - local_bounds.width / 2.0;
            guides.vertical = Some(other_center.x);
        }
    }

    (position, guides)
}

/// Rounds both axes to the nearest multiple of `grid_size`. Non-positive sizes leave the
/// point unchanged.
pub fn snap_to_grid(position: Point, grid_size: f64) -> Point {
    if grid_size.is_nan() || grid_size <= 0.0 {
        return position;
    }
    Point::new(
        (position.x / grid_size).round() * grid_size,
        (position.y / grid_size).round() * grid_size,
    )
}
