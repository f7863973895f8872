/// Shared geometric and color primitives used across the scene, export and app modules.
/// Coordinates are scene pixels; y grows downward.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn delta_to(self, other: Point) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Largest size with this aspect ratio that fits inside `bounds`, rounded to whole
    /// pixels. Degenerate sources or bounds yield an empty size.
    pub fn fit_within(self, bounds: Size) -> Size {
        if self.width <= 0.0 || self.height <= 0.0 || bounds.width <= 0.0 || bounds.height <= 0.0
        {
            return Size::default();
        }
        let scaled_height = bounds.width * self.height / self.width;
        if scaled_height <= bounds.height {
            Size::new(bounds.width.round(), scaled_height.round())
        } else {
            let scaled_width = bounds.height * self.width / self.height;
            Size::new(scaled_width.round(), bounds.height.round())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// Normalized rectangle spanned by two corner points in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let left = a.x.min(b.x);
        let top = a.y.min(b.y);
        Self::new(left, top, (a.x - b.x).abs(), (a.y - b.y).abs())
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Grows (positive) or shrinks (negative) the rectangle on every side.
    pub fn inflated(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            (self.width + amount * 2.0).max(0.0),
            (self.height + amount * 2.0).max(0.0),
        )
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() <= other.right()
            && other.left() <= self.right()
            && self.top() <= other.bottom()
            && other.top() <= self.bottom()
    }

    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn rgb_f64(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    /// `#rrggbb`, lowercase.
    pub fn hex_name(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_within_keeps_aspect_ratio_on_limiting_axis() {
        let source = Size::new(200.0, 100.0);
        assert_eq!(
            source.fit_within(Size::new(100.0, 100.0)),
            Size::new(100.0, 50.0)
        );
        assert_eq!(
            source.fit_within(Size::new(400.0, 60.0)),
            Size::new(120.0, 60.0)
        );
    }

    #[test]
    fn fit_within_degenerate_inputs_produce_empty_size() {
        assert_eq!(
            Size::new(0.0, 10.0).fit_within(Size::new(50.0, 50.0)),
            Size::default()
        );
        assert_eq!(
            Size::new(10.0, 10.0).fit_within(Size::new(-1.0, 50.0)),
            Size::default()
        );
    }

    #[test]
    fn rect_from_corners_normalizes_any_drag_direction() {
        let rect = Rect::from_corners(Point::new(50.0, 40.0), Point::new(10.0, 60.0));
        assert_eq!(rect, Rect::new(10.0, 40.0, 40.0, 20.0));
    }

    #[test]
    fn rect_union_and_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 5.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Rect::new(5.0, 5.0, 1.0, 1.0)));
        assert_eq!(a.union(&b), Rect::new(0.0, 0.0, 30.0, 15.0));
        assert_eq!(a.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn color_hex_round_trips_and_rejects_garbage() {
        let color = Color::new(255, 16, 0);
        assert_eq!(color.hex_name(), "#ff1000");
        assert_eq!(Color::from_hex("#FF1000"), Some(color));
        assert_eq!(Color::from_hex("ff1000"), None);
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }
}
