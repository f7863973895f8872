use super::{Point, Rect, SceneError, Size};

/// Side length of the square resize handle drawn at an image's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f64 = 5.0;
/// Requested sizes below this on either axis are ignored while resizing.
pub const MIN_IMAGE_SIZE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub source: String,
    natural_size: Size,
    size: Size,
}

impl ImageItem {
    pub fn new(id: u64, position: Point, source: impl Into<String>, natural_size: Size) -> Self {
        Self {
            id,
            x: position.x,
            y: position.y,
            source: source.into(),
            natural_size,
            size: natural_size,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Pixel size of the source image as decoded.
    pub fn natural_size(&self) -> Size {
        self.natural_size
    }

    /// Displayed size on the canvas.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn local_bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.size.width, self.size.height)
    }

    pub fn bounds(&self) -> Rect {
        self.local_bounds().translated(self.x, self.y)
    }

    /// Handle square in scene coordinates, kept at `(width - 5, height - 5)`.
    pub fn handle_rect(&self) -> Rect {
        Rect::new(
            self.x + self.size.width - RESIZE_HANDLE_SIZE,
            self.y + self.size.height - RESIZE_HANDLE_SIZE,
            RESIZE_HANDLE_SIZE,
            RESIZE_HANDLE_SIZE,
        )
    }

    /// Rescales from the source so the image fits inside `requested` with its aspect ratio.
    pub fn resize_to(&mut self, requested: Size) -> Result<Size, SceneError> {
        let too_small = |value: f64| value.is_nan() || value < MIN_IMAGE_SIZE;
        if too_small(requested.width) || too_small(requested.height) {
            return Err(SceneError::ResizeTooSmall {
                width: requested.width,
                height: requested.height,
            });
        }
        let fitted = self.natural_size.fit_within(requested);
        self.size = Size::new(fitted.width.max(1.0), fitted.height.max(1.0));
        Ok(self.size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn landscape() -> ImageItem {
        ImageItem::new(1, Point::new(10.0, 20.0), "a.png", Size::new(400.0, 200.0))
    }

    #[test]
    fn new_image_uses_natural_size_and_places_handle_inside_corner() {
        let image = landscape();
        assert_eq!(image.size(), Size::new(400.0, 200.0));
        assert_eq!(image.bounds(), Rect::new(10.0, 20.0, 400.0, 200.0));
        assert_eq!(image.handle_rect(), Rect::new(405.0, 215.0, 5.0, 5.0));
    }

    #[test]
    fn resize_keeps_aspect_ratio_and_moves_handle() {
        let mut image = landscape();
        let size = image
            .resize_to(Size::new(100.0, 100.0))
            .expect("resize should apply");
        assert_eq!(size, Size::new(100.0, 50.0));
        assert_eq!(image.handle_rect(), Rect::new(105.0, 65.0, 5.0, 5.0));

        image
            .resize_to(Size::new(800.0, 300.0))
            .expect("upscale should apply");
        assert_eq!(image.size(), Size::new(600.0, 300.0));
    }

    #[test]
    fn resize_below_minimum_is_rejected_without_change() {
        let mut image = landscape();
        let err = image
            .resize_to(Size::new(4.0, 300.0))
            .expect_err("tiny width should be rejected");
        assert!(matches!(err, SceneError::ResizeTooSmall { .. }));
        assert_eq!(image.size(), Size::new(400.0, 200.0));

        assert!(image.resize_to(Size::new(f64::NAN, 10.0)).is_err());
    }
}
