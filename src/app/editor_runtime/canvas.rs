use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use gtk4::cairo::{Context, FontSlant, FontWeight};
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::Pixbuf;
use gtk4::prelude::*;
use gtk4::DrawingArea;

use crate::scene::{
    Color, ImageItem, Rect, Scene, SceneItem, Size, SnapGuides, TextFont, TextItem,
    TEXT_BOUNDS_PADDING,
};
use crate::storage::resolve_image_source;
use crate::ui::CanvasPalette;

/// Selection outline around text content, tighter than the hit bounds.
const TEXT_OUTLINE_PADDING: f64 = 5.0;
const SELECTION_DASH: [f64; 2] = [4.0, 3.0];
const GUIDE_DASH: [f64; 2] = [4.0, 4.0];

/// Decoded pixbufs keyed by item source. `None` marks a source that failed to load.
pub(super) type ImageCache = Rc<RefCell<HashMap<String, Option<Pixbuf>>>>;

pub(super) struct CanvasDrawDeps {
    pub(super) scene: Rc<RefCell<Scene>>,
    pub(super) guides: Rc<Cell<SnapGuides>>,
    pub(super) rubber_band: Rc<Cell<Option<Rect>>>,
    pub(super) hovered_text: Rc<Cell<Option<u64>>>,
    pub(super) layout_dir: Rc<RefCell<Option<PathBuf>>>,
    pub(super) image_cache: ImageCache,
    pub(super) palette: CanvasPalette,
}

pub(super) fn configure_canvas_draw(canvas: &DrawingArea, deps: CanvasDrawDeps) {
    let CanvasDrawDeps {
        scene,
        guides,
        rubber_band,
        hovered_text,
        layout_dir,
        image_cache,
        palette,
    } = deps;
    canvas.set_draw_func(move |_, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }
        if let Ok(mut scene) = scene.try_borrow_mut() {
            measure_pending_texts(context, &mut scene);
        }
        let Ok(scene) = scene.try_borrow() else {
            return;
        };
        let rect = scene.rect();
        fill_rect(context, rect, palette.background, 1.0);
        let options = scene.options();
        if options.show_grid {
            draw_grid(context, rect, options.grid_size, palette.grid);
        }

        let layout_dir = layout_dir.borrow();
        for item in scene.leaves_in_draw_order() {
            match item {
                SceneItem::Image(image) => {
                    let pixbuf = cached_pixbuf(&image_cache, &image.source, layout_dir.as_ref());
                    draw_image(context, image, pixbuf.as_ref(), palette);
                }
                SceneItem::Text(text) => draw_text(context, text),
                SceneItem::Group(_) => {}
            }
        }

        draw_selection(context, &scene, hovered_text.get(), palette);
        if let Some(text) = scene.editing_text() {
            draw_edit_cursor(context, text, palette.edit_cursor);
        }
        draw_guides(context, rect, guides.get(), palette.guide);
        if let Some(band) = rubber_band.get() {
            fill_rect(context, band, palette.rubber_band, palette.rubber_band_fill_alpha);
            stroke_rect(context, band, palette.rubber_band, 1.0, None);
        }
    });
}

fn set_source_color(context: &Context, color: Color, alpha: f64) {
    let (r, g, b) = color.rgb_f64();
    context.set_source_rgba(r, g, b, alpha);
}

fn fill_rect(context: &Context, rect: Rect, color: Color, alpha: f64) {
    context.save().ok();
    set_source_color(context, color, alpha);
    context.rectangle(rect.x, rect.y, rect.width, rect.height);
    let _ = context.fill();
    context.restore().ok();
}

fn stroke_rect(context: &Context, rect: Rect, color: Color, line_width: f64, dash: Option<&[f64]>) {
    context.save().ok();
    set_source_color(context, color, 1.0);
    context.set_line_width(line_width);
    if let Some(dash) = dash {
        context.set_dash(dash, 0.0);
    }
    context.rectangle(rect.x + 0.5, rect.y + 0.5, rect.width - 1.0, rect.height - 1.0);
    let _ = context.stroke();
    context.restore().ok();
}

fn draw_grid(context: &Context, rect: Rect, grid_size: f64, color: Color) {
    if !grid_size.is_finite() || grid_size < 1.0 {
        return;
    }
    context.save().ok();
    set_source_color(context, color, 1.0);
    context.set_line_width(1.0);
    let mut x = rect.left();
    while x <= rect.right() {
        context.move_to(x.floor() + 0.5, rect.top());
        context.line_to(x.floor() + 0.5, rect.bottom());
        x += grid_size;
    }
    let mut y = rect.top();
    while y <= rect.bottom() {
        context.move_to(rect.left(), y.floor() + 0.5);
        context.line_to(rect.right(), y.floor() + 0.5);
        y += grid_size;
    }
    let _ = context.stroke();
    context.restore().ok();
}

fn cached_pixbuf(
    cache: &ImageCache,
    source: &str,
    layout_dir: Option<&PathBuf>,
) -> Option<Pixbuf> {
    if let Some(entry) = cache.borrow().get(source) {
        return entry.clone();
    }
    let pixbuf = resolve_image_source(source, layout_dir.map(PathBuf::as_path)).and_then(
        |(path, _)| match Pixbuf::from_file(&path) {
            Ok(pixbuf) => Some(pixbuf),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "image could not be decoded");
                None
            }
        },
    );
    cache
        .borrow_mut()
        .insert(source.to_string(), pixbuf.clone());
    pixbuf
}

fn draw_image(context: &Context, image: &ImageItem, pixbuf: Option<&Pixbuf>, palette: CanvasPalette) {
    let bounds = image.bounds();
    match pixbuf {
        Some(pixbuf) if pixbuf.width() > 0 && pixbuf.height() > 0 => {
            context.save().ok();
            context.rectangle(bounds.x, bounds.y, bounds.width, bounds.height);
            context.clip();
            context.translate(bounds.x, bounds.y);
            context.scale(
                bounds.width / f64::from(pixbuf.width()),
                bounds.height / f64::from(pixbuf.height()),
            );
            context.set_source_pixbuf(pixbuf, 0.0, 0.0);
            let _ = context.paint();
            context.restore().ok();
        }
        _ => {
            fill_rect(context, bounds, palette.grid, 1.0);
            stroke_rect(context, bounds, palette.rubber_band, 1.0, None);
        }
    }
    fill_rect(context, image.handle_rect(), palette.handle, 1.0);
}

fn select_text_font(context: &Context, font: &TextFont) {
    let weight = if font.bold {
        FontWeight::Bold
    } else {
        FontWeight::Normal
    };
    context.select_font_face(&font.family, FontSlant::Normal, weight);
    context.set_font_size(font.pixel_size());
}

fn line_advance(context: &Context, line: &str, font: &TextFont) -> f64 {
    if line.is_empty() {
        return 0.0;
    }
    context
        .text_extents(line)
        .map(|extents| extents.x_advance())
        .unwrap_or_else(|_| line.chars().count() as f64 * font.pixel_size() * 0.6)
}

fn text_ascent(context: &Context, font: &TextFont) -> f64 {
    context
        .font_extents()
        .map(|extents| extents.ascent())
        .unwrap_or_else(|_| font.pixel_size())
}

fn measure_text(context: &Context, text: &TextItem) -> Size {
    context.save().ok();
    select_text_font(context, &text.font);
    let lines = text.lines();
    let width = lines
        .iter()
        .map(|line| line_advance(context, line, &text.font))
        .fold(0.0, f64::max);
    context.restore().ok();
    Size::new(width.ceil(), lines.len() as f64 * text.font.line_height())
}

/// Records rendered extents for text boxes whose content or font changed since their
/// last measurement, so hit testing and snapping see the real size.
fn measure_pending_texts(context: &Context, scene: &mut Scene) {
    let pending = scene
        .leaves_in_draw_order()
        .into_iter()
        .filter_map(SceneItem::as_text)
        .filter(|text| !text.has_measured_size())
        .map(|text| (text.id, measure_text(context, text)))
        .collect::<Vec<_>>();
    for (id, size) in pending {
        scene.set_text_measured_size(id, size);
    }
}

fn draw_text(context: &Context, text: &TextItem) {
    context.save().ok();
    select_text_font(context, &text.font);
    set_source_color(context, text.color, 1.0);
    let ascent = text_ascent(context, &text.font);
    let line_height = text.font.line_height();
    for (index, line) in text.lines().iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        context.move_to(text.x, text.y + ascent + index as f64 * line_height);
        let _ = context.show_text(line);
    }
    context.restore().ok();
}

fn draw_edit_cursor(context: &Context, text: &TextItem, color: Color) {
    let (line, column) = text.cursor_line_column();
    let lines = text.lines();
    let Some(current) = lines.get(line) else {
        return;
    };
    let prefix = current.chars().take(column).collect::<String>();
    context.save().ok();
    select_text_font(context, &text.font);
    let x = text.x + line_advance(context, &prefix, &text.font);
    let top = text.y + line as f64 * text.font.line_height();
    set_source_color(context, color, 1.0);
    context.set_line_width(1.0);
    context.move_to(x.floor() + 0.5, top);
    context.line_to(x.floor() + 0.5, top + text.font.line_height());
    let _ = context.stroke();
    context.restore().ok();
}

fn text_outline(text: &TextItem) -> Rect {
    text.bounds()
        .inflated(TEXT_OUTLINE_PADDING - TEXT_BOUNDS_PADDING)
}

fn draw_selection(context: &Context, scene: &Scene, hovered_text: Option<u64>, palette: CanvasPalette) {
    for item in scene.items() {
        let selected = scene.is_selected(item.id());
        match item {
            SceneItem::Text(text) if selected => {
                stroke_rect(
                    context,
                    text_outline(text),
                    palette.selection,
                    1.0,
                    Some(SELECTION_DASH.as_slice()),
                );
            }
            SceneItem::Image(image) if selected => {
                stroke_rect(
                    context,
                    image.bounds(),
                    palette.selection,
                    1.0,
                    Some(SELECTION_DASH.as_slice()),
                );
            }
            SceneItem::Group(group) if selected => {
                stroke_rect(
                    context,
                    group.bounds(),
                    palette.selection,
                    1.0,
                    Some(SELECTION_DASH.as_slice()),
                );
            }
            _ => {}
        }
    }
    if let Some(text) = hovered_text.and_then(|id| scene.text(id)) {
        stroke_rect(
            context,
            text_outline(text),
            palette.selection,
            1.0,
            Some(SELECTION_DASH.as_slice()),
        );
    }
}

fn draw_guides(context: &Context, rect: Rect, guides: SnapGuides, color: Color) {
    if guides.is_empty() {
        return;
    }
    context.save().ok();
    set_source_color(context, color, 1.0);
    context.set_line_width(1.0);
    context.set_dash(&GUIDE_DASH, 0.0);
    if let Some(x) = guides.vertical {
        context.move_to(x.floor() + 0.5, rect.top());
        context.line_to(x.floor() + 0.5, rect.bottom());
    }
    if let Some(y) = guides.horizontal {
        context.move_to(rect.left(), y.floor() + 0.5);
        context.line_to(rect.right(), y.floor() + 0.5);
    }
    let _ = context.stroke();
    context.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Point;

    #[test]
    fn text_outline_sits_five_pixels_outside_content() {
        let mut text = TextItem::new(1, Point::new(100.0, 50.0), "hi", TextFont::default());
        text.set_measured_size(Size::new(40.0, 20.0));
        assert_eq!(text_outline(&text), Rect::new(95.0, 45.0, 50.0, 30.0));
    }
}
