//! Static HTML rendering of a scene: absolutely positioned `<img>` and `<div>` tags in
//! draw order, one per line.

use std::fmt::Write as _;

use crate::scene::{ImageItem, Scene, SceneItem, TextItem};

const HTML_HEAD: &str = "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\">\n</head>\n<body>\n";
const HTML_TAIL: &str = "</body>\n</html>\n";

pub fn generate_html(scene: &Scene) -> String {
    let mut html = String::from(HTML_HEAD);
    for item in scene.leaves_in_draw_order() {
        match item {
            SceneItem::Image(image) => push_image_tag(&mut html, image),
            SceneItem::Text(text) => push_text_tag(&mut html, text),
            SceneItem::Group(_) => {}
        }
    }
    html.push_str(HTML_TAIL);
    html
}

fn push_image_tag(html: &mut String, image: &ImageItem) {
    let bounds = image.bounds();
    let _ = writeln!(
        html,
        "<img src=\"{}\" style=\"position:absolute; left:{}px; top:{}px; width:{}px; height:{}px;\">",
        escape_html(&image.source),
        truncate(bounds.left()),
        truncate(bounds.top()),
        truncate(bounds.width),
        truncate(bounds.height),
    );
}

fn push_text_tag(html: &mut String, text: &TextItem) {
    let _ = writeln!(
        html,
        "<div style=\"position:absolute; left:{}px; top:{}px; font-family:'{}'; font-size:{}pt; font-weight:{}; color:{};\">{}</div>",
        truncate(text.x),
        truncate(text.y),
        escape_html(&text.font.family),
        text.font.point_size,
        if text.font.bold { "bold" } else { "normal" },
        text.color.hex_name(),
        escape_html(&text.content),
    );
}

fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Escapes `&`, `<`, `>` and `"`.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}
