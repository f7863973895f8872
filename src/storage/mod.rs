use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::Deserializer;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::scene::{Color, ImageItem, Point, Scene, SceneItem, Size, TextFont, TextItem};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read layout: {path}")]
    ReadLayout { path: PathBuf, source: io::Error },
    #[error("failed to write {path}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to parse layout: {path}")]
    ParseLayout {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode layout")]
    EncodeLayout(#[from] serde_json::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Serialize, Deserialize)]
struct LayoutFile {
    #[serde(default, deserialize_with = "lenient_items")]
    items: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LayoutEntry {
    Image(ImageEntry),
    Text(TextEntry),
}

#[derive(Debug, Serialize, Deserialize)]
struct ImageEntry {
    #[serde(default, deserialize_with = "lenient_f64")]
    x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    y: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    source: String,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    height: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextEntry {
    #[serde(default, deserialize_with = "lenient_f64")]
    x: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    y: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    text: String,
    #[serde(
        rename = "fontSize",
        default,
        deserialize_with = "lenient_opt_f64",
        serialize_with = "whole_point_size"
    )]
    font_size: Option<f64>,
    #[serde(rename = "fontBold", default, deserialize_with = "lenient_bool")]
    font_bold: bool,
    #[serde(rename = "fontFamily", default, deserialize_with = "lenient_string")]
    font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<Value>,
}

fn lenient_items<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Value>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => Vec::new(),
    })
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_opt_f64(deserializer)?.unwrap_or(0.0))
}

fn lenient_opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?
        .as_f64()
        .filter(|value| value.is_finite()))
}

fn whole_point_size<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(size) => serializer.serialize_u32(size.round().max(0.0) as u32),
        None => serializer.serialize_none(),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(value) => value,
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool().unwrap_or(false))
}

/// Items decoded from a layout file, with ids still unassigned.
#[derive(Debug, Default)]
pub struct LoadedLayout {
    pub items: Vec<SceneItem>,
    pub skipped: usize,
}

/// Reads and decodes a layout file. An unreadable file or invalid JSON is an error and
/// yields nothing; individual entries with an unknown type or an image that cannot be
/// opened are skipped.
pub fn load_layout(path: &Path) -> StorageResult<LoadedLayout> {
    let contents = fs::read_to_string(path).map_err(|source| StorageError::ReadLayout {
        path: path.to_path_buf(),
        source,
    })?;
    let file: LayoutFile =
        serde_json::from_str(&contents).map_err(|source| StorageError::ParseLayout {
            path: path.to_path_buf(),
            source,
        })?;

    let base_dir = path.parent();
    let mut loaded = LoadedLayout::default();
    for value in file.items {
        let entry = match serde_json::from_value::<LayoutEntry>(value) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "skipping layout entry with unknown type");
                loaded.skipped += 1;
                continue;
            }
        };
        match entry_to_item(entry, base_dir) {
            Some(item) => loaded.items.push(item),
            None => loaded.skipped += 1,
        }
    }
    tracing::info!(
        path = %path.display(),
        items = loaded.items.len(),
        skipped = loaded.skipped,
        "layout loaded"
    );
    Ok(loaded)
}

fn entry_to_item(entry: LayoutEntry, base_dir: Option<&Path>) -> Option<SceneItem> {
    match entry {
        LayoutEntry::Image(image) => {
            let natural_size = match probe_image_size(&image.source, base_dir) {
                Some(size) => size,
                None => {
                    tracing::warn!(source = %image.source, "skipping image that cannot be opened");
                    return None;
                }
            };
            let mut item = ImageItem::new(
                0,
                Point::new(image.x, image.y),
                image.source,
                natural_size,
            );
            if let (Some(width), Some(height)) = (image.width, image.height) {
                if let Err(err) = item.resize_to(Size::new(width, height)) {
                    tracing::debug!(?err, "keeping natural image size");
                }
            }
            Some(SceneItem::Image(item))
        }
        LayoutEntry::Text(text) => {
            let point_size = text
                .font_size
                .filter(|size| *size > 0.0)
                .map_or_else(|| TextFont::default().point_size, |size| size as u32);
            let font = TextFont::stored(text.font_family, point_size, text.font_bold);
            let mut item = TextItem::new(0, Point::new(text.x, text.y), text.text, font);
            item.color = text
                .color
                .as_ref()
                .and_then(Value::as_str)
                .and_then(Color::from_hex)
                .unwrap_or(Color::BLACK);
            Some(SceneItem::Text(item))
        }
    }
}

/// Pixel size of an image file, see [`resolve_image_source`].
pub fn probe_image_size(source: &str, base_dir: Option<&Path>) -> Option<Size> {
    resolve_image_source(source, base_dir).map(|(_, size)| size)
}

/// Finds a readable image for `source`, trying it as given and then relative to the
/// layout's directory. Returns the path that opened and its pixel size.
pub fn resolve_image_source(source: &str, base_dir: Option<&Path>) -> Option<(PathBuf, Size)> {
    if source.is_empty() {
        return None;
    }
    let direct = Path::new(source);
    let mut candidates = vec![direct.to_path_buf()];
    if direct.is_relative() {
        if let Some(base_dir) = base_dir {
            candidates.push(base_dir.join(direct));
        }
    }
    candidates.into_iter().find_map(|candidate| {
        let (width, height) = image::image_dimensions(&candidate).ok()?;
        if width == 0 || height == 0 {
            return None;
        }
        Some((candidate, Size::new(f64::from(width), f64::from(height))))
    })
}

/// Serializes every image and text item, groups flattened, in draw order.
pub fn encode_layout(scene: &Scene) -> StorageResult<String> {
    let items = scene
        .leaves_in_draw_order()
        .into_iter()
        .filter_map(|item| match item {
            SceneItem::Image(image) => {
                let position = image.position();
                let size = image.size();
                Some(LayoutEntry::Image(ImageEntry {
                    x: position.x,
                    y: position.y,
                    source: image.source.clone(),
                    width: Some(size.width),
                    height: Some(size.height),
                }))
            }
            SceneItem::Text(text) => Some(LayoutEntry::Text(TextEntry {
                x: text.x,
                y: text.y,
                text: text.content.clone(),
                font_size: Some(f64::from(text.font.point_size)),
                font_bold: text.font.bold,
                font_family: text.font.family.clone(),
                color: Some(Value::String(text.color.hex_name())),
            })),
            SceneItem::Group(_) => None,
        })
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::to_string_pretty(&LayoutFile { items })?)
}

pub fn save_layout(scene: &Scene, path: &Path) -> StorageResult<()> {
    let encoded = encode_layout(scene)?;
    write_file(path, &encoded)?;
    tracing::info!(path = %path.display(), "layout saved");
    Ok(())
}

pub fn write_html(path: &Path, html: &str) -> StorageResult<()> {
    write_file(path, html)?;
    tracing::info!(path = %path.display(), "html exported");
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> StorageResult<()> {
    fs::write(path, contents).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}
