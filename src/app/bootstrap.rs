use crate::config::{load_app_config, AppConfig};
use crate::scene::Scene;

/// Generic families every fontconfig setup resolves, offered even when the toolkit
/// reports nothing.
const GENERIC_FONT_FAMILIES: [&str; 3] = ["Monospace", "Sans", "Serif"];

pub(super) struct AppBootstrap {
    pub(super) config: AppConfig,
}

pub(super) fn bootstrap_app_runtime() -> AppBootstrap {
    let config = load_app_config();
    tracing::info!(
        canvas_width = config.canvas_width,
        canvas_height = config.canvas_height,
        grid_size = config.grid_size,
        show_grid = config.show_grid,
        snap_to_grid = config.snap_to_grid,
        snap_threshold = config.snap_threshold,
        default_font_family = %config.default_font_family,
        default_font_size = config.default_font_size,
        "loaded app config"
    );
    AppBootstrap { config }
}

impl AppBootstrap {
    /// Empty scene sized and configured from the user's settings.
    pub(super) fn new_scene(&self) -> Scene {
        let mut scene = Scene::new(self.config.canvas_size());
        scene.set_options(self.config.scene_options());
        scene.set_text_defaults(self.config.text_defaults());
        scene
    }
}

/// Families for the style toolbar: what the toolkit knows plus the generic aliases and
/// the configured default, sorted case-insensitively without duplicates.
pub(super) fn font_family_choices(available: Vec<String>, default_family: &str) -> Vec<String> {
    let mut families = available
        .into_iter()
        .map(|family| family.trim().to_string())
        .filter(|family| !family.is_empty())
        .collect::<Vec<_>>();
    families.extend(GENERIC_FONT_FAMILIES.iter().map(|family| family.to_string()));
    let default_family = default_family.trim();
    if !default_family.is_empty() {
        families.push(default_family.to_string());
    }
    families.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    families.dedup();
    families
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Rect, TextFont};

    #[test]
    fn new_scene_applies_configured_canvas_and_defaults() {
        let bootstrap = AppBootstrap {
            config: AppConfig {
                canvas_width: 800.0,
                canvas_height: 600.0,
                snap_to_grid: true,
                grid_size: 25.0,
                default_font_family: "Serif".to_string(),
                default_font_size: 20,
                ..AppConfig::default()
            },
        };

        let scene = bootstrap.new_scene();
        assert_eq!(scene.rect(), Rect::new(0.0, 0.0, 800.0, 600.0));
        assert_eq!(scene.options().snap().grid_size, Some(25.0));
        assert_eq!(scene.text_defaults(), &TextFont::new("Serif", 20, false));
    }

    #[test]
    fn font_family_choices_are_sorted_and_deduplicated() {
        let choices = font_family_choices(
            vec![
                "DejaVu Sans".to_string(),
                "sans".to_string(),
                "  ".to_string(),
                "Sans".to_string(),
                "Cantarell".to_string(),
            ],
            "Cantarell",
        );
        assert_eq!(
            choices,
            vec!["Cantarell", "DejaVu Sans", "Monospace", "Sans", "sans", "Serif"]
        );
    }

    #[test]
    fn font_family_choices_keep_configured_default_when_toolkit_reports_nothing() {
        let choices = font_family_choices(Vec::new(), "Fira Code");
        assert!(choices.contains(&"Fira Code".to_string()));
        assert!(choices.contains(&"Sans".to_string()));
    }
}
