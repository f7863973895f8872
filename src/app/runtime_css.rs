use crate::ui::StyleTokens;
use gtk4::CssProvider;

pub(super) fn install_runtime_css(tokens: StyleTokens) {
    let icon_button_padding = (i32::from(tokens.control_size) - i32::from(tokens.icon_size)) / 2;
    let css = format!(
        "
window.layoutdesk-root {{
  background: @window_bg_color;
}}
.style-toolbar {{
  padding: {spacing_4}px {spacing_8}px;
  border-bottom: 1px solid alpha(currentColor, 0.12);
}}
.style-toolbar .labeled-spin label {{
  margin-end: {spacing_4}px;
}}
.style-toolbar button.icon-button {{
  min-width: {control_size}px;
  min-height: {control_size}px;
  padding: {icon_button_padding}px;
  border-radius: {control_radius}px;
}}
.style-toolbar button.icon-button:checked {{
  background: alpha(@accent_bg_color, 0.18);
  color: @accent_color;
}}
.style-toolbar separator {{
  margin: 0 {spacing_4}px;
}}
.canvas-scroller {{
  background: alpha(currentColor, 0.06);
}}
.layout-canvas {{
  background: transparent;
}}
.layout-canvas:focus-visible {{
  outline: none;
}}
.status-line {{
  padding: {spacing_4}px {spacing_12}px;
  font-size: 12px;
  border-top: 1px solid alpha(currentColor, 0.12);
}}
",
        spacing_4 = tokens.spacing_4,
        spacing_8 = tokens.spacing_8,
        spacing_12 = tokens.spacing_12,
        control_size = tokens.control_size,
        control_radius = tokens.control_radius,
        icon_button_padding = icon_button_padding.max(0),
    );

    let provider = CssProvider::new();
    provider.load_from_data(&css);
    if let Some(display) = gtk4::gdk::Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
