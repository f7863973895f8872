use gtk4::prelude::*;
use gtk4::{Box as GtkBox, Button, Label, Orientation, SpinButton, ToggleButton};

pub fn icon_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> Button {
    let button = Button::from_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

pub fn icon_toggle_button(
    icon_name: &str,
    tooltip: &str,
    control_size: i32,
    extra_classes: &[&str],
) -> ToggleButton {
    let button = ToggleButton::new();
    button.set_icon_name(icon_name);
    button.set_focus_on_click(false);
    button.set_active(false);
    button.set_tooltip_text(Some(tooltip));
    button.add_css_class("flat");
    button.add_css_class("icon-button");
    for css_class in extra_classes {
        button.add_css_class(css_class);
    }
    button.set_size_request(control_size, control_size);
    button
}

/// Integer spin button with a leading caption, packed in a horizontal box.
pub fn labeled_spin_button(
    caption: &str,
    min: f64,
    max: f64,
    width: i32,
    spacing: i32,
) -> (GtkBox, SpinButton) {
    let container = GtkBox::new(Orientation::Horizontal, spacing);
    container.add_css_class("labeled-spin");
    let label = Label::new(Some(caption));
    label.add_css_class("dim-label");
    let spin = SpinButton::with_range(min, max, 1.0);
    spin.set_digits(0);
    spin.set_numeric(true);
    spin.set_width_request(width);
    container.append(&label);
    container.append(&spin);
    (container, spin)
}
