use gdk4 as gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use rotary::KnobPalette;
use std::path::Path;

pub fn knob_palette(context: &gtk::StyleContext) -> KnobPalette {
    let defaults = KnobPalette::default();
    KnobPalette {
        accent: lookup_color(context, "theme_selected_bg_color", defaults.accent),
        label: lookup_color(context, "theme_fg_color", defaults.label),
        ..defaults
    }
}

fn lookup_color(context: &gtk::StyleContext, name: &str, fallback: Srgba<f64>) -> Srgba<f64> {
    context
        .lookup_color(name)
        .map(|c| {
            Srgba::new(
                c.red() as f64,
                c.green() as f64,
                c.blue() as f64,
                c.alpha() as f64,
            )
        })
        .unwrap_or(fallback)
}

const BUILTIN_CSS: &str = "
.rotary-knob:focus-visible {
    outline: none;
}
";

/// Installs the built-in styles, then the user stylesheet if one is configured.
/// A stylesheet that cannot be read is logged and skipped.
pub fn load_css(stylesheet: Option<&Path>) {
    let Some(display) = gdk::Display::default() else {
        return;
    };

    let provider = gtk::CssProvider::new();
    provider.load_from_data(BUILTIN_CSS);
    gtk::style_context_add_provider_for_display(
        &display,
        &provider,
        gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
    );

    if let Some(path) = stylesheet {
        match fs_err::read_to_string(path) {
            Ok(css) => {
                let user = gtk::CssProvider::new();
                user.load_from_data(&css);
                gtk::style_context_add_provider_for_display(
                    &display,
                    &user,
                    gtk::STYLE_PROVIDER_PRIORITY_USER,
                );
                log::info!("Loaded stylesheet {}", path.display());
            }
            Err(e) => log::warn!("Skipping stylesheet: {}", e),
        }
    }
}
