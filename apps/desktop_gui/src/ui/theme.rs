//! Visual tokens for the portfolio shell.

use eframe::egui;
use egui::Color32;

pub const BACKGROUND: Color32 = Color32::from_rgb(0x10, 0x12, 0x16);
/// Alternating band behind about/experience, the muted surface.
pub const MUTED: Color32 = Color32::from_rgb(0x18, 0x1b, 0x21);
pub const SURFACE: Color32 = Color32::from_rgb(0x1d, 0x21, 0x28);
pub const BORDER: Color32 = Color32::from_rgb(0x2c, 0x31, 0x3a);

pub const FOREGROUND: Color32 = Color32::from_rgb(0xe8, 0xea, 0xee);
pub const MUTED_FOREGROUND: Color32 = Color32::from_rgb(0x9a, 0xa1, 0xac);

pub const PRIMARY: Color32 = Color32::from_rgb(0x5b, 0x8c, 0xff);
pub const PRIMARY_FOREGROUND: Color32 = Color32::from_rgb(0xf4, 0xf7, 0xff);
pub const SECONDARY: Color32 = Color32::from_rgb(0x2a, 0x2f, 0x38);
pub const SECONDARY_FOREGROUND: Color32 = Color32::from_rgb(0xc9, 0xce, 0xd6);

pub const ERROR: Color32 = Color32::from_rgb(0xd9, 0x5c, 0x5c);

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = SURFACE;
    visuals.override_text_color = Some(FOREGROUND);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, BORDER);
    visuals.selection.bg_fill = PRIMARY.linear_multiply(0.4);
    ctx.set_visuals(visuals);
}
