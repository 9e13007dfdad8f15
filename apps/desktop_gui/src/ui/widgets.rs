//! Reusable presentational primitives: badge, pill button, card frame,
//! skill bar.

use content::Skill;
use eframe::egui;

use crate::ui::theme;

/// Tag badge, the rounded label used on project cards.
pub fn badge(ui: &mut egui::Ui, text: &str) {
    egui::Frame::new()
        .fill(theme::SECONDARY)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::symmetric(8, 3))
        .show(ui, |ui| {
            ui.label(
                egui::RichText::new(text)
                    .size(11.0)
                    .color(theme::SECONDARY_FOREGROUND),
            );
        });
}

/// Filled pill button used for hero contact actions and card links.
pub fn pill_button(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(
        egui::Button::new(
            egui::RichText::new(label)
                .size(13.0)
                .color(theme::PRIMARY_FOREGROUND),
        )
        .fill(theme::PRIMARY)
        .corner_radius(egui::CornerRadius::same(14))
        .min_size(egui::Vec2::new(0.0, 28.0)),
    )
}

/// Round icon-sized control button, the carousel arrow shape.
pub fn arrow_button(ui: &mut egui::Ui, enabled: bool, label: &str) -> egui::Response {
    ui.add_enabled(
        enabled,
        egui::Button::new(egui::RichText::new(label).size(14.0))
            .fill(theme::SURFACE)
            .stroke(egui::Stroke::new(1.0, theme::BORDER))
            .corner_radius(egui::CornerRadius::same(16))
            .min_size(egui::Vec2::splat(32.0)),
    )
}

/// Card container frame for project entries.
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(theme::SURFACE)
        .stroke(egui::Stroke::new(1.0, theme::BORDER))
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(12, 12))
}

/// Name, numeric level, and a `level / 10` fill bar.
pub fn skill_bar(ui: &mut egui::Ui, skill: &Skill) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(&skill.name).strong());
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(
                egui::RichText::new(format!("{}/10", skill.level.value()))
                    .size(12.0)
                    .color(theme::MUTED_FOREGROUND),
            );
        });
    });

    let (rect, _) = ui.allocate_exact_size(
        egui::Vec2::new(ui.available_width(), 10.0),
        egui::Sense::hover(),
    );
    let painter = ui.painter();
    painter.rect_filled(rect, egui::CornerRadius::same(5), theme::MUTED);
    let mut fill = rect;
    fill.set_width(rect.width() * skill.level.fraction());
    painter.rect_filled(fill, egui::CornerRadius::same(5), theme::PRIMARY);
    ui.add_space(8.0);
}
