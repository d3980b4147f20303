//! Static content: title, taxonomy, size comparison, species cards, footer.

use super::UiApp;
use camelid_core::{Species, TAXONOMY, TAXONOMY_SOURCE};
use eframe::egui::{self, Color32, RichText};

const TEXT_BROWN: Color32 = Color32::from_rgb(0x5d, 0x40, 0x37);
const TITLE_BLUE: Color32 = Color32::from_rgb(0x15, 0x65, 0xc0);
const BAR_GREEN: Color32 = Color32::from_rgb(0x4c, 0xaf, 0x50);

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}

/// Rounded, tinted box used for every section.
pub(super) fn section(fill: Color32) -> egui::Frame {
    egui::Frame::new()
        .fill(fill)
        .corner_radius(egui::CornerRadius::same(14))
        .inner_margin(egui::Margin::same(16))
        .outer_margin(egui::Margin::symmetric(0, 6))
}

/// Card with the species' accent border, title and description.
pub(super) fn species_card(ui: &mut egui::Ui, species: Species) {
    let info = species.info();
    section(rgb(info.background))
        .stroke(egui::Stroke::new(2.0, rgb(info.accent)))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(format!("{} {}", info.icon, info.name))
                        .size(22.0)
                        .strong()
                        .color(rgb(info.accent)),
                );
            });
            ui.add_space(6.0);
            ui.label(
                RichText::new(format!("{} ({})", info.name, info.scientific_name))
                    .strong()
                    .color(TEXT_BROWN),
            );
            for (heading, text) in [
                ("Descripción", info.description),
                ("Uso", info.usage),
                ("Estado", info.status),
            ] {
                ui.horizontal_wrapped(|ui| {
                    ui.label(RichText::new(format!("{heading}:")).strong().color(TEXT_BROWN));
                    ui.label(RichText::new(text).color(TEXT_BROWN));
                });
            }
        });
}

impl UiApp {
    pub(super) fn render_title(&self, ui: &mut egui::Ui) {
        section(Color32::from_rgb(0xff, 0xf9, 0xc4)).show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(self.tr(
                        "🦙 CLASIFICADOR DE CAMÉLIDOS SUDAMERICANOS",
                        "🦙 SOUTH AMERICAN CAMELID CLASSIFIER",
                    ))
                    .size(28.0)
                    .strong()
                    .color(TEXT_BROWN),
                );
                ui.label(
                    RichText::new(self.tr(
                        "Descubre y reconoce las especies de camélidos andinos",
                        "Discover and recognise the Andean camelid species",
                    ))
                    .size(18.0)
                    .color(Color32::from_rgb(0x7e, 0x57, 0xc2)),
                );
            });
        });
    }

    pub(super) fn render_taxonomy(&self, ui: &mut egui::Ui) {
        section(Color32::from_rgb(0xe3, 0xf2, 0xfd)).show(ui, |ui| {
            ui.label(
                RichText::new(self.tr("📊 Clasificación Taxonómica", "📊 Taxonomy"))
                    .heading()
                    .color(TITLE_BLUE),
            );
            ui.label(
                RichText::new(self.tr(
                    "Figura 1. Clasificación de los camélidos",
                    "Figure 1. Classification of the camelids",
                ))
                .small()
                .color(TITLE_BLUE),
            );
        });
        section(Color32::from_rgb(0xf5, 0xf5, 0xf5)).show(ui, |ui| {
            ui.label(RichText::new(TAXONOMY_SOURCE).strong());
            ui.add_space(8.0);
            ui.label(RichText::new(TAXONOMY).monospace());
        });
    }

    pub(super) fn render_size_comparison(&self, ui: &mut egui::Ui) {
        section(Color32::from_rgb(0xff, 0xf3, 0xe0)).show(ui, |ui| {
            ui.label(
                RichText::new(self.tr("📏 Comparación de Tamaño", "📏 Size comparison"))
                    .heading()
                    .color(TEXT_BROWN),
            );
            ui.label(
                RichText::new(self.tr(
                    "Altura promedio (a la cruz):",
                    "Average height (at the withers):",
                ))
                .strong()
                .color(TEXT_BROWN),
            );
            let full = ui.available_width();
            for species in Species::by_height() {
                let info = species.info();
                ui.add_space(6.0);
                ui.label(
                    RichText::new(format!(
                        "{} {} - {}",
                        info.icon,
                        info.name.to_uppercase(),
                        info.height
                    ))
                    .color(TEXT_BROWN),
                );
                let width = full * f32::from(info.relative_height) / 100.0;
                let (rect, _) =
                    ui.allocate_exact_size(egui::vec2(width, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 6.0, BAR_GREEN);
            }
        });
    }

    pub(super) fn render_species_grid(&self, ui: &mut egui::Ui) {
        section(Color32::from_rgb(0xe3, 0xf2, 0xfd)).show(ui, |ui| {
            ui.label(
                RichText::new(self.tr("🦙 Especies de Camélidos Andinos", "🦙 Andean camelid species"))
                    .heading()
                    .color(TITLE_BLUE),
            );
        });
        ui.columns(2, |cols| {
            for (i, species) in Species::ALL.into_iter().enumerate() {
                species_card(&mut cols[i % 2], species);
            }
        });
    }

    pub(super) fn render_footer(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.label(
                RichText::new(self.tr(
                    "🦙 CLASIFICADOR DE CAMÉLIDOS SUDAMERICANOS",
                    "🦙 SOUTH AMERICAN CAMELID CLASSIFIER",
                ))
                .strong()
                .color(TEXT_BROWN),
            );
            ui.label(
                RichText::new(format!(
                    "{} · v{}",
                    self.tr(
                        "Sistema inteligente de identificación visual",
                        "Visual identification system"
                    ),
                    self.app_version
                ))
                .color(Color32::from_gray(0x66)),
            );
        });
    }
}
