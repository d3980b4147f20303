//! Upload, analysis results and the session history.

use super::UiApp;
use super::catalog::{section, species_card};
use anyhow::Context as _;
use camelid_core::{
    Classification, PredictionSource, SUPPORTED_EXTENSIONS, ScanOptions, classify_all, export_csv,
    scan_folder,
};
use eframe::egui::{self, Color32, RichText};
use egui_extras::{Column, TableBuilder};
use rfd::FileDialog;
use std::time::Instant;

const RESULT_GREEN: Color32 = Color32::from_rgb(0x2e, 0x7d, 0x32);
const UPLOAD_PURPLE: Color32 = Color32::from_rgb(0x7b, 0x1f, 0xa2);

impl UiApp {
    pub(super) fn render_classifier_panel(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        section(Color32::from_rgb(0xf3, 0xe5, 0xf5)).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(self.tr("📸 Clasificador de Imágenes", "📸 Image classifier"))
                        .size(24.0)
                        .strong()
                        .color(UPLOAD_PURPLE),
                );
            });
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui
                    .button(self.tr("Seleccionar imagen...", "Choose image..."))
                    .on_hover_text(self.tr(
                        "Sube una imagen clara de una llama, alpaca, guanaco o vicuña",
                        "Upload a clear picture of a llama, alpaca, guanaco or vicuña",
                    ))
                    .clicked()
                    && let Some(path) = FileDialog::new()
                        .add_filter(self.tr("Imágenes", "Images"), &SUPPORTED_EXTENSIONS)
                        .pick_file()
                {
                    self.load_upload_path(ctx, path);
                }
                ui.label(
                    RichText::new(self.tr(
                        "o arrastra una imagen JPG, PNG o BMP a la ventana",
                        "or drop a JPG, PNG or BMP image onto the window",
                    ))
                    .weak(),
                );
            });
        });

        if let Some(error) = &self.error {
            ui.colored_label(Color32::from_rgb(0xc6, 0x28, 0x28), error.as_str());
        }

        let Some(upload) = &self.upload else {
            return;
        };
        let texture = upload.texture.clone();
        let caption = format!(
            "🖼️ {} ({})",
            self.tr("Imagen cargada para análisis", "Image loaded for analysis"),
            upload.name
        );

        let mut analyze = false;
        ui.horizontal_top(|ui| {
            let image_width = (ui.available_width() * 0.72).max(200.0);
            ui.vertical(|ui| {
                ui.add(
                    egui::Image::new(&texture)
                        .max_width(image_width)
                        .max_height(520.0)
                        .corner_radius(egui::CornerRadius::same(10)),
                );
                ui.label(RichText::new(caption).weak());
            });
            ui.vertical(|ui| {
                let button = egui::Button::new(
                    RichText::new(self.tr("🔍 Analizar Imagen", "🔍 Analyse image"))
                        .size(16.0)
                        .color(Color32::WHITE),
                )
                .fill(Color32::from_rgb(0x29, 0xb6, 0xf6))
                .corner_radius(egui::CornerRadius::same(20));
                analyze = ui.add_sized([ui.available_width(), 40.0], button).clicked();
            });
        });
        if analyze {
            self.analyze();
        }

        if let Some(result) = &self.result {
            self.render_result(ui, result);
        }
    }

    fn render_result(&self, ui: &mut egui::Ui, result: &Classification) {
        section(Color32::from_rgb(0xe8, 0xf5, 0xe8)).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(self.tr("🎯 Resultados del Análisis", "🎯 Analysis results"))
                        .heading()
                        .color(RESULT_GREEN),
                );
            });
            ui.add_space(6.0);
            ui.label(
                RichText::new(format!(
                    "✅ {}: {}",
                    self.tr("Especie identificada", "Identified species"),
                    result.headline()
                ))
                .size(18.0)
                .strong()
                .color(RESULT_GREEN),
            );
            ui.label(self.tr("Nivel de confianza", "Confidence level"));
            ui.label(
                RichText::new(result.probabilities.confidence_text())
                    .size(30.0)
                    .strong(),
            );
            if result.source == PredictionSource::Simulation {
                let reason = self.classifier.fallback_reason().unwrap_or_default();
                ui.label(
                    RichText::new(format!(
                        "ℹ {} {reason}",
                        self.tr(
                            "Resultado simulado: no hay un modelo entrenado disponible.",
                            "Simulated result: no trained model is available."
                        )
                    ))
                    .italics()
                    .weak(),
                );
            }

            species_card(ui, result.species);

            section(Color32::WHITE).show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(
                    RichText::new(self.tr(
                        "📈 Probabilidades por especie:",
                        "📈 Probability per species:",
                    ))
                    .strong(),
                );
                for (species, p) in result.probabilities.iter() {
                    ui.horizontal(|ui| {
                        ui.label(RichText::new(species.info().icon).size(22.0));
                        ui.label(RichText::new(species.name()).strong());
                        let bar_width = (ui.available_width() - 70.0).max(60.0);
                        ui.add(
                            egui::ProgressBar::new(p)
                                .desired_width(bar_width)
                                .fill(Color32::from_rgb(0x66, 0xbb, 0x6a)),
                        );
                        ui.label(RichText::new(result.probabilities.percent(species)).strong());
                    });
                }
            });
        });
    }

    pub(super) fn render_history_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr("Historial de análisis", "Analysis history"));
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            if ui
                .button(self.tr("Analizar carpeta...", "Analyse folder..."))
                .clicked()
                && let Some(dir) = FileDialog::new().set_directory(".").pick_folder()
            {
                self.analyze_folder(dir);
            }
            let can_export = !self.history.is_empty();
            if ui
                .add_enabled(
                    can_export,
                    egui::Button::new(self.tr("Exportar CSV", "Export CSV")),
                )
                .clicked()
                && let Some(path) = FileDialog::new()
                    .add_filter("CSV", &["csv"])
                    .set_file_name("camelidos.csv")
                    .save_file()
            {
                let exported = export_csv(&self.history, &path)
                    .with_context(|| format!("no se pudo exportar {}", path.display()));
                match exported {
                    Ok(()) => {
                        self.status = format!(
                            "{}: {}",
                            self.tr("CSV exportado", "CSV exported"),
                            path.display()
                        );
                    }
                    Err(e) => self.report_error(format!("{e:#}")),
                }
            }
            if ui
                .add_enabled(can_export, egui::Button::new(self.tr("Vaciar", "Clear")))
                .clicked()
            {
                self.history.clear();
            }
        });
        ui.add_space(8.0);

        if self.history.is_empty() {
            ui.label(self.tr("Todavía no hay análisis.", "No analyses yet."));
            return;
        }

        let unknown = self.tr("sin resultado", "no result").to_string();
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::remainder().at_least(160.0))
            .column(Column::auto().at_least(110.0))
            .column(Column::auto().at_least(90.0))
            .column(Column::auto().at_least(110.0))
            .header(22.0, |mut header| {
                for title in [
                    self.tr("Archivo", "File"),
                    self.tr("Especie", "Species"),
                    self.tr("Confianza", "Confidence"),
                    self.tr("Origen", "Source"),
                ] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for row in &self.history {
                    body.row(20.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(row.file.display().to_string());
                        });
                        match &row.classification {
                            Some(c) => {
                                table_row.col(|ui| {
                                    ui.label(c.headline());
                                });
                                table_row.col(|ui| {
                                    ui.label(c.probabilities.confidence_text());
                                });
                                table_row.col(|ui| {
                                    ui.label(c.source.to_string());
                                });
                            }
                            None => {
                                table_row.col(|ui| {
                                    ui.label(&unknown);
                                });
                                table_row.col(|_| {});
                                table_row.col(|_| {});
                            }
                        }
                    });
                }
            });
    }

    fn analyze_folder(&mut self, dir: std::path::PathBuf) {
        let start = Instant::now();
        match scan_folder(&dir, ScanOptions { recursive: false }) {
            Ok(mut rows) => {
                let classified = classify_all(&self.classifier, &mut rows);
                let total = rows.len();
                self.status = format!(
                    "{}: {classified}/{total} ({:.1?})",
                    self.tr("Carpeta analizada", "Folder analysed"),
                    start.elapsed()
                );
                self.history.extend(rows);
            }
            Err(e) => self.report_error(format!("{e:#}")),
        }
    }
}
