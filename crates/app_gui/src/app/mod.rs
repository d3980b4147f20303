//! Main window: catalog column, classifier, history and settings panels.

mod catalog;
mod results;
mod settings;

use crate::i18n::{Language, LanguagePreference};
use anyhow::Context as _;
use camelid_core::{Classification, Classifier, ClassifierConfig, ImageRow, decode_image};
use eframe::{App, Frame, egui};
use image::DynamicImage;
use std::path::{Path, PathBuf};

const PREVIEW_MAX_SIDE: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Panel {
    Classifier,
    History,
    Settings,
}

/// Image chosen by the user, kept until another one replaces it.
pub(crate) struct Upload {
    name: String,
    image: DynamicImage,
    texture: egui::TextureHandle,
}

pub struct UiApp {
    language: Language,
    language_preference: LanguagePreference,
    config: ClassifierConfig,
    config_path: Option<PathBuf>,
    classifier: Classifier,
    panel: Panel,
    upload: Option<Upload>,
    result: Option<Classification>,
    history: Vec<ImageRow>,
    status: String,
    error: Option<String>,
    pending_concentration: f32,
    pending_seed: Option<u64>,
    app_version: String,
}

impl UiApp {
    pub fn new(
        config: ClassifierConfig,
        config_path: Option<PathBuf>,
        classifier: Classifier,
    ) -> Self {
        let language_preference = LanguagePreference::System;
        Self {
            language: language_preference.resolve(),
            language_preference,
            pending_concentration: config.concentration,
            pending_seed: config.seed,
            config,
            config_path,
            classifier,
            panel: Panel::Classifier,
            upload: None,
            result: None,
            history: Vec::new(),
            status: String::new(),
            error: None,
            app_version: env!("CAMELID_VERSION").to_string(),
        }
    }

    pub(crate) fn tr<'a>(&self, es: &'a str, en: &'a str) -> &'a str {
        self.language.pick(es, en)
    }

    pub(crate) fn update_language_preference(&mut self, preference: LanguagePreference) {
        self.language_preference = preference;
        self.language = preference.resolve();
    }

    fn load_upload(&mut self, ctx: &egui::Context, name: String, bytes: &[u8]) {
        self.result = None;
        match decode_image(bytes) {
            Ok(image) => {
                let preview = image.thumbnail(PREVIEW_MAX_SIDE, PREVIEW_MAX_SIDE).to_rgba8();
                let size = [preview.width() as usize, preview.height() as usize];
                let color = egui::ColorImage::from_rgba_unmultiplied(size, preview.as_raw());
                let texture =
                    ctx.load_texture(format!("upload:{name}"), color, egui::TextureOptions::LINEAR);
                tracing::info!("imagen cargada: {name} ({}x{})", image.width(), image.height());
                self.status = format!("{}: {name}", self.tr("Imagen cargada", "Image loaded"));
                self.error = None;
                self.upload = Some(Upload {
                    name,
                    image,
                    texture,
                });
            }
            Err(e) => {
                self.upload = None;
                self.report_error(e);
            }
        }
    }

    pub(crate) fn load_upload_path(&mut self, ctx: &egui::Context, path: PathBuf) {
        match read_upload(&path) {
            Ok((name, bytes)) => self.load_upload(ctx, name, &bytes),
            Err(e) => {
                self.upload = None;
                self.report_error(format!("{e:#}"));
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        let Some(file) = dropped.into_iter().next() else {
            return;
        };
        if let Some(bytes) = file.bytes {
            self.load_upload(ctx, file.name, &bytes);
        } else if let Some(path) = file.path {
            self.load_upload_path(ctx, path);
        }
    }

    pub(crate) fn analyze(&mut self) {
        let Some(upload) = &self.upload else {
            return;
        };
        match self.classifier.classify_image(&upload.image) {
            Ok(classification) => {
                self.status = format!(
                    "{}: {} ({})",
                    self.tr("Especie identificada", "Identified species"),
                    classification.species,
                    classification.probabilities.confidence_text()
                );
                self.error = None;
                self.history.push(ImageRow {
                    file: PathBuf::from(&upload.name),
                    classification: Some(classification.clone()),
                });
                self.result = Some(classification);
            }
            Err(e) => {
                self.result = None;
                self.report_error(e);
            }
        }
    }

    pub(crate) fn report_error(&mut self, e: impl std::fmt::Display) {
        tracing::warn!("{e}");
        self.error = Some(format!(
            "❌ {}: {e}",
            self.tr("Error al procesar la imagen", "Error processing the image")
        ));
    }

    /// Rebuilds the classifier after a settings change.
    pub(crate) fn apply_config(&mut self, config: ClassifierConfig) {
        match Classifier::from_config(&config) {
            Ok(classifier) => {
                self.classifier = classifier;
                self.config = config;
                self.result = None;
                self.status = self
                    .tr("Configuración aplicada", "Settings applied")
                    .to_string();
            }
            Err(e) => self.report_error(e),
        }
    }

    fn render_navigation(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let tabs = [
                (Panel::Classifier, self.tr("📸 Clasificador", "📸 Classifier")),
                (Panel::History, self.tr("🗂 Historial", "🗂 History")),
                (Panel::Settings, self.tr("⚙ Ajustes", "⚙ Settings")),
            ];
            for (panel, label) in tabs {
                ui.selectable_value(&mut self.panel, panel, label);
            }
            ui.separator();
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
        });
    }
}

/// Display name and raw bytes of an image picked from disk.
fn read_upload(path: &Path) -> anyhow::Result<(String, Vec<u8>)> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    let bytes =
        std::fs::read(path).with_context(|| format!("no se pudo leer {}", path.display()))?;
    Ok((name, bytes))
}

impl App for UiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.handle_dropped_files(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            self.render_title(ui);
            self.render_navigation(ui);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.render_footer(ui);
        });

        egui::SidePanel::left("catalog")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_taxonomy(ui);
                    ui.add_space(12.0);
                    self.render_size_comparison(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| match self.panel {
                    Panel::Classifier => {
                        self.render_classifier_panel(ctx, ui);
                        ui.add_space(16.0);
                        ui.separator();
                        self.render_species_grid(ui);
                    }
                    Panel::History => self.render_history_panel(ui),
                    Panel::Settings => self.render_settings_panel(ui),
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn read_upload_keeps_the_file_name() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("llama.png");
        std::fs::write(&path, b"\x89PNG")?;
        let (name, bytes) = read_upload(&path)?;
        assert_eq!(name, "llama.png");
        assert_eq!(bytes, b"\x89PNG");
        Ok(())
    }

    #[test]
    fn read_upload_error_names_the_path() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("missing.jpg");
        let err = read_upload(&path).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.starts_with("no se pudo leer"), "{chain}");
        assert!(chain.contains("missing.jpg"), "{chain}");
        assert!(err.chain().count() >= 2);
        Ok(())
    }
}
