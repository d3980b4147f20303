//! Settings panel rendering for language, simulation and model status.

use super::{Panel, UiApp};
use crate::i18n::{Language, LanguagePreference};
use anyhow::Context as _;
use camelid_core::{ClassifierConfig, PredictionSource};
use eframe::egui;

impl UiApp {
    /// Renders the settings screen including the simulation parameters.
    pub(super) fn render_settings_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading(self.tr("Ajustes", "Settings"));
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(self.tr("Idioma", "Language"));
            let mut selected = self.language_preference;
            let option_label = |lang: LanguagePreference| match (self.language, lang) {
                (Language::Spanish, LanguagePreference::System) => "Sistema (automático)",
                (Language::English, LanguagePreference::System) => "System (auto)",
                (Language::Spanish, LanguagePreference::Spanish) => "Español",
                (Language::English, LanguagePreference::Spanish) => "Spanish",
                (Language::Spanish, LanguagePreference::English) => "Inglés",
                (Language::English, LanguagePreference::English) => "English",
            };
            egui::ComboBox::from_id_salt("language-select")
                .selected_text(option_label(selected))
                .show_ui(ui, |ui| {
                    for lang in [
                        LanguagePreference::System,
                        LanguagePreference::Spanish,
                        LanguagePreference::English,
                    ] {
                        ui.selectable_value(&mut selected, lang, option_label(lang));
                    }
                });
            if selected != self.language_preference {
                self.update_language_preference(selected);
                self.status = self.tr("Idioma cambiado.", "Language updated.").to_string();
            }
        });

        ui.add_space(12.0);
        ui.separator();
        ui.heading(self.tr("Clasificador", "Classifier"));
        ui.add_space(6.0);
        match self.classifier.source() {
            PredictionSource::Model { path } => {
                ui.label(format!(
                    "{}: {}",
                    self.tr("Modelo activo", "Active model"),
                    path.display()
                ));
            }
            PredictionSource::Simulation => {
                ui.label(self.tr(
                    "Modo simulación (distribución de Dirichlet)",
                    "Simulation mode (Dirichlet distribution)",
                ));
                if let Some(reason) = self.classifier.fallback_reason() {
                    ui.label(egui::RichText::new(reason).weak());
                }
            }
        }
        ui.label(format!(
            "{}: {} · {}: {}",
            self.tr("Modelo", "Model"),
            self.config.model_path.display(),
            self.tr("Etiquetas", "Labels"),
            self.config.labels_path.display()
        ));

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            let slider = egui::Slider::new(&mut self.pending_concentration, 0.1..=50.0)
                .logarithmic(true)
                .text(self.language.pick("Concentración", "Concentration"));
            ui.add(slider);
        });
        ui.horizontal(|ui| {
            let mut fixed = self.pending_seed.is_some();
            let fixed_label = self.language.pick("Semilla fija", "Fixed seed");
            if ui.checkbox(&mut fixed, fixed_label).changed() {
                self.pending_seed = fixed.then_some(0);
            }
            if let Some(seed) = self.pending_seed.as_mut() {
                ui.add(egui::DragValue::new(seed).speed(1));
            }
        });
        ui.horizontal(|ui| {
            if ui.button(self.tr("Aplicar", "Apply")).clicked() {
                let config = ClassifierConfig {
                    concentration: self.pending_concentration,
                    seed: self.pending_seed,
                    ..self.config.clone()
                };
                self.apply_config(config);
                self.panel = Panel::Classifier;
            }
            if let Some(path) = self.config_path.clone()
                && ui.button(self.tr("Guardar", "Save")).clicked()
            {
                let saved = self
                    .config
                    .save(&path)
                    .context("no se pudo guardar la configuración");
                match saved {
                    Ok(()) => {
                        self.status = format!(
                            "{}: {}",
                            self.tr("Configuración guardada", "Settings saved"),
                            path.display()
                        );
                    }
                    Err(e) => self.report_error(format!("{e:#}")),
                }
            }
        });

        ui.add_space(16.0);
        ui.separator();
        ui.add_space(6.0);
        ui.heading(self.tr("Versiones", "Versions"));
        ui.label(format!(
            "{}: {}",
            self.tr("Versión de la aplicación", "App version"),
            self.app_version
        ));
    }
}
