use camelid_core::{CONFIG_FILE_NAME, Classifier, ClassifierConfig};
use directories_next::ProjectDirs;
use eframe::{NativeOptions, egui};
use std::path::PathBuf;

mod app;
mod i18n;

use app::UiApp;

fn main() {
    tracing_subscriber::fmt::init();
    let (config, config_path) = load_config();
    let (config, classifier) = match Classifier::from_config(&config) {
        Ok(classifier) => (config, classifier),
        Err(e) => {
            tracing::warn!("configuración inválida ({e}), usando valores por defecto");
            let defaults = ClassifierConfig::default();
            match Classifier::from_config(&defaults) {
                Ok(classifier) => (defaults, classifier),
                Err(e) => {
                    eprintln!("No se pudo iniciar el clasificador: {e}");
                    return;
                }
            }
        }
    };
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Clasificador de Camélidos Sudamericanos")
            .with_inner_size([1280.0, 860.0]),
        ..Default::default()
    };
    if let Err(e) = eframe::run_native(
        "Clasificador de Camélidos Sudamericanos",
        options,
        Box::new(|_cc| {
            Ok::<_, Box<dyn std::error::Error + Send + Sync>>(Box::new(UiApp::new(
                config,
                config_path,
                classifier,
            )))
        }),
    ) {
        eprintln!("La aplicación terminó con error: {e}");
    }
}

/// Per-user config location, also where settings are saved.
fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("org", "camelidos", "Camelidos")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

fn load_config() -> (ClassifierConfig, Option<PathBuf>) {
    let user_path = user_config_path();
    let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
    candidates.extend(user_path.clone());
    match ClassifierConfig::discover(&candidates) {
        Ok(cfg) => (cfg, user_path),
        Err(e) => {
            tracing::warn!("configuración ignorada: {e:#}");
            (ClassifierConfig::default(), user_path)
        }
    }
}
