use crate::error::{Error, Result};
use crate::predictor::LabelMap;
use crate::species::Species;
use std::fs;
use std::path::Path;

/// Reads one label per non-empty line, trimming whitespace and dropping repeats.
pub fn load_labels(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|e| Error::Labels {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut labels: Vec<String> = Vec::new();
    for label in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if !labels.iter().any(|l| l == label) {
            labels.push(label.to_string());
        }
    }
    if labels.is_empty() {
        return Err(Error::Labels {
            path: path.to_path_buf(),
            message: "el archivo no contiene etiquetas".to_string(),
        });
    }
    Ok(labels)
}

/// Maps label names onto species, in file order.
pub fn label_map_from(path: &Path, labels: &[String]) -> Result<LabelMap> {
    let order = labels
        .iter()
        .map(|l| {
            Species::from_label(l).ok_or_else(|| Error::Labels {
                path: path.to_path_buf(),
                message: format!("etiqueta desconocida: {l}"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    LabelMap::new(order).map_err(|e| match e {
        Error::LabelOrder(message) => Error::Labels {
            path: path.to_path_buf(),
            message,
        },
        other => other,
    })
}

/// Loads the class list, falling back to the built-in four species.
pub fn resolve_labels(path: &Path) -> LabelMap {
    if !path.exists() {
        tracing::warn!(
            "sin archivo de etiquetas en {}, usando las cuatro especies",
            path.display()
        );
        return LabelMap::canonical();
    }
    match load_labels(path).and_then(|labels| label_map_from(path, &labels)) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!("{e}; usando las cuatro especies");
            LabelMap::canonical()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn load_labels_trims_and_dedups() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("labels.txt");
        fs::write(&path, "  llama\n\nalpaca\nllama\r\nvicuña\nguanaco\n")?;
        assert_eq!(
            load_labels(&path)?,
            vec!["llama", "alpaca", "vicuña", "guanaco"]
        );
        Ok(())
    }

    #[test]
    fn resolve_labels_follows_file_order() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("labels.txt");
        fs::write(&path, "Vicuna\nLlama\nGuanaco\nAlpaca\n")?;
        assert_eq!(
            resolve_labels(&path).order(),
            &[
                Species::Vicuna,
                Species::Llama,
                Species::Guanaco,
                Species::Alpaca
            ]
        );
        Ok(())
    }

    #[test]
    fn repeated_species_is_reported_as_a_labels_error() {
        let labels: Vec<String> = ["llama", "Llama", "alpaca", "vicuña"]
            .iter()
            .map(|l| l.to_string())
            .collect();
        let err = label_map_from(Path::new("labels.txt"), &labels).unwrap_err();
        let Error::Labels { path, message } = &err else {
            panic!("unexpected error kind: {err:?}");
        };
        assert_eq!(path, Path::new("labels.txt"));
        assert!(message.starts_with("las etiquetas deben cubrir"));
        assert!(!err.to_string().contains("probabilidades"));
        assert!(!err.to_string().contains("orden de etiquetas"));
    }

    #[test]
    fn resolve_labels_falls_back_when_missing() {
        let map = resolve_labels(Path::new("/definitely/not/here/labels.txt"));
        assert_eq!(map, LabelMap::canonical());
    }

    #[test]
    fn resolve_labels_falls_back_on_foreign_or_empty_lists() -> Result<()> {
        let dir = tempdir()?;
        let foreign = dir.path().join("foreign.txt");
        fs::write(&foreign, "cat\ndog\nllama\nalpaca\n")?;
        assert_eq!(resolve_labels(&foreign), LabelMap::canonical());

        let empty = dir.path().join("empty.txt");
        fs::write(&empty, "\n  \n")?;
        assert!(matches!(load_labels(&empty), Err(Error::Labels { .. })));
        assert_eq!(resolve_labels(&empty), LabelMap::canonical());
        Ok(())
    }
}
