use crate::classifier::{Classification, Classifier};
use crate::preprocess::is_supported_extension;
use crate::species::Species;
use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One image file and, once analyzed, its classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRow {
    pub file: PathBuf,
    pub classification: Option<Classification>,
}

/// Options controlling how folder scanning behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// When true, scan subdirectories recursively.
    pub recursive: bool,
}

/// Lists the JPEG/PNG/BMP files in a folder.
pub fn scan_folder(path: impl AsRef<Path>, opts: ScanOptions) -> Result<Vec<ImageRow>> {
    let root = path.as_ref();
    if !root.exists() {
        anyhow::bail!("la ruta no existe: {}", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("la ruta no es una carpeta: {}", root.display());
    }

    let walker = if opts.recursive {
        WalkDir::new(root)
    } else {
        WalkDir::new(root).max_depth(1)
    };

    let mut rows = Vec::new();
    for entry in walker.sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("walkdir error: {}", e);
                continue;
            }
        };
        let path = entry.path();
        let supported = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(is_supported_extension);
        if path.is_file() && supported {
            rows.push(ImageRow {
                file: path.to_path_buf(),
                classification: None,
            });
        }
    }
    Ok(rows)
}

/// Classifies every row in parallel; failures leave the row unclassified.
///
/// Each row is classified by its position, so a seeded simulation produces
/// the same rows regardless of the thread count.
/// Returns the number of rows that were classified.
pub fn classify_all(classifier: &Classifier, rows: &mut [ImageRow]) -> usize {
    rows.par_iter_mut()
        .enumerate()
        .map(|(i, row)| match classifier.classify_path_at(&row.file, i as u64) {
            Ok(c) => {
                row.classification = Some(c);
                1
            }
            Err(e) => {
                tracing::warn!("error al clasificar {}: {e}", row.file.display());
                row.classification = None;
                0
            }
        })
        .sum()
}

/// Writes the rows as CSV with headers:
/// file,species,confidence,alpaca,guanaco,llama,vicuna,source
pub fn export_csv(rows: &[ImageRow], path: impl AsRef<Path>) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    let mut header = vec!["file".to_string(), "species".into(), "confidence".into()];
    header.extend(Species::ALL.iter().map(|s| s.name().to_lowercase().replace('ñ', "n")));
    header.push("source".into());
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![row.file.to_string_lossy().to_string()];
        match &row.classification {
            Some(c) => {
                record.push(c.species.name().to_string());
                record.push(format!("{}", c.confidence));
                record.extend(c.probabilities.values().iter().map(|p| format!("{p}")));
                record.push(c.source.to_string());
            }
            None => record.extend(std::iter::repeat_n(String::new(), 3 + Species::ALL.len())),
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClassifierConfig;
    use crate::predictor::PredictionSource;
    use crate::probabilities::Probabilities;
    use image::DynamicImage;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn names(rows: Vec<ImageRow>) -> Vec<String> {
        rows.into_iter()
            .map(|r| r.file.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn scan_folder_lists_only_images_non_recursive() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.JPG"))?;
        File::create(dir.path().join("b.jpeg"))?;
        File::create(dir.path().join("c.png"))?;
        File::create(dir.path().join("d.bmp"))?;
        File::create(dir.path().join("not-image.txt"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("e.jpg"))?;

        let rows = scan_folder(dir.path(), ScanOptions { recursive: false })?;
        assert_eq!(names(rows), vec!["a.JPG", "b.jpeg", "c.png", "d.bmp"]);
        Ok(())
    }

    #[test]
    fn scan_folder_recurses_when_enabled() -> Result<()> {
        let dir = tempdir()?;
        File::create(dir.path().join("a.jpg"))?;
        let nested = dir.path().join("nested");
        fs::create_dir(&nested)?;
        File::create(nested.join("b.PNG"))?;

        let mut files = names(scan_folder(dir.path(), ScanOptions { recursive: true })?);
        files.sort();
        assert_eq!(files, vec!["a.jpg", "b.PNG"]);
        Ok(())
    }

    #[test]
    fn scan_folder_rejects_missing_path() {
        assert!(scan_folder("/no/such/folder", ScanOptions::default()).is_err());
    }

    #[test]
    fn classify_all_skips_broken_files() -> Result<()> {
        let dir = tempdir()?;
        DynamicImage::new_rgb8(20, 20).save(dir.path().join("ok.png"))?;
        fs::write(dir.path().join("broken.jpg"), b"nope")?;
        let classifier = Classifier::from_config(&ClassifierConfig {
            force_simulation: true,
            seed: Some(5),
            ..ClassifierConfig::default()
        })?;

        let mut rows = scan_folder(dir.path(), ScanOptions::default())?;
        assert_eq!(classify_all(&classifier, &mut rows), 1);
        let broken = rows.iter().find(|r| r.file.ends_with("broken.jpg")).unwrap();
        assert!(broken.classification.is_none());
        let ok = rows.iter().find(|r| r.file.ends_with("ok.png")).unwrap();
        assert!(ok.classification.is_some());
        Ok(())
    }

    #[test]
    fn seeded_batches_do_not_depend_on_thread_count() -> Result<()> {
        let dir = tempdir()?;
        for i in 0..24 {
            DynamicImage::new_rgb8(12, 12).save(dir.path().join(format!("img{i:02}.png")))?;
        }
        let cfg = ClassifierConfig {
            force_simulation: true,
            seed: Some(1),
            input_size: 16,
            ..ClassifierConfig::default()
        };
        let run = |threads: usize| -> Result<Vec<ImageRow>> {
            let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
            let classifier = Classifier::from_config(&cfg)?;
            let mut rows = scan_folder(dir.path(), ScanOptions::default())?;
            assert_eq!(pool.install(|| classify_all(&classifier, &mut rows)), 24);
            Ok(rows)
        };

        let single = run(1)?;
        assert_eq!(run(4)?, single);
        assert_eq!(run(4)?, single);
        Ok(())
    }

    #[test]
    fn export_csv_writes_expected_headers_and_rows() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("out.csv");
        let rows = vec![
            ImageRow {
                file: PathBuf::from("a.jpg"),
                classification: None,
            },
            ImageRow {
                file: PathBuf::from("b.jpg"),
                classification: Some(Classification::new(
                    Probabilities::new(&[0.125, 0.125, 0.25, 0.5])?,
                    PredictionSource::Simulation,
                )),
            },
        ];

        export_csv(&rows, &path)?;

        let mut rdr = csv::Reader::from_path(&path)?;
        let headers = rdr.headers()?.clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "file",
                "species",
                "confidence",
                "alpaca",
                "guanaco",
                "llama",
                "vicuna",
                "source"
            ]
        );

        let mut recs = rdr.records();
        let r1 = recs.next().unwrap()?;
        assert_eq!(&r1[0], "a.jpg");
        assert!(r1.iter().skip(1).all(|f| f.is_empty()));

        let r2 = recs.next().unwrap()?;
        assert_eq!(&r2[0], "b.jpg");
        assert_eq!(&r2[1], "Vicuña");
        assert_eq!(&r2[2], "0.5");
        assert_eq!(&r2[3], "0.125");
        assert_eq!(&r2[7], "simulación");

        assert!(recs.next().is_none());
        Ok(())
    }
}
