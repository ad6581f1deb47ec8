/// Manifest loader
///
/// The manifest is a JSON array. Each entry names one image (`name`) or
/// several alternates (`images`), plus a caption and a rating:
///
/// ```json
/// [
///   { "name": "harbour.jpg", "caption": "Harbour at dawn", "rating": 7.5 },
///   { "images": ["market", "market-night"], "caption": "Market", "rating": 6 }
/// ]
/// ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::task;

use crate::config::CarouselConfig;
use crate::error::{CarouselError, Result};
use crate::manifest::probe::find_valid_image;
use crate::state::point::ImagePoint;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ManifestEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub rating: f32,
}

impl ManifestEntry {
    /// `name` first, then `images`, without duplicates
    pub fn image_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.name.iter().chain(self.images.iter()) {
            let name = name.trim();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}

/// Parse manifest JSON. Every entry must name at least one image.
pub fn parse_manifest(json: &str) -> std::result::Result<Vec<ManifestEntry>, ManifestError> {
    let entries: Vec<ManifestEntry> = serde_json::from_str(json)?;

    if let Some(index) = entries.iter().position(|e| e.image_names().is_empty()) {
        return Err(ManifestError::MissingName(index));
    }
    Ok(entries)
}

/// Parse failures before a path is attached
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("invalid manifest JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("manifest entry {0} names no image")]
    MissingName(usize),
}

impl ManifestError {
    fn at(self, path: &Path) -> CarouselError {
        match self {
            ManifestError::Json(source) => CarouselError::ManifestParse {
                path: path.to_path_buf(),
                source,
            },
            ManifestError::MissingName(index) => CarouselError::MissingImageName { index },
        }
    }
}

/// Build points from parsed entries, probing every image on disk.
/// Entry order is kept; entries without any readable image are dropped.
pub fn resolve_points(
    entries: &[ManifestEntry],
    images_dir: &Path,
    extensions: &[String],
) -> Vec<ImagePoint> {
    entries
        .iter()
        .filter_map(|entry| {
            let sources: Vec<_> = entry
                .image_names()
                .into_iter()
                .filter_map(|name| {
                    let found = find_valid_image(images_dir, name, extensions);
                    if found.is_none() {
                        tracing::warn!("⚠️  No readable image for '{}'", name);
                    }
                    found
                })
                .collect();

            let point = ImagePoint::new(sources, entry.caption.clone(), entry.rating);
            if point.is_none() {
                tracing::warn!("⚠️  Skipping '{}': no images found", entry.caption);
            }
            point
        })
        .collect()
}

/// Load the manifest named in `config` and probe all its images
pub async fn load_points(config: CarouselConfig) -> Result<Vec<ImagePoint>> {
    let path = config.manifest.clone();
    tracing::info!("🔍 Loading manifest: {}", path.display());

    let json = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| CarouselError::ManifestRead {
            path: path.clone(),
            source,
        })?;

    let entries = parse_manifest(&json).map_err(|e| e.at(&path))?;
    let entry_count = entries.len();

    // Header probing touches the disk for every candidate extension
    let images_dir: PathBuf = config.images_dir.clone();
    let extensions = config.extensions.clone();
    let points = task::spawn_blocking(move || resolve_points(&entries, &images_dir, &extensions))
        .await?;

    if points.is_empty() {
        return Err(CarouselError::NoValidPoints { path });
    }

    tracing::info!(
        "✅ Manifest loaded: {} of {} points usable",
        points.len(),
        entry_count
    );
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
        image::RgbImage::new(width, height).save(dir.join(name)).unwrap();
    }

    fn config_for(root: &Path) -> CarouselConfig {
        CarouselConfig {
            manifest: root.join("images.json"),
            images_dir: root.join("images"),
            ..CarouselConfig::default()
        }
    }

    #[test]
    fn test_parse_entries() {
        let entries = parse_manifest(
            r#"[
                { "name": "a.jpg", "caption": "A", "rating": 7.5 },
                { "images": ["b", "b-alt", "b"], "caption": "B", "rating": 3 },
                { "name": "c" }
            ]"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].rating, 7.5);
        assert_eq!(entries[1].image_names(), vec!["b", "b-alt"]);
        assert_eq!(entries[2].caption, "");
        assert_eq!(entries[2].rating, 0.0);
    }

    #[test]
    fn test_name_and_images_combine() {
        let entries =
            parse_manifest(r#"[{ "name": "main", "images": ["alt", "main"] }]"#).unwrap();
        assert_eq!(entries[0].image_names(), vec!["main", "alt"]);
    }

    #[test]
    fn test_entry_without_image_is_rejected() {
        let err = parse_manifest(r#"[{ "name": "a" }, { "caption": "nothing" }]"#).unwrap_err();
        assert!(matches!(err, ManifestError::MissingName(1)));
        assert_eq!(err.to_string(), "manifest entry 1 names no image");
    }

    #[test]
    fn test_parse_error_gains_path() {
        let err = parse_manifest("[{").unwrap_err();
        assert!(err.to_string().starts_with("invalid manifest JSON"));
        let err = err.at(Path::new("trip/images.json"));
        assert!(matches!(err, CarouselError::ManifestParse { .. }));
        assert!(err.to_string().contains("trip/images.json"));
    }

    #[test]
    fn test_not_an_array() {
        assert!(matches!(parse_manifest("{}"), Err(ManifestError::Json(_))));
    }

    #[tokio::test]
    async fn test_load_points_keeps_order_and_drops_missing() {
        let root = tempfile::tempdir().unwrap();
        let images = root.path().join("images");
        std::fs::create_dir(&images).unwrap();
        write_png(&images, "one.png", 40, 30);
        write_png(&images, "three.png", 10, 20);
        write_png(&images, "three-b.png", 20, 10);

        std::fs::write(
            root.path().join("images.json"),
            r#"[
                { "name": "one.jpg", "caption": "One", "rating": 5 },
                { "name": "two.jpg", "caption": "Two", "rating": 6 },
                { "images": ["three", "three-b", "three-c"], "caption": "Three", "rating": 9.5 }
            ]"#,
        )
        .unwrap();

        let points = load_points(config_for(root.path())).await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].caption, "One");
        assert_eq!(points[0].current_source().width, 40);
        assert_eq!(points[1].caption, "Three");
        assert_eq!(points[1].sources().len(), 2);
        assert_eq!(points[1].rating, 9.5);
    }

    #[tokio::test]
    async fn test_load_points_missing_manifest() {
        let root = tempfile::tempdir().unwrap();
        let err = load_points(config_for(root.path())).await.unwrap_err();
        assert!(matches!(err, CarouselError::ManifestRead { .. }));
    }

    #[tokio::test]
    async fn test_load_points_nothing_usable() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("images.json"), r#"[{ "name": "ghost" }]"#).unwrap();

        let err = load_points(config_for(root.path())).await.unwrap_err();
        assert!(matches!(err, CarouselError::NoValidPoints { .. }));
    }

    #[tokio::test]
    async fn test_load_points_bad_json() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("images.json"), "[ { ").unwrap();

        let err = load_points(config_for(root.path())).await.unwrap_err();
        assert!(matches!(err, CarouselError::ManifestParse { .. }));
    }
}
