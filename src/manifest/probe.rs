/// Image probing
///
/// Manifest names may carry any extension (or none). The real file is found
/// by trying each configured extension in order and keeping the first one
/// whose header decodes.

use std::path::Path;

use crate::state::point::ImageSource;

/// Drop a trailing `.ext` from the file name part of `name`
///
/// A bare leading dot (`.hidden`) is kept, and a trailing dot with nothing
/// after it (`photo.`) is dropped. Both names then probe as `<name>.<ext>`
/// like any other.
pub fn strip_extension(name: &str) -> &str {
    let file_start = name.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    match name[file_start..].rfind('.') {
        // A leading dot is a hidden file, not an extension
        Some(dot) if dot > 0 => &name[..file_start + dot],
        _ => name,
    }
}

/// First `dir/<name>.<ext>` that is a readable image
pub fn find_valid_image(dir: &Path, name: &str, extensions: &[String]) -> Option<ImageSource> {
    let clean = strip_extension(name);

    for ext in extensions {
        let path = dir.join(format!("{}.{}", clean, ext));
        if !path.is_file() {
            continue;
        }

        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                tracing::debug!(path = %path.display(), width, height, "🔍 Probed image");
                return Some(ImageSource::new(path, width, height));
            }
            Err(e) => {
                tracing::warn!("⚠️  {} exists but is not a readable image: {}", path.display(), e);
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extensions() -> Vec<String> {
        ["jpg", "jpeg", "png", "webp"].iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("photo.jpeg"), "photo");
        assert_eq!(strip_extension("photo"), "photo");
        assert_eq!(strip_extension("my.trip.png"), "my.trip");
        assert_eq!(strip_extension("album.v2/cover"), "album.v2/cover");
        assert_eq!(strip_extension("album/cover.jpg"), "album/cover");
        assert_eq!(strip_extension(".hidden"), ".hidden");
        assert_eq!(strip_extension("album/.hidden"), "album/.hidden");
        assert_eq!(strip_extension("photo."), "photo");
    }

    #[test]
    fn test_finds_real_extension() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(8, 6).save(dir.path().join("beach.png")).unwrap();

        // Manifest says jpg, disk has png
        let source = find_valid_image(dir.path(), "beach.jpg", &extensions()).unwrap();
        assert_eq!(source.path, dir.path().join("beach.png"));
        assert_eq!((source.width, source.height), (8, 6));
    }

    #[test]
    fn test_extension_order_wins() {
        let dir = tempfile::tempdir().unwrap();
        image::RgbImage::new(4, 4).save(dir.path().join("dup.png")).unwrap();
        image::RgbImage::new(2, 2).save(dir.path().join("dup.jpg")).unwrap();

        let source = find_valid_image(dir.path(), "dup", &extensions()).unwrap();
        assert_eq!(source.path, dir.path().join("dup.jpg"));
    }

    #[test]
    fn test_broken_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.jpg"), b"not an image").unwrap();
        image::RgbImage::new(3, 5).save(dir.path().join("bad.png")).unwrap();

        let source = find_valid_image(dir.path(), "bad", &extensions()).unwrap();
        assert_eq!(source.path, dir.path().join("bad.png"));
    }

    #[test]
    fn test_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(find_valid_image(dir.path(), "ghost", &extensions()).is_none());
    }
}
