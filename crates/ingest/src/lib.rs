//! Turns user-picked files into inline image references.

use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::ImageFormat;

mod worker;

pub use worker::IngestWorker;

/// Content type of `bytes`, when they are an image. Magic bytes win; the file
/// extension is only consulted when the content is not recognized.
pub fn sniff_image_mime(bytes: &[u8], path: &Path) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())?;
    if ext == "svg" {
        return Some("image/svg+xml");
    }
    if bytes.is_empty() {
        return None;
    }
    ImageFormat::from_extension(&ext).map(|format| format.to_mime_type())
}

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Reads one file into a `data:` URI. Unreadable and non-image files yield
/// `None`.
pub fn ingest_file(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
            return None;
        }
    };
    let Some(mime) = sniff_image_mime(&bytes, path).filter(|mime| mime.starts_with("image/"))
    else {
        tracing::debug!(path = %path.display(), "skipping non-image file");
        return None;
    };
    Some(encode_data_uri(mime, &bytes))
}

/// Decodes every file and keeps the images, in input order.
pub fn ingest_batch(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().filter_map(|path| ingest_file(path)).collect()
}

/// Splits a path list typed by the user. Entries are separated by `;` or `,`
/// and surrounding whitespace is ignored.
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split([';', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::path::{Path, PathBuf};

    pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];
    pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn sniffs_by_content_before_extension() {
        assert_eq!(
            sniff_image_mime(PNG_BYTES, Path::new("photo.jpg")),
            Some("image/png")
        );
        assert_eq!(
            sniff_image_mime(JPEG_BYTES, Path::new("noext")),
            Some("image/jpeg")
        );
        assert_eq!(
            sniff_image_mime(b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>", Path::new("a.SVG")),
            Some("image/svg+xml")
        );
        assert_eq!(sniff_image_mime(b"hello", Path::new("notes.txt")), None);
        assert_eq!(sniff_image_mime(b"", Path::new("empty.png")), None);
    }

    #[test]
    fn data_uri_is_base64() {
        assert_eq!(encode_data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[test]
    fn batch_keeps_images_in_order() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let first = write(dir.path(), "a.png", PNG_BYTES);
        let second = write(dir.path(), "b.txt", b"plain text");
        let third = write(dir.path(), "c.jpg", JPEG_BYTES);
        let images = ingest_batch(&[first, second, third]);
        assert_eq!(images.len(), 2);
        assert!(images[0].starts_with("data:image/png;base64,"));
        assert!(images[1].starts_with("data:image/jpeg;base64,"));
        Ok(())
    }

    #[test]
    fn missing_file_contributes_nothing() {
        let images = ingest_batch(&[PathBuf::from("/definitely/not/here.png")]);
        assert!(images.is_empty());
    }

    #[test]
    fn path_list_splits_on_separators() {
        assert_eq!(
            parse_path_list(" /a.png; /b.jpg ,, ;/c.gif "),
            vec![
                PathBuf::from("/a.png"),
                PathBuf::from("/b.jpg"),
                PathBuf::from("/c.gif")
            ]
        );
        assert!(parse_path_list("  ").is_empty());
    }
}
