//! Filename rules for the media pool.

use crate::domain::errors::{DomainError, DomainResult};

/// Extensions that could be executed by a web server if served from the pool.
const BLOCKED_EXTENSIONS: &[&str] = &[
    "php", "php3", "php4", "php5", "phtml", "phar", "pl", "py", "cgi", "asp", "aspx", "jsp",
    "sh", "exe", "htaccess",
];

/// Splits `Photo.Final.JPG` into (`Photo.Final`, `jpg`).
pub fn split(filename: &str) -> (&str, Option<String>) {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem, Some(ext.to_ascii_lowercase()))
        }
        _ => (filename, None),
    }
}

pub fn ensure_allowed(filename: &str) -> DomainResult<()> {
    let (_, ext) = split(filename);
    let blocked = filename.starts_with('.')
        || ext
            .as_deref()
            .map(|ext| BLOCKED_EXTENSIONS.contains(&ext))
            .unwrap_or(false);
    if blocked {
        return Err(DomainError::rule(
            "medium.blocked_extension",
            format!("files like '{filename}' are not allowed in the media pool"),
        ));
    }
    Ok(())
}

/// The n-th candidate for a normalized stem: `stem.ext`, `stem_1.ext`, ...
pub fn candidate(stem: &str, ext: Option<&str>, attempt: u32) -> String {
    let base = if attempt == 0 {
        stem.to_string()
    } else {
        format!("{stem}_{attempt}")
    };
    match ext {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

pub fn mimetype(ext: Option<&str>) -> &'static str {
    match ext.unwrap_or_default() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lowercases_extension() {
        assert_eq!(split("Photo.Final.JPG"), ("Photo.Final", Some("jpg".into())));
        assert_eq!(split("README"), ("README", None));
        assert_eq!(split(".hidden"), (".hidden", None));
    }

    #[test]
    fn scripts_are_blocked() {
        let err = ensure_allowed("shell.PHP").unwrap_err();
        assert_eq!(err.code(), "medium.blocked_extension");
        assert!(ensure_allowed(".htaccess").is_err());
        assert!(ensure_allowed("photo.jpg").is_ok());
    }

    #[test]
    fn candidates_count_up() {
        assert_eq!(candidate("photo", Some("jpg"), 0), "photo.jpg");
        assert_eq!(candidate("photo", Some("jpg"), 2), "photo_2.jpg");
        assert_eq!(candidate("notes", None, 1), "notes_1");
    }

    #[test]
    fn mimetypes_fall_back_to_octet_stream() {
        assert_eq!(mimetype(Some("png")), "image/png");
        assert_eq!(mimetype(Some("xyz")), "application/octet-stream");
        assert_eq!(mimetype(None), "application/octet-stream");
    }
}
