//! Photo upload service.
//!
//! # Responsibility
//! - Decode `data:image/<subtype>;base64,<body>` payloads.
//! - Store the bytes in a well-known folder and publish a view URL.
//!
//! # Invariants
//! - Uploads never overwrite or delete earlier files; replaced photos stay
//!   in the folder.
//! - The returned reference is not attached to any record here.

use crate::config::DirectoryConfig;
use crate::model::employee::PhotoRef;
use crate::repo::file_repo::{FileStore, FolderId, NewFile};
use crate::service::{ServiceError, ServiceResult, MSG_MISSING_IMAGE};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{SystemTime, UNIX_EPOCH};

static DATA_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^data:image/([A-Za-z0-9.+-]*);base64,(.+)$").expect("valid data url regex")
});
static UNSAFE_FILENAME_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid filename regex"));

const DEFAULT_EXTENSION: &str = "png";
const FALLBACK_FILE_STEM: &str = "employee";

/// Decoded inline image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub mime_type: String,
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Uploads photos into one named folder of an injected file store.
pub struct PhotoService<F: FileStore> {
    files: F,
    folder_name: String,
    view_url_prefix: String,
}

impl<F: FileStore> PhotoService<F> {
    pub fn new(files: F, config: &DirectoryConfig) -> Self {
        Self {
            files,
            folder_name: config.photo_folder_name.clone(),
            view_url_prefix: config.view_url_prefix.clone(),
        }
    }

    pub fn files(&self) -> &F {
        &self.files
    }

    /// Stores one inline image named after `emp_id`.
    ///
    /// # Errors
    /// - `MissingInput` when `data_url` is blank.
    /// - `InvalidFormat` when the payload is not a base64 image data URL.
    /// - `Storage` when the file store fails.
    pub fn upload(&self, data_url: &str, emp_id: &str) -> ServiceResult<PhotoRef> {
        let image = parse_data_url(data_url)?;
        let file_name = format!(
            "{}_{}.{}",
            sanitize_file_stem(emp_id),
            epoch_millis(),
            image.extension
        );

        let folder = self.photo_folder()?;
        let photo_id = self.files.create_file(
            &folder,
            &NewFile {
                name: &file_name,
                mime_type: &image.mime_type,
                bytes: &image.bytes,
            },
        )?;

        info!(
            "event=photo_upload module=photo status=ok photo_id={} bytes={} mime={}",
            photo_id,
            image.bytes.len(),
            image.mime_type
        );
        Ok(PhotoRef {
            view_url: format!("{}{}", self.view_url_prefix, photo_id),
            photo_id,
        })
    }

    /// First folder with the configured name, created when none exists.
    fn photo_folder(&self) -> ServiceResult<FolderId> {
        if let Some(folder) = self.files.find_folders(&self.folder_name)?.into_iter().next() {
            return Ok(folder);
        }
        let folder = self.files.create_folder(&self.folder_name)?;
        info!(
            "event=photo_folder_create module=photo status=ok folder_id={}",
            folder
        );
        Ok(folder)
    }
}

/// Parses and decodes a `data:image/<subtype>;base64,<body>` payload.
pub fn parse_data_url(data_url: &str) -> ServiceResult<InlineImage> {
    if data_url.trim().is_empty() {
        return Err(ServiceError::MissingInput(MSG_MISSING_IMAGE));
    }

    let Some(captures) = DATA_URL_RE.captures(data_url) else {
        warn!("event=photo_upload module=photo status=rejected reason=shape");
        return Err(ServiceError::InvalidFormat);
    };
    let subtype = captures[1].to_ascii_lowercase();
    let bytes = STANDARD.decode(&captures[2]).map_err(|err| {
        warn!("event=photo_upload module=photo status=rejected reason=base64 error={err}");
        ServiceError::InvalidFormat
    })?;

    let extension = if subtype.is_empty() {
        DEFAULT_EXTENSION.to_string()
    } else {
        subtype
    };
    Ok(InlineImage {
        mime_type: format!("image/{extension}"),
        extension,
        bytes,
    })
}

/// Replaces characters outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_file_stem(emp_id: &str) -> String {
    let emp_id = emp_id.trim();
    if emp_id.is_empty() {
        return FALLBACK_FILE_STEM.to_string();
    }
    UNSAFE_FILENAME_CHARS_RE.replace_all(emp_id, "_").into_owned()
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis())
}

#[cfg(test)]
mod tests {
    use super::{parse_data_url, sanitize_file_stem};
    use crate::service::ServiceError;

    #[test]
    fn parses_png_payload() {
        let image = parse_data_url("data:image/png;base64,QQ==").unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.extension, "png");
        assert_eq!(image.bytes, b"A".to_vec());
    }

    #[test]
    fn empty_subtype_defaults_to_png() {
        let image = parse_data_url("data:image/;base64,QQ==").unwrap();
        assert_eq!(image.extension, "png");
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn rejects_non_image_and_bad_base64() {
        for payload in [
            "not-a-data-url",
            "data:text/plain;base64,QQ==",
            "data:image/png,QQ==",
            "data:image/png;base64,***",
        ] {
            let err = parse_data_url(payload).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidFormat), "{payload}");
        }
    }

    #[test]
    fn unpadded_base64_body_is_invalid_format() {
        let err = parse_data_url("data:image/png;base64,QQ").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidFormat));
    }

    #[test]
    fn blank_payload_is_missing_input() {
        let err = parse_data_url("  ").unwrap_err();
        assert!(matches!(err, ServiceError::MissingInput(_)));
    }

    #[test]
    fn sanitizes_file_stem() {
        assert_eq!(sanitize_file_stem("E 1/ä.x"), "E_1___x");
        assert_eq!(sanitize_file_stem("emp-01_a"), "emp-01_a");
        assert_eq!(sanitize_file_stem(""), "employee");
    }
}
