//! Directory configuration.
//!
//! # Responsibility
//! - Name the sheet and photo folder the directory works against.
//! - Hold the view URL prefix used to publish photo references.

use serde::Deserialize;

pub const DEFAULT_SHEET_NAME: &str = "Employees";
pub const DEFAULT_PHOTO_FOLDER_NAME: &str = "Employee Photos";
pub const DEFAULT_VIEW_URL_PREFIX: &str = "https://drive.google.com/uc?export=view&id=";

/// Names and URLs shared by the record store and the photo store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Sheet holding the employee table.
    pub sheet_name: String,
    /// Folder receiving uploaded photos. Looked up by exact name.
    pub photo_folder_name: String,
    /// Prefix joined with a photo id to build its view URL.
    pub view_url_prefix: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            photo_folder_name: DEFAULT_PHOTO_FOLDER_NAME.to_string(),
            view_url_prefix: DEFAULT_VIEW_URL_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DirectoryConfig, DEFAULT_VIEW_URL_PREFIX};

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: DirectoryConfig =
            serde_json::from_str(r#"{"sheet_name": "Staff"}"#).expect("config should parse");
        assert_eq!(config.sheet_name, "Staff");
        assert_eq!(config.photo_folder_name, "Employee Photos");
        assert_eq!(config.view_url_prefix, DEFAULT_VIEW_URL_PREFIX);
    }
}
