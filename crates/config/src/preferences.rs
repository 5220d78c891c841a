//! User preferences persisted between sessions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Stamp text used until the user picks their own
pub const DEFAULT_STAMP_TEXT: &str = "雅";

/// Preferences the glue layer persists on behalf of the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    /// Characters carved into the seal stamp (1-4 recommended)
    pub stamp_text: String,
    /// Name attached to shared artwork
    pub artist_name: String,
    /// Font file used to rasterize stamp glyphs
    pub stamp_font: Option<PathBuf>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            stamp_text: DEFAULT_STAMP_TEXT.to_string(),
            artist_name: String::new(),
            stamp_font: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.stamp_text, "雅");
        assert!(prefs.artist_name.is_empty());
        assert!(prefs.stamp_font.is_none());
    }

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"artistName":"Hana"}"#).unwrap();
        assert_eq!(prefs.artist_name, "Hana");
        assert_eq!(prefs.stamp_text, DEFAULT_STAMP_TEXT);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(Preferences::default()).unwrap();
        assert!(json.get("stampText").is_some());
        assert!(json.get("artistName").is_some());
    }
}
