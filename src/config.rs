/// Filter panel configuration
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
///
/// ```
/// use tablefilter::{FilterPanelConfig, Side};
///
/// let json = r#"{ "apply_label": "OK", "popup_side": "right" }"#;
/// let config = FilterPanelConfig::from_json(json).unwrap();
/// assert_eq!(config.apply_label, "OK");
/// assert_eq!(config.popup_side, Side::Right);
/// assert_eq!(config.reset_label, "RESET");
/// ```

use crate::error::FilterError;
use crate::menu::Side;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPanelConfig {
    pub search_prompt: String,
    pub apply_label: String,
    pub reset_label: String,
    pub reset_all_label: String,
    /// Side of the header cell the filter popup opens on
    pub popup_side: Side,
    pub popup_offset: (f64, f64),
    pub case_sensitive_search: bool,
    /// Close the context menu when the panel is clicked
    pub hide_on_click: bool,
    /// Clear the search text whenever the context menu hides
    pub reset_search_on_hide: bool,
}

impl Default for FilterPanelConfig {
    fn default() -> Self {
        FilterPanelConfig {
            search_prompt: "Search...".to_string(),
            apply_label: "APPLY".to_string(),
            reset_label: "RESET".to_string(),
            reset_all_label: "RESET ALL".to_string(),
            popup_side: Side::Bottom,
            popup_offset: (5.0, 5.0),
            case_sensitive_search: true,
            hide_on_click: false,
            reset_search_on_hide: true,
        }
    }
}

impl FilterPanelConfig {
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, FilterError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
