//! Configuration handed to the embedded report object.
//!
//! The shape follows the embedding library's report configuration so the
//! embedding surface can serialize it straight across. Only the credential
//! fields ever change after construction.

use super::action::{EmbedCredentials, FilterSpec};
use super::wire::wire_enum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedType {
    Report,
}

wire_enum! {
    pub enum TokenType {
        Aad = 0,
        Embed = 1,
    }
}

wire_enum! {
    pub enum LayoutType {
        Master = 0,
        Custom = 1,
        MobilePortrait = 2,
        MobileLandscape = 3,
    }
}

wire_enum! {
    /// How a custom layout scales the page.
    pub enum DisplayOption {
        FitToPage = 0,
        FitToWidth = 1,
        ActualSize = 2,
    }
}

wire_enum! {
    pub enum BackgroundType {
        Default = 0,
        Transparent = 1,
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiltersPane {
    pub expanded: bool,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNavigationPane {
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panes {
    pub filters: FiltersPane,
    pub page_navigation: PageNavigationPane,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomLayout {
    pub display_option: DisplayOption,
}

/// Fixed display settings of the widget.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub panes: Panes,
    pub layout_type: LayoutType,
    pub custom_layout: CustomLayout,
    pub background: BackgroundType,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            panes: Panes {
                filters: FiltersPane {
                    expanded: false,
                    visible: true,
                },
                page_navigation: PageNavigationPane { visible: false },
            },
            layout_type: LayoutType::Custom,
            custom_layout: CustomLayout {
                display_option: DisplayOption::FitToPage,
            },
            background: BackgroundType::Transparent,
        }
    }
}

/// Configuration object for the embedded report.
///
/// Owned by the controller; everything else sees clones.
///
/// # Example
///
/// ```rust
/// use report_widget::core::ReportEmbedConfig;
///
/// let config = ReportEmbedConfig::default();
/// assert!(config.embed_url.is_none());
/// assert!(config.access_token.is_none());
/// assert!(!config.has_credentials());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportEmbedConfig {
    #[serde(rename = "type")]
    pub embed_type: EmbedType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub embed_url: Option<String>,
    pub token_type: TokenType,
    pub access_token: Option<String>,
    pub visual_name: String,
    pub settings: DisplaySettings,
    pub filters: Vec<FilterSpec>,
}

impl Default for ReportEmbedConfig {
    fn default() -> Self {
        Self {
            embed_type: EmbedType::Report,
            id: None,
            embed_url: None,
            token_type: TokenType::Embed,
            access_token: None,
            visual_name: String::new(),
            settings: DisplaySettings::default(),
            filters: Vec::new(),
        }
    }
}

impl ReportEmbedConfig {
    /// Whether url and token have been written.
    pub fn has_credentials(&self) -> bool {
        self.embed_url.is_some() && self.access_token.is_some()
    }

    /// Write url, token and report id in one step.
    pub(crate) fn apply_credentials(&mut self, credentials: &EmbedCredentials) {
        self.embed_url = Some(credentials.embed_url.clone());
        self.access_token = Some(credentials.token.clone());
        self.id = credentials.report_id.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_config_serializes_embed_shape() {
        let value = serde_json::to_value(ReportEmbedConfig::default()).unwrap();

        assert_eq!(
            value,
            json!({
                "type": "report",
                "embedUrl": null,
                "tokenType": 1,
                "accessToken": null,
                "visualName": "",
                "settings": {
                    "panes": {
                        "filters": { "expanded": false, "visible": true },
                        "pageNavigation": { "visible": false },
                    },
                    "layoutType": 1,
                    "customLayout": { "displayOption": 0 },
                    "background": 1,
                },
                "filters": [],
            })
        );
    }

    #[test]
    fn apply_credentials_writes_all_fields_together() {
        let mut config = ReportEmbedConfig::default();
        let creds = EmbedCredentials::new("https://embed", "secret").with_report_id("r-7");

        config.apply_credentials(&creds);

        assert_eq!(config.embed_url.as_deref(), Some("https://embed"));
        assert_eq!(config.access_token.as_deref(), Some("secret"));
        assert_eq!(config.id.as_deref(), Some("r-7"));
        assert!(config.has_credentials());
        assert_eq!(config.settings, DisplaySettings::default());
    }

    #[test]
    fn config_reads_back_numeric_codes() {
        let json = serde_json::to_string(&ReportEmbedConfig::default()).unwrap();
        let parsed: ReportEmbedConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.token_type, TokenType::Embed);
        assert_eq!(parsed.settings.layout_type, LayoutType::Custom);
        assert_eq!(parsed.settings.background, BackgroundType::Transparent);
        assert!(serde_json::from_str::<TokenType>("7").is_err());
    }
}
