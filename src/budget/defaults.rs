use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::line_item::{sanitize_amount, LineItem};
use crate::core::errors::Result;

/// Template row used to seed new or reset months.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub default_amount: f64,
}

impl TemplateItem {
    pub fn new(label: impl Into<String>, default_amount: f64) -> Self {
        Self {
            label: label.into(),
            default_amount,
        }
    }

    fn to_line_item(&self) -> LineItem {
        LineItem::new(self.label.clone(), sanitize_amount(self.default_amount))
    }
}

/// Default rows for the charges and rent-detail tables.
///
/// Loaded once at startup and only ever used to seed a month, never merged
/// into months that already exist.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultTablesConfig {
    #[serde(default)]
    pub charges: Vec<TemplateItem>,
    #[serde(default)]
    pub rent_details: Vec<TemplateItem>,
}

impl DefaultTablesConfig {
    /// Reads the template, falling back to an empty one on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                tracing::info!(
                    path = %path.display(),
                    charges = config.charges.len(),
                    rent_details = config.rent_details.len(),
                    "default tables loaded"
                );
                config
            }
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "default tables unavailable, using an empty template"
                );
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty() && self.rent_details.is_empty()
    }

    pub fn charge_items(&self) -> Vec<LineItem> {
        self.charges.iter().map(TemplateItem::to_line_item).collect()
    }

    pub fn rent_detail_items(&self) -> Vec<LineItem> {
        self.rent_details
            .iter()
            .map(TemplateItem::to_line_item)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_template_document() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("default_tables.json");
        fs::write(
            &path,
            r#"{
                "charges": [{"label": "Internet", "defaultAmount": 30}],
                "rentDetails": [{"label": "Loyer", "defaultAmount": 450}]
            }"#,
        )
        .unwrap();

        let config = DefaultTablesConfig::load(&path);
        assert_eq!(config.charges, vec![TemplateItem::new("Internet", 30.0)]);
        assert_eq!(config.rent_details, vec![TemplateItem::new("Loyer", 450.0)]);
    }

    #[test]
    fn missing_file_falls_back_to_empty_template() {
        let temp = tempdir().unwrap();
        let config = DefaultTablesConfig::load(&temp.path().join("absent.json"));
        assert!(config.is_empty());
    }

    #[test]
    fn malformed_document_falls_back_to_empty_template() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("default_tables.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(DefaultTablesConfig::try_load(&path).is_err());
        assert_eq!(DefaultTablesConfig::load(&path), DefaultTablesConfig::default());
    }

    #[test]
    fn negative_template_amounts_are_clamped() {
        let config = DefaultTablesConfig {
            charges: vec![TemplateItem::new("Refund", -12.0)],
            rent_details: Vec::new(),
        };
        assert_eq!(config.charge_items(), vec![LineItem::new("Refund", 0.0)]);
    }
}
