//! Customer profile from TOML (`[profile]` section)

use finadvisor_domain::CustomerProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Record served by the profile lookup. Unset fields keep the standard
/// record's values; a non-empty `asset` table replaces its holdings.
///
/// ```toml
/// [profile]
/// monthly_income = "80000HKD"
/// monthly_expense = "30000HKD"
///
/// [profile.asset]
/// saving = "200000HKD"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfileConfig {
    pub monthly_income: Option<String>,
    pub monthly_expense: Option<String>,
    pub asset: BTreeMap<String, String>,
}

impl FileProfileConfig {
    pub fn to_profile(&self) -> CustomerProfile {
        let standard = CustomerProfile::default();
        CustomerProfile {
            monthly_income: self
                .monthly_income
                .clone()
                .unwrap_or(standard.monthly_income),
            monthly_expense: self
                .monthly_expense
                .clone()
                .unwrap_or(standard.monthly_expense),
            asset: if self.asset.is_empty() {
                standard.asset
            } else {
                self.asset.clone()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_section_is_standard_record() {
        assert_eq!(
            FileProfileConfig::default().to_profile(),
            CustomerProfile::default()
        );
    }

    #[test]
    fn test_asset_table_replaces_holdings() {
        let config = FileProfileConfig {
            monthly_income: Some("80000HKD".to_string()),
            asset: [("gold".to_string(), "50000HKD".to_string())].into(),
            ..Default::default()
        };
        let profile = config.to_profile();
        assert_eq!(profile.monthly_income, "80000HKD");
        assert_eq!(profile.monthly_expense, "20000HKD");
        assert_eq!(profile.asset.len(), 1);
    }
}
