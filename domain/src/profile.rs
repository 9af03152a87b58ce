//! Customer profile record returned by the Profile Lookup Service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monthly cash flow and asset holdings of the client.
///
/// Amounts are currency-suffixed strings (e.g. `"100000HKD"`) and are never
/// parsed; they are handed to the model as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub monthly_income: String,
    pub monthly_expense: String,
    /// Asset category name → amount
    #[serde(default)]
    pub asset: BTreeMap<String, String>,
}

impl Default for CustomerProfile {
    fn default() -> Self {
        let asset = [
            ("saving", "100000HKD"),
            ("fixed_income", "100000HKD"),
            ("high_risk_stock", "500000HKD"),
            ("Bitcoin", "100000HKD"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            monthly_income: "50000HKD".to_string(),
            monthly_expense: "20000HKD".to_string(),
            asset,
        }
    }
}

impl CustomerProfile {
    /// JSON text handed back to the model as the capability output
    pub fn to_capability_output(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                "monthly_income: {}, monthly_expense: {}",
                self.monthly_income, self.monthly_expense
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let profile = CustomerProfile::default();
        assert_eq!(profile.monthly_income, "50000HKD");
        assert_eq!(profile.monthly_expense, "20000HKD");
        assert_eq!(profile.asset.len(), 4);
        assert_eq!(profile.asset["high_risk_stock"], "500000HKD");
    }

    #[test]
    fn test_capability_output_is_json() {
        let output = CustomerProfile::default().to_capability_output();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["monthly_income"], "50000HKD");
        assert_eq!(value["asset"]["Bitcoin"], "100000HKD");
    }
}
