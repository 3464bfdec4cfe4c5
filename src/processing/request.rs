//! Request payload and field defaults

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::AppError;
use crate::substitution::ReplacementMap;

pub const SELLER_NAME_TOKEN: &str = "{{SellerName}}";
pub const PROPERTY_ADDRESS_TOKEN: &str = "{{PropertyAddress}}";
pub const CONTRACT_DATE_TOKEN: &str = "{{ContractDate}}";
pub const NOTARY_DATE_TOKEN: &str = "{{NotaryDate}}";

/// Value used for optional fields the caller did not send
pub const DEFAULT_FIELD_VALUE: &str = "TBD";

/// Body of `POST /process-word-document`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessRequest {
    pub seller_name: Option<String>,
    pub property_address: Option<String>,
    pub contract_date: Option<String>,
    pub notary_date: Option<String>,
}

/// Validated fields with defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffidavitFields {
    pub seller_name: String,
    pub property_address: String,
    pub contract_date: String,
    pub notary_date: String,
}

impl ProcessRequest {
    /// Decode a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Request body must be a JSON object: {}", e)))
    }

    /// Check required fields and fill in defaults.
    ///
    /// `seller_name` must be present and non-empty. A missing `notary_date`
    /// defaults to `today`.
    pub fn into_fields(self, today: NaiveDate) -> Result<AffidavitFields, AppError> {
        let seller_name = self
            .seller_name
            .filter(|name| !name.is_empty())
            .ok_or_else(|| AppError::Validation("seller_name is required".to_string()))?;

        Ok(AffidavitFields {
            seller_name,
            property_address: self
                .property_address
                .unwrap_or_else(|| DEFAULT_FIELD_VALUE.to_string()),
            contract_date: self
                .contract_date
                .unwrap_or_else(|| DEFAULT_FIELD_VALUE.to_string()),
            notary_date: self
                .notary_date
                .unwrap_or_else(|| format_notary_date(today)),
        })
    }
}

impl AffidavitFields {
    /// Placeholder tokens mapped to their values
    pub fn replacements(&self) -> ReplacementMap {
        ReplacementMap::new()
            .with(SELLER_NAME_TOKEN, self.seller_name.as_str())
            .with(PROPERTY_ADDRESS_TOKEN, self.property_address.as_str())
            .with(CONTRACT_DATE_TOKEN, self.contract_date.as_str())
            .with(NOTARY_DATE_TOKEN, self.notary_date.as_str())
    }
}

/// `Month DD, YYYY`, e.g. `October 08, 2026`
pub fn format_notary_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}
