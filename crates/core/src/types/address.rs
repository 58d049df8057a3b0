//! Delivery address snapshot.

use serde::{Deserialize, Serialize};

/// Errors that can occur when building an [`Address`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// A required field is missing or blank.
    #[error("address {field} is required")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
}

/// A delivery address as embedded in an order.
///
/// ## Constraints
///
/// - `fullName`, `phone`, `line1`, `city`, `state` and `pincode` are
///   non-empty after trimming
/// - `line2` is optional
///
/// ## Examples
///
/// ```
/// use kirana_core::Address;
///
/// let address = Address::parse(
///     " Asha ", "9999999999", "12 MG Road", None, "Kolkata", "WB", "700001",
/// )
/// .unwrap();
/// assert_eq!(address.full_name, "Asha");
///
/// assert!(Address::parse("Asha", "", "12 MG Road", None, "Kolkata", "WB", "700001").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

impl Address {
    /// Build an address, trimming every field.
    ///
    /// A blank `line2` is normalized to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::MissingField`] naming the first required field
    /// that is blank.
    pub fn parse(
        full_name: &str,
        phone: &str,
        line1: &str,
        line2: Option<&str>,
        city: &str,
        state: &str,
        pincode: &str,
    ) -> Result<Self, AddressError> {
        Ok(Self {
            full_name: required("fullName", full_name)?,
            phone: required("phone", phone)?,
            line1: required("line1", line1)?,
            line2: line2
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned),
            city: required("city", city)?,
            state: required("state", state)?,
            pincode: required("pincode", pincode)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, AddressError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddressError::MissingField { field });
    }
    Ok(trimmed.to_owned())
}
