//! Payment domain model.

use serde::{Deserialize, Serialize};

use super::{opaque_id, opaque_id_opt};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Netbanking,
    Wallet,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            Self::Card => "Credit / Debit Card",
            Self::Upi => "UPI",
            Self::Netbanking => "Net Banking",
            Self::Wallet => "Wallet",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "card" => Ok(Self::Card),
            "upi" => Ok(Self::Upi),
            "netbanking" | "net-banking" => Ok(Self::Netbanking),
            "wallet" => Ok(Self::Wallet),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
    /// Any status this client does not know; only `failed` is a failure.
    #[serde(other)]
    Unknown,
}

/// Payment record returned by the backend. Only `status` is required;
/// the method is kept verbatim since the backend may accept methods this
/// client does not offer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(default, deserialize_with = "opaque_id")]
    pub course_id: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
    pub status: PaymentStatus,
    #[serde(default, deserialize_with = "opaque_id_opt")]
    pub transaction_id: Option<String>,
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePayment {
    pub course_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upi_id: Option<String>,
}
