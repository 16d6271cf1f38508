//! Customer accounts and prescription records

use crate::domain::ids::{CustomerId, PrescriptionId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Customer account as seen by the pricing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAccount {
    pub id: CustomerId,

    /// Redeemable points, 1 point = 1 currency unit
    #[serde(default)]
    pub loyalty_points: u64,

    /// Insurance coverage percentage (0-100)
    #[serde(default)]
    pub insurance_coverage_pct: Decimal,

    /// Redemption keys already applied to this balance
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied_redemptions: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl CustomerAccount {
    /// Creates an account with no points and no insurance
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            loyalty_points: 0,
            insurance_coverage_pct: Decimal::ZERO,
            applied_redemptions: Vec::new(),
            updated_at: None,
        }
    }

    pub fn with_loyalty_points(mut self, points: u64) -> Self {
        self.loyalty_points = points;
        self
    }

    pub fn with_insurance(mut self, pct: Decimal) -> Self {
        self.insurance_coverage_pct = pct;
        self
    }
}

/// Outcome of a loyalty point redemption against the stored balance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoyaltyRedemption {
    /// Points were deducted; carries the remaining balance
    Applied { remaining: u64 },
    /// The redemption key was already applied; balance untouched
    AlreadyApplied,
}

/// Prescription record written by the upload/extraction pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionRecord {
    pub id: PrescriptionId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<CustomerId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PrescriptionRecord {
    pub fn new(id: PrescriptionId, customer_id: Option<CustomerId>) -> Self {
        Self {
            id,
            customer_id,
            payment_type: None,
            payment_id: None,
            updated_at: None,
        }
    }
}
