//! Medication lines produced by prescription extraction
//!
//! The extraction collaborator hands over an ordered list of
//! [`MedicationLine`]s. They are read-only input to cart assembly.

use serde::{Deserialize, Serialize};

/// One parsed prescription entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicationLine {
    /// Medication name as extracted (e.g. "Paracetamol 500 mg")
    pub name: String,

    /// Strength (e.g. "500 mg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,

    /// Dosage form (tablet, syrup, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,

    /// Course length in days, positive when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_instructions: Option<String>,

    /// Units requested, positive when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

impl MedicationLine {
    /// Creates a line with only a name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strength: None,
            form: None,
            dosage: None,
            frequency: None,
            duration_days: None,
            special_instructions: None,
            quantity: None,
        }
    }

    /// Sets the strength
    pub fn with_strength(mut self, strength: impl Into<String>) -> Self {
        self.strength = Some(strength.into());
        self
    }

    /// Sets the requested quantity
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Requested quantity, defaulting to 1 when absent
    pub fn requested_quantity(&self) -> u32 {
        self.quantity.unwrap_or(1)
    }

    /// Validates the line
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("medication name cannot be empty".to_string());
        }
        if self.quantity == Some(0) {
            return Err(format!("quantity for '{}' must be positive", self.name));
        }
        if self.duration_days == Some(0) {
            return Err(format!("durationDays for '{}' must be positive", self.name));
        }
        Ok(())
    }
}

/// Structured result of prescription extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionExtraction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriber_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,

    /// Medications in prescription order
    pub medications: Vec<MedicationLine>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Extraction confidence in `[0, 1]`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PrescriptionExtraction {
    /// Creates an extraction holding only medications
    pub fn from_medications(medications: Vec<MedicationLine>) -> Self {
        Self {
            prescriber_name: None,
            patient_name: None,
            issued_date: None,
            medications,
            notes: None,
            confidence: None,
        }
    }

    /// Validates the extraction and every medication line
    ///
    /// # Errors
    ///
    /// Returns a message if the medication list is empty or a line is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.medications.is_empty() {
            return Err("extraction contains no medications".to_string());
        }
        if let Some(confidence) = self.confidence {
            if !(0.0..=1.0).contains(&confidence) {
                return Err(format!("confidence {confidence} outside [0, 1]"));
            }
        }
        self.medications.iter().try_for_each(MedicationLine::validate)
    }
}
