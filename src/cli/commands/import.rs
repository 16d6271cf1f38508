//! Import-prescription command implementation
//!
//! Stores a prescription record and its medication extraction, and
//! optionally creates or updates the customer account it belongs to.

use crate::cli::commands::context::{print_json, report, AppContext, EXIT_OK};
use crate::domain::{
    CustomerAccount, CustomerId, MedcartError, MedicationLine, PrescriptionExtraction,
    PrescriptionId, PrescriptionRecord,
};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

/// Arguments for the import-prescription command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Prescription id to store the extraction under
    #[arg(long)]
    pub prescription_id: String,

    /// JSON file holding the extraction, or a bare array of medications
    #[arg(long)]
    pub file: PathBuf,

    /// Customer the prescription belongs to
    #[arg(long)]
    pub customer_id: Option<String>,

    /// Set the customer's loyalty point balance
    #[arg(long, requires = "customer_id")]
    pub loyalty_points: Option<u64>,

    /// Set the customer's insurance coverage percentage
    #[arg(long, requires = "customer_id")]
    pub insurance_pct: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExtractionFile {
    Medications(Vec<MedicationLine>),
    Extraction(PrescriptionExtraction),
}

impl From<ExtractionFile> for PrescriptionExtraction {
    fn from(file: ExtractionFile) -> Self {
        match file {
            ExtractionFile::Medications(lines) => PrescriptionExtraction::from_medications(lines),
            ExtractionFile::Extraction(extraction) => extraction,
        }
    }
}

impl ImportArgs {
    /// Execute the import-prescription command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Failed to import prescription")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let prescription_id =
            PrescriptionId::new(&self.prescription_id).map_err(MedcartError::Validation)?;
        let customer_id = self
            .customer_id
            .as_ref()
            .map(CustomerId::new)
            .transpose()
            .map_err(MedcartError::Validation)?;
        let extraction = read_extraction(&self.file)?;

        let ctx = AppContext::open(config_path).await?;

        if let Some(ref customer_id) = customer_id {
            self.update_customer(&ctx, customer_id).await?;
        }

        let mut record = ctx
            .store
            .get_prescription(&prescription_id)
            .await?
            .unwrap_or_else(|| PrescriptionRecord::new(prescription_id.clone(), None));
        if customer_id.is_some() {
            record.customer_id = customer_id;
        }
        ctx.store.put_prescription(record.clone()).await?;

        let medications = extraction.medications.len();
        ctx.store.put_extraction(&prescription_id, extraction).await?;
        ctx.persist().await?;

        tracing::info!(
            prescription_id = %prescription_id,
            medications,
            "Imported prescription"
        );
        eprintln!("✅ Imported {medications} medication(s) for {prescription_id}");
        print_json(&record)
    }

    async fn update_customer(
        &self,
        ctx: &AppContext,
        customer_id: &CustomerId,
    ) -> Result<(), MedcartError> {
        let existing = ctx.store.get_customer(customer_id).await?;
        if existing.is_some() && self.loyalty_points.is_none() && self.insurance_pct.is_none() {
            return Ok(());
        }

        let mut account = existing.unwrap_or_else(|| CustomerAccount::new(customer_id.clone()));
        if let Some(points) = self.loyalty_points {
            account.loyalty_points = points;
        }
        if let Some(pct) = self.insurance_pct {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(MedcartError::Validation(format!(
                    "insurance coverage {pct} must be within 0-100"
                )));
            }
            account.insurance_coverage_pct = pct;
        }
        ctx.store.put_customer(account).await
    }
}

/// Read and validate an extraction file
fn read_extraction(path: &std::path::Path) -> Result<PrescriptionExtraction, MedcartError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MedcartError::MissingData(format!("cannot read {}: {e}", path.display()))
    })?;
    let file: ExtractionFile = serde_json::from_str(&contents).map_err(|e| {
        MedcartError::Validation(format!("{} is not a valid extraction: {e}", path.display()))
    })?;
    let extraction = PrescriptionExtraction::from(file);
    extraction.validate().map_err(MedcartError::Validation)?;
    Ok(extraction)
}
