//! Inventory command implementation
//!
//! `inventory list` prints a vendor's records; `inventory set` creates or
//! updates records from flags or a JSON file.

use crate::cli::commands::context::{parse_vendor, print_json, report, AppContext, EXIT_OK};
use crate::core::vendors::{InventoryItemUpdate, VendorAdmin};
use crate::domain::{MedcartError, VendorId};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

/// Arguments for the inventory command
#[derive(Args, Debug)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub action: InventoryAction,
}

#[derive(Subcommand, Debug)]
pub enum InventoryAction {
    /// Print every inventory record of a vendor
    List {
        /// Vendor id
        #[arg(long)]
        vendor: String,
    },

    /// Create or update inventory records
    Set {
        /// Vendor id
        #[arg(long)]
        vendor: String,

        /// JSON array of {name, stockQty, unitPrice, currency?}
        #[arg(long, conflicts_with_all = ["name", "stock", "price"])]
        file: Option<PathBuf>,

        /// Medication name
        #[arg(long, requires_all = ["stock", "price"])]
        name: Option<String>,

        /// Units in stock
        #[arg(long)]
        stock: Option<u32>,

        /// Unit price
        #[arg(long)]
        price: Option<Decimal>,

        /// Currency of the price (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,
    },
}

impl InventoryArgs {
    /// Execute the inventory command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        match self.run(config_path).await {
            Ok(()) => Ok(EXIT_OK),
            Err(e) => Ok(report(&e, "Inventory command failed")),
        }
    }

    async fn run(&self, config_path: &str) -> Result<(), MedcartError> {
        let ctx = AppContext::open(config_path).await?;
        let admin = VendorAdmin::new(
            ctx.store.clone(),
            ctx.vendor_ids()?,
            ctx.config.application.currency.clone(),
        );

        match &self.action {
            InventoryAction::List { vendor } => {
                let records = admin.list_inventory(&parse_vendor(vendor)?).await?;
                ctx.persist().await?;
                print_json(&records)
            }
            InventoryAction::Set {
                vendor,
                file,
                name,
                stock,
                price,
                currency,
            } => {
                let vendor_id: VendorId = parse_vendor(vendor)?;
                let items = match (file, name, stock, price) {
                    (Some(path), _, _, _) => read_items(path)?,
                    (None, Some(name), Some(stock), Some(price)) => vec![InventoryItemUpdate {
                        name: name.clone(),
                        stock_qty: *stock,
                        unit_price: *price,
                        currency: currency.clone(),
                    }],
                    _ => {
                        return Err(MedcartError::Validation(
                            "either --file or --name, --stock and --price are required"
                                .to_string(),
                        ));
                    }
                };

                let written = admin.upsert_inventory(&vendor_id, &items).await?;
                ctx.persist().await?;
                eprintln!("✅ Updated {written} inventory record(s) for {vendor_id}");
                print_json(&admin.list_inventory(&vendor_id).await?)
            }
        }
    }
}

fn read_items(path: &Path) -> Result<Vec<InventoryItemUpdate>, MedcartError> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        MedcartError::MissingData(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&contents).map_err(|e| {
        MedcartError::Validation(format!("{} is not a valid item list: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_read_items() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"name": "Drug X", "stockQty": 4, "unitPrice": 12.5}]"#)
            .unwrap();
        file.flush().unwrap();

        let items = read_items(file.path()).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].stock_qty, 4);
        assert_eq!(items[0].unit_price, Decimal::new(125, 1));
        assert_eq!(items[0].currency, None);
    }

    #[test]
    fn test_read_items_rejects_wrong_shape() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"name": "Drug X"}"#).unwrap();
        file.flush().unwrap();
        assert!(matches!(
            read_items(file.path()),
            Err(MedcartError::Validation(_))
        ));
    }
}
