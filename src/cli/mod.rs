//! CLI interface and argument parsing

pub mod commands;

use clap::{Parser, Subcommand};

/// Medcart - prescription cart pricing engine
#[derive(Parser, Debug)]
#[command(name = "medcart")]
#[command(version, about, long_about = None)]
#[command(author = "Medcart Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults apply when it does not exist)
    #[arg(short, long, default_value = "medcart.toml", env = "MEDCART_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "MEDCART_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Create starter vendor profiles, pricing rules and inventory
    Seed(commands::seed::SeedArgs),

    /// Store a prescription extraction from a JSON file
    ImportPrescription(commands::import::ImportArgs),

    /// Build and price the cart for a prescription
    BuildCart(commands::build_cart::BuildCartArgs),

    /// Place a cash-on-delivery order for a prescription
    PlaceOrder(commands::place_order::PlaceOrderArgs),

    /// List or update vendor inventory
    Inventory(commands::inventory::InventoryArgs),

    /// Show or update vendor pricing rules
    PricingRules(commands::pricing_rules::PricingRulesArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::inventory::InventoryAction;

    #[test]
    fn test_cli_parse_build_cart() {
        let cli = Cli::parse_from(["medcart", "build-cart", "--prescription-id", "rx-1"]);
        assert_eq!(cli.config, "medcart.toml");
        match cli.command {
            Commands::BuildCart(args) => {
                assert_eq!(args.prescription_id, "rx-1");
                assert!(args.preferred_vendor.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["medcart", "--config", "custom.toml", "seed"]);
        assert_eq!(cli.config, "custom.toml");
        assert!(matches!(cli.command, Commands::Seed(_)));
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["medcart", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_preferred_vendor() {
        let cli = Cli::parse_from([
            "medcart",
            "build-cart",
            "--prescription-id",
            "rx-1",
            "--preferred-vendor",
            "site-c",
        ]);
        let Commands::BuildCart(args) = cli.command else {
            panic!("expected build-cart");
        };
        assert_eq!(args.preferred_vendor.as_deref(), Some("site-c"));
    }

    #[test]
    fn test_cli_parse_inventory_set() {
        let cli = Cli::parse_from([
            "medcart",
            "inventory",
            "set",
            "--vendor",
            "site-b",
            "--name",
            "Paracetamol 500 mg",
            "--stock",
            "0",
            "--price",
            "17",
        ]);
        let Commands::Inventory(args) = cli.command else {
            panic!("expected inventory");
        };
        assert!(matches!(
            args.action,
            InventoryAction::Set { stock: Some(0), .. }
        ));
    }

    #[test]
    fn test_cli_inventory_set_requires_price() {
        let result = Cli::try_parse_from([
            "medcart", "inventory", "set", "--vendor", "site-b", "--name", "X", "--stock", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_place_order_and_init() {
        let cli = Cli::parse_from(["medcart", "place-order", "--prescription-id", "rx-9"]);
        assert!(matches!(cli.command, Commands::PlaceOrder(_)));

        let cli = Cli::parse_from(["medcart", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}
