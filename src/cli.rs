use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser)]
#[command(name = "tfport")]
#[command(version)]
#[command(about = "Export live CDN and DNS configuration into Terraform files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Credentials file (default: ~/.config/tfport/credentials.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub credentials: Option<String>,

    /// Credentials section to authenticate with
    #[arg(long, global = true, value_name = "NAME")]
    pub section: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Export a DNS zone (inventory, config, import script)
    Zone(ZoneArgs),

    /// Export a property with its rule tree and hostnames
    Property(PropertyArgs),

    /// Export a cloud access key
    AccessKey(AccessKeyArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Zone
// ============================================================================

#[derive(Parser)]
pub struct ZoneArgs {
    /// Zone to export (lowercased before use)
    pub zone: String,

    /// Directory generated files go into (must exist)
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub work_dir: String,

    /// Fetch record names and types and write the inventory file
    #[arg(long)]
    pub inventory: bool,

    /// Generate or merge the zone's .tf declarations
    #[arg(long)]
    pub config: bool,

    /// Config step without an inventory - zone block only
    #[arg(long)]
    pub config_only: bool,

    /// Inventory step records names with empty type sets
    #[arg(long)]
    pub names_only: bool,

    /// Restrict the inventory to specific record names (repeatable)
    #[arg(long = "record", value_name = "NAME")]
    pub records: Vec<String>,

    /// Place each record name's declarations in its own module
    #[arg(long)]
    pub segment: bool,

    /// Write the terraform import script
    #[arg(long)]
    pub import_script: bool,
}

// ============================================================================
// Property
// ============================================================================

#[derive(Parser)]
pub struct PropertyArgs {
    /// Property name to export
    pub name: String,

    /// Directory generated files go into (must exist)
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub work_dir: String,
}

// ============================================================================
// Access Key
// ============================================================================

#[derive(Parser)]
pub struct AccessKeyArgs {
    /// Numeric uid of the access key
    pub uid: i64,

    /// Directory generated files go into (must exist)
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub work_dir: String,
}
