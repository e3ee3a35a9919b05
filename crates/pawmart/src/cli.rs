//! Clap derive structures for the `pawmart` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// pawmart -- browse and manage the PawMart pet marketplace
#[derive(Debug, Parser)]
#[command(
    name = "pawmart",
    version,
    about = "Browse and manage the PawMart pet marketplace from the command line",
    long_about = "A CLI client for the PawMart marketplace: pets, products, cart,\n\
        orders, vet appointments, blogs and adoption applications.\n\n\
        The session from `pawmart login` is kept between invocations.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "PAWMART_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "PAWMART_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PAWMART_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "PAWMART_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Directory for persisted session state (overrides profile)
    #[arg(long, env = "PAWMART_STATE_DIR", global = true, hide_env = true)]
    pub state_dir: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login(LoginArgs),

    /// End the session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Browse, adopt and manage pets
    #[command(alias = "pet")]
    Pets(PetsArgs),

    /// Browse products
    #[command(alias = "product")]
    Products(ProductsArgs),

    /// Manage the shopping cart
    Cart(CartArgs),

    /// View and cancel orders
    #[command(alias = "order")]
    Orders(OrdersArgs),

    /// Book and manage vet appointments
    #[command(alias = "appt")]
    Appointments(AppointmentsArgs),

    /// Read blog posts
    Blogs(BlogsArgs),

    /// Review adoption applications
    #[command(alias = "apps")]
    Applications(ApplicationsArgs),

    /// Administrator views
    Admin(AdminArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Client-side search, filtering and pagination for list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive search over name/title
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Field filter, repeatable (e.g. --filter species=dog)
    #[arg(long, short = 'f', value_name = "FIELD=VALUE")]
    pub filter: Vec<String>,

    /// Sort by field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page number (1-based)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Results per page
    #[arg(long, short = 'l', default_value = "25")]
    pub limit: usize,
}

/// JSON input for create-style commands.
#[derive(Debug, Args)]
pub struct PayloadArgs {
    /// Read the request body from a JSON file
    #[arg(long, short = 'F', value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Image to upload alongside (sends multipart)
    #[arg(long, value_name = "PATH")]
    pub image: Option<PathBuf>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Account email (prompted when omitted)
    #[arg(long, short = 'e', env = "PAWMART_EMAIL")]
    pub email: Option<String>,

    /// Account password (prompted when omitted)
    #[arg(long, env = "PAWMART_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PETS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PetsArgs {
    #[command(subcommand)]
    pub command: PetsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PetsCommand {
    /// List pets
    #[command(alias = "ls")]
    List {
        /// Only pets listed by the signed-in user
        #[arg(long)]
        mine: bool,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one pet
    Show {
        /// Pet ID
        id: String,
    },

    /// List a pet for adoption or sale
    Create(PayloadArgs),

    /// Adopt a pet
    Adopt {
        /// Pet ID
        id: String,
    },

    /// Delete a pet listing
    #[command(alias = "rm")]
    Delete {
        /// Pet ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRODUCTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ProductsCommand {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Only products from this seller
        #[arg(long)]
        seller: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Show one product
    Show {
        /// Product ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CART
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show the cart
    #[command(alias = "ls")]
    List,

    /// Add a product to the cart
    Add {
        /// Product ID
        product: String,

        /// Quantity
        #[arg(long, short = 'n', default_value = "1")]
        quantity: u32,
    },

    /// Change the quantity of a cart item
    Set {
        /// Cart item ID
        item: String,

        /// New quantity
        quantity: u32,
    },

    /// Remove an item from the cart
    #[command(alias = "rm")]
    Remove {
        /// Cart item ID
        item: String,
    },

    /// Empty the cart
    Clear,

    /// Place an order for the cart's contents
    Checkout {
        /// Shipping address
        #[arg(long)]
        address: Option<String>,

        /// Read the order body from a JSON file
        #[arg(long, short = 'F', value_name = "PATH", conflicts_with = "address")]
        from_file: Option<PathBuf>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ORDERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrdersCommand {
    /// List orders
    #[command(alias = "ls")]
    List {
        /// Only the signed-in user's orders
        #[arg(long)]
        mine: bool,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Cancel an order
    Cancel {
        /// Order ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPOINTMENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AppointmentsArgs {
    #[command(subcommand)]
    pub command: AppointmentsCommand,
}

#[derive(Debug, Subcommand)]
pub enum AppointmentsCommand {
    /// List appointments
    #[command(alias = "ls")]
    List {
        /// Only this vet's schedule
        #[arg(long)]
        vet: Option<String>,

        #[command(flatten)]
        list: ListArgs,
    },

    /// Book an appointment
    Book {
        /// Vet ID
        #[arg(long)]
        vet: String,

        /// Pet ID
        #[arg(long)]
        pet: Option<String>,

        /// Date and time (as the server expects it, e.g. 2026-11-02T10:00)
        #[arg(long)]
        date: String,

        /// Reason for the visit
        #[arg(long)]
        reason: Option<String>,
    },

    /// Cancel an appointment
    Cancel {
        /// Appointment ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BLOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BlogsArgs {
    #[command(subcommand)]
    pub command: BlogsCommand,
}

#[derive(Debug, Subcommand)]
pub enum BlogsCommand {
    /// List blog posts
    #[command(alias = "ls")]
    List(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  APPLICATIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ApplicationsArgs {
    #[command(subcommand)]
    pub command: ApplicationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ApplicationsCommand {
    /// List adoption applications
    #[command(alias = "ls")]
    List(ListArgs),

    /// Approve an application
    Approve {
        /// Application ID
        id: String,
    },

    /// Reject an application
    Reject {
        /// Application ID
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  ADMIN
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Debug, Subcommand)]
pub enum AdminCommand {
    /// Show the admin dashboard
    Dashboard {
        /// Show the marketplace summary instead
        #[arg(long)]
        summary: bool,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration
    Show,

    /// Print the config file and state directory locations
    Path,

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
