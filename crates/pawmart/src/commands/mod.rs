//! Command dispatch: bridges CLI args -> entity store operations -> output formatting.

pub mod admin;
pub mod applications;
pub mod appointments;
pub mod auth;
pub mod blogs;
pub mod cart;
pub mod config_cmd;
pub mod orders;
pub mod pets;
pub mod products;
pub mod util;

use pawmart_core::Marketplace;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    market: &Marketplace,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(market, args, global).await,
        Command::Logout => auth::logout(market).await,
        Command::Whoami => auth::whoami(market, global),
        Command::Pets(args) => pets::handle(market, args, global).await,
        Command::Products(args) => products::handle(market, args, global).await,
        Command::Cart(args) => cart::handle(market, args, global).await,
        Command::Orders(args) => orders::handle(market, args, global).await,
        Command::Appointments(args) => appointments::handle(market, args, global).await,
        Command::Blogs(args) => blogs::handle(market, args, global).await,
        Command::Applications(args) => applications::handle(market, args, global).await,
        Command::Admin(args) => admin::handle(market, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
