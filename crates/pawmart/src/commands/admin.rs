//! Admin dashboard handlers.

use pawmart_core::Marketplace;

use crate::cli::{AdminArgs, AdminCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    market: &Marketplace,
    args: AdminArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let admin = market.admin();
    match args.command {
        AdminCommand::Dashboard { summary } => {
            let outcome = if summary {
                admin.fetch_summary().await?
            } else {
                admin.fetch_dashboard().await?
            };
            let aggregate = util::fulfilled(outcome)?.ok_or_else(|| CliError::ApiError {
                code: "empty".into(),
                message: "the server returned no dashboard data".into(),
            })?;
            let out = output::render_single(
                &global.output,
                &aggregate,
                output::record_detail,
                |_| "dashboard".into(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
