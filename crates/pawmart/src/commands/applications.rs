//! Adoption application command handlers.

use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Applications};

use crate::cli::{ApplicationsArgs, ApplicationsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ApplicationRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Applicant")]
    applicant: String,
    #[tabled(rename = "Pet")]
    pet: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Record> for ApplicationRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Applications::ID_FIELD)),
            applicant: util::cell(r.text("applicantName").or_else(|| r.text("email"))),
            pet: util::cell(r.text("petName").or_else(|| r.text("petId"))),
            status: util::cell(r.text("status")),
        }
    }
}

pub async fn handle(
    market: &Marketplace,
    args: ApplicationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let applications = market.applications();
    match args.command {
        ApplicationsCommand::List(list) => {
            let query =
                util::list_query(&list)?.search_in(&["applicantName", "email", "petName"]);
            util::fulfilled(applications.fetch_all().await?)?;
            let page = applications.query(&query);
            let out = output::render_page(&global.output, &page, |r| ApplicationRow::from(r), |r| {
                r.text(Applications::ID_FIELD).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ApplicationsCommand::Approve { id } => {
            util::fulfilled(applications.approve(&util::entity_id(&id)).await?)?;
            Ok(())
        }

        ApplicationsCommand::Reject { id } => {
            if !util::confirm(&format!("Reject application '{id}'?"), global.yes)? {
                return Ok(());
            }
            util::fulfilled(applications.reject(&util::entity_id(&id)).await?)?;
            Ok(())
        }
    }
}
