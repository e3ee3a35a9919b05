//! Pet command handlers.

use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Pets};

use crate::cli::{GlobalOpts, PetsArgs, PetsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PetRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Species")]
    species: String,
    #[tabled(rename = "Breed")]
    breed: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Record> for PetRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Pets::ID_FIELD)),
            name: util::cell(r.text("name")),
            species: util::cell(r.text("species")),
            breed: util::cell(r.text("breed")),
            age: util::cell(r.text("age")),
            price: util::cell(r.text("price")),
            status: util::cell(r.text("status")),
        }
    }
}

fn id_of(r: &Record) -> String {
    r.text(Pets::ID_FIELD).unwrap_or_default()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    market: &Marketplace,
    args: PetsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let pets = market.pets();
    match args.command {
        PetsCommand::List { mine, list } => {
            let query = util::list_query(&list)?;
            let outcome = if mine {
                pets.fetch_mine().await?
            } else {
                pets.fetch_all().await?
            };
            util::fulfilled(outcome)?;
            let page = pets.query(&query);
            let out = output::render_page(&global.output, &page, |r| PetRow::from(r), id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Show { id } => {
            let record = util::fulfilled(pets.fetch_one(&util::entity_id(&id)).await?)?;
            let record = record.ok_or_else(|| CliError::NotFound {
                message: format!("pet '{id}' not found"),
            })?;
            let out = output::render_single(&global.output, &record, output::record_detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PetsCommand::Create(payload) => {
            let body = util::payload_body(&payload)?;
            let created = util::fulfilled(pets.create(body).await?)?;
            if let Some(record) = created {
                let out =
                    output::render_single(&global.output, &record, output::record_detail, id_of)?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        PetsCommand::Adopt { id } => {
            if !util::confirm(&format!("Adopt pet '{id}'?"), global.yes)? {
                return Ok(());
            }
            util::fulfilled(pets.adopt(&util::entity_id(&id)).await?)?;
            Ok(())
        }

        PetsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete pet '{id}'? This is destructive."),
                global.yes,
            )? {
                return Ok(());
            }
            util::fulfilled(pets.delete(&util::entity_id(&id)).await?)?;
            Ok(())
        }
    }
}
