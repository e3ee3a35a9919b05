//! Vet appointment command handlers.

use serde_json::{Map, Value};
use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Appointments};

use crate::cli::{AppointmentsArgs, AppointmentsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct AppointmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Vet")]
    vet: String,
    #[tabled(rename = "Pet")]
    pet: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Record> for AppointmentRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Appointments::ID_FIELD)),
            date: util::cell(r.text("date")),
            vet: util::cell(r.text("vetName").or_else(|| r.text("vetId"))),
            pet: util::cell(r.text("petName").or_else(|| r.text("petId"))),
            status: util::cell(r.text("status")),
        }
    }
}

fn id_of(r: &Record) -> String {
    r.text(Appointments::ID_FIELD).unwrap_or_default()
}

pub async fn handle(
    market: &Marketplace,
    args: AppointmentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let appointments = market.appointments();
    match args.command {
        AppointmentsCommand::List { vet, list } => {
            let query = util::list_query(&list)?.search_in(&["reason", "status", "petName"]);
            let outcome = match vet {
                Some(vet) => appointments.fetch_for_vet(&util::entity_id(&vet)).await?,
                None => appointments.fetch_all().await?,
            };
            util::fulfilled(outcome)?;
            let page = appointments.query(&query);
            let out = output::render_page(&global.output, &page, |r| AppointmentRow::from(r), id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        AppointmentsCommand::Book {
            vet,
            pet,
            date,
            reason,
        } => {
            let mut body = Map::new();
            body.insert("vetId".into(), Value::String(vet));
            body.insert("date".into(), Value::String(date));
            if let Some(pet) = pet {
                body.insert("petId".into(), Value::String(pet));
            }
            if let Some(reason) = reason {
                body.insert("reason".into(), Value::String(reason));
            }
            let booked = util::fulfilled(appointments.create(Value::Object(body)).await?)?;
            if let Some(record) = booked {
                let out =
                    output::render_single(&global.output, &record, output::record_detail, id_of)?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        AppointmentsCommand::Cancel { id } => {
            if !util::confirm(&format!("Cancel appointment '{id}'?"), global.yes)? {
                return Ok(());
            }
            util::fulfilled(appointments.cancel(&util::entity_id(&id)).await?)?;
            Ok(())
        }
    }
}
