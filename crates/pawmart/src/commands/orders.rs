//! Order command handlers.

use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Orders};

use crate::cli::{GlobalOpts, OrdersArgs, OrdersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Placed")]
    placed: String,
}

impl From<&Record> for OrderRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Orders::ID_FIELD)),
            status: util::cell(r.text("status")),
            total: util::cell(r.text("totalAmount").or_else(|| r.text("total"))),
            placed: util::cell(r.text("createdAt")),
        }
    }
}

fn id_of(r: &Record) -> String {
    r.text(Orders::ID_FIELD).unwrap_or_default()
}

pub async fn handle(
    market: &Marketplace,
    args: OrdersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let orders = market.orders();
    match args.command {
        OrdersCommand::List { mine, list } => {
            let query = util::list_query(&list)?;
            let outcome = if mine {
                orders.fetch_mine().await?
            } else {
                orders.fetch_all().await?
            };
            util::fulfilled(outcome)?;
            let page = orders.query(&query);
            let out = output::render_page(&global.output, &page, |r| OrderRow::from(r), id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        OrdersCommand::Cancel { id } => {
            if !util::confirm(&format!("Cancel order '{id}'?"), global.yes)? {
                return Ok(());
            }
            util::fulfilled(orders.cancel(&util::entity_id(&id)).await?)?;
            Ok(())
        }
    }
}
