//! Product command handlers.

use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Products};

use crate::cli::{GlobalOpts, ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Stock")]
    stock: String,
}

impl From<&Record> for ProductRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Products::ID_FIELD)),
            name: util::cell(r.text("name")),
            category: util::cell(r.text("category")),
            price: util::cell(r.text("price")),
            stock: util::cell(r.text("stock")),
        }
    }
}

fn id_of(r: &Record) -> String {
    r.text(Products::ID_FIELD).unwrap_or_default()
}

pub async fn handle(
    market: &Marketplace,
    args: ProductsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let products = market.products();
    match args.command {
        ProductsCommand::List { seller, list } => {
            let query = util::list_query(&list)?;
            let outcome = match seller {
                Some(seller) => products.fetch_by_seller(&util::entity_id(&seller)).await?,
                None => products.fetch_all().await?,
            };
            util::fulfilled(outcome)?;
            let page = products.query(&query);
            let out = output::render_page(&global.output, &page, |r| ProductRow::from(r), id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ProductsCommand::Show { id } => {
            let record = util::fulfilled(products.fetch_one(&util::entity_id(&id)).await?)?
                .ok_or_else(|| CliError::NotFound {
                    message: format!("product '{id}' not found"),
                })?;
            let out = output::render_single(&global.output, &record, output::record_detail, id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
