//! Cart and checkout command handlers.

use serde_json::json;
use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Cart};

use crate::cli::{CartArgs, CartCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct CartRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Product")]
    product: String,
    #[tabled(rename = "Qty")]
    quantity: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&Record> for CartRow {
    fn from(r: &Record) -> Self {
        let product = r
            .text("name")
            .or_else(|| r.text("productName"))
            .or_else(|| r.text("productId"));
        Self {
            id: util::cell(r.text(Cart::ID_FIELD)),
            product: util::cell(product),
            quantity: util::cell(r.text("quantity")),
            price: util::cell(r.text("price")),
        }
    }
}

fn id_of(r: &Record) -> String {
    r.text(Cart::ID_FIELD).unwrap_or_default()
}

pub async fn handle(
    market: &Marketplace,
    args: CartArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let cart = market.cart();
    match args.command {
        CartCommand::List => {
            util::fulfilled(cart.fetch_all().await?)?;
            let items = cart.items();
            let out = output::render_list(&global.output, &items, |r| CartRow::from(r), id_of)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        CartCommand::Add { product, quantity } => {
            validate_quantity(quantity)?;
            util::fulfilled(cart.add_item(&util::entity_id(&product), quantity).await?)?;
            Ok(())
        }

        CartCommand::Set { item, quantity } => {
            validate_quantity(quantity)?;
            util::fulfilled(cart.set_quantity(&util::entity_id(&item), quantity).await?)?;
            Ok(())
        }

        CartCommand::Remove { item } => {
            util::fulfilled(cart.remove_item(&util::entity_id(&item)).await?)?;
            Ok(())
        }

        CartCommand::Clear => {
            if !util::confirm("Remove every item from the cart?", global.yes)? {
                return Ok(());
            }
            util::fulfilled(cart.clear().await?)?;
            Ok(())
        }

        CartCommand::Checkout { address, from_file } => {
            let body = match (from_file, address) {
                (Some(path), _) => util::read_json_file(&path)?,
                (None, Some(address)) => json!({ "shippingAddress": address }),
                (None, None) => json!({}),
            };
            let order = util::fulfilled(cart.checkout(body).await?)?;
            if let Some(order) = order {
                let out = output::render_single(
                    &global.output,
                    &order,
                    output::record_detail,
                    |o: &Record| o.text("_id").unwrap_or_default(),
                )?;
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }
    }
}

fn validate_quantity(quantity: u32) -> Result<(), CliError> {
    if quantity == 0 {
        return Err(CliError::Validation {
            field: "quantity".into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(())
}
