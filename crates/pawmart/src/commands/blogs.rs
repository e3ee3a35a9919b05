//! Blog command handlers.

use tabled::Tabled;

use pawmart_core::{Marketplace, Record, Resource, entity::Blogs};

use crate::cli::{BlogsArgs, BlogsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct BlogRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Author")]
    author: String,
    #[tabled(rename = "Published")]
    published: String,
}

impl From<&Record> for BlogRow {
    fn from(r: &Record) -> Self {
        Self {
            id: util::cell(r.text(Blogs::ID_FIELD)),
            title: util::cell(r.text("title")),
            author: util::cell(r.text("author")),
            published: util::cell(r.text("createdAt")),
        }
    }
}

pub async fn handle(
    market: &Marketplace,
    args: BlogsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let blogs = market.blogs();
    match args.command {
        BlogsCommand::List(list) => {
            let query = util::list_query(&list)?.search_in(&["title", "content"]);
            util::fulfilled(blogs.fetch_all().await?)?;
            let page = blogs.query(&query);
            let out = output::render_page(&global.output, &page, |r| BlogRow::from(r), |r| {
                r.text(Blogs::ID_FIELD).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
