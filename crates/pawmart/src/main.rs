mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

use pawmart_core::{Marketplace, Notice, NoticeLevel, OperationEvent};

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "pawmart", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the marketplace API
        cmd => {
            let client_config = config::build_client_config(&cli.global)?;
            let market = Marketplace::new(client_config)?;
            let mut events = market.notifications();

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &market, &cli.global).await;
            drain_notices(&mut events, &cli.global);
            result
        }
    }
}

/// Show the success banners raised while the command ran. Failures are
/// reported through the returned error instead.
fn drain_notices(events: &mut broadcast::Receiver<OperationEvent>, global: &GlobalOpts) {
    let color = output::should_color(&global.color);
    while let Ok(event) = events.try_recv() {
        let Some(notice) = Notice::from_event(&event) else {
            continue;
        };
        if notice.level == NoticeLevel::Success && !global.quiet {
            eprintln!("{}", output::format_notice(&notice, color));
        }
    }
}
