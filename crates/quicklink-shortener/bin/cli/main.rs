mod cli;

use crate::cli::{Command, LogFormatArg, CLI};
use anyhow::Context;
use clap::Parser;
use quicklink_shortener::{SeqGenerator, Shortener, ShortenerService};
use quicklink_storage::FileRepository;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::parse();
    init_tracing(config.log_format);

    info!(
        store = %config.store.display(),
        namespace = %config.namespace,
        "starting quicklink"
    );

    let repository = FileRepository::open(&config.store)
        .await
        .with_context(|| format!("failed to open {}", config.store.display()))?;
    let generator = SeqGenerator::with_namespace(config.namespace.as_str());
    let service = ShortenerService::new(repository, generator).await?;
    debug!(next = service.generator().peek(), "counter restored");

    run(&service, &config.command).await
}

fn init_tracing(format: LogFormatArg) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}

async fn run(service: &impl Shortener, command: &Command) -> anyhow::Result<()> {
    match command {
        Command::Shorten { url } => match service.shorten(url).await {
            Ok(key) => println!("{key}"),
            Err(err) => {
                // The key stays assigned for this process even if the rewrite failed.
                if let Some(key) = err.assigned_key() {
                    println!("{key}");
                }
                return Err(err.into());
            }
        },
        Command::Resolve { key } => println!("{}", service.resolve(key).await?),
        Command::List { json } => {
            let entries = service.list().await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for entry in entries {
                    println!("{} -> {}", entry.short_key, entry.original_url);
                }
            }
        }
    }

    Ok(())
}
