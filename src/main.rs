#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, bail};
use clap::Parser;
use ozon_product_parser::infrastructure::{ConfigSource, init_logging_with_config};
use ozon_product_parser::{ConfigManager, ParsingError, ParsingService, ProductRecord};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info};

#[derive(Parser)]
#[command(
    name = "ozon-product-parser",
    about = "Fetch an Ozon product page and print its fields as JSON",
    version
)]
struct Cli {
    /// Product SKU, e.g. 2102536131
    #[arg(
        required_unless_present_any = ["url", "html_file"],
        conflicts_with_all = ["url", "html_file"]
    )]
    sku: Option<String>,

    /// Parse this product page URL instead of building one from a SKU
    #[arg(long, conflicts_with = "html_file")]
    url: Option<String>,

    /// Parse a saved page instead of fetching
    #[arg(long, value_name = "PATH")]
    html_file: Option<PathBuf>,

    /// JSON configuration file (created with defaults if missing)
    #[arg(long, short, env = "OZON_PARSER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured log level
    #[arg(long)]
    log_level: Option<String>,

    /// Print the record on a single line
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            if let Some(hint) = e.downcast_ref::<ParsingError>().and_then(ParsingError::retry_hint) {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new()?,
    };
    let (mut config, source) = manager.load_or_create().await?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging_with_config(&config.logging)?;
    match source {
        ConfigSource::CreatedDefault => info!(
            "Created default configuration at {}",
            manager.config_path().display()
        ),
        ConfigSource::Loaded => debug!("Using configuration {}", manager.config_path().display()),
    }

    let service = ParsingService::from_config(&config)?;

    let record: ProductRecord = match (cli.sku, cli.url, cli.html_file) {
        (_, _, Some(path)) => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let html = String::from_utf8_lossy(&bytes);
            service.parse_html(&html, &path.display().to_string())?
        }
        (_, Some(url), None) => {
            url::Url::parse(&url).with_context(|| format!("Invalid URL: {}", url))?;
            service.parse_product_page(&url).await?
        }
        (Some(sku), None, None) => service.parse_by_sku(&sku).await?,
        (None, None, None) => bail!("a SKU, --url or --html-file is required"),
    };

    let json = if cli.compact {
        serde_json::to_string(&record)?
    } else {
        serde_json::to_string_pretty(&record)?
    };
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ozon-product-parser").chain(args.iter().copied()))
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn accepts_each_source_alone() {
        let cli = parse(&["2102536131"]).unwrap();
        assert_eq!(cli.sku.as_deref(), Some("2102536131"));

        let cli = parse(&["--url", "https://www.ozon.ru/product/1/"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://www.ozon.ru/product/1/"));
        assert!(cli.sku.is_none());

        let cli = parse(&["--html-file", "page.html", "--compact"]).unwrap();
        assert_eq!(cli.html_file, Some(PathBuf::from("page.html")));
        assert!(cli.compact);
    }

    #[test]
    fn requires_a_source() {
        let err = parse(&[]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        assert!(parse(&["--compact"]).is_err());
    }

    #[test]
    fn rejects_more_than_one_source() {
        for args in [
            &["123", "--url", "https://www.ozon.ru/product/1/"][..],
            &["123", "--html-file", "page.html"][..],
            &["--url", "https://www.ozon.ru/product/1/", "--html-file", "page.html"][..],
        ] {
            let err = parse(args).err().unwrap();
            assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict, "{args:?}");
        }
    }
}
