//! CLI command implementations

use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use shellmarket_core::ShellmarketConfig;
use shellmarket_feed::{
    AuctionFilters, AuctionItem, DemoProvider, FeedController, FetchOutcome, ImageCarousel,
};
use tracing::{debug, info};

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the auction feed and print it
    Browse {
        /// Number of pages to load (one search plus continuations)
        #[arg(short, long, default_value = "1")]
        pages: u32,
        /// Show only auctions currently open for bidding
        #[arg(long)]
        in_progress: bool,
        /// Turtle gender filter
        #[arg(long)]
        gender: Option<String>,
        /// Minimum starting bid
        #[arg(long)]
        min_price: Option<f64>,
        /// Maximum starting bid
        #[arg(long)]
        max_price: Option<f64>,
        /// Minimum turtle size
        #[arg(long)]
        min_size: Option<f64>,
        /// Maximum turtle size
        #[arg(long)]
        max_size: Option<f64>,
        /// Extra filter forwarded as-is, in key=value form
        #[arg(long = "filter", value_parser = parse_filter)]
        filters: Vec<(String, String)>,
        /// Use demo data instead of the listing API
        #[arg(long)]
        demo: bool,
    },
    /// Print the effective configuration
    Config,
}

/// Handle the CLI command
///
/// # Errors
/// Returns the failing configuration or feed error
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Browse {
            pages,
            in_progress,
            gender,
            min_price,
            max_price,
            min_size,
            max_size,
            filters,
            demo,
        } => {
            let mut query = AuctionFilters::new();
            if let Some(gender) = gender {
                query = query.gender(&gender);
            }
            if let Some(price) = min_price {
                query = query.min_price(price);
            }
            if let Some(price) = max_price {
                query = query.max_price(price);
            }
            if let Some(size) = min_size {
                query = query.min_size(size);
            }
            if let Some(size) = max_size {
                query = query.max_size(size);
            }
            for (key, value) in filters {
                query.insert(key, value);
            }

            browse(pages, in_progress, &query, demo).await
        }
        Commands::Config => show_config(),
    }
}

/// Run one search plus continuations and print the visible feed
///
/// # Errors
/// - Configuration is invalid
/// - Any page fetch fails
pub async fn browse(
    pages: u32,
    in_progress: bool,
    filters: &AuctionFilters,
    demo: bool,
) -> anyhow::Result<()> {
    let config = validated(ShellmarketConfig::from_env())?;
    info!(pages, in_progress, demo, "Browsing auction feed");

    let controller = if demo {
        println!("Using demo auction data");
        FeedController::new(
            Arc::new(DemoProvider::new(23, config.feed.page_size)),
            config.feed.clone(),
        )
    } else {
        FeedController::from_config(&config).context("failed to set up listing client")?
    };

    controller
        .search(filters)
        .await
        .context("auction search failed")?;

    for _ in 1..pages {
        let outcome = controller
            .load_more(filters)
            .await
            .context("loading more auctions failed")?;
        if outcome == FetchOutcome::Exhausted {
            debug!("No more auction pages");
            break;
        }
    }

    controller.set_progress_filter(in_progress).await;

    let visible = controller.visible().await;
    let heading = if in_progress {
        "Auctions in progress"
    } else {
        "All auctions"
    };
    println!("{heading} ({})", visible.len());
    println!("{:-<72}", "");

    if visible.is_empty() {
        println!("No auctions match these filters.");
    }
    for item in visible.iter() {
        println!("{}", format_item(item));
    }

    Ok(())
}

/// Print the configuration after environment overrides
///
/// # Errors
/// - Configuration fails validation
pub fn show_config() -> anyhow::Result<()> {
    let config = validated(ShellmarketConfig::from_env())?;

    println!("Listing URL:  {}", config.api.listing_url()?);
    println!("Timeout:      {:?}", config.api.timeout);
    println!(
        "Auth token:   {}",
        if config.api.access_token.is_some() { "set" } else { "not set" }
    );
    println!("Page size:    {}", config.feed.page_size);
    println!("First page:   {}", config.feed.first_page);

    Ok(())
}

/// Rejects an unusable configuration with a message fit for the terminal.
fn validated(config: ShellmarketConfig) -> anyhow::Result<ShellmarketConfig> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    Ok(config)
}

fn format_item(item: &AuctionItem) -> String {
    let title = item.title.as_deref().unwrap_or("(untitled)");
    let price = item
        .current_price()
        .map_or_else(|| "-".to_string(), |p| format!("{p:.0}"));
    let photos = ImageCarousel::new(item.image_addresses.clone());
    let cover = photos.current().unwrap_or("no photo");

    format!(
        "#{:<6} {:<16} {:<28} {:>10}  {} ({}/{})",
        item.id,
        item.progress.as_str(),
        title,
        price,
        cover,
        photos.position(),
        photos.len()
    )
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty filter key in '{raw}'"));
    }
    if key == "page" {
        return Err("'page' is controlled by the feed, not a filter".to_string());
    }

    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use shellmarket_feed::AuctionProgress;

    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("species=slider"),
            Ok(("species".to_string(), "slider".to_string()))
        );
        assert_eq!(
            parse_filter(" region = Busan "),
            Ok(("region".to_string(), "Busan".to_string()))
        );
        assert!(parse_filter("novalue").is_err());
        assert!(parse_filter("=x").is_err());
        assert!(parse_filter("page=2").is_err());
    }

    #[test]
    fn test_invalid_config_reports_user_message() {
        let mut config = ShellmarketConfig::default();
        config.feed.page_size = 0;

        let error = validated(config).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid configuration: page size must be at least 1"
        );

        assert!(validated(ShellmarketConfig::default()).is_ok());
    }

    #[test]
    fn test_format_item_falls_back_for_missing_payload() {
        let line = format_item(&AuctionItem::new(42, AuctionProgress::DuringAuction));

        assert!(line.contains("#42"));
        assert!(line.contains("DURING_AUCTION"));
        assert!(line.contains("(untitled)"));
        assert!(line.contains("no photo (0/0)"));
    }
}
