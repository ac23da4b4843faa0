use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atelier_core::catalog;
use atelier_core::directory;
use atelier_core::geo;
use atelier_core::location::{self, FixedLocation};
use atelier_core::models::{Coordinates, Product};
use atelier_core::providers::{
    CatalogProvider, GenerativeVision, HostedImageUploader, RestCatalogProvider, VisionAnalyzer,
};
use atelier_core::{Config, FavoritesStore, FilterSpec, Recognizer, SortKey};
use atelier_store::FileSlotStore;

#[derive(Parser)]
#[command(name = "atelier")]
#[command(version, about = "Art-supply catalog browser with AI product recognition", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Browse the catalog with filters and sorting
    Browse {
        /// Only this brand
        #[arg(long)]
        brand: Option<String>,
        /// Free-text match over name and brand
        #[arg(long)]
        query: Option<String>,
        /// Only products with an active deal
        #[arg(long)]
        on_sale: bool,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        /// default | price-asc | price-desc | reviews
        #[arg(long, default_value = "default")]
        sort: String,
    },
    /// Show one product with its feedback summary
    Show {
        /// Product id
        id: String,
    },
    /// Manage favorited products
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },
    /// Find stores, nearest first
    Stores {
        /// Latitude to search from; needs --lon
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        /// Longitude to search from; needs --lat
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
        /// Search radius in km
        #[arg(long)]
        radius: Option<f64>,
        /// Only stores stocking this product id
        #[arg(long)]
        product: Option<String>,
    },
    /// Recognize a product from a photo
    Recognize {
        /// Path to a local image file
        image: PathBuf,
    },
    /// AI suggestions based on your favorites
    Suggest,
}

#[derive(clap::Subcommand)]
enum FavAction {
    /// Favorite a product by id
    Add { id: String },
    /// Unfavorite a product by id
    Remove { id: String },
    /// List favorites in the order they were added
    List,
    /// Is this product favorited?
    Check { id: String },
    /// Forget all favorites
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging - helps when things go sideways
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atelier=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;
    let provider =
        RestCatalogProvider::with_timeout(&config.catalog.base_url, config.catalog.timeout_secs);

    match cli.command {
        Commands::Browse {
            brand,
            query,
            on_sale,
            min_price,
            max_price,
            sort,
        } => {
            let sort_key = SortKey::parse(&sort)
                .with_context(|| format!("Unknown sort key: {}", sort))?;

            let spec = FilterSpec {
                brand,
                text: query.unwrap_or_default(),
                on_sale_only: on_sale,
                min_price: min_price.unwrap_or(0.0),
                max_price: max_price.unwrap_or(f64::INFINITY),
            };

            let products = provider.list_products().await?;
            let filtered = catalog::filter(&products, &spec);
            let sorted = catalog::sort(&filtered, sort_key);

            if sorted.is_empty() {
                println!("No products match.");
            }
            for product in &sorted {
                print_product_line(product);
            }
        }
        Commands::Show { id } => {
            let product = provider.get_product(&id).await?;
            println!("{} - {}", product.art_name, product.brand);
            if let Some(category) = &product.category {
                println!("  category: {}", category);
            }
            if product.is_on_sale() {
                println!(
                    "  price: ${:.2} (deal: ${:.2})",
                    product.price,
                    product.discounted_price()
                );
            } else {
                println!("  price: ${:.2}", product.price);
            }
            println!(
                "  rating: {:.1} across {} reviews",
                product.average_rating(),
                product.review_count()
            );
            for feedback in &product.feedbacks {
                println!(
                    "  [{:.0}/5] {}: {}",
                    feedback.rating, feedback.author, feedback.comment
                );
            }
        }
        Commands::Fav { action } => {
            let favorites = FavoritesStore::new(FileSlotStore::new(Config::data_dir()?));

            match action {
                FavAction::Add { id } => {
                    let product = provider.get_product(&id).await?;
                    let name = product.art_name.clone();
                    let all = favorites.add(product).await;
                    println!("Favorited {} ({} total)", name, all.len());
                }
                FavAction::Remove { id } => {
                    let all = favorites.remove(&id).await;
                    println!("Removed {} ({} remaining)", id, all.len());
                }
                FavAction::List => {
                    let all = favorites.get_all().await;
                    if all.is_empty() {
                        println!("No favorites yet.");
                    }
                    for product in &all {
                        print_product_line(product);
                    }
                }
                FavAction::Check { id } => {
                    println!("{}", favorites.contains(&id).await);
                }
                FavAction::Clear => {
                    favorites.clear().await;
                    println!("Favorites cleared.");
                }
            }
        }
        Commands::Stores {
            lat,
            lon,
            radius,
            product,
        } => {
            let stores = directory::builtin_stores();

            if let Some(product_id) = product {
                for store in geo::stores_with_product(&stores, &product_id) {
                    println!("{} - {} ({})", store.name, store.address, store.phone);
                }
                return Ok(());
            }

            // Explicit coordinates win; otherwise ask the location
            // provider, falling back to the configured default
            let fallback = Coordinates {
                latitude: config.location.default_latitude,
                longitude: config.location.default_longitude,
            };
            // clap enforces that --lat and --lon come as a pair
            let here = match (lat, lon) {
                (Some(latitude), Some(longitude)) => Coordinates {
                    latitude,
                    longitude,
                },
                // No GPS integration on a terminal; the fixed provider
                // stands in for the device location collaborator
                _ => {
                    let provider = FixedLocation::new(fallback.latitude, fallback.longitude);
                    location::locate_or_default(&provider, fallback).await
                }
            };
            let radius_km = radius.unwrap_or(config.stores.radius_km);

            let nearby = geo::nearby_stores(&stores, here.latitude, here.longitude, radius_km);
            if nearby.is_empty() {
                println!("No stores within {:.0} km.", radius_km);
            }
            for store in &nearby {
                println!(
                    "{:>8}  {} - {}",
                    geo::format_distance(store.distance),
                    store.name,
                    store.address
                );
            }
        }
        Commands::Recognize { image } => {
            let api_key = config
                .vision
                .api_key
                .clone()
                .context("vision.api_key is not configured")?;
            let cloud_name = config.media.cloud_name.clone().unwrap_or_default();
            let upload_preset = config.media.upload_preset.clone().unwrap_or_default();

            let recognizer = Recognizer::new(
                Box::new(HostedImageUploader::new(cloud_name, upload_preset)),
                Box::new(GenerativeVision::new(
                    api_key,
                    Some(config.vision.model.clone()),
                )),
            );

            tracing::info!("Analyzing {}", image.display());
            let candidates = provider.list_products().await?;
            let report = recognizer.recognize(&image, &candidates).await?;

            let result = &report.result;
            println!(
                "{} by {} ({:.0}% confident)",
                result.product_name,
                result.brand,
                result.confidence * 100.0
            );
            if !result.visual_tags.is_empty() {
                println!("  tags: {}", result.visual_tags.join(", "));
            }
            for similar in &result.similar_products {
                println!(
                    "  similar: #{} ({:.0}%) - {}",
                    similar.id,
                    similar.similarity * 100.0,
                    similar.reason
                );
            }
        }
        Commands::Suggest => {
            let api_key = config
                .vision
                .api_key
                .clone()
                .context("vision.api_key is not configured")?;

            let favorites = FavoritesStore::new(FileSlotStore::new(Config::data_dir()?));
            let favorite_products: Vec<Product> = favorites.get_all().await;

            let vision = GenerativeVision::new(api_key, Some(config.vision.model.clone()));
            let suggestions = vision.suggest(&favorite_products).await?;
            println!("{}", suggestions);
        }
    }

    Ok(())
}

fn print_product_line(product: &Product) {
    let deal = if product.is_on_sale() {
        format!(" [-{:.0}%]", product.limited_time_deal * 100.0)
    } else {
        String::new()
    };
    println!(
        "{:>4}  {} - {}  ${:.2}{}",
        product.id, product.art_name, product.brand, product.price, deal
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stores_rejects_half_specified_coordinates() {
        assert!(Cli::try_parse_from(["atelier", "stores", "--lat", "10.8"]).is_err());
        assert!(Cli::try_parse_from(["atelier", "stores", "--lon", "106.7"]).is_err());

        assert!(
            Cli::try_parse_from(["atelier", "stores", "--lat", "10.8", "--lon", "106.7"]).is_ok()
        );
        assert!(Cli::try_parse_from(["atelier", "stores"]).is_ok());
    }
}
