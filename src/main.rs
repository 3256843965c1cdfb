use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use seoul_explorer::geocoding::geocoder_from_config;
use seoul_explorer::logging::init_logging;
use seoul_explorer::tracking::FixedPositionProvider;
use seoul_explorer::{
    Category, Coordinates, ExplorerConfig, ExplorerError, FavoritesStore, Landmark,
    LandmarkCatalog, LocationTracker, RankedLandmark, TrackerEvent, TrackingSettings, nearest,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Discover Seoul landmarks near you")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List landmarks in catalog order
    Landmarks {
        /// Only this category (historical, landmark, shopping, modern, cultural)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show details for one landmark
    Show {
        /// Landmark id, e.g. namsan-tower
        id: String,
    },
    /// Rank landmarks by distance from a position
    Nearby {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Number of landmarks to list
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Manage favorite landmarks
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Run the location tracker at a fixed position and print its events
    Track {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// How long to track before stopping
        #[arg(long, default_value_t = 5)]
        seconds: u64,
    },
}

#[derive(Subcommand, Debug)]
enum FavoritesAction {
    List,
    Add { id: String },
    Remove { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ExplorerConfig::load_from_path(cli.config.clone())
        .context("failed to load configuration")?;
    init_logging(&config.logging, cli.verbose);

    let catalog = LandmarkCatalog::seoul()?;
    debug!(landmarks = catalog.len(), "Catalog loaded");

    match cli.command {
        Command::Landmarks { category } => handle_landmarks(&catalog, category.as_deref()),
        Command::Show { id } => handle_show(&catalog, &id),
        Command::Nearby { lat, lng, limit } => {
            let limit = limit.unwrap_or(config.display.nearby_limit as usize);
            handle_nearby(&catalog, parse_position(lat, lng)?, limit)
        }
        Command::Favorites { action } => handle_favorites(&config, &catalog, action).await,
        Command::Track { lat, lng, seconds } => {
            handle_track(&config, catalog, parse_position(lat, lng)?, seconds).await
        }
    }
}

fn parse_position(lat: f64, lng: f64) -> Result<Coordinates> {
    let coordinates = Coordinates::new(lat, lng);
    if !coordinates.is_valid() {
        return Err(ExplorerError::validation(format!(
            "coordinates out of range: {lat}, {lng}"
        ))
        .into());
    }
    Ok(coordinates)
}

fn handle_landmarks(catalog: &LandmarkCatalog, category: Option<&str>) -> Result<()> {
    let landmarks: Vec<&Arc<Landmark>> = match category {
        Some(id) => {
            let category = Category::from_id(id)
                .ok_or_else(|| ExplorerError::validation(format!("unknown category '{id}'")))?;
            catalog.by_category(category)
        }
        None => catalog.iter().collect(),
    };

    for landmark in landmarks {
        println!(
            "{:<18} {} ({}) [{}]",
            landmark.id,
            landmark.name,
            landmark.localized_name,
            landmark.category.info().name
        );
    }
    Ok(())
}

fn handle_show(catalog: &LandmarkCatalog, id: &str) -> Result<()> {
    let landmark = catalog.require(id)?;
    let info = landmark.category.info();

    println!("{} ({})", landmark.name, landmark.localized_name);
    println!("Category: {} / {}", info.name, info.localized_name);
    println!("Location: {}", landmark.coordinates.format_coordinates());
    println!();
    println!("{}", landmark.long_description.as_deref().unwrap_or(&landmark.description));

    for (label, value) in [
        ("Hours", &landmark.hours),
        ("Entrance", &landmark.entrance),
        ("Subway", &landmark.nearby_subway),
        ("Etiquette", &landmark.cultural_tips),
    ] {
        if let Some(value) = value {
            println!("{label}: {value}");
        }
    }

    if !landmark.tips.is_empty() {
        println!("Tips:");
        for tip in &landmark.tips {
            println!("  - {tip}");
        }
    }

    for section in &landmark.detail_sections {
        println!();
        println!("## {}", section.title);
        println!("{}", section.description);
    }

    println!();
    println!("Directions: {}", landmark.directions_url());
    Ok(())
}

fn print_ranked(ranked: &[RankedLandmark]) {
    for (index, entry) in ranked.iter().enumerate() {
        println!(
            "{}. {} - {}",
            index + 1,
            entry.landmark.name,
            entry.display_distance()
        );
    }
}

fn handle_nearby(catalog: &LandmarkCatalog, position: Coordinates, limit: usize) -> Result<()> {
    print_ranked(&nearest(&position, catalog, limit));
    Ok(())
}

async fn handle_favorites(
    config: &ExplorerConfig,
    catalog: &LandmarkCatalog,
    action: FavoritesAction,
) -> Result<()> {
    let path = config.favorites_path();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("failed to create favorites directory {}", path.display()))?;
    let store = FavoritesStore::open(&path)?;

    match action {
        FavoritesAction::List => {
            for id in store.list().await? {
                match catalog.get(&id) {
                    Some(landmark) => println!("{:<18} {}", id, landmark.name),
                    None => println!("{id:<18} (no longer in catalog)"),
                }
            }
        }
        FavoritesAction::Add { id } => {
            let landmark = catalog.require(&id)?;
            if store.add(&id).await? {
                println!("Added {} to favorites", landmark.name);
            } else {
                println!("{} is already a favorite", landmark.name);
            }
        }
        FavoritesAction::Remove { id } => {
            if store.remove(&id).await? {
                println!("Removed {id} from favorites");
            } else {
                println!("{id} is not a favorite");
            }
        }
    }
    Ok(())
}

async fn handle_track(
    config: &ExplorerConfig,
    catalog: LandmarkCatalog,
    position: Coordinates,
    seconds: u64,
) -> Result<()> {
    let limit = config.display.nearby_limit as usize;
    let tracker = LocationTracker::new(
        Arc::new(FixedPositionProvider::new(position)),
        geocoder_from_config(&config.geocoding)?,
        Arc::new(catalog),
        TrackingSettings::from(&config.tracking),
    );

    let mut events = tracker.subscribe();
    tracker.start();

    let printing = async {
        loop {
            match events.recv().await {
                Ok(TrackerEvent::StatusChanged(phase)) => println!("Status: {phase}"),
                Ok(TrackerEvent::PositionAccepted(sample)) => {
                    println!("Position: {}", sample.coordinates.format_coordinates());
                }
                Ok(TrackerEvent::DistancesUpdated(ranked)) => {
                    println!("Nearby:");
                    print_ranked(&ranked[..limit.min(ranked.len())]);
                }
                Ok(TrackerEvent::LabelResolved(label)) => println!("Location: {label}"),
                Ok(TrackerEvent::AcquisitionFailed(e)) => println!("Error: {e}"),
                Ok(TrackerEvent::RetryScheduled { attempt, delay }) => {
                    println!("Retry {attempt} in {}s", delay.as_secs());
                }
                Ok(TrackerEvent::Restarting) => println!("Restarting tracking"),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Event receiver lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    };

    // Elapsed is the normal way out
    let _ = tokio::time::timeout(Duration::from_secs(seconds), printing).await;
    tracker.stop();
    println!("Showing: {}", tracker.display_label());
    Ok(())
}
