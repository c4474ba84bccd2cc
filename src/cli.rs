//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// travelpack - create and edit travel packages
#[derive(Debug, Parser)]
#[command(
    name = "travelpack",
    about = "Create and edit travel packages and their itineraries",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List destinations
    Destinations,

    /// List the places of a destination
    Places {
        #[arg(short, long)]
        destination: i64,
    },

    /// Show a package and its itinerary
    Show {
        #[arg(short, long)]
        package: i64,
    },

    /// Create a new package
    Create(PackageFields),

    /// Edit an existing package
    Edit {
        #[arg(short, long)]
        package: i64,

        #[command(flatten)]
        fields: PackageFields,
    },
}

/// Form fields; anything left out keeps its current value
#[derive(Debug, Args)]
pub struct PackageFields {
    #[arg(short, long)]
    pub destination: Option<i64>,

    #[arg(short, long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// Number of days; defaults to the number of --day values for new packages
    #[arg(long)]
    pub duration: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    #[arg(long)]
    pub image_url: Option<String>,

    /// Itinerary text, one per day in order
    #[arg(long = "day", value_name = "TEXT")]
    pub days: Vec<String>,

    /// Toggle a place in the selection
    #[arg(long = "place", value_name = "ID")]
    pub places: Vec<i64>,
}
