use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

const DEFAULT_DB: &str = "waymark.db";

#[derive(Parser, Debug)]
#[command(
    name = "waymark",
    about = "Log running and cycling workouts at map coordinates and list them back"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Option<Cmd>,

    /// SQLite file holding the workout snapshot.
    ///
    /// Default: ./waymark.db
    #[arg(long, default_value = DEFAULT_DB, global = true)]
    pub db: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Record a running workout at the given map point.
    Run {
        /// Latitude of the map point.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the map point.
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Distance in kilometers.
        #[arg(long)]
        distance: f64,

        /// Duration in minutes.
        #[arg(long)]
        duration: f64,

        /// Cadence in steps per minute.
        #[arg(long)]
        cadence: f64,
    },

    /// Record a cycling workout at the given map point.
    Ride {
        /// Latitude of the map point.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the map point.
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Distance in kilometers.
        #[arg(long)]
        distance: f64,

        /// Duration in minutes.
        #[arg(long)]
        duration: f64,

        /// Elevation gain in meters.
        #[arg(long)]
        elevation: f64,
    },

    /// Center the map on a previously recorded workout.
    Locate {
        /// Workout id as printed in the list.
        id: Uuid,
    },
}
