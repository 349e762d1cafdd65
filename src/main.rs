#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::Parser;
use waymark::render::{ListSurface, MapSurface, TermList, TermMap};
use waymark::storage::SqliteStore;
use waymark::store::WorkoutStore;
use waymark::workout::{GeoPoint, KindTag};
use waymark::{cli, utils};

#[macro_use]
extern crate waymark;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let storage = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening workout storage: {}", cli.db.display()))?;
    let mut store = WorkoutStore::open(storage);
    dlog!("store ready workouts={}", store.all().len());

    let mut map = TermMap;
    let mut list = TermList;

    // Replay the restored collection onto both surfaces, oldest first.
    for w in store.all() {
        map.place_marker(w);
        list.append_entry(w);
    }

    match cli.cmd {
        Some(cli::Cmd::Run {
            lat,
            lng,
            distance,
            duration,
            cadence,
        }) => {
            let w = store
                .add_workout(
                    KindTag::Running,
                    GeoPoint { lat, lng },
                    distance,
                    duration,
                    cadence,
                )
                .context("workout rejected; nothing was recorded")?;
            map.place_marker(w);
            map.center_on(w.location);
            list.append_entry(w);
        }
        Some(cli::Cmd::Ride {
            lat,
            lng,
            distance,
            duration,
            elevation,
        }) => {
            let w = store
                .add_workout(
                    KindTag::Cycling,
                    GeoPoint { lat, lng },
                    distance,
                    duration,
                    elevation,
                )
                .context("workout rejected; nothing was recorded")?;
            map.place_marker(w);
            map.center_on(w.location);
            list.append_entry(w);
        }
        Some(cli::Cmd::Locate { id }) => {
            let Some(w) = store.find_by_id(id) else {
                anyhow::bail!("no workout with id {id}");
            };
            dlog!("locate id={id}");
            map.center_on(w.location);
        }
        None => {
            if store.all().is_empty() {
                tracing::info!("no workouts recorded yet");
            }
        }
    }

    Ok(())
}
