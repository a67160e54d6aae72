use crate::core::car::CarPars;
use crate::core::driver::DriverPars;
use crate::core::race::RacePars;
use crate::core::track::TrackPars;
use anyhow::Context;
use helpers::general::InputValueError;
use helpers::geometry::Point2d;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// GamePars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct GamePars {
    pub track_pars: TrackPars,
    pub car_pars: CarPars,
    pub race_pars: RacePars,
    pub driver_pars: DriverPars,
}

#[derive(Debug, Deserialize)]
struct TrackCsvRow {
    x_m: f64,
    y_m: f64,
}

/// read_game_pars reads the JSON file and decodes the JSON string into the game parameters
/// struct.
pub fn read_game_pars(filepath: &Path) -> anyhow::Result<GamePars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}

/// read_track_csv reads the centerline waypoints of a track from a CSV file with the columns x_m
/// and y_m.
pub fn read_track_csv(filepath: &Path) -> anyhow::Result<Vec<Point2d>> {
    let mut reader = csv::Reader::from_path(filepath).context(format!(
        "Failed to open track file {}!",
        filepath.display()
    ))?;

    let mut waypoints = vec![];

    for (i, row) in reader.deserialize::<TrackCsvRow>().enumerate() {
        let row = row.context(format!(
            "Failed to parse row {} of track file {}!",
            i + 1,
            filepath.display()
        ))?;
        waypoints.push(Point2d::new(row.x_m, row.y_m));
    }

    if waypoints.is_empty() {
        return Err(InputValueError).context(format!(
            "Track file {} does not contain any waypoints!",
            filepath.display()
        ));
    }

    Ok(waypoints)
}
