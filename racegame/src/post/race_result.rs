use std::fmt::Write;

/// RaceOutcome contains the way a race attempt ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceOutcome {
    Finished { lap_time: f64, is_new_best: bool },
    Crashed { elapsed: f64 },
    Unfinished { elapsed: f64 },
}

/// RaceResult contains all race information that is required for post-processing the results.
#[derive(Debug, Clone)]
pub struct RaceResult {
    pub driver_label: String,
    pub outcome: RaceOutcome,
    pub best_time: Option<f64>,
    pub no_ticks: u64,
}

impl RaceResult {
    pub fn get_lap_time(&self) -> Option<f64> {
        match self.outcome {
            RaceOutcome::Finished { lap_time, .. } => Some(lap_time),
            _ => None,
        }
    }
}

/// format_time returns a time in seconds with two decimals or the placeholder for a missing time.
pub fn format_time(time: Option<f64>) -> String {
    match time {
        Some(time) => format!("{:.2}s", time),
        None => String::from("--:--"),
    }
}

/// print_results prints the outcomes of the inserted race results to the console output.
pub fn print_results(race_results: &[RaceResult]) {
    let mut tmp_string = String::new();

    for race_result in race_results.iter() {
        let (outcome, time) = match race_result.outcome {
            RaceOutcome::Finished {
                lap_time,
                is_new_best,
            } => (
                if is_new_best { "finished (new best)" } else { "finished" },
                lap_time,
            ),
            RaceOutcome::Crashed { elapsed } => ("crashed", elapsed),
            RaceOutcome::Unfinished { elapsed } => ("unfinished", elapsed),
        };

        // writing into a String cannot fail
        let _ = writeln!(
            &mut tmp_string,
            "{:28}, {:20}, {:8.3}s, {:>8}, {:6}",
            race_result.driver_label,
            outcome,
            time,
            format_time(race_result.best_time),
            race_result.no_ticks
        );
    }

    // print everything to the console
    println!("RESULT: Race outcomes");
    println!(
        "{:28}, {:20}, {:>9}, {:>8}, {:>6}",
        "driver", "outcome", "time", "best", "ticks"
    );
    print!("{}", tmp_string);

    let best_lap = race_results
        .iter()
        .filter_map(|race_result| {
            race_result
                .get_lap_time()
                .map(|lap_time| (lap_time, &race_result.driver_label))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    if let Some((lap_time, driver_label)) = best_lap {
        println!("RESULT: Fastest lap {:.3}s by {}", lap_time, driver_label);
    }
}
