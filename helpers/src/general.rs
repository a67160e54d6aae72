use std::error::Error;
use std::f64::consts::PI;
use std::fmt;

/// InputValueError is used if some game option or parameter does not fulfill the posed
/// requirements, e.g., a track with less than three waypoints.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

/// argmin returns the index and value of the minimum entry produced by the iterator. Entries that
/// are None are skipped, None is returned if no entry remains.
pub fn argmin<I>(x: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = Option<f64>>,
{
    x.into_iter()
        .enumerate()
        .filter_map(|(idx, val)| val.map(|v| (idx, v)))
        .fold(None, |acc, (idx, val)| match acc {
            Some((_, val_min)) if val_min <= val => acc,
            _ => Some((idx, val)),
        })
}

/// wrap_angle maps an angle in radians into the range (-pi, pi].
pub fn wrap_angle(angle: f64) -> f64 {
    let mut wrapped = angle % (2.0 * PI);

    if wrapped > PI {
        wrapped -= 2.0 * PI;
    } else if wrapped <= -PI {
        wrapped += 2.0 * PI;
    }

    wrapped
}
