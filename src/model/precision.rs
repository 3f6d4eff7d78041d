use crate::model::{
    constants::{METERS_PER_MILE, MILE_PRECISION_LIMIT_MILES, SPRINT_PRECISION_LIMIT, TRACK_PRECISION_LIMIT},
    error::{AgeGradeError, Result},
    structures::processing::TimePrecision
};

// Absorbs representation error when scaling, e.g. 60.1 * 10 = 601.0000000000001
const SCALE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    #[default]
    Nearest,
    Ceiling,
    Floor
}

/// Decimal places used to display (and therefore compare) times at a race
/// distance given in miles
pub fn precision_for_distance(distance_miles: f64) -> TimePrecision {
    let meters = distance_miles * METERS_PER_MILE;

    if meters < SPRINT_PRECISION_LIMIT {
        TimePrecision { time: 2, ag_time: 2 }
    } else if meters < TRACK_PRECISION_LIMIT {
        TimePrecision { time: 1, ag_time: 1 }
    } else if distance_miles <= MILE_PRECISION_LIMIT_MILES {
        TimePrecision { time: 0, ag_time: 1 }
    } else {
        TimePrecision { time: 0, ag_time: 0 }
    }
}

fn scaled(seconds: f64, precision: usize, rounding: Rounding) -> u64 {
    let value = seconds.max(0.0) * 10f64.powi(precision as i32);

    let value = match rounding {
        Rounding::Nearest => value.round(),
        Rounding::Ceiling => (value - SCALE_EPSILON).ceil(),
        Rounding::Floor => (value + SCALE_EPSILON).floor()
    };

    value.max(0.0) as u64
}

/// Renders seconds as `h:mm:ss`, `m:ss` or `s`, with `precision` decimal
/// places, rounded to nearest
pub fn render_time(seconds: f64, precision: usize) -> String {
    render_time_with(seconds, precision, Rounding::Nearest)
}

pub fn render_time_with(seconds: f64, precision: usize, rounding: Rounding) -> String {
    let multiplier = 10u64.pow(precision as u32);
    let scaled = scaled(seconds, precision, rounding);

    let whole = scaled / multiplier;
    let (hours, minutes, secs) = (whole / 3600, (whole % 3600) / 60, whole % 60);

    let mut rendered = if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}:{:02}", minutes, secs)
    } else {
        secs.to_string()
    };

    if precision > 0 {
        rendered.push_str(&format!(".{:0width$}", scaled % multiplier, width = precision));
    }

    rendered
}

/// Rounds a time up to the displayed precision
pub fn adjust_time(seconds: f64, precision: usize) -> f64 {
    scaled(seconds, precision, Rounding::Ceiling) as f64 / 10f64.powi(precision as i32)
}

/// Parses `h:mm:ss[.f]`, `m:ss[.f]` or `s[.f]` into seconds
pub fn parse_time(value: &str) -> Result<f64> {
    let invalid = || AgeGradeError::Format(format!("invalid time {:?}", value));

    let parts: Vec<&str> = value.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return Err(invalid());
    }

    let mut seconds = 0.0;
    for (i, part) in parts.iter().enumerate() {
        let last = i == parts.len() - 1;
        let part = part.trim();

        // Only the seconds may carry a fraction
        if part.is_empty() || (!last && part.contains('.')) {
            return Err(invalid());
        }

        let number = part.parse::<f64>().map_err(|_| invalid())?;
        if !number.is_finite() || number < 0.0 {
            return Err(invalid());
        }

        seconds = seconds * 60.0 + number;
    }

    Ok(seconds)
}
