use crate::foundation::error::{ReelError, ReelResult};

/// A point in time as written in a manifest: seconds, or a clock string.
///
/// Clock strings are `"SS"`, `"MM:SS"` or `"HH:MM:SS"`, each optionally with fractional seconds
/// (`"01:06.5"`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum TimeSpec {
    /// Plain seconds.
    Seconds(f64),
    /// Clock notation.
    Clock(String),
}

impl TimeSpec {
    /// Resolve to seconds.
    pub fn to_secs(&self) -> ReelResult<f64> {
        let secs = match self {
            Self::Seconds(s) => *s,
            Self::Clock(s) => parse_clock(s)?,
        };
        if !secs.is_finite() || secs < 0.0 {
            return Err(ReelError::config(format!(
                "time must be finite and >= 0, got {secs}"
            )));
        }
        Ok(secs)
    }
}

impl From<f64> for TimeSpec {
    fn from(v: f64) -> Self {
        Self::Seconds(v)
    }
}

/// Parse `"SS"`, `"MM:SS"` or `"HH:MM:SS"` into seconds.
pub fn parse_clock(s: &str) -> ReelResult<f64> {
    let trimmed = s.trim();
    let bad = || ReelError::config(format!("invalid clock time '{s}'"));
    if trimmed.is_empty() {
        return Err(bad());
    }

    let parts: Vec<&str> = trimmed.split(':').collect();
    if parts.len() > 3 {
        return Err(bad());
    }

    let (last, leading) = parts.split_last().ok_or_else(bad)?;
    let seconds: f64 = last.parse().map_err(|_| bad())?;
    if !seconds.is_finite() || seconds < 0.0 || (!leading.is_empty() && seconds >= 60.0) {
        return Err(bad());
    }

    let mut total = seconds;
    let mut unit = 60.0;
    for (pos, field) in leading.iter().rev().enumerate() {
        let v: u32 = field.parse().map_err(|_| bad())?;
        // Minutes are bounded when hours are present.
        if pos == 0 && leading.len() == 2 && v >= 60 {
            return Err(bad());
        }
        total += f64::from(v) * unit;
        unit *= 60.0;
    }
    Ok(total)
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/time.rs"]
mod tests;
