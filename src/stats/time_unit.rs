//! Time unit used to scale recorded durations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PerformanceError;

/// Unit the duration samples of a snapshot are expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeUnit {
    Seconds,
    #[default]
    Milliseconds,
}

impl TimeUnit {
    /// Factor applied to a duration measured in seconds
    pub fn scale(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1000.0,
        }
    }

    /// Full name used in summaries
    pub fn name(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "seconds",
            TimeUnit::Milliseconds => "milliseconds",
        }
    }

    /// Short suffix used in tables
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Seconds => "s",
            TimeUnit::Milliseconds => "ms",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeUnit {
    type Err = PerformanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" | "secs" | "seconds" => Ok(TimeUnit::Seconds),
            "ms" | "millis" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            other => Err(PerformanceError::Configuration(format!(
                "unknown time unit `{}` (expected one of: s, seconds, ms, millis, milliseconds)",
                other
            ))),
        }
    }
}

impl TryFrom<String> for TimeUnit {
    type Error = PerformanceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeUnit> for String {
    fn from(unit: TimeUnit) -> Self {
        unit.suffix().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spellings() {
        for s in ["s", "sec", "Seconds", " seconds "] {
            assert_eq!(s.parse::<TimeUnit>().unwrap(), TimeUnit::Seconds);
        }
        for s in ["ms", "millis", "MILLISECONDS"] {
            assert_eq!(s.parse::<TimeUnit>().unwrap(), TimeUnit::Milliseconds);
        }
    }

    #[test]
    fn test_parse_unknown_is_configuration_error() {
        let err = "minutes".parse::<TimeUnit>().unwrap_err();
        assert!(matches!(err, PerformanceError::Configuration(_)));
    }

    #[test]
    fn test_scale_and_display() {
        assert_eq!(TimeUnit::Seconds.scale(), 1.0);
        assert_eq!(TimeUnit::Milliseconds.scale(), 1000.0);
        assert_eq!(TimeUnit::Milliseconds.to_string(), "milliseconds");
        assert_eq!(TimeUnit::default(), TimeUnit::Milliseconds);
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&TimeUnit::Seconds).unwrap();
        assert_eq!(json, "\"s\"");
        let unit: TimeUnit = serde_json::from_str("\"millis\"").unwrap();
        assert_eq!(unit, TimeUnit::Milliseconds);
        assert!(serde_json::from_str::<TimeUnit>("\"hours\"").is_err());
    }
}
