use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Minimum title length (in characters, after trimming)
pub const TITLE_MIN_LEN: usize = 5;

/// Maximum title length, mirrors the `incidents.title` column
pub const TITLE_MAX_LEN: usize = 255;

/// How serious a reported incident is
///
/// Parsing is case-insensitive; the canonical form is capitalized
/// (`Low`, `Medium`, `High`), which is also what gets stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    /// # Example
    /// ```
    /// use cyberbank_api::domain::incident::Severity;
    ///
    /// assert_eq!("high".parse::<Severity>(), Ok(Severity::High));
    /// assert!("critical".parse::<Severity>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Severity::ALL
            .into_iter()
            .find(|severity| severity.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("Invalid severity '{}': expected one of Low, Medium, High", s)
            })
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Incident title value object
///
/// # Invariants
/// - Leading and trailing whitespace is stripped
/// - At least 5 characters, at most 255
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncidentTitle(String);

impl IncidentTitle {
    pub fn new(title: impl AsRef<str>) -> Result<Self, String> {
        let title = title.as_ref().trim();
        let len = title.chars().count();

        if len < TITLE_MIN_LEN {
            return Err(format!(
                "Title is too short: at least {} characters required",
                TITLE_MIN_LEN
            ));
        }
        if len > TITLE_MAX_LEN {
            return Err(format!(
                "Title is too long: at most {} characters allowed",
                TITLE_MAX_LEN
            ));
        }

        Ok(IncidentTitle(title.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for IncidentTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
