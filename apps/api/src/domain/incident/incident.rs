use super::value_objects::{IncidentTitle, Severity};
use chrono::{DateTime, Utc};

/// A persisted incident report
///
/// `id` and `created_at` are assigned by storage. `created_by` is empty for
/// incidents whose reporter account no longer exists.
#[derive(Debug, Clone, PartialEq)]
pub struct Incident {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub bank: String,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub created_by: Option<i32>,
}

/// Validated input for creating an incident
///
/// # Example
/// ```
/// use cyberbank_api::domain::incident::{NewIncident, Severity};
///
/// let new = NewIncident::new(
///     "Card skimming",
///     "Skimmer found on ATM #12".to_string(),
///     "high",
///     "Acme".to_string(),
/// )
/// .expect("valid incident");
///
/// assert_eq!(new.title.as_str(), "Card skimming");
/// assert_eq!(new.severity, Severity::High);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncident {
    pub title: IncidentTitle,
    pub description: String,
    pub severity: Severity,
    pub bank: String,
    pub image_url: Option<String>,
    pub created_by: Option<i32>,
}

impl NewIncident {
    pub fn new(
        title: &str,
        description: String,
        severity: &str,
        bank: String,
    ) -> Result<Self, String> {
        Ok(Self {
            title: IncidentTitle::new(title)?,
            description,
            severity: severity.parse()?,
            bank,
            image_url: None,
            created_by: None,
        })
    }

    pub fn with_image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn created_by(mut self, user_id: i32) -> Self {
        self.created_by = Some(user_id);
        self
    }
}

/// A partial update: only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncidentChanges {
    pub title: Option<IncidentTitle>,
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub bank: Option<String>,
    pub image_url: Option<String>,
}

impl IncidentChanges {
    /// Validates whichever fields were supplied
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        severity: Option<String>,
        bank: Option<String>,
        image_url: Option<String>,
    ) -> Result<Self, String> {
        Ok(Self {
            title: title.map(IncidentTitle::new).transpose()?,
            description,
            severity: severity.map(|s| s.parse()).transpose()?,
            bank,
            image_url,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.severity.is_none()
            && self.bank.is_none()
            && self.image_url.is_none()
    }

    /// Applies the supplied fields to `incident`, leaving the rest untouched
    pub fn apply_to(&self, incident: &mut Incident) {
        if let Some(title) = &self.title {
            incident.title = title.as_str().to_string();
        }
        if let Some(description) = &self.description {
            incident.description = description.clone();
        }
        if let Some(severity) = self.severity {
            incident.severity = severity;
        }
        if let Some(bank) = &self.bank {
            incident.bank = bank.clone();
        }
        if let Some(image_url) = &self.image_url {
            incident.image_url = Some(image_url.clone());
        }
    }
}
