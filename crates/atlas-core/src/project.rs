//! Project request types and draft builder.
//!
//! A [`ProjectDraft`] has never been persisted and carries no identifier or
//! status. The store assigns both on creation and hands back a [`Project`],
//! whose identifier is fixed from then on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};
use crate::types::ProjectStatus;

/// Store-assigned project identifier.
pub type ProjectId = i64;

/// A persisted project request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,

    pub name: String,

    #[serde(rename = "objetivo")]
    pub objective: String,

    #[serde(rename = "escopo")]
    pub scope: String,

    #[serde(rename = "publicoAlvo")]
    pub target_audience: String,

    #[serde(rename = "dataInicio", with = "start_date")]
    pub start_date: NaiveDate,

    status: ProjectStatus,
}

impl Project {
    /// Materializes a stored record. Only stores should call this.
    pub fn from_store(id: ProjectId, draft: ProjectDraft, status: ProjectStatus) -> Self {
        Self {
            id,
            name: draft.name,
            objective: draft.objective,
            scope: draft.scope,
            target_audience: draft.target_audience,
            start_date: draft.start_date,
            status,
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Full payload for an update that only changes the status.
    pub fn with_status(&self, status: ProjectStatus) -> Project {
        Project {
            status,
            ..self.clone()
        }
    }

    /// Full payload for an update that replaces the editable fields.
    /// Id and status are kept.
    pub fn with_details(&self, draft: ProjectDraft) -> Project {
        Project::from_store(self.id, draft, self.status)
    }

    /// Editable fields of this project.
    pub fn draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            objective: self.objective.clone(),
            scope: self.scope.clone(),
            target_audience: self.target_audience.clone(),
            start_date: self.start_date,
        }
    }
}

/// A project request that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDraft {
    pub name: String,

    #[serde(rename = "objetivo")]
    pub objective: String,

    #[serde(rename = "escopo")]
    pub scope: String,

    #[serde(rename = "publicoAlvo")]
    pub target_audience: String,

    #[serde(rename = "dataInicio", with = "start_date")]
    pub start_date: NaiveDate,
}

impl ProjectDraft {
    pub fn builder() -> ProjectDraftBuilder {
        ProjectDraftBuilder::default()
    }

    /// Rejects drafts with blank text fields.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("name", &self.name),
            ("objective", &self.objective),
            ("scope", &self.scope),
            ("target audience", &self.target_audience),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(AtlasError::Validation(format!(
                    "Project {field} cannot be empty"
                )));
            }
        }
        Ok(())
    }
}

/// Fluent builder for [`ProjectDraft`].
#[derive(Debug, Default)]
pub struct ProjectDraftBuilder {
    name: Option<String>,
    objective: Option<String>,
    scope: Option<String>,
    target_audience: Option<String>,
    start_date: Option<NaiveDate>,
}

impl ProjectDraftBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = Some(objective.into());
        self
    }

    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = Some(audience.into());
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    /// Build and validate the draft.
    pub fn build(self) -> Result<ProjectDraft> {
        let start_date = self.start_date.ok_or_else(|| {
            AtlasError::Validation("Project start date is required".to_string())
        })?;

        let draft = ProjectDraft {
            name: self.name.unwrap_or_default(),
            objective: self.objective.unwrap_or_default(),
            scope: self.scope.unwrap_or_default(),
            target_audience: self.target_audience.unwrap_or_default(),
            start_date,
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// `dataInicio` is written as `YYYY-MM-DD`. Some backends answer with a full
/// ISO timestamp, which is accepted and truncated to its date.
mod start_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if let Ok(date) = NaiveDate::parse_from_str(&raw, FORMAT) {
            return Ok(date);
        }
        if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(ts.date_naive());
        }
        NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|ts| ts.date())
            .map_err(|_| de::Error::custom(format!("invalid start date: {raw}")))
    }
}
