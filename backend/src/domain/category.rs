//! Complaint categories such as "Outage" or "Overbilling".

use std::fmt;

use serde::{Deserialize, Serialize};

use super::FieldViolations;

/// Store-assigned category identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

/// Raised when an identifier is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("category id must not be blank")]
pub struct EmptyCategoryId;

impl CategoryId {
    /// Wrap a non-blank identifier, trimming surrounding whitespace.
    pub fn new(id: impl AsRef<str>) -> Result<Self, EmptyCategoryId> {
        let id = id.as_ref().trim();
        if id.is_empty() {
            return Err(EmptyCategoryId);
        }
        Ok(Self(id.to_owned()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CategoryId> for String {
    fn from(value: CategoryId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CategoryId {
    type Error = EmptyCategoryId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Classification tag referenced by complaints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: String,
    description: Option<String>,
}

impl Category {
    /// Attach an identifier to validated content.
    pub fn new(id: CategoryId, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    /// Identifier.
    pub fn id(&self) -> &CategoryId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional longer description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Validated category content used for create and update.
///
/// # Examples
/// ```
/// use complaint_desk::domain::CategoryDraft;
///
/// let draft = CategoryDraft::try_from_parts(" Outage ", Some("  ")).unwrap();
/// assert_eq!(draft.name(), "Outage");
/// assert_eq!(draft.description(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    name: String,
    description: Option<String>,
}

impl CategoryDraft {
    /// Trim inputs; the name is required and a blank description is dropped.
    pub fn try_from_parts(name: &str, description: Option<&str>) -> Result<Self, FieldViolations> {
        let name = name.trim();
        let mut violations = FieldViolations::default();
        if name.is_empty() {
            violations.push("name", "required", "Name is required");
        }
        violations.into_result()?;
        Ok(Self {
            name: name.to_owned(),
            description: description
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}
