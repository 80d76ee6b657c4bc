//! Course references held by the selection and enrollment sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors returned by [`CourseRef::try_from_parts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CourseValidationError {
    /// Course id was blank once trimmed.
    EmptyId,
    /// Course name was blank once trimmed.
    EmptyName,
}

impl fmt::Display for CourseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "course id must not be empty"),
            Self::EmptyName => write!(f, "course name must not be empty"),
        }
    }
}

impl std::error::Error for CourseValidationError {}

/// Catalogue code such as `CSE201`; the selection set is unique by this key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId(String);

impl CourseId {
    /// Validate and construct a [`CourseId`].
    pub fn new(id: impl Into<String>) -> Result<Self, CourseValidationError> {
        Self::from_owned(id.into())
    }

    fn from_owned(id: String) -> Result<Self, CourseValidationError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CourseValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<CourseId> for String {
    fn from(value: CourseId) -> Self {
        value.0
    }
}

impl TryFrom<String> for CourseId {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Lightweight course reference: `{id, name, credit}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseRef {
    id: CourseId,
    name: String,
    credit: u32,
}

impl CourseRef {
    /// Build a reference from a validated id.
    #[must_use]
    pub fn new(id: CourseId, name: impl Into<String>, credit: u32) -> Self {
        Self {
            id,
            name: name.into(),
            credit,
        }
    }

    /// Fallible constructor from raw strings.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::CourseRef;
    ///
    /// let course = CourseRef::try_from_parts("CSE201", "Data Structures", 3).unwrap();
    /// assert_eq!(course.id().as_ref(), "CSE201");
    /// assert_eq!(course.credit(), 3);
    /// ```
    pub fn try_from_parts(
        id: &str,
        name: &str,
        credit: u32,
    ) -> Result<Self, CourseValidationError> {
        let id = CourseId::new(id)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        Ok(Self::new(id, name, credit))
    }

    /// Catalogue code; the selection set is unique by this.
    #[must_use]
    pub const fn id(&self) -> &CourseId {
        &self.id
    }

    /// Course title.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Credit hours counted towards the bill.
    #[must_use]
    pub const fn credit(&self) -> u32 {
        self.credit
    }
}
