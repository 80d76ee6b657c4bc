//! Registered identity records.
//!
//! An [`Identity`] is the full durable record, password included. Anything
//! handed to views or written to the session slot is a [`PublicIdentity`],
//! produced only through [`Identity::to_public`].

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by identity field constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a canonical UUID.
    InvalidId,
    /// Full name was blank once trimmed.
    EmptyFullName,
    /// Email was blank once trimmed.
    EmptyEmail,
    /// Email did not look like `name@domain`.
    InvalidEmail,
    /// Gender tag outside the accepted set.
    UnknownGender {
        /// Tag as submitted, trimmed.
        value: String,
    },
    /// Date of birth not in `YYYY-MM-DD` form.
    InvalidDateOfBirth {
        /// Date as submitted, trimmed.
        value: String,
    },
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identity id must not be empty"),
            Self::InvalidId => write!(f, "identity id must be a valid UUID"),
            Self::EmptyFullName => write!(f, "full name must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::UnknownGender { value } => {
                write!(f, "gender must be Male, Female, or Other (got {value})")
            }
            Self::InvalidDateOfBirth { value } => {
                write!(f, "date of birth must use YYYY-MM-DD (got {value})")
            }
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Opaque identity identifier stored as a UUID string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IdentityId(Uuid, String);

impl IdentityId {
    /// Validate and construct an [`IdentityId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        let uuid = Uuid::new_v4();
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, IdentityValidationError> {
        if id.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(IdentityValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| IdentityValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<IdentityId> for String {
    fn from(value: IdentityId) -> Self {
        let IdentityId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for IdentityId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Full name as entered at registration, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a [`FullName`].
    pub fn new(full_name: impl Into<String>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(full_name.into())
    }

    fn from_owned(full_name: String) -> Result<Self, IdentityValidationError> {
        let trimmed = full_name.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyFullName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for FullName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Email address used as the identity lookup key.
///
/// ## Invariants
/// - Stored trimmed, with the caller's casing preserved.
/// - Exactly one `@` separating two non-empty, whitespace-free parts.
///
/// Equality via `==` is exact; use [`EmailAddress::matches`] for the
/// case-insensitive comparison that uniqueness and login rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, IdentityValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, IdentityValidationError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if !email_regex().is_match(trimmed) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Case-insensitive comparison against raw input.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("a@x.com").unwrap();
    /// assert!(email.matches(" A@X.COM "));
    /// assert!(!email.matches("b@x.com"));
    /// ```
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Optional gender tag offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    /// `Male`.
    Male,
    /// `Female`.
    Female,
    /// `Other`.
    Other,
}

impl Gender {
    /// Label used in forms and persisted records.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = IdentityValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            other => Err(IdentityValidationError::UnknownGender {
                value: other.to_owned(),
            }),
        }
    }
}

/// Parse a `YYYY-MM-DD` date of birth.
pub(crate) fn parse_date_of_birth(value: &str) -> Result<NaiveDate, IdentityValidationError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        IdentityValidationError::InvalidDateOfBirth {
            value: trimmed.to_owned(),
        }
    })
}

/// Registration input accepted by the session store.
///
/// Optional profile fields are attached with the `with_*` builders; blank
/// mobile numbers are dropped rather than stored.
///
/// # Examples
/// ```
/// use portal::domain::{Gender, NewIdentity};
///
/// let new = NewIdentity::try_from_parts("Ann", "a@x.com", "pw123456")
///     .unwrap()
///     .with_mobile_number("  ")
///     .with_gender(Gender::Female);
/// assert_eq!(new.email().as_ref(), "a@x.com");
/// assert!(new.mobile_number().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    full_name: FullName,
    email: EmailAddress,
    password: String,
    mobile_number: Option<String>,
    gender: Option<Gender>,
    date_of_birth: Option<NaiveDate>,
}

impl NewIdentity {
    /// Build registration input from validated components.
    #[must_use]
    pub fn new(full_name: FullName, email: EmailAddress, password: impl Into<String>) -> Self {
        Self {
            full_name,
            email,
            password: password.into(),
            mobile_number: None,
            gender: None,
            date_of_birth: None,
        }
    }

    /// Fallible constructor from raw strings.
    ///
    /// The password is kept exactly as given; password policy belongs to
    /// [`crate::domain::RegistrationForm`].
    pub fn try_from_parts(
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, IdentityValidationError> {
        Ok(Self::new(
            FullName::new(full_name)?,
            EmailAddress::new(email)?,
            password,
        ))
    }

    /// Attach a mobile number; blank input clears it.
    #[must_use]
    pub fn with_mobile_number(mut self, mobile_number: impl Into<String>) -> Self {
        let raw: String = mobile_number.into();
        let trimmed = raw.trim();
        self.mobile_number = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Attach a gender tag.
    #[must_use]
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Attach a date of birth.
    #[must_use]
    pub fn with_date_of_birth(mut self, date_of_birth: NaiveDate) -> Self {
        self.date_of_birth = Some(date_of_birth);
        self
    }

    /// Name as registered.
    #[must_use]
    pub const fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Email as registered, trimmed.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Mobile number, when one was given.
    #[must_use]
    pub fn mobile_number(&self) -> Option<&str> {
        self.mobile_number.as_deref()
    }

    /// Gender tag, when one was given.
    #[must_use]
    pub const fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Date of birth, when one was given.
    #[must_use]
    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }
}

/// Durable identity record, password included.
///
/// Serialises with camelCase keys into the `app_users` slot. Optional profile
/// fields are omitted when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    id: IdentityId,
    full_name: FullName,
    email: EmailAddress,
    password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl Identity {
    /// Materialise a registration into a durable record.
    #[must_use]
    pub fn from_registration(id: IdentityId, new: NewIdentity, created_at: DateTime<Utc>) -> Self {
        let NewIdentity {
            full_name,
            email,
            password,
            mobile_number,
            gender,
            date_of_birth,
        } = new;
        Self {
            id,
            full_name,
            email,
            password,
            mobile_number,
            gender,
            date_of_birth,
            created_at,
        }
    }

    /// Stable identifier assigned at registration.
    #[must_use]
    pub const fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Email as registered, trimmed.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plain equality against the stored password.
    #[must_use]
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// Password-stripped view handed to views and the session slot.
    #[must_use]
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            mobile_number: self.mobile_number.clone(),
            gender: self.gender,
            date_of_birth: self.date_of_birth,
            created_at: self.created_at,
        }
    }
}

/// Identity without its password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicIdentity {
    id: IdentityId,
    full_name: FullName,
    email: EmailAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mobile_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date_of_birth: Option<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl PublicIdentity {
    /// Stable identifier assigned at registration.
    #[must_use]
    pub const fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Name as registered.
    #[must_use]
    pub const fn full_name(&self) -> &FullName {
        &self.full_name
    }

    /// Email as registered, trimmed.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Mobile number, when one was given.
    #[must_use]
    pub fn mobile_number(&self) -> Option<&str> {
        self.mobile_number.as_deref()
    }

    /// Gender tag, when one was given.
    #[must_use]
    pub const fn gender(&self) -> Option<Gender> {
        self.gender
    }

    /// Date of birth, when one was given.
    #[must_use]
    pub const fn date_of_birth(&self) -> Option<NaiveDate> {
        self.date_of_birth
    }

    /// When the underlying identity was registered.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
