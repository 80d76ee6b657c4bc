//! Authentication payloads: login credentials and the registration form.
//!
//! Keep inbound payload parsing outside the stores by exposing constructors
//! that validate string inputs before a caller talks to the session store.

use std::fmt;

use serde::Deserialize;
use zeroize::Zeroizing;

use crate::domain::identity::{
    EmailAddress, FullName, Gender, IdentityValidationError, NewIdentity, parse_date_of_birth,
};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the session store.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming. Its shape is not
///   checked: an unknown address simply fails to authenticate.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace because the stored comparison is exact.
///
/// # Examples
/// ```
/// use portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@x.com ", "pw123456").unwrap();
/// assert_eq!(creds.email(), "a@x.com");
/// assert_eq!(creds.password(), "pw123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email string used for the case-insensitive lookup.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Minimum password length enforced by the registration form.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Errors raised while validating the registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Password and confirmation differ.
    PasswordMismatch,
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`] characters.
    PasswordTooShort {
        /// Required minimum length.
        min: usize,
    },
    /// A profile field failed to parse.
    Field(IdentityValidationError),
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PasswordMismatch => write!(f, "Passwords do not match"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters long")
            }
            Self::Field(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<IdentityValidationError> for RegistrationValidationError {
    fn from(value: IdentityValidationError) -> Self {
        Self::Field(value)
    }
}

/// Raw registration form fields as submitted by a view.
///
/// Optional fields arrive as strings and are dropped when blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    /// Name shown on the dashboard.
    pub full_name: String,
    /// Login email; must look like `name@domain`.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Must equal `password`.
    pub confirm_password: String,
    /// Optional; blank means absent.
    pub mobile_number: String,
    /// Optional `Male`, `Female`, or `Other`; blank means absent.
    pub gender: String,
    /// Optional `YYYY-MM-DD`; blank means absent.
    pub date_of_birth: String,
}

impl RegistrationForm {
    /// Check the form and produce the session store's registration input.
    ///
    /// Password checks run first, in the order the form reports them.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{RegistrationForm, RegistrationValidationError};
    ///
    /// let form = RegistrationForm {
    ///     full_name: "Ann".into(),
    ///     email: "a@x.com".into(),
    ///     password: "pw123456".into(),
    ///     confirm_password: "pw123457".into(),
    ///     ..RegistrationForm::default()
    /// };
    /// assert_eq!(form.validate(), Err(RegistrationValidationError::PasswordMismatch));
    /// ```
    pub fn validate(&self) -> Result<NewIdentity, RegistrationValidationError> {
        if self.password != self.confirm_password {
            return Err(RegistrationValidationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
            });
        }

        let mut new = NewIdentity::new(
            FullName::new(self.full_name.as_str())?,
            EmailAddress::new(self.email.as_str())?,
            self.password.as_str(),
        )
        .with_mobile_number(self.mobile_number.as_str());

        if !self.gender.trim().is_empty() {
            new = new.with_gender(self.gender.parse::<Gender>()?);
        }
        if !self.date_of_birth.trim().is_empty() {
            new = new.with_date_of_birth(parse_date_of_birth(&self.date_of_birth)?);
        }
        Ok(new)
    }
}
