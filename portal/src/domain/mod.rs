//! Domain primitives, stores, and ports.
//!
//! Purpose: define the typed records the portal persists (identities, course
//! references) and the two stores that mutate them. Storage is reached only
//! through [`ports::KeyValueStore`], so the stores stay testable without a
//! filesystem.
//!
//! Public surface:
//! - Identity, PublicIdentity, NewIdentity: registered user records.
//! - LoginCredentials, RegistrationForm: validated inbound payloads.
//! - CourseRef: course reference held in the selection and enrollment sets.
//! - SessionStore, AuthError: authentication state and its failures.
//! - SelectionStore: course cart and enrollment state.

pub mod auth;
pub mod course;
pub mod identity;
pub mod ports;
pub mod selection;
pub mod session;

pub use self::auth::{
    LoginCredentials, LoginValidationError, MIN_PASSWORD_LENGTH, RegistrationForm,
    RegistrationValidationError,
};
pub use self::course::{CourseId, CourseRef, CourseValidationError};
pub use self::identity::{
    EmailAddress, FullName, Gender, Identity, IdentityId, IdentityValidationError, NewIdentity,
    PublicIdentity,
};
pub use self::selection::SelectionStore;
pub use self::session::{AuthError, IDENTITIES_KEY, SESSION_KEY, SessionStore};
