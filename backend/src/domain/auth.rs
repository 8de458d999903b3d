//! Authentication and registration inputs.
//!
//! Handlers build these from raw request strings so services only ever see
//! validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::user::non_blank;
use super::{Email, Error, Role, User, UserId, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was blank or malformed.
    InvalidEmail(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` is normalised by [`Email::new`].
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use roadguard::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Admin@RoadGuard.local", "admin").unwrap();
/// assert_eq!(creds.email().as_ref(), "admin@roadguard.local");
/// assert_eq!(creds.password(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: Email,
    password: Zeroizing<String>,
    role: Role,
    phone: Option<String>,
}

impl Registration {
    /// Validate registration inputs. `role` defaults to [`Role::User`].
    pub fn try_new(
        name: &str,
        email: &str,
        password: &str,
        role: Option<Role>,
        phone: Option<String>,
    ) -> Result<Self, UserValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if password.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self {
            name: name.to_owned(),
            email: Email::new(email)?,
            password: Zeroizing::new(password.to_owned()),
            role: role.unwrap_or(Role::User),
            phone: non_blank(phone),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// The authenticated caller of a use case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Fail with `forbidden` unless the caller holds `role`.
    pub fn require(self, role: Role) -> Result<Self, Error> {
        if self.role == role {
            Ok(self)
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::Mechanic, Role::Admin, false)]
    #[case(Role::User, Role::Mechanic, false)]
    fn actor_requires_exact_role(#[case] held: Role, #[case] needed: Role, #[case] allowed: bool) {
        let result = Actor::new(UserId::new(1), held).require(needed);
        match (allowed, result) {
            (true, Ok(actor)) => assert_eq!(actor.role, held),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Forbidden),
            (_, other) => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail(UserValidationError::EmptyEmail))]
    #[case("nobody", "pw", LoginValidationError::InvalidEmail(UserValidationError::InvalidEmail))]
    #[case("a@b.c", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("a@b.c", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    fn registration_defaults_to_user_role() {
        let reg = Registration::try_new("Asha", "asha@example.com", "pw", None, None)
            .expect("valid registration");
        assert_eq!(reg.role(), Role::User);
        assert_eq!(reg.phone(), None);
    }

    #[rstest]
    #[case("", "a@b.c", "pw", UserValidationError::EmptyName)]
    #[case("Asha", "a@b.c", "", UserValidationError::EmptyPassword)]
    #[case("Asha", "bad", "pw", UserValidationError::InvalidEmail)]
    fn registration_rejects_invalid_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: UserValidationError,
    ) {
        let err = Registration::try_new(name, email, password, Some(Role::Mechanic), None)
            .expect_err("invalid registration");
        assert_eq!(err, expected);
    }
}
