//! Identity primitives: roles, account records and authenticated principals.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Validation errors raised by identity constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrincipalValidationError {
    /// Identifier was empty.
    #[error("principal id must not be empty")]
    EmptyId,
    /// Identifier carried surrounding whitespace.
    #[error("principal id must not contain surrounding whitespace")]
    InvalidId,
    /// Name was blank.
    #[error("name must not be empty")]
    EmptyName,
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Credential token was blank.
    #[error("credential token must not be empty")]
    EmptyToken,
    /// Role was neither `user` nor `admin`.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Access class of a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Complaint submitter.
    User,
    /// Triager and resolver.
    Admin,
}

impl Role {
    /// Wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PrincipalValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(PrincipalValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Opaque identifier assigned to an account by the data store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Validate and construct an identifier.
    ///
    /// # Examples
    /// ```
    /// use complaint_desk::domain::PrincipalId;
    ///
    /// assert!(PrincipalId::new("65f1c0ffee").is_ok());
    /// assert!(PrincipalId::new(" 65f1 ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PrincipalValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PrincipalValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PrincipalId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PrincipalId> for String {
    fn from(value: PrincipalId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the sign-in handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, PrincipalValidationError> {
        let trimmed = email.as_ref().trim();
        if !email_regex().is_match(trimmed) {
            return Err(PrincipalValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Bearer credential issued by the authentication service.
///
/// The raw value is zeroed on drop and never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Wrap a non-blank token.
    pub fn new(token: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            return Err(PrincipalValidationError::EmptyToken);
        }
        Ok(Self(token))
    }

    /// Raw token for the `Authorization: Bearer` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Account record as listed by the user directory.
///
/// ## Invariants
/// - `name` is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: PrincipalId,
    name: String,
    email: EmailAddress,
    role: Role,
}

impl Account {
    /// Build an account from validated parts.
    pub fn new(
        id: PrincipalId,
        name: impl AsRef<str>,
        email: EmailAddress,
        role: Role,
    ) -> Result<Self, PrincipalValidationError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(PrincipalValidationError::EmptyName);
        }
        Ok(Self {
            id,
            name: name.to_owned(),
            email,
            role,
        })
    }

    /// Build an account from raw strings.
    ///
    /// # Examples
    /// ```
    /// use complaint_desk::domain::{Account, Role};
    ///
    /// let account = Account::try_from_parts("a1", "Ada", "ada@example.com", "admin").unwrap();
    /// assert_eq!(account.role(), Role::Admin);
    /// ```
    pub fn try_from_parts(
        id: &str,
        name: &str,
        email: &str,
        role: &str,
    ) -> Result<Self, PrincipalValidationError> {
        Self::new(
            PrincipalId::new(id)?,
            name,
            EmailAddress::new(email)?,
            role.parse()?,
        )
    }

    /// Stable identifier.
    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sign-in email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Access class.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Copy of this account with a different role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Authenticated actor: an account plus the credential it signed in with.
///
/// Immutable apart from token refresh via [`Principal::with_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    account: Account,
    token: AuthToken,
}

impl Principal {
    /// Bind an account to its credential.
    pub fn new(account: Account, token: AuthToken) -> Self {
        Self { account, token }
    }

    /// Underlying account record.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Stable identifier.
    pub fn id(&self) -> &PrincipalId {
        self.account.id()
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.account.name()
    }

    /// Sign-in email.
    pub fn email(&self) -> &EmailAddress {
        self.account.email()
    }

    /// Access class.
    pub fn role(&self) -> Role {
        self.account.role()
    }

    /// Whether the principal holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }

    /// Bearer credential.
    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    /// Replace the credential after a refresh.
    pub fn with_token(mut self, token: AuthToken) -> Self {
        self.token = token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", PrincipalValidationError::EmptyId)]
    #[case(" abc", PrincipalValidationError::InvalidId)]
    fn principal_id_rejects_malformed_values(
        #[case] raw: &str,
        #[case] expected: PrincipalValidationError,
    ) {
        assert_eq!(PrincipalId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("  ada@example.com  ", true)]
    #[case("ada@example", false)]
    #[case("ada example@x.io", false)]
    #[case("@example.com", false)]
    fn email_format(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(EmailAddress::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("user", Role::User)]
    #[case("admin", Role::Admin)]
    fn role_parses_wire_names(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    fn role_rejects_unknown_names() {
        assert!(matches!(
            "agent".parse::<Role>(),
            Err(PrincipalValidationError::UnknownRole(_))
        ));
    }

    #[rstest]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("secret-token").expect("token");
        assert_eq!(format!("{token:?}"), "AuthToken(<redacted>)");
        assert_eq!(token.expose(), "secret-token");
    }

    #[rstest]
    fn account_trims_name() {
        let account =
            Account::try_from_parts("u1", "  Ada  ", "ada@example.com", "user").expect("account");
        assert_eq!(account.name(), "Ada");
    }

    #[rstest]
    fn with_token_keeps_identity() {
        let account =
            Account::try_from_parts("u1", "Ada", "ada@example.com", "user").expect("account");
        let principal = Principal::new(account, AuthToken::new("t1").expect("token"));
        let refreshed = principal.clone().with_token(AuthToken::new("t2").expect("token"));
        assert_eq!(refreshed.id(), principal.id());
        assert_eq!(refreshed.token().expose(), "t2");
    }
}
