//! Authentication primitives: sign-in credentials, registrations and grants.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use zeroize::Zeroizing;

use super::{Account, AuthToken, EmailAddress, FieldViolations, Principal, Role};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

fn check_email(violations: &mut FieldViolations, raw: &str) -> Option<EmailAddress> {
    if raw.trim().is_empty() {
        violations.push("email", "required", "Email is required");
        return None;
    }
    match EmailAddress::new(raw) {
        Ok(email) => Some(email),
        Err(_) => {
            violations.push("email", "invalid_format", "Invalid email format");
            None
        }
    }
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and well formed.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use complaint_desk::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "password").unwrap();
/// assert_eq!(creds.email().as_str(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs, reporting every bad field.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, FieldViolations> {
        let mut violations = FieldViolations::default();
        let email = check_email(&mut violations, email);
        if password.is_empty() {
            violations.push("password", "required", "Password is required");
        }
        violations.into_result()?;
        let email = email.ok_or_else(FieldViolations::default)?;
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Sign-in handle.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password as typed.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a sign-up form.
    ///
    /// The name is trimmed; the password must hold at least
    /// [`MIN_PASSWORD_LEN`] characters.
    pub fn try_from_parts(name: &str, email: &str, password: &str) -> Result<Self, FieldViolations> {
        let mut violations = FieldViolations::default();
        let name = name.trim();
        if name.is_empty() {
            violations.push("name", "required", "Name is required");
        }
        let email = check_email(&mut violations, email);
        if password.is_empty() {
            violations.push("password", "required", "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LEN {
            violations.push(
                "password",
                "too_short",
                format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
            );
        }
        violations.into_result()?;
        let email = email.ok_or_else(FieldViolations::default)?;
        Ok(Self {
            name: name.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Sign-in handle.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Account and credential returned by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGrant {
    account: Account,
    token: AuthToken,
}

impl SessionGrant {
    /// Pair an account with its bearer credential.
    pub fn new(account: Account, token: AuthToken) -> Self {
        Self { account, token }
    }

    /// Account the grant was issued for.
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Promote the grant to a principal.
    pub fn into_principal(self) -> Principal {
        Principal::new(self.account, self.token)
    }

    /// Promote the grant to a principal holding the `user` role whatever the
    /// service reported.
    pub fn into_user_principal(self) -> Principal {
        Principal::new(self.account.with_role(Role::User), self.token)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", &["email"])]
    #[case("nope", "pw", &["email"])]
    #[case("ada@example.com", "", &["password"])]
    #[case("  ", "", &["email", "password"])]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: &[&str],
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err.fields(), expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds =
            LoginCredentials::try_from_parts("ada@example.com", " pw ").expect("valid inputs");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case("", "ada@example.com", "secret", &["name"])]
    #[case("Ada", "ada@", "secret", &["email"])]
    #[case("Ada", "ada@example.com", "12345", &["password"])]
    #[case(" ", "", "", &["name", "email", "password"])]
    fn invalid_registrations_enumerate_fields(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: &[&str],
    ) {
        let err = Registration::try_from_parts(name, email, password)
            .expect_err("invalid registration must fail");
        assert_eq!(err.fields(), expected);
    }

    #[rstest]
    fn short_password_message_names_the_minimum() {
        let err = Registration::try_from_parts("Ada", "ada@example.com", "abc")
            .expect_err("short password");
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[rstest]
    fn registration_accepts_six_characters() {
        let registration = Registration::try_from_parts("  Ada ", "ada@example.com", "123456")
            .expect("boundary password");
        assert_eq!(registration.name(), "Ada");
    }

    #[rstest]
    fn user_principal_coerces_role() {
        let account = Account::try_from_parts("u1", "Ada", "ada@example.com", "admin")
            .expect("account");
        let grant = SessionGrant::new(account, AuthToken::new("t").expect("token"));
        assert_eq!(grant.into_user_principal().role(), Role::User);
    }
}
