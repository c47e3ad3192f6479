//! Authentication inputs: login credentials and account registration.
//!
//! Raw form values are validated here before an endpoint call is built, so
//! blank credentials never reach the network.

use std::fmt;

use zeroize::Zeroizing;

/// Error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// First name was missing or blank once trimmed.
    EmptyFirstName,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated credentials sent to `/authentication/login`.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but keeps caller-provided
///   whitespace.
///
/// # Examples
/// ```
/// use asideka_client::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "hunter2").unwrap();
/// assert_eq!(creds.username(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter2");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username, usually the account e-mail address.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Validated input for `/authentication/create-account`.
///
/// Registration signs the new user in with the same credentials, so they
/// are kept together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRegistration {
    credentials: LoginCredentials,
    first_name: String,
    last_name: String,
    phone_number: Option<String>,
}

impl AccountRegistration {
    /// Validate registration form values.
    ///
    /// Blank optional values are dropped rather than sent as empty strings.
    pub fn try_new(
        credentials: LoginCredentials,
        first_name: &str,
        last_name: &str,
        phone_number: Option<&str>,
    ) -> Result<Self, LoginValidationError> {
        let first = first_name.trim();
        if first.is_empty() {
            return Err(LoginValidationError::EmptyFirstName);
        }
        Ok(Self {
            credentials,
            first_name: first.to_owned(),
            last_name: last_name.trim().to_owned(),
            phone_number: phone_number
                .map(str::trim)
                .filter(|phone| !phone.is_empty())
                .map(str::to_owned),
        })
    }

    /// Credentials used both to create the account and to sign in after.
    pub const fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    /// Given name.
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Family name; may be empty.
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Contact number, when supplied.
    pub fn phone_number(&self) -> Option<&str> {
        self.phone_number.as_deref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ", "secret")]
    #[case("grace", " spaced passphrase ")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn debug_output_hides_password() {
        let creds = LoginCredentials::try_from_parts("ada", "hunter2").expect("valid");
        let rendered = format!("{creds:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("ada"));
    }

    #[rstest]
    #[case(Some("  "), None)]
    #[case(Some(" +2348000000 "), Some("+2348000000"))]
    #[case(None, None)]
    fn registration_normalises_phone(#[case] phone: Option<&str>, #[case] expected: Option<&str>) {
        let creds = LoginCredentials::try_from_parts("ada", "pw").expect("valid");
        let registration =
            AccountRegistration::try_new(creds, " Ada ", "Lovelace", phone).expect("valid");
        assert_eq!(registration.first_name(), "Ada");
        assert_eq!(registration.phone_number(), expected);
    }

    #[test]
    fn registration_requires_first_name() {
        let creds = LoginCredentials::try_from_parts("ada", "pw").expect("valid");
        let err = AccountRegistration::try_new(creds, " ", "Lovelace", None)
            .expect_err("blank first name");
        assert_eq!(err, LoginValidationError::EmptyFirstName);
    }
}
