//! Session cookie settings derived from configuration toggles.
//!
//! Debug builds tolerate missing or malformed toggles, warning and falling
//! back to defaults. Release builds require every toggle, a key file of at
//! least [`SESSION_KEY_MIN_LEN`] bytes, no ephemeral keys, and `Secure`
//! whenever `SameSite=None`.

mod parsing;

use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroizing;

use parsing::{BoolToggle, parse_bool_toggle, parse_same_site_value};

pub const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// `Key::derive_from` panics below this many bytes.
const KEY_DERIVE_MIN_LEN: usize = 32;
const COOKIE_SECURE: &str = "session_cookie_secure";
const SAME_SITE: &str = "session_same_site";
const ALLOW_EPHEMERAL: &str = "session_allow_ephemeral";
const FINGERPRINT_BYTES: usize = 8;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    Debug,
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Raw toggles as read from configuration, before validation.
#[derive(Debug, Clone, Default)]
pub struct SessionToggles {
    pub key_file: Option<PathBuf>,
    pub cookie_secure: Option<String>,
    pub same_site: Option<String>,
    pub allow_ephemeral: Option<String>,
}

/// Validated session cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key for the private cookie.
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required setting: {name}")]
    MissingSetting { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidSetting {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("session_same_site=None requires session_cookie_secure=true")]
    InsecureSameSiteNone,
    #[error("session_allow_ephemeral must be false in release builds")]
    EphemeralNotAllowed,
}

/// Validate `toggles` for `mode` and load the signing key.
///
/// # Examples
///
/// ```rust
/// use complaint_desk::inbound::http::session_config::{
///     BuildMode, SessionToggles, session_settings,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_file = tempfile::NamedTempFile::new()?;
/// std::fs::write(key_file.path(), vec![b'k'; 64])?;
/// let toggles = SessionToggles {
///     key_file: Some(key_file.path().to_path_buf()),
///     cookie_secure: Some("true".into()),
///     same_site: Some("Strict".into()),
///     allow_ephemeral: Some("false".into()),
/// };
///
/// let settings = session_settings(&toggles, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings(
    toggles: &SessionToggles,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_toggle(
        toggles.cookie_secure.as_deref(),
        mode,
        BoolToggle::new(COOKIE_SECURE, true),
        |flag, _| Ok(flag),
    )?;
    let same_site = same_site(toggles.same_site.as_deref(), mode, cookie_secure)?;
    let allow_ephemeral = parse_bool_toggle(
        toggles.allow_ephemeral.as_deref(),
        mode,
        BoolToggle::new(ALLOW_EPHEMERAL, false),
        |flag, mode| match (flag, mode) {
            (true, BuildMode::Release) => Err(SessionConfigError::EphemeralNotAllowed),
            _ => Ok(flag),
        },
    )?;
    let key = session_key(toggles.key_file.clone(), mode, allow_ephemeral)?;
    Ok(SessionSettings {
        key,
        cookie_secure,
        same_site,
    })
}

fn same_site(
    value: Option<&str>,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match value {
        Some(value) => parse_same_site_value(value, mode, cookie_secure, default_same_site),
        None => parsing::debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::MissingSetting { name: SAME_SITE },
            || warn!("{SAME_SITE} not set; using default"),
        ),
    }
}

fn session_key(
    key_file: Option<PathBuf>,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = key_file.unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH));
    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            if length < KEY_DERIVE_MIN_LEN {
                warn!(
                    path = %path.display(),
                    length,
                    min_len = KEY_DERIVE_MIN_LEN,
                    "session key file too short to derive from; using temporary key (dev only)"
                );
                return Ok(Key::generate());
            }
            Ok(Key::derive_from(&bytes))
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(error) => Err(SessionConfigError::KeyRead {
            path,
            source: error,
        }),
    }
}

/// Truncated SHA-256 of the signing half of `key`, as lowercase hex.
///
/// Logged at startup so operators can tell which key is live without
/// exposing it.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}
