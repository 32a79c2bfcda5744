//! Toggle parsing helpers for session configuration.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SAME_SITE, SessionConfigError};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and its debug-build fallback.
pub(super) struct BoolToggle {
    name: &'static str,
    default_value: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

pub(super) fn parse_bool_toggle<F>(
    value: Option<&str>,
    mode: BuildMode,
    toggle: BoolToggle,
    validate: F,
) -> Result<bool, SessionConfigError>
where
    F: FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
{
    let BoolToggle {
        name,
        default_value,
    } = toggle;
    match value {
        Some(value) => match parse_bool(value) {
            Some(flag) => validate(flag, mode),
            None => debug_warn_or_error(
                mode,
                default_value,
                SessionConfigError::InvalidSetting {
                    name,
                    value: value.to_owned(),
                    expected: BOOL_EXPECTED,
                },
                || warn!(value, "invalid {name}; defaulting to {default_value}"),
            ),
        },
        None => debug_warn_or_error(
            mode,
            default_value,
            SessionConfigError::MissingSetting { name },
            || warn!("{name} not set; defaulting to {default_value}"),
        ),
    }
}

pub(super) fn debug_warn_or_error<T, F>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: F,
) -> Result<T, SessionConfigError>
where
    F: FnOnce(),
{
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_same_site_value(
    value: &str,
    mode: BuildMode,
    cookie_secure: bool,
    default_same_site: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" => {
            if !cookie_secure {
                debug_warn_or_error(mode, (), SessionConfigError::InsecureSameSiteNone, || {
                    warn!("SameSite=None without Secure; browsers may reject the cookie");
                })?;
            }
            Ok(SameSite::None)
        }
        _ => debug_warn_or_error(
            mode,
            default_same_site,
            SessionConfigError::InvalidSetting {
                name: SAME_SITE,
                value: value.to_owned(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value, "invalid {SAME_SITE}, using default"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
