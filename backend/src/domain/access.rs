//! Role-based access rules.
//!
//! [`authorize`] gates route classes and [`can_read`] scopes complaint
//! visibility. Every role check in the crate goes through one of these two
//! rules or through [`require_role`], which is defined in terms of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Complaint, Error, Principal, Role};

/// Sign-in page.
pub const LOGIN_PATH: &str = "/login";
/// Sign-up page.
pub const REGISTER_PATH: &str = "/register";
/// Landing page for `user` principals.
pub const USER_HOME_PATH: &str = "/dashboard";
/// Landing page for `admin` principals.
pub const ADMIN_HOME_PATH: &str = "/admin";

/// Access class declared by a route or endpoint scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteClass {
    /// Open to everyone, signed in or not.
    Public,
    /// Complaint submitters only; admins are barred.
    UserOnly,
    /// Administrators only.
    AdminOnly,
}

/// Raised when parsing an unknown route class.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route class: {0}")]
pub struct UnknownRouteClass(pub String);

impl RouteClass {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::UserOnly => "user-only",
            Self::AdminOnly => "admin-only",
        }
    }
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteClass {
    type Err = UnknownRouteClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Public, Self::UserOnly, Self::AdminOnly]
            .into_iter()
            .find(|class| class.as_str() == s)
            .ok_or_else(|| UnknownRouteClass(s.to_owned()))
    }
}

/// Outcome of a gating decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Proceed to the requested route.
    Allow,
    /// Anonymous caller on a protected route.
    RedirectToLogin,
    /// User on an admin-only route.
    RedirectToUserHome,
    /// Admin on a user-only route.
    RedirectToAdminHome,
}

impl Decision {
    /// Redirect target, or `None` for [`Decision::Allow`].
    pub fn location(self) -> Option<&'static str> {
        match self {
            Self::Allow => None,
            Self::RedirectToLogin => Some(LOGIN_PATH),
            Self::RedirectToUserHome => Some(USER_HOME_PATH),
            Self::RedirectToAdminHome => Some(ADMIN_HOME_PATH),
        }
    }

    /// Whether access is granted.
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }
}

/// Decide whether `principal` may enter a route of class `route`.
///
/// Total and side-effect free. Rules in order: anonymous callers are sent to
/// sign in for anything but public routes; admins are barred from user-only
/// routes; non-admins are barred from admin-only routes; everything else is
/// allowed.
///
/// # Examples
/// ```
/// use complaint_desk::domain::{Decision, RouteClass, authorize};
///
/// assert_eq!(authorize(None, RouteClass::Public), Decision::Allow);
/// assert_eq!(authorize(None, RouteClass::AdminOnly), Decision::RedirectToLogin);
/// ```
pub fn authorize(principal: Option<&Principal>, route: RouteClass) -> Decision {
    match (principal.map(Principal::role), route) {
        (None, RouteClass::Public) => Decision::Allow,
        (None, _) => Decision::RedirectToLogin,
        (Some(Role::Admin), RouteClass::UserOnly) => Decision::RedirectToAdminHome,
        (Some(Role::User), RouteClass::AdminOnly) => Decision::RedirectToUserHome,
        (Some(_), _) => Decision::Allow,
    }
}

/// Landing location for `principal`.
pub fn landing(principal: Option<&Principal>) -> &'static str {
    match principal.map(Principal::role) {
        None => LOGIN_PATH,
        Some(Role::Admin) => ADMIN_HOME_PATH,
        Some(Role::User) => USER_HOME_PATH,
    }
}

/// Navigation link offered to a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    /// Client route, e.g. `/dashboard`.
    pub path: &'static str,
    /// Link text.
    pub label: &'static str,
    /// Gate applied to `path`.
    pub route: RouteClass,
}

const NAVIGATION: [NavEntry; 4] = [
    NavEntry {
        path: USER_HOME_PATH,
        label: "Dashboard",
        route: RouteClass::UserOnly,
    },
    NavEntry {
        path: ADMIN_HOME_PATH,
        label: "Admin",
        route: RouteClass::AdminOnly,
    },
    NavEntry {
        path: LOGIN_PATH,
        label: "Sign in",
        route: RouteClass::Public,
    },
    NavEntry {
        path: REGISTER_PATH,
        label: "Sign up",
        route: RouteClass::Public,
    },
];

/// Navigation entries for `principal`.
///
/// Signed-in principals see the protected areas [`authorize`] admits them
/// to; anonymous callers see the sign-in and sign-up links.
pub fn navigation_for(principal: Option<&Principal>) -> Vec<NavEntry> {
    NAVIGATION
        .into_iter()
        .filter(|entry| match principal {
            None => entry.route == RouteClass::Public,
            Some(_) => entry.route != RouteClass::Public && authorize(principal, entry.route).is_allowed(),
        })
        .collect()
}

/// Whether `principal` may observe `complaint`.
///
/// Admins read everything; anyone else reads only what they own.
pub fn can_read(principal: &Principal, complaint: &Complaint) -> bool {
    principal.is_admin() || complaint.owner() == principal.id()
}

/// Drop every complaint `principal` may not observe, keeping order.
pub fn scope_to_reader(principal: &Principal, complaints: Vec<Complaint>) -> Vec<Complaint> {
    complaints
        .into_iter()
        .filter(|complaint| can_read(principal, complaint))
        .collect()
}

/// Fail with `forbidden` unless `principal` holds `role`.
///
/// The denial carries `details.redirect` with the principal's landing page.
pub fn require_role(principal: &Principal, role: Role, action: &str) -> Result<(), Error> {
    let route = match role {
        Role::Admin => RouteClass::AdminOnly,
        Role::User => RouteClass::UserOnly,
    };
    match authorize(Some(principal), route).location() {
        None => Ok(()),
        Some(redirect) => Err(Error::forbidden(format!("only {role} accounts may {action}"))
            .with_details(serde_json::json!({ "redirect": redirect }))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComplaintStatus;
    use crate::domain::ErrorCode;
    use crate::test_support::fixtures::{complaint, principal};
    use rstest::rstest;

    #[rstest]
    #[case(None, RouteClass::Public, Decision::Allow)]
    #[case(None, RouteClass::UserOnly, Decision::RedirectToLogin)]
    #[case(None, RouteClass::AdminOnly, Decision::RedirectToLogin)]
    #[case(Some(Role::User), RouteClass::Public, Decision::Allow)]
    #[case(Some(Role::User), RouteClass::UserOnly, Decision::Allow)]
    #[case(Some(Role::User), RouteClass::AdminOnly, Decision::RedirectToUserHome)]
    #[case(Some(Role::Admin), RouteClass::Public, Decision::Allow)]
    #[case(Some(Role::Admin), RouteClass::UserOnly, Decision::RedirectToAdminHome)]
    #[case(Some(Role::Admin), RouteClass::AdminOnly, Decision::Allow)]
    fn authorize_is_total(
        #[case] role: Option<Role>,
        #[case] route: RouteClass,
        #[case] expected: Decision,
    ) {
        let caller = role.map(|role| principal("p1", role));
        assert_eq!(authorize(caller.as_ref(), route), expected);
    }

    #[rstest]
    #[case(Decision::Allow, None)]
    #[case(Decision::RedirectToLogin, Some("/login"))]
    #[case(Decision::RedirectToUserHome, Some("/dashboard"))]
    #[case(Decision::RedirectToAdminHome, Some("/admin"))]
    fn decision_locations(#[case] decision: Decision, #[case] expected: Option<&str>) {
        assert_eq!(decision.location(), expected);
    }

    #[rstest]
    #[case("public", RouteClass::Public)]
    #[case("user-only", RouteClass::UserOnly)]
    #[case("admin-only", RouteClass::AdminOnly)]
    fn route_class_parses(#[case] raw: &str, #[case] expected: RouteClass) {
        assert_eq!(raw.parse::<RouteClass>(), Ok(expected));
    }

    #[rstest]
    fn landing_follows_role() {
        assert_eq!(landing(None), "/login");
        assert_eq!(landing(Some(&principal("u1", Role::User))), "/dashboard");
        assert_eq!(landing(Some(&principal("a1", Role::Admin))), "/admin");
    }

    #[rstest]
    fn navigation_matches_role() {
        let paths = |p: Option<&Principal>| -> Vec<&str> {
            navigation_for(p).into_iter().map(|entry| entry.path).collect()
        };
        assert_eq!(paths(None), vec!["/login", "/register"]);
        assert_eq!(paths(Some(&principal("u1", Role::User))), vec!["/dashboard"]);
        assert_eq!(paths(Some(&principal("a1", Role::Admin))), vec!["/admin"]);
    }

    #[rstest]
    fn users_only_see_their_own_complaints() {
        let reader = principal("u1", Role::User);
        let all = vec![
            complaint("c1", "u1", "cat", ComplaintStatus::Pending),
            complaint("c2", "u2", "cat", ComplaintStatus::Pending),
            complaint("c3", "u1", "cat", ComplaintStatus::Resolved),
        ];
        let visible = scope_to_reader(&reader, all);
        let ids: Vec<&str> = visible.iter().map(|c| c.id().as_str()).collect();
        assert_eq!(ids, vec!["c1", "c3"]);
    }

    #[rstest]
    fn admins_see_everything() {
        let reader = principal("a1", Role::Admin);
        let all = vec![
            complaint("c1", "u1", "cat", ComplaintStatus::Pending),
            complaint("c2", "u2", "cat", ComplaintStatus::Pending),
        ];
        assert_eq!(scope_to_reader(&reader, all).len(), 2);
    }

    #[rstest]
    fn require_role_denies_with_redirect() {
        let err = require_role(&principal("u1", Role::User), Role::Admin, "delete complaints")
            .expect_err("users are not admins");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert_eq!(
            err.details().and_then(|d| d.get("redirect")).and_then(|v| v.as_str()),
            Some("/dashboard")
        );
        assert!(require_role(&principal("a1", Role::Admin), Role::Admin, "x").is_ok());
    }
}
