//! Navigation guard deciding whether a requested page may render.
//!
//! The decision is a pure function of session presence and the requested
//! path. It never touches the session itself.

/// Login page.
pub const LOGIN_PATH: &str = "/login";
/// Registration page.
pub const REGISTER_PATH: &str = "/register";
/// Root of the authenticated area.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Public landing page.
pub const HOME_PATH: &str = "/";

const EXCLUDED_PREFIXES: [&str; 4] = ["/api", "/_next/static", "/_next/image", "/favicon.ico"];

/// Area of the application a path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Reachable with or without a session.
    Public,
    /// Login and registration pages.
    AuthPages,
    /// Pages under the dashboard prefix.
    Dashboard,
}

impl Zone {
    /// Classify a request path by prefix. Query strings and fragments are
    /// ignored.
    pub fn classify(path: &str) -> Self {
        let pathname = strip_query(path);
        if pathname.starts_with(LOGIN_PATH) || pathname.starts_with(REGISTER_PATH) {
            Self::AuthPages
        } else if pathname.starts_with(DASHBOARD_PATH) {
            Self::Dashboard
        } else {
            Self::Public
        }
    }
}

/// Outcome of evaluating the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteDecision {
    /// Render the requested page.
    PassThrough,
    /// Send the visitor elsewhere.
    Redirect(&'static str),
}

impl RouteDecision {
    /// Redirect target, if any.
    pub const fn redirect_target(self) -> Option<&'static str> {
        match self {
            Self::PassThrough => None,
            Self::Redirect(target) => Some(target),
        }
    }
}

/// Where a completed auth flow sends the user next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Navigation {
    to: &'static str,
}

impl Navigation {
    /// Navigate to `to`.
    pub const fn to(to: &'static str) -> Self {
        Self { to }
    }

    /// Target path.
    pub const fn target(self) -> &'static str {
        self.to
    }
}

/// Whether `path` is subject to the guard at all. Framework assets and API
/// routes are not.
pub fn is_guarded(path: &str) -> bool {
    let pathname = strip_query(path);
    !EXCLUDED_PREFIXES
        .iter()
        .any(|prefix| pathname.starts_with(prefix))
}

/// Decide what happens to a request for `path`.
///
/// # Examples
/// ```
/// use asideka_client::domain::route_guard::{evaluate, RouteDecision};
///
/// assert_eq!(evaluate(false, "/dashboard/posts"), RouteDecision::Redirect("/login"));
/// assert_eq!(evaluate(true, "/login"), RouteDecision::Redirect("/dashboard"));
/// assert_eq!(evaluate(false, "/"), RouteDecision::PassThrough);
/// ```
pub fn evaluate(session_present: bool, path: &str) -> RouteDecision {
    if !is_guarded(path) {
        return RouteDecision::PassThrough;
    }
    match (session_present, Zone::classify(path)) {
        (true, Zone::AuthPages) => RouteDecision::Redirect(DASHBOARD_PATH),
        (false, Zone::Dashboard) => RouteDecision::Redirect(LOGIN_PATH),
        _ => RouteDecision::PassThrough,
    }
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}
