//! Access control gateway.
//!
//! Every page request is checked here before it reaches a handler. The gateway
//! reads the session cookies, matches the path against the route tables in
//! [`RouteRules`] and answers with a [`Decision`]. It holds no mutable state and
//! performs no I/O, so one instance is shared by all requests.

pub mod middleware;

use crate::session::{RequestDescriptor, SessionClaim, SessionCookies};

/// RouteClass
///
/// Which rule table a path falls into, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    AuthOnly,
    AdminOnly,
    Public,
}

impl RouteClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Protected => "protected",
            RouteClass::AuthOnly => "auth_only",
            RouteClass::AdminOnly => "admin_only",
            RouteClass::Public => "public",
        }
    }
}

/// Decision
///
/// The gateway verdict: let the request through, or send the browser elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectTo(String),
}

/// RouteRules
///
/// The route tables and redirect targets. Loaded once at startup (see
/// [`crate::config::AppConfig::load`]) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRules {
    /// Any path starting with one of these requires a session token.
    pub protected_prefixes: Vec<String>,
    /// Exact paths meant only for visitors without a session (login, sign-up, reset).
    pub auth_only_paths: Vec<String>,
    /// Exact paths reserved for the admin role.
    pub admin_only_paths: Vec<String>,
    pub login_path: String,
    pub landing_path: String,
    pub admin_role_id: i64,
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            protected_prefixes: to_owned(&[
                "/dashboard",
                "/current-session",
                "/calendar",
                "/clients",
                "/session-notes",
                "/intake-forms",
                "/services",
                "/invoice",
                "/profile",
            ]),
            auth_only_paths: to_owned(&["/login", "/sign-up", "/reset-password"]),
            admin_only_paths: to_owned(&["/services", "/invoice"]),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
            admin_role_id: 4,
        }
    }
}

fn to_owned(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

impl RouteRules {
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path.starts_with(prefix.as_str()))
    }

    pub fn is_auth_only(&self, path: &str) -> bool {
        self.auth_only_paths.iter().any(|p| p == path)
    }

    pub fn is_admin_only(&self, path: &str) -> bool {
        self.admin_only_paths.iter().any(|p| p == path)
    }

    /// classify
    ///
    /// Highest-precedence table the path matches. A path can sit in several
    /// tables (e.g. `/invoice` is protected and admin-only); this reports the
    /// first one, while [`Gateway::evaluate`] still walks every rule.
    pub fn classify(&self, path: &str) -> RouteClass {
        if self.is_protected(path) {
            RouteClass::Protected
        } else if self.is_auth_only(path) {
            RouteClass::AuthOnly
        } else if self.is_admin_only(path) {
            RouteClass::AdminOnly
        } else {
            RouteClass::Public
        }
    }
}

/// Rule
///
/// One entry of the decision list. Each rule either fires with a redirect or
/// passes the request on to the next rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Protected prefix without a token goes to the login page.
    RequireSession,
    /// Signed-in users are bounced off login/sign-up/reset.
    RejectSignedIn,
    /// Admin-only paths need the admin role claim.
    RequireAdmin,
}

/// Evaluation order of [`Rule`]s. First rule that fires wins; no match means allow.
/// New rules must be slotted in here explicitly.
pub const RULE_ORDER: [Rule; 3] = [
    Rule::RequireSession,
    Rule::RejectSignedIn,
    Rule::RequireAdmin,
];

impl Rule {
    fn apply<'r>(
        self,
        rules: &'r RouteRules,
        path: &str,
        session: &SessionClaim,
    ) -> Option<&'r str> {
        match self {
            Rule::RequireSession if rules.is_protected(path) && !session.has_token() => {
                Some(rules.login_path.as_str())
            }
            Rule::RejectSignedIn if rules.is_auth_only(path) && session.has_token() => {
                Some(rules.landing_path.as_str())
            }
            Rule::RequireAdmin
                if rules.is_admin_only(path) && !session.role.is(rules.admin_role_id) =>
            {
                Some(rules.landing_path.as_str())
            }
            _ => None,
        }
    }
}

/// Gateway
///
/// Stateless evaluator over a fixed set of [`RouteRules`].
#[derive(Debug, Clone, Default)]
pub struct Gateway {
    rules: RouteRules,
    cookies: SessionCookies,
}

impl Gateway {
    pub fn new(rules: RouteRules, cookies: SessionCookies) -> Self {
        Self { rules, cookies }
    }

    pub fn rules(&self) -> &RouteRules {
        &self.rules
    }

    /// evaluate
    ///
    /// Decides the fate of one request. Malformed cookies are read as "no token"
    /// or "no role", so this always produces a decision.
    pub fn evaluate(&self, request: &RequestDescriptor) -> Decision {
        let session = SessionClaim::from_cookies(&request.cookies, &self.cookies);
        self.decide(&request.path, &session)
    }

    pub fn decide(&self, path: &str, session: &SessionClaim) -> Decision {
        RULE_ORDER
            .iter()
            .find_map(|rule| rule.apply(&self.rules, path, session))
            .map_or(Decision::Allow, |target| Decision::RedirectTo(target.to_string()))
    }
}
