//! Router Module Index
//!
//! Page routers grouped by the access tier the gateway applies to them. The
//! grouping mirrors the default route tables; the gateway itself decides from
//! `RouteRules`, so a reconfigured deployment may shift pages between tiers.

/// Probes and pages open to anonymous visitors, including the sign-in pages.
pub mod public;

/// Pages under the protected prefixes. Require a session token.
pub mod authenticated;

/// Pages restricted to the admin role.
pub mod admin;
