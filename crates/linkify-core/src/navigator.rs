//! Router seam.
//!
//! Route rendering is out of scope; the core only needs to force the
//! presentation layer onto a route (after login, logout, or a 401-class
//! failure) or hand it an external URL (standalone OAuth redirect).

use strum::Display;

/// Routes the core can force navigation to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Route {
    /// Unauthenticated entry point.
    Login,
    /// Main authenticated view.
    Companies,
}

/// Service the presentation layer implements to accept navigation.
pub trait Navigator: Send + Sync {
    /// Navigates to an application route.
    fn navigate(&self, route: Route);

    /// Leaves the application for an external URL (standalone OAuth flow).
    fn open_external(&self, url: &str);
}
