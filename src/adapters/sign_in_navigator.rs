//! Terminal navigator: tells the user to sign in again.

use tracing::debug;

use crate::traits::Navigator;

/// Prints a sign-in notice to stderr and optionally opens the page in the
/// system browser.
#[derive(Debug, Clone, Default)]
pub struct SignInNavigator {
    open_browser: bool,
}

impl SignInNavigator {
    pub fn new(open_browser: bool) -> Self {
        Self { open_browser }
    }
}

impl Navigator for SignInNavigator {
    fn redirect_to_sign_in(&self, url: &str) {
        eprintln!("Your session has ended. Sign in again at:");
        eprintln!("  {}", url);

        if self.open_browser {
            match open::that(url) {
                Ok(()) => eprintln!("Browser opened automatically."),
                Err(e) => debug!(error = %e, "Could not open browser"),
            }
        }
    }
}
