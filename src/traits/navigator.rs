//! Navigation capability used when a session ends.

/// Sends the user to the sign-in entry point.
///
/// Implementations should be cheap and must not block on user input.
pub trait Navigator: Send + Sync {
    /// Redirect to the sign-in page at `url`.
    fn redirect_to_sign_in(&self, url: &str);
}
