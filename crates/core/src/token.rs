//! Auth token source.

/// Produces the bearer token for a request.
///
/// Called once for every dispatched request and never cached, so an
/// implementation may rotate tokens between calls.
pub trait TokenProvider: Send + Sync {
    /// The current token.
    fn token(&self) -> String;
}

impl TokenProvider for String {
    fn token(&self) -> String {
        self.clone()
    }
}

impl TokenProvider for &'static str {
    fn token(&self) -> String {
        (*self).to_owned()
    }
}

impl<F> TokenProvider for F
where
    F: Fn() -> String + Send + Sync,
{
    fn token(&self) -> String {
        self()
    }
}
