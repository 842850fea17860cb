//! Absolute URL composition.

use crate::{Error, Result};
use url::Url;

/// Compose `scheme://host:port` with a base path and an endpoint path.
///
/// Slashes between the base path and the endpoint path are normalized, so
/// `("/api/", "/v1/models")` and `("api", "v1/models")` both yield
/// `/api/v1/models`. The port is omitted from the result when it is the
/// scheme's default.
pub fn build_url(scheme: &str, host: &str, port: u16, base_path: &str, path: &str) -> Result<Url> {
    let mut url = Url::parse(&format!("{scheme}://{host}"))
        .map_err(|e| Error::encoding(format!("invalid origin {scheme}://{host}: {e}")))?;
    url.set_port(Some(port))
        .map_err(|_| Error::encoding(format!("{scheme} urls cannot carry a port")))?;

    let mut joined = String::new();
    for segment in [base_path, path] {
        let segment = segment.trim_matches('/');
        if !segment.is_empty() {
            joined.push('/');
            joined.push_str(segment);
        }
    }
    if joined.is_empty() {
        joined.push('/');
    }
    url.set_path(&joined);
    Ok(url)
}
