//! Security: SSRF protection for article URLs and API key handling.

mod credentials;
mod url_policy;

pub use credentials::ApiKey;
pub use url_policy::UrlValidator;
