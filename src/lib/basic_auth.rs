//! `Authorization: Basic` header construction.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::header::HeaderValue;

use crate::lib::errors::ClientBuildError;

/// Returns `base64(email:api_token)`.
pub fn encode_credentials(email: &str, api_token: &str) -> String {
    STANDARD.encode(format!("{email}:{api_token}"))
}

/// Build the header value, marked sensitive so it never shows up in debug output.
pub fn authorization_header(email: &str, api_token: &str) -> Result<HeaderValue, ClientBuildError> {
    let mut value = HeaderValue::from_str(&format!(
        "Basic {}",
        encode_credentials(email, api_token)
    ))
    .map_err(|_| ClientBuildError::InvalidAuthHeader)?;
    value.set_sensitive(true);
    Ok(value)
}
