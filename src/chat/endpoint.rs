//! URL derivation for the chat socket and the upload endpoint.

use crate::infra::error::AppError;

/// Builds the customer chat socket URL from the storefront base URL,
/// mirroring the page scheme: `http` becomes `ws`, `https` becomes `wss`.
pub fn chat_socket_url(base_url: &str, customer_id: i64) -> Result<String, AppError> {
    let (scheme, rest) = if let Some(rest) = base_url.strip_prefix("https://") {
        ("wss", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        ("ws", rest)
    } else {
        return Err(AppError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "expected an http:// or https:// scheme".to_owned(),
        });
    };

    let host = rest.trim_end_matches('/');
    if host.is_empty() {
        return Err(AppError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "missing host".to_owned(),
        });
    }

    Ok(format!("{scheme}://{host}/ws/customer/chat/{customer_id}"))
}

/// Builds the multipart upload endpoint URL.
pub fn upload_url(base_url: &str) -> String {
    format!(
        "{}/api/customer/chat/upload",
        base_url.trim_end_matches('/')
    )
}
