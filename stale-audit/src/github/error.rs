//! Mapping of octocrab failures onto the fetch error taxonomy.

use crate::fetch::FetchError;

/// Classifies an octocrab error by HTTP status.
///
/// 401 and "bad credentials" 403s are authentication failures; 404, 409 (empty
/// repository) and 422 (unknown SHA) mean the resource is missing; anything
/// else, including rate-limit 403s, is a transport failure.
pub(crate) fn classify_error(error: octocrab::Error, resource: &str) -> FetchError {
    if let octocrab::Error::GitHub { source, .. } = &error {
        let message = source.message.clone();
        return classify_status(source.status_code.as_u16(), message, resource);
    }

    FetchError::transport(format!("{resource}: {error}"))
}

fn classify_status(status: u16, message: String, resource: &str) -> FetchError {
    match status {
        401 => FetchError::Auth { message },
        403 if message.to_lowercase().contains("bad credentials") => FetchError::Auth { message },
        404 | 409 | 422 => FetchError::NotFound {
            resource: resource.to_string(),
        },
        _ => FetchError::transport(format!("{resource}: HTTP {status}: {message}")),
    }
}
