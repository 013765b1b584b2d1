use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::server::CodeCell;

const CONFIRMATION_PAGE: &str =
    "<h2>Authorization response received.</h2><p>You can close this browser tab.</p>";

/// Stores the `code` query parameter for the polling loop.
///
/// A redirect without `code` (the user declined consent) is stored as an
/// empty string so the waiting side learns about it instead of timing out.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(code): Extension<CodeCell>,
) -> Html<&'static str> {
    let received = params.get("code").cloned().unwrap_or_default();
    *code.lock().await = Some(received);

    Html(CONFIRMATION_PAGE)
}
