//! API description endpoints: the raw document and a browsable reference.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};

use crate::AppState;
use crate::error::ApiError;

/// Reference UI page. The Scalar script fetches `/openapi.json` in the browser.
const REFERENCE_PAGE: &str = r#"<!doctype html>
<html>
<head>
  <title>SummitMate API Reference</title>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
</head>
<body>
  <div id="app"></div>
  <script src="https://cdn.jsdelivr.net/npm/@scalar/api-reference"></script>
  <script>
    Scalar.createApiReference('#app', {
      url: '/openapi.json',
      theme: 'kepler',
    })
  </script>
</body>
</html>
"#;

/// GET /openapi.json — the generated API document.
///
/// Regenerated on every request; a generation failure is answered with a
/// plain-text 500.
#[tracing::instrument(skip(state))]
pub async fn openapi_json(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let document = state.schema.document()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], document))
}

/// GET /docs — HTML reference UI.
pub async fn reference() -> Html<&'static str> {
    Html(REFERENCE_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_page_points_at_document_route() {
        assert!(REFERENCE_PAGE.contains("url: '/openapi.json'"));
        assert!(REFERENCE_PAGE.contains("@scalar/api-reference"));
    }
}
