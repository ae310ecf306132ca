//! The 500 Internal Server Error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::html;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, render},
};

/// The description and suggested fix shown on the error page.
pub struct InternalServerErrorPageTemplate<'a> {
    /// What went wrong, in one line.
    pub description: &'a str,
    /// What the user (or the operator) can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerErrorPageTemplate<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Try again later or check the server logs",
        }
    }
}

/// An htmx redirect to the error page, for handlers that respond to htmx
/// requests rather than full page loads.
pub fn get_internal_server_error_redirect() -> Response {
    (
        StatusCode::SEE_OTHER,
        HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
        (),
    )
        .into_response()
}

/// Route handler that displays the generic error page.
pub async fn get_internal_server_error_page() -> Response {
    render_internal_server_error(Default::default())
}

/// Build the 500 Internal Server Error response.
pub fn render_internal_server_error(template: InternalServerErrorPageTemplate) -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-4xl font-bold mb-4" { "500 Internal Server Error" }
            p class="mb-2" { (template.description) }
            p { (template.fix) }
        }
    };

    render(
        StatusCode::INTERNAL_SERVER_ERROR,
        base("Internal Server Error", &content),
    )
}
