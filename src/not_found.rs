//! The 404 Not Found page.

use axum::{http::StatusCode, response::Response};
use maud::html;

use crate::{
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, render},
};

/// Route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

/// Build the 404 Not Found response.
pub fn get_404_not_found_response() -> Response {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-4xl font-bold mb-4" { "404 Not Found" }
            p class="mb-4" { "The page you were looking for does not exist." }
            a href=(endpoints::DASHBOARD_VIEW) class=(LINK_STYLE) { "Back to the dashboard" }
        }
    };

    render(StatusCode::NOT_FOUND, base("Not Found", &content))
}
