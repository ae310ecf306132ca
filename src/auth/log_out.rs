//! Route handler for logging out.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_auth_cookie, endpoints};

/// Invalidate the session cookie and send the user back to the log-in page.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    (
        invalidate_auth_cookie(jar),
        Redirect::to(endpoints::LOG_IN_VIEW),
    )
        .into_response()
}

#[cfg(test)]
mod log_out_tests {
    use axum::http::{StatusCode, header::SET_COOKIE};
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{DEFAULT_COOKIE_DURATION, set_auth_cookie},
        endpoints,
    };

    use super::get_log_out;

    #[tokio::test]
    async fn log_out_clears_cookie_and_redirects() {
        let hash = Sha512::digest(b"foobar");
        let jar = PrivateCookieJar::new(Key::from(&hash));
        let jar = set_auth_cookie(jar, DEFAULT_COOKIE_DURATION).unwrap();

        let response = get_log_out(jar).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get("location").unwrap(),
            endpoints::LOG_IN_VIEW
        );
        assert!(response.headers().contains_key(SET_COOKIE));
    }
}
