//! This file defines the routes for displaying the log-in page and handling log-in requests.
//! The auth module handles the lower level authentication and cookie auth logic.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::{
    AppState, Error,
    app_state::create_cookie_key,
    auth::{
        DEFAULT_COOKIE_DURATION, User, get_user, invalidate_auth_cookie,
        redirect::normalize_redirect_url, set_auth_cookie,
    },
    endpoints,
    html::{LINK_STYLE, base, loading_spinner, log_in_register, password_input},
};

fn log_in_form(password: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (password_input(password, 0, error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me logged in for one week"
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-green-700 dark:bg-green-800 disabled:bg-green-900
                    hover:enabled:bg-green-800 hover:enabled:dark:bg-green-900 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Log in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have a password? "
                a href=(endpoints::REGISTER_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Register here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(normalize_redirect_url) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "log-in query");
    let log_in_form = log_in_form("", None, redirect_url.as_deref());
    let content = log_in_register("Log in to the school's books", &log_in_form);
    base("Log In", &content).into_response()
}

/// How long the auth cookie should last if the user selects "remember me" at log-in.
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

/// The state needed to perform a login.
#[derive(Debug, Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection holding the registered password hash.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl LoginState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

pub(super) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";

/// Handler for log-in requests via the POST method.
///
/// On a successful log-in request, the auth cookie is set and the client is
/// redirected to the dashboard page. Otherwise, the form is returned with an
/// error message explaining the problem.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "log-in form");
    let redirect_url = redirect_url.as_deref();
    let user: User = match get_user(
        &state
            .db_connection
            .lock()
            .expect("Could not acquire lock to database connection"),
    ) {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_form(
                "",
                Some("Password not set, go to the registration page and set your password"),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(
                "",
                Some("An internal error occurred. Please try again later."),
                redirect_url,
            )
            .into_response();
        }
    };

    let is_password_valid = match user.password_hash.verify(&user_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(
                "",
                Some("An internal error occurred. Please try again later."),
                redirect_url,
            )
            .into_response();
        }
    };

    if !is_password_valid {
        return log_in_form("", Some(INVALID_CREDENTIALS_ERROR_MSG), redirect_url).into_response();
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    set_auth_cookie(jar.clone(), cookie_duration)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting auth cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
        })
        .into_response()
}

/// The query string accepted by the log-in page.
#[derive(Deserialize)]
pub struct RedirectQuery {
    /// Where to send the user after a successful log-in.
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the log-in form.
///
/// The password is stored as a plain string. There is no need for validation here since
/// it will be compared against the password in the database, which has been verified.
#[derive(Clone, Serialize, Deserialize)]
pub struct LogInData {
    /// Password entered during log-in.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after logging in.
    /// Only accepted from the log-in form submission.
    pub redirect_url: Option<String>,
}

#[cfg(test)]
mod log_in_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        body::Body,
        extract::{Query, State},
        http::{Response, StatusCode, header::SET_COOKIE},
    };
    use axum_extra::extract::PrivateCookieJar;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;

    use crate::{
        auth::{PasswordHash, create_user, create_user_table},
        endpoints,
    };

    use super::{
        INVALID_CREDENTIALS_ERROR_MSG, LogInData, LoginState, RedirectQuery, get_log_in_page,
        post_log_in,
    };

    fn get_test_state(password_hash: Option<PasswordHash>) -> LoginState {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        create_user_table(&connection).expect("Could not create user table");

        if let Some(password_hash) = password_hash {
            create_user(password_hash, &connection).expect("Could not create test user");
        }

        LoginState::new("foobar", Arc::new(Mutex::new(connection)))
    }

    async fn new_log_in_request(state: LoginState, log_in_form: LogInData) -> Response<Body> {
        let jar = PrivateCookieJar::new(state.cookie_key.clone());

        post_log_in(State(state), jar, Form(log_in_form)).await
    }

    async fn body_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        String::from_utf8_lossy(&body).to_string()
    }

    #[tokio::test]
    async fn log_in_page_displays_form() {
        let response = get_log_in_page(Query(RedirectQuery { redirect_url: None })).await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains(&format!("hx-post=\"{}\"", endpoints::LOG_IN_API)));
        assert!(text.contains(endpoints::REGISTER_VIEW));
    }

    #[tokio::test]
    async fn log_in_page_preserves_redirect_url() {
        let redirect_url = "/credits?category=Fee".to_string();

        let response = get_log_in_page(Query(RedirectQuery {
            redirect_url: Some(redirect_url.clone()),
        }))
        .await;

        let text = body_text(response).await;
        assert!(
            text.contains("name=\"redirect_url\""),
            "expected hidden redirect_url input"
        );
        assert!(text.contains(&redirect_url));
    }

    #[tokio::test]
    async fn log_in_succeeds_with_valid_credentials() {
        let state = get_test_state(Some(PasswordHash::from_raw_password("averygoodpassword", 4).unwrap()));

        let response = new_log_in_request(
            state,
            LogInData {
                password: "averygoodpassword".to_string(),
                remember_me: None,
                redirect_url: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );
        assert!(response.headers().contains_key(SET_COOKIE));
    }

    #[tokio::test]
    async fn log_in_redirects_to_requested_url() {
        let state = get_test_state(Some(PasswordHash::from_raw_password("averygoodpassword", 4).unwrap()));
        let redirect_url = "/debits?from=2024-01-01&to=2024-12-31";

        let response = new_log_in_request(
            state,
            LogInData {
                password: "averygoodpassword".to_string(),
                remember_me: None,
                redirect_url: Some(redirect_url.to_string()),
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(HX_REDIRECT).unwrap(), redirect_url);
    }

    #[tokio::test]
    async fn log_in_falls_back_on_invalid_redirect_url() {
        let state = get_test_state(Some(PasswordHash::from_raw_password("averygoodpassword", 4).unwrap()));

        let response = new_log_in_request(
            state,
            LogInData {
                password: "averygoodpassword".to_string(),
                remember_me: None,
                redirect_url: Some("https://example.com".to_string()),
            },
        )
        .await;

        assert_eq!(
            response.headers().get(HX_REDIRECT).unwrap(),
            endpoints::DASHBOARD_VIEW
        );
    }

    #[tokio::test]
    async fn log_in_fails_with_incorrect_password() {
        let state = get_test_state(Some(PasswordHash::from_raw_password("averygoodpassword", 4).unwrap()));

        let response = new_log_in_request(
            state,
            LogInData {
                password: "wrongpassword".to_string(),
                remember_me: None,
                redirect_url: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains(INVALID_CREDENTIALS_ERROR_MSG));
    }

    #[tokio::test]
    async fn log_in_without_registered_password_points_to_registration() {
        let state = get_test_state(None);

        let response = new_log_in_request(
            state,
            LogInData {
                password: "anything".to_string(),
                remember_me: None,
                redirect_url: None,
            },
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let text = body_text(response).await;
        assert!(text.contains("registration page"));
    }
}
