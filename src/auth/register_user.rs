//! The registration page for setting the password for accessing the app.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
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
    AppState,
    app_state::create_cookie_key,
    auth::{
        DEFAULT_COOKIE_DURATION, PasswordHash, ValidatedPassword, count_users, create_user,
        set_auth_cookie,
    },
    endpoints,
    html::{
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, base, loading_spinner,
        log_in_register, password_input,
    },
    internal_server_error::get_internal_server_error_redirect,
};

/// The minimum number of characters the password should have to be considered
/// valid on the client side (server-side validation is done on top of this
/// validation).
const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

fn confirm_password_input(min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="confirm-password"
                class=(FORM_LABEL_STYLE)
            {
                "Confirm Password"
            }

            input
                type="password"
                name="confirm_password"
                id="confirm-password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                minlength=(min_length)
                autofocus[error_message.is_some()]
            ;

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

fn registration_form(
    password: &str,
    password_error_message: Option<&str>,
    confirm_password_error_message: Option<&str>,
) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, password_error_message))
            (confirm_password_input(PASSWORD_INPUT_MIN_LENGTH, confirm_password_error_message))

            button
                type="submit" id="submit-button" tabindex="0"
                class="w-full px-4 py-2 bg-green-700 dark:bg-green-800 disabled:bg-green-900
                    hover:enabled:bg-green-800 hover:enabled:dark:bg-green-900 text-white rounded"
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Password"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have a password? "

                a href=(endpoints::LOG_IN_VIEW) tabindex="0" class=(LINK_STYLE)
                {
                  "Log in here"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let registration_form = registration_form("", None, None);
    let content = log_in_register("Create Password", &registration_form);
    base("Register", &content).into_response()
}

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection to store the password hash in.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl RegistrationState {
    /// Create the cookie key from a string and set the default cookie duration.
    pub fn new(cookie_secret: &str, db_connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        }
    }
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered in the registration form.
#[derive(Serialize, Deserialize)]
pub struct RegisterForm {
    /// The password to protect the app with.
    pub password: String,
    /// A second copy of the password to catch typos.
    pub confirm_password: String,
}

/// Handler for registration requests via the POST method.
///
/// Registration is only open while no password has been set. Once a password
/// exists the form is returned with an error directing the user to log in.
pub async fn register_user(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterForm>,
) -> Response {
    match count_users(
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    ) {
        Ok(count) if count >= 1 => {
            return registration_form(
                &user_data.password,
                None,
                Some("A password has already been created, please log in with your existing password."),
            ).into_response();
        }
        _ => {}
    }

    let validated_password = match ValidatedPassword::new(&user_data.password) {
        Ok(password) => password,
        Err(error) => {
            return registration_form(&user_data.password, Some(error.to_string().as_ref()), None)
                .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return registration_form(&user_data.password, None, Some("Passwords do not match"))
            .into_response();
    }

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!("an error occurred while hashing a password: {e}");

            return get_internal_server_error_redirect();
        }
    };

    create_user(
        password_hash,
        &state
            .db_connection
            .lock()
            .expect("Could not acquire database lock"),
    )
    .map(|_| {
        let jar = set_auth_cookie(jar, state.cookie_duration);

        match jar {
            Ok(jar) => (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                jar,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("An error occurred while setting the auth cookie: {e}");

                get_internal_server_error_redirect()
            }
        }
    })
    .map_err(|e| {
        tracing::error!("An unhandled error occurred while inserting a new user: {e}");

        get_internal_server_error_redirect()
    })
    .into_response()
}
