//! Defines functions for handling user authentication with cookies.
//!
//! The app has a single password, so the session cookie does not identify a
//! user. Its value is the session expiry, signed and encrypted by the
//! private cookie jar so the client cannot forge or extend it.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{
    Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::Error;

pub(crate) const COOKIE_SESSION: &str = "session";
/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Date time format for the session expiry, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

fn build_session_cookie(expiry: OffsetDateTime) -> Result<Cookie<'static>, Error> {
    // Use format instead of to_string to avoid errors at midnight when the
    // hour is printed as a single digit when [DATE_TIME_FORMAT] expects two
    // digits.
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    Ok(Cookie::build((COOKIE_SESSION, expiry_string))
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build())
}

/// Add an auth cookie to the cookie jar, indicating that the user is logged in.
///
/// Sets the initial expiry of the cookie to `duration` from the current time.
/// You can use [DEFAULT_COOKIE_DURATION] for the default duration.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns an [Error::InvalidDateFormat] if the expiry time cannot be formatted.
pub fn set_auth_cookie(jar: PrivateCookieJar, duration: Duration) -> Result<PrivateCookieJar, Error> {
    let expiry = OffsetDateTime::now_utc() + duration;

    Ok(jar.add(build_session_cookie(expiry)?))
}

/// Set the auth cookie to an invalid value and set its max age to zero, which
/// should delete the cookie on the client side.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session expiry stored in the auth cookie.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if the auth cookie is not in the cookie jar.
/// - [Error::InvalidDateFormat] if the cookie value cannot be parsed.
pub(crate) fn get_session_expiry(jar: &PrivateCookieJar) -> Result<OffsetDateTime, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::CookieMissing)?;

    extract_date_time(&cookie)
}

/// Check that the auth cookie in `jar` marks a live session.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if the cookie is missing, unreadable,
/// or expired.
pub(crate) fn assert_session_is_live(jar: &PrivateCookieJar) -> Result<(), Error> {
    let expiry = get_session_expiry(jar).map_err(|_| Error::InvalidCredentials)?;

    if expiry > OffsetDateTime::now_utc() {
        Ok(())
    } else {
        Err(Error::InvalidCredentials)
    }
}

/// Set the expiry of the auth cookie in `jar` to the latest of UTC now
/// plus `duration` and the cookie's current expiry.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns:
/// - [Error::CookieMissing] if the auth cookie is not in the cookie jar.
/// - [Error::InvalidDateFormat] if the stored expiry cannot be parsed or the
///   new expiry cannot be formatted.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let current_expiry = get_session_expiry(&jar)?;
    let new_expiry = OffsetDateTime::now_utc() + duration;

    let expiry = max(current_expiry, new_expiry);

    Ok(jar.add(build_session_cookie(expiry)?))
}

fn extract_date_time(cookie: &Cookie) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), cookie.value_trimmed().to_owned())
    })
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::Error;

    use super::{
        COOKIE_SESSION, DEFAULT_COOKIE_DURATION, assert_session_is_live,
        extend_auth_cookie_duration_if_needed, get_session_expiry, invalidate_auth_cookie,
        set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn can_set_cookie() {
        let jar = get_jar();

        let jar = set_auth_cookie(jar, DEFAULT_COOKIE_DURATION).unwrap();
        let got_expiry = get_session_expiry(&jar).unwrap();

        assert_date_time_close!(got_expiry, OffsetDateTime::now_utc() + Duration::minutes(5));
        assert!(assert_session_is_live(&jar).is_ok());
    }

    #[test]
    fn missing_cookie_is_not_a_session() {
        let jar = get_jar();

        assert_eq!(get_session_expiry(&jar), Err(Error::CookieMissing));
        assert_eq!(assert_session_is_live(&jar), Err(Error::InvalidCredentials));
    }

    #[test]
    fn expired_cookie_is_not_a_session() {
        let jar = set_auth_cookie(get_jar(), Duration::minutes(-5)).unwrap();

        assert_eq!(assert_session_is_live(&jar), Err(Error::InvalidCredentials));
    }

    #[test]
    fn can_extend_cookie_duration() {
        let jar = set_auth_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10)).unwrap();

        let got_expiry = get_session_expiry(&jar).unwrap();
        assert_date_time_close!(got_expiry, OffsetDateTime::now_utc() + Duration::minutes(10));
    }

    #[test]
    fn cookie_duration_does_not_shrink() {
        let jar = set_auth_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();
        let want = get_session_expiry(&jar).unwrap();

        // The initial cookie is set to expire in 5 minutes, so extending it
        // by 5 seconds should not change the expiry.
        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::seconds(5)).unwrap();

        assert_eq!(get_session_expiry(&jar).unwrap(), want);
    }

    #[test]
    fn invalidate_auth_cookie_succeeds() {
        let jar = set_auth_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(assert_session_is_live(&jar), Err(Error::InvalidCredentials));
    }
}
