//! Reading and writing the auth cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Token};

/// The name of the private cookie holding the serialized [Token].
pub(crate) const COOKIE_TOKEN: &str = "token";

/// The default duration for which auth cookies are valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Add an auth cookie to `jar` that is valid for `duration` from now.
///
/// # Errors
/// Returns [Error::JSONSerializationError] if the token cannot be serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expires_at = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDate(format!("now plus {duration} is out of range")))?;

    set_token(jar, Token { expires_at })
}

fn set_token(jar: PrivateCookieJar, token: Token) -> Result<PrivateCookieJar, Error> {
    let token_string = serde_json::to_string(&token)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_TOKEN, token_string))
            .expires(token.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Get the token from the auth cookie, checking that it has not expired.
///
/// # Errors
/// Returns:
/// - [Error::CookieMissing] if there is no auth cookie or it could not be decrypted.
/// - [Error::JSONSerializationError] if the cookie does not hold a token.
/// - [Error::TokenExpired] if the token has expired.
pub(crate) fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;
    let token: Token = serde_json::from_str(cookie.value_trimmed())
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    if token.is_valid_at(OffsetDateTime::now_utc()) {
        Ok(token)
    } else {
        Err(Error::TokenExpired)
    }
}

/// Push the expiry of the auth cookie out to at least `duration` from now.
///
/// A cookie that already lasts longer, e.g. after "remember me", keeps its
/// expiry. The jar is returned unchanged on error.
pub(crate) fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;
    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or_else(|| Error::InvalidDate(format!("now plus {duration} is out of range")))?;

    set_token(
        jar,
        Token {
            expires_at: max(token.expires_at, new_expiry),
        },
    )
}

/// Overwrite the auth cookie with an expired one so the browser drops it.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_TOKEN, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::Error;

    use super::{
        COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, extend_auth_cookie_duration_if_needed,
        get_token_from_cookies, invalidate_auth_cookie, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::from(&Sha512::digest("foobar")))
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_cookie_holds_token() {
        let jar = set_auth_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        let cookie = jar.get(COOKIE_TOKEN).unwrap();

        let want = OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION;
        assert_date_time_close(token.expires_at, want);
        assert_date_time_close(cookie.expires_datetime().unwrap(), want);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(get_token_from_cookies(&get_jar()), Err(Error::CookieMissing));
    }

    #[test]
    fn expired_token_is_an_error() {
        let jar = set_auth_cookie(get_jar(), Duration::seconds(-1)).unwrap();

        assert_eq!(get_token_from_cookies(&jar), Err(Error::TokenExpired));
    }

    #[test]
    fn extends_short_cookie() {
        let jar = set_auth_cookie(get_jar(), Duration::seconds(5)).unwrap();

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(10)).unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_date_time_close(
            token.expires_at,
            OffsetDateTime::now_utc() + Duration::minutes(10),
        );
    }

    #[test]
    fn keeps_longer_expiry() {
        let jar = set_auth_cookie(get_jar(), Duration::days(7)).unwrap();
        let want = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar = extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5)).unwrap();

        assert_eq!(get_token_from_cookies(&jar).unwrap().expires_at, want);
    }

    #[test]
    fn invalidated_cookie_is_rejected() {
        let jar = set_auth_cookie(get_jar(), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);

        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert!(matches!(
            get_token_from_cookies(&jar),
            Err(Error::JSONSerializationError(_))
        ));
    }
}
