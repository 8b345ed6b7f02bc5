//! Authentication middleware that validates cookies, extends sessions, and handles redirects.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    auth::{
        Passphrase,
        cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
        redirect::log_in_redirect_url,
    },
};

/// How long an active session is kept alive after each request.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The passphrase guarding the app, `None` when the gate is disabled.
    pub passphrase: Option<Passphrase>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            passphrase: state.passphrase.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    if state.passphrase.is_none() {
        return next.run(request).await;
    }

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::error!("Error getting cookie jar: {error:?}. Redirecting to log in page.");
            let request = Request::from_parts(parts, body);
            return get_redirect(&log_in_redirect_url(&request));
        }
    };
    let request = Request::from_parts(parts, body);

    if let Err(error) = get_token_from_cookies(&jar) {
        tracing::debug!("Rejected auth cookie: {error}");
        return get_redirect(&log_in_redirect_url(&request));
    }

    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_auth_cookie_duration_if_needed(jar.clone(), SESSION_EXTENSION) {
        Ok(updated_jar) => updated_jar,
        Err(error) => {
            tracing::error!("Error extending cookie duration: {error}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, value) in jar.into_response().headers().iter() {
        if key == SET_COOKIE {
            parts.headers.append(key, value.to_owned());
        }
    }

    Response::from_parts(parts, body)
}

/// Middleware for pages: lets the request through if it carries a valid auth
/// cookie, otherwise redirects to the log-in page.
///
/// Every request passes when no passphrase is configured.
///
/// **Note**: The app state must contain an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware for htmx API routes: like [auth_guard], but redirects with the
/// `HX-Redirect` header so that htmx navigates the whole page.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Router,
        extract::State,
        middleware,
        response::Html,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key, SameSite},
    };
    use axum_test::TestServer;
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{
        Error,
        auth::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, Passphrase, set_auth_cookie},
        endpoints,
    };

    use super::{AuthState, auth_guard, auth_guard_hx};

    async fn test_handler() -> Html<&'static str> {
        Html("<h1>Hello, World!</h1>")
    }

    async fn stub_log_in_route(jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, Duration::seconds(5))
    }

    async fn stub_expired_log_in_route(jar: PrivateCookieJar) -> Result<PrivateCookieJar, Error> {
        set_auth_cookie(jar, Duration::seconds(-5))
    }

    const TEST_LOG_IN_ROUTE: &str = "/stub_log_in";
    const TEST_EXPIRED_LOG_IN_ROUTE: &str = "/stub_expired_log_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_state(passphrase: Option<&str>) -> AuthState {
        AuthState {
            cookie_key: Key::from(&Sha512::digest("nafstenoas")),
            passphrase: passphrase.and_then(Passphrase::new),
        }
    }

    fn get_test_server(passphrase: Option<&str>) -> TestServer {
        let state = get_test_state(passphrase);

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
            .route(TEST_EXPIRED_LOG_IN_ROUTE, post(stub_expired_log_in_route))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn get_test_server_hx() -> TestServer {
        let state = get_test_state(Some("hunter2"));

        let app = Router::new()
            .route(TEST_API_ROUTE, post(test_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
            .with_state(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn log_in_location(redirect_url: &str) -> String {
        let query = serde_urlencoded::to_string([("redirect_url", redirect_url)]).unwrap();
        format!("{}?{}", endpoints::LOG_IN_VIEW, query)
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_cookie() {
        let server = get_test_server(Some("hunter2"));
        let response = server.post(TEST_LOG_IN_ROUTE).await;
        response.assert_status_ok();

        server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(response.cookie(COOKIE_TOKEN))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn auth_guard_extends_valid_cookie_duration() {
        let server = get_test_server(Some("hunter2"));
        let response = server.post(TEST_LOG_IN_ROUTE).await;
        let response_time = OffsetDateTime::now_utc();

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookies(response.cookies())
            .await;

        let auth_cookie = response.cookie(COOKIE_TOKEN);
        assert_date_time_close(
            auth_cookie.expires_datetime().unwrap(),
            response_time + Duration::minutes(5),
        );
        assert_eq!(auth_cookie.secure(), Some(true));
        assert_eq!(auth_cookie.http_only(), Some(true));
        assert_eq!(auth_cookie.same_site(), Some(SameSite::Strict));
    }

    #[tokio::test]
    async fn no_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(Some("hunter2"));

        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_location(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn invalid_auth_cookie_redirects_to_log_in() {
        let server = get_test_server(Some("hunter2"));

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_TOKEN, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        assert_eq!(
            response.header("location"),
            log_in_location(TEST_PROTECTED_ROUTE)
        );
    }

    #[tokio::test]
    async fn expired_token_redirects_to_log_in() {
        let server = get_test_server(Some("hunter2"));
        let response = server.post(TEST_EXPIRED_LOG_IN_ROUTE).await;
        let mut token_cookie = response.cookie(COOKIE_TOKEN);
        // Make the client send the cookie anyway.
        token_cookie.set_expires(OffsetDateTime::now_utc() + DEFAULT_COOKIE_DURATION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(token_cookie)
            .await;

        response.assert_status_see_other();
    }

    #[tokio::test]
    async fn no_passphrase_lets_every_request_through() {
        let server = get_test_server(None);

        server.get(TEST_PROTECTED_ROUTE).await.assert_status_ok();
    }

    #[tokio::test]
    async fn api_route_uses_hx_current_url_for_redirect() {
        let server = get_test_server_hx();
        let current_url = "http://localhost:3000/pending";

        let response = server
            .post(TEST_API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        assert_eq!(response.header("hx-redirect"), log_in_location("/pending"));
    }
}
