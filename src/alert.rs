//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as HTML fragments that HTMX swaps into the
//! `#alert-container` element of the base page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// An alert message and its styling.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message on its own.
    SuccessSimple { message: String },
    /// An error message with details on how to fix the problem.
    Error { message: String, details: String },
    /// An error message on its own.
    ErrorSimple { message: String },
}

impl Alert {
    pub fn into_html(self) -> Markup {
        let (is_error, message, details) = match self {
            Alert::SuccessSimple { message } => (false, message, String::new()),
            Alert::Error { message, details } => (true, message, details),
            Alert::ErrorSimple { message } => (true, message, String::new()),
        };

        let style = if is_error {
            "flex items-start justify-between gap-4 p-4 text-sm rounded-lg shadow \
            text-red-800 bg-red-50 dark:bg-gray-800 dark:text-red-400"
        } else {
            "flex items-start justify-between gap-4 p-4 text-sm rounded-lg shadow \
            text-green-800 bg-green-50 dark:bg-gray-800 dark:text-green-400"
        };

        html!(
            div class=(style) role="alert"
            {
                div
                {
                    span class="font-medium" { (message) }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    class="font-bold"
                    onclick="this.closest('[role=alert]').remove()"
                {
                    "×"
                }
            }
        )
    }

    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_response_with_status(StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use scraper::Selector;

    use crate::{
        alert::Alert,
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    #[tokio::test]
    async fn renders_error_with_details() {
        let response = Alert::Error {
            message: "Oh no".to_owned(),
            details: "Try again".to_owned(),
        }
        .into_response_with_status(StatusCode::BAD_REQUEST);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let alert = html
            .select(&Selector::parse("[role=alert]").unwrap())
            .next()
            .expect("could not find alert");
        let text = alert.text().collect::<String>();
        assert!(text.contains("Oh no"));
        assert!(text.contains("Try again"));
        assert!(alert.value().attr("class").unwrap().contains("text-red-800"));
    }

    #[tokio::test]
    async fn success_alert_has_ok_status() {
        let response = Alert::SuccessSimple {
            message: "Saved".to_owned(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let paragraphs = html.select(&Selector::parse("p").unwrap()).count();
        assert_eq!(paragraphs, 0, "simple alerts should not render details");
    }
}
