//! Inline alert partials for form validation and operation results.

use maud::{Markup, Render, html};

/// The severity of an alert, which controls its color.
enum AlertKind {
    Error,
    Success,
}

/// An inline alert with a bold title and a detail message.
///
/// Endpoints return these as HTML fragments so htmx can swap them into the
/// page next to the form that triggered the request.
pub struct AlertTemplate {
    kind: AlertKind,
    title: String,
    message: String,
}

impl AlertTemplate {
    /// An alert for a failed operation or invalid input.
    pub fn error(title: &str, message: &str) -> Self {
        Self {
            kind: AlertKind::Error,
            title: title.to_owned(),
            message: message.to_owned(),
        }
    }

    /// An alert for a completed operation.
    pub fn success(title: &str, message: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            title: title.to_owned(),
            message: message.to_owned(),
        }
    }
}

impl Render for AlertTemplate {
    fn render(&self) -> Markup {
        let style = match self.kind {
            AlertKind::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                 dark:bg-gray-800 dark:text-red-400"
            }
            AlertKind::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                 dark:bg-gray-800 dark:text-green-400"
            }
        };

        html! {
            div class=(style) role="alert"
            {
                span class="font-medium" { (self.title) " " }
                (self.message)
            }
        }
    }
}
