//! The base HTML template, shared styles, and formatting helpers.

use std::sync::OnceLock;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, Render, html};
use numfmt::{Formatter, Precision};
use unicode_segmentation::UnicodeSegmentation;

use crate::transaction::TransactionKind;

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "px-4 py-2 bg-green-700 \
    dark:bg-green-800 disabled:bg-green-900 hover:enabled:bg-green-800 \
    hover:enabled:dark:bg-green-900 text-white rounded";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_CONTAINER_STYLE: &str = "flex flex-col items-center px-6 py-8 \
    mx-auto lg:py-0 max-w-md text-gray-900 dark:text-white";
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-green-600 focus:border-green-600";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

// Summary card styles
pub const CARD_STYLE: &str = "flex flex-col gap-1 p-4 rounded-lg border \
    border-gray-200 dark:border-gray-700 bg-white dark:bg-gray-800";
pub const CARD_TITLE_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";
pub const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

// Page container
pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col px-6 py-8 mx-auto lg:py-5 max-w-5xl text-gray-900 dark:text-white";

/// The max number of graphemes to display in transaction table rows before
/// truncating and displaying ellipses.
pub const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

/// The base page shell: doctype, head, stylesheet and htmx script links.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Bursary" }
                link href="/static/main.css" rel="stylesheet";
                script src="https://unpkg.com/htmx.org@2.0.8" {}
            }

            body class="bg-gray-100 dark:bg-gray-900"
            {
                (content)
            }
        }
    }
}

/// Render `content` as an HTML response with `status_code`.
#[inline]
pub fn render(status_code: StatusCode, content: impl Render) -> Response {
    (status_code, Html(content.render().into_string())).into_response()
}

/// Format a whole-rupee amount, e.g. `Rs50,000`.
///
/// The school keeps its books in whole rupees, so amounts are rounded and
/// rendered without decimals.
pub fn format_currency(number: f64) -> String {
    static POSITIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let positive_fmt = POSITIVE_FMT.get_or_init(|| {
        Formatter::currency("Rs")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    static NEGATIVE_FMT: OnceLock<Formatter> = OnceLock::new();

    let negative_fmt = NEGATIVE_FMT.get_or_init(|| {
        Formatter::currency("-Rs")
            .unwrap()
            .precision(Precision::Decimals(0))
    });

    let number = if number.is_finite() { number.round() } else { 0.0 };

    if number < 0.0 {
        negative_fmt.fmt_string(number.abs())
    } else if number > 0.0 {
        positive_fmt.fmt_string(number)
    } else {
        // Zero is hardcoded as "0", so we must specify the formatted string for zero
        "Rs0".to_owned()
    }
}

/// The card layout shared by the log-in and registration pages.
pub fn log_in_register(form_title: &str, form: &Markup) -> Markup {
    html! {
        div class="flex flex-col items-center justify-center px-6 py-8 mx-auto"
        {
            a href="#" class="flex items-center mb-6 text-2xl font-semibold text-gray-900 dark:text-white"
            {
                "Bursary"
            }

            div class="w-full bg-white rounded-lg shadow dark:border md:mt-0 sm:max-w-md xl:p-0 dark:bg-gray-800 dark:border-gray-700"
            {
                div class="p-6 space-y-4 md:space-y-6 sm:p-8"
                {
                    h1 class="text-xl font-bold leading-tight tracking-tight text-gray-900 md:text-2xl dark:text-white"
                    {
                        (form_title)
                    }

                    (form)
                }
            }
        }
    }
}

/// A labelled password input with an optional inline error message.
pub fn password_input(password: &str, min_length: u8, error_message: Option<&str>) -> Markup {
    html! {
        div
        {
            label
                for="password"
                class=(FORM_LABEL_STYLE)
            {
                "Password"
            }

            input
                type="password"
                name="password"
                id="password"
                placeholder="••••••••"
                class=(FORM_TEXT_INPUT_STYLE)
                required
                autofocus
                value=(password)
                minlength=(min_length);

            @if let Some(error_message) = error_message
            {
                p class="text-red-500 text-base" { (error_message) }
            }
        }

    }
}

/// The loading indicator shown on buttons while htmx requests are in flight.
pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// The text color for an amount of the given kind.
pub fn amount_class(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Credit => "text-green-700 dark:text-green-300",
        TransactionKind::Debit => "text-red-700 dark:text-red-300",
    }
}

/// A colored credit/debit badge.
pub fn kind_badge(kind: TransactionKind) -> Markup {
    let style = match kind {
        TransactionKind::Credit => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold \
             text-green-800 bg-green-100 rounded-full dark:bg-green-900 dark:text-green-300"
        }
        TransactionKind::Debit => {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold \
             text-red-800 bg-red-100 rounded-full dark:bg-red-900 dark:text-red-300"
        }
    };

    html! { span class=(style) { (kind.label()) } }
}

/// Truncate `text` to [MAX_DESCRIPTION_GRAPHEMES] graphemes, appending an
/// ellipsis when something was cut.
pub fn truncate_description(text: &str) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();

    if graphemes.len() <= MAX_DESCRIPTION_GRAPHEMES {
        text.to_owned()
    } else {
        let mut truncated: String = graphemes[..MAX_DESCRIPTION_GRAPHEMES].concat();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod html_tests {
    use super::{format_currency, truncate_description};

    #[test]
    fn currency_renders_whole_rupees() {
        assert_eq!(format_currency(50_000.0), "Rs50,000");
        assert_eq!(format_currency(-1_234.0), "-Rs1,234");
        assert_eq!(format_currency(0.0), "Rs0");
    }

    #[test]
    fn currency_treats_non_finite_amounts_as_zero() {
        assert_eq!(format_currency(f64::NAN), "Rs0");
    }

    #[test]
    fn short_descriptions_are_untouched() {
        assert_eq!(truncate_description("Chalk and dusters"), "Chalk and dusters");
    }

    #[test]
    fn long_descriptions_gain_an_ellipsis() {
        let long = "a".repeat(50);

        let truncated = truncate_description(&long);

        assert!(truncated.ends_with('…'));
        assert_eq!(truncated.chars().count(), 33);
    }
}
