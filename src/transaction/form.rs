//! The shared form markup for recording and editing transactions.

use maud::{Markup, html};
use time::Date;

use crate::{
    category::suggested_categories,
    dates::canonical_date_string,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    transaction::TransactionKind,
};

/// Whether the form creates a new transaction or updates an existing one.
pub(super) enum FormMethod {
    /// `hx-post` to the given URL.
    Post(String),
    /// `hx-put` to the given URL.
    Put(String),
}

/// The values the form is pre-filled with.
pub(super) struct FormValues {
    pub kind: TransactionKind,
    /// Empty for a new transaction.
    pub amount: Option<f64>,
    pub category: String,
    pub description: String,
    pub date: Date,
}

const CATEGORY_DATALIST_ID: &str = "category-suggestions";

fn category_datalist() -> Markup {
    // Credit and debit suggestions share one datalist because the kind can be
    // switched without reloading the form.
    let mut suggestions: Vec<&str> = Vec::new();
    for kind in [TransactionKind::Credit, TransactionKind::Debit] {
        for category in suggested_categories(kind) {
            if !suggestions.contains(category) {
                suggestions.push(category);
            }
        }
    }

    html! {
        datalist id=(CATEGORY_DATALIST_ID)
        {
            @for category in suggestions {
                option value=(category) {}
            }
        }
    }
}

/// Render the transaction form.
///
/// Validation errors returned by the endpoint are swapped into the `#alert`
/// element by htmx; on success the endpoint redirects to the ledger page for
/// the transaction's kind.
pub(super) fn transaction_form(
    method: FormMethod,
    values: &FormValues,
    submit_label: &str,
) -> Markup {
    let (hx_post, hx_put) = match &method {
        FormMethod::Post(url) => (Some(url.as_str()), None),
        FormMethod::Put(url) => (None, Some(url.as_str())),
    };

    html! {
        form
            hx-post=[hx_post]
            hx-put=[hx_put]
            hx-target="#alert"
            hx-indicator="#indicator"
            class="space-y-4 md:space-y-6 w-full max-w-md"
        {
            div id="alert" {}

            div
            {
                label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for kind in [TransactionKind::Credit, TransactionKind::Debit] {
                        option
                            value=(kind.as_str())
                            selected[values.kind == kind]
                        {
                            (kind.label())
                        }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount (Rs)" }

                input
                    type="number"
                    name="amount"
                    id="amount"
                    class=(FORM_TEXT_INPUT_STYLE)
                    min="0.01"
                    step="any"
                    required
                    value=[values.amount];
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    type="text"
                    name="category"
                    id="category"
                    class=(FORM_TEXT_INPUT_STYLE)
                    list=(CATEGORY_DATALIST_ID)
                    required
                    value=(values.category);

                (category_datalist())
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required
                    value=(canonical_date_string(values.date));
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="description"
                    class=(FORM_TEXT_INPUT_STYLE)
                    placeholder="e.g. Term fees, class 5"
                    value=(values.description);
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
                (submit_label)
            }
        }
    }
}
