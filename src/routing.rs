//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    response::Redirect,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        AuthState, auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_register_page,
        post_log_in, register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    report::{export_report_csv, get_report_print_page, get_reports_page},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_credits_page, get_debits_page, get_edit_transaction_page, get_new_transaction_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let auth_state = AuthState::from_ref(&state);

    let unprotected_routes = Router::new()
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(endpoints::USERS, post(register_user))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::CREDITS_VIEW, get(get_credits_page))
        .route(endpoints::DEBITS_VIEW, get(get_debits_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_new_transaction_page),
        )
        .route(
            endpoints::EDIT_TRANSACTION_VIEW,
            get(get_edit_transaction_page),
        )
        .route(endpoints::REPORTS_VIEW, get(get_reports_page))
        .route(endpoints::REPORT_PRINT_VIEW, get(get_report_print_page))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_guard,
        ));

    // These API routes need to use the HX-Redirect header for auth redirects
    // to work properly for HTMX requests.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .route(
                endpoints::TRANSACTION,
                put(edit_transaction_endpoint).delete(delete_transaction_endpoint),
            )
            .route(endpoints::EXPORT_CSV, get(export_report_csv))
            .layer(middleware::from_fn_with_state(auth_state, auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
