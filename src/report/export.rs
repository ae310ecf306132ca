//! The CSV download of a report.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use time::OffsetDateTime;

use crate::{
    Error,
    dates::{canonical_date_string, get_local_offset},
    html::format_currency,
    report::{
        core::{Report, ReportQuery},
        page::{ReportViewState, load_report},
    },
    transaction::TransactionKind,
};

/// A route handler serving the requested report as a CSV attachment.
///
/// The file mirrors the on-screen report: a title and period preamble, the
/// summary figures, then one row per covered transaction with the amount
/// signed by its kind.
pub async fn export_report_csv(
    State(state): State<ReportViewState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let report = load_report(&state, &query)?;

    let body = match build_csv(&report) {
        Ok(body) => body,
        Err(error) => {
            tracing::error!("could not build the CSV export: {error}");

            return Ok(
                (StatusCode::INTERNAL_SERVER_ERROR, "could not build the CSV export")
                    .into_response(),
            );
        }
    };

    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();
    let filename = format!(
        "{}_{}.csv",
        report.report_type.title().replace(' ', "_"),
        canonical_date_string(today)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response())
}

fn build_csv(report: &Report) -> Result<Vec<u8>, csv::Error> {
    // The preamble rows have fewer fields than the transaction rows.
    let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(vec![]);

    writer.write_record([report.report_type.title()])?;
    writer.write_record([report.period_label().as_str()])?;
    writer.write_record([""])?;

    writer.write_record(["Financial Summary"])?;
    writer.write_record(["Total Credit", format_currency(report.total_credit).as_str()])?;
    writer.write_record(["Total Debit", format_currency(report.total_debit).as_str()])?;
    writer.write_record(["Net Balance", format_currency(report.balance).as_str()])?;
    writer.write_record([""])?;

    writer.write_record(["Date", "Type", "Category", "Description", "Amount"])?;

    for transaction in &report.rows {
        let sign = match transaction.kind {
            TransactionKind::Credit => "+",
            TransactionKind::Debit => "-",
        };

        writer.write_record([
            canonical_date_string(transaction.date).as_str(),
            transaction.kind.as_str(),
            transaction.category.as_str(),
            transaction.description.as_str(),
            format!("{sign}{}", format_currency(transaction.amount)).as_str(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|error| error.into_error().into())
}

#[cfg(test)]
mod export_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Query, State},
        http::{StatusCode, header},
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        db::initialize,
        report::core::{Report, ReportQuery, ReportType},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::{ReportViewState, build_csv, export_report_csv};

    fn get_test_state() -> ReportViewState {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        ReportViewState {
            db_connection: Arc::new(Mutex::new(conn)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[test]
    fn csv_has_preamble_summary_and_signed_rows() {
        let transactions = vec![
            Transaction {
                id: 1,
                kind: TransactionKind::Credit,
                amount: 50_000.0,
                category: "Fee".to_owned(),
                description: "Term fees, class 5".to_owned(),
                date: date!(2024 - 12 - 15),
            },
            Transaction {
                id: 2,
                kind: TransactionKind::Debit,
                amount: 25_000.0,
                category: "Salary".to_owned(),
                description: String::new(),
                date: date!(2024 - 12 - 14),
            },
        ];
        let report = Report::assemble(
            ReportType::AccountStatement,
            date!(2024 - 12 - 01),
            date!(2024 - 12 - 31),
            &transactions,
        );

        let text = String::from_utf8(build_csv(&report).unwrap()).unwrap();

        assert!(text.starts_with("Account Statement\n"));
        assert!(text.contains("2024-12-01 to 2024-12-31"));
        assert!(text.contains("Total Credit,\"Rs50,000\""));
        assert!(text.contains("Net Balance,\"Rs25,000\""));
        assert!(text.contains("2024-12-15,credit,Fee,\"Term fees, class 5\",\"+Rs50,000\""));
        assert!(text.contains("2024-12-14,debit,Salary,,\"-Rs25,000\""));
    }

    #[tokio::test]
    async fn export_sets_attachment_headers() {
        let state = get_test_state();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(TransactionKind::Credit, 10.0, date!(2024 - 12 - 01))
                    .category("Fee"),
                &connection,
            )
            .unwrap();
        }

        let response = export_report_csv(
            State(state),
            Query(ReportQuery {
                report: Some(ReportType::CreditReport),
                from: Some("2024-12-01".to_owned()),
                to: Some("2024-12-31".to_owned()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/csv; charset=utf-8"
        );

        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(disposition.starts_with("attachment; filename=\"Credit_Report_"));
        assert!(disposition.ends_with(".csv\""));
    }
}
