//! Report assembly: which records a report covers and the figures shown above
//! the table.

use serde::{Deserialize, Serialize};
use time::{Date, UtcOffset};

use crate::{
    aggregate::{CategoryTotal, category_breakdown, total_by_kind},
    dates::{canonical_date_string, local_today, normalize_date_text, parse_canonical_date},
    transaction::{Transaction, TransactionKind},
};

/// The kinds of report the reports page offers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportType {
    /// Every record in the period with a running balance column.
    #[default]
    AccountStatement,
    /// Credits only.
    CreditReport,
    /// Debits only.
    DebitReport,
    /// Debits whose category mentions salaries.
    SalaryReport,
    /// Debits only, framed as an expense listing.
    ExpenseReport,
}

impl ReportType {
    /// Every report type, in the order offered by the select control.
    pub const ALL: [ReportType; 5] = [
        ReportType::AccountStatement,
        ReportType::CreditReport,
        ReportType::DebitReport,
        ReportType::SalaryReport,
        ReportType::ExpenseReport,
    ];

    /// The value used in query strings and form options.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AccountStatement => "account-statement",
            Self::CreditReport => "credit-report",
            Self::DebitReport => "debit-report",
            Self::SalaryReport => "salary-report",
            Self::ExpenseReport => "expense-report",
        }
    }

    /// The heading shown on the page and in exports.
    pub fn title(self) -> &'static str {
        match self {
            Self::AccountStatement => "Account Statement",
            Self::CreditReport => "Credit Report",
            Self::DebitReport => "Debit Report",
            Self::SalaryReport => "Salary Report",
            Self::ExpenseReport => "Expense Report",
        }
    }

    /// Whether `transaction` belongs in this report, ignoring the date range.
    ///
    /// The salary report is the only category-aware type: it keeps debits
    /// whose category mentions "salary", case-insensitively. The expense
    /// report covers all debits, same as the debit report.
    pub fn includes(self, transaction: &Transaction) -> bool {
        match self {
            Self::AccountStatement => true,
            Self::CreditReport => transaction.kind == TransactionKind::Credit,
            Self::DebitReport | Self::ExpenseReport => {
                transaction.kind == TransactionKind::Debit
            }
            Self::SalaryReport => {
                transaction.kind == TransactionKind::Debit
                    && transaction.category.to_lowercase().contains("salary")
            }
        }
    }

    /// Only the account statement carries the running balance column.
    pub fn shows_running_balance(self) -> bool {
        matches!(self, Self::AccountStatement)
    }
}

/// The query string shared by the reports page, the printable view, and the
/// CSV export, so the print and download links reproduce exactly what is on
/// screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Which report to build. Defaults to the account statement.
    pub report: Option<ReportType>,
    /// Start of the period. Defaults to the first day of the current month.
    pub from: Option<String>,
    /// End of the period. Defaults to today.
    pub to: Option<String>,
}

impl ReportQuery {
    /// Resolve the requested period, falling back to the current month so the
    /// page always has a concrete range.
    pub fn resolve_period(&self, local_offset: UtcOffset) -> (Date, Date) {
        let today = local_today(local_offset);

        let parse_bound = |text: Option<&String>| {
            text.and_then(|text| {
                parse_canonical_date(&normalize_date_text(text, local_offset)).ok()
            })
        };

        let from = parse_bound(self.from.as_ref()).unwrap_or_else(|| {
            // The first of the month always exists.
            today.replace_day(1).unwrap_or(today)
        });
        let to = parse_bound(self.to.as_ref()).unwrap_or(today);

        (from, to)
    }
}

/// A fully assembled report: the covered records in chronological order plus
/// the summary figures derived from them.
#[derive(Debug, Clone)]
pub struct Report {
    /// Which report was built.
    pub report_type: ReportType,
    /// Start of the covered period, inclusive.
    pub from: Date,
    /// End of the covered period, inclusive.
    pub to: Date,
    /// Matching records, ascending by date (stable for same-day records).
    pub rows: Vec<Transaction>,
    /// Unsigned sum over the covered credits.
    pub total_credit: f64,
    /// Unsigned sum over the covered debits.
    pub total_debit: f64,
    /// Total credit minus total debit over the covered records.
    pub balance: f64,
    /// Per (kind, category) sums over the covered records, largest first.
    pub breakdown: Vec<CategoryTotal>,
}

impl Report {
    /// Select and order the records covered by `report_type` over the period
    /// and compute the summary figures.
    pub fn assemble(
        report_type: ReportType,
        from: Date,
        to: Date,
        transactions: &[Transaction],
    ) -> Self {
        let mut rows: Vec<Transaction> = transactions
            .iter()
            .filter(|transaction| {
                from <= transaction.date
                    && transaction.date <= to
                    && report_type.includes(transaction)
            })
            .cloned()
            .collect();

        rows.sort_by_key(|transaction| transaction.date);

        let total_credit = total_by_kind(&rows, TransactionKind::Credit);
        let total_debit = total_by_kind(&rows, TransactionKind::Debit);
        let breakdown = category_breakdown(&rows);

        Self {
            report_type,
            from,
            to,
            total_credit,
            total_debit,
            balance: total_credit - total_debit,
            breakdown,
            rows,
        }
    }

    /// The period line shown under the report title.
    pub fn period_label(&self) -> String {
        format!(
            "{} to {}",
            canonical_date_string(self.from),
            canonical_date_string(self.to)
        )
    }

    /// The kind total a breakdown group is measured against.
    pub fn kind_total(&self, kind: TransactionKind) -> f64 {
        match kind {
            TransactionKind::Credit => self.total_credit,
            TransactionKind::Debit => self.total_debit,
        }
    }
}

#[cfg(test)]
mod report_core_tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::{Report, ReportQuery, ReportType};

    fn record(
        id: i64,
        kind: TransactionKind,
        amount: f64,
        category: &str,
        date: time::Date,
    ) -> Transaction {
        Transaction {
            id,
            kind,
            amount,
            category: category.to_owned(),
            description: String::new(),
            date,
        }
    }

    fn december_ledger() -> Vec<Transaction> {
        vec![
            record(1, TransactionKind::Credit, 50_000.0, "Fee", date!(2024 - 12 - 15)),
            record(2, TransactionKind::Debit, 25_000.0, "Salary", date!(2024 - 12 - 14)),
            record(3, TransactionKind::Debit, 5_000.0, "Bills", date!(2024 - 12 - 13)),
            record(4, TransactionKind::Credit, 1_000.0, "Donation", date!(2024 - 11 - 30)),
        ]
    }

    fn december(report_type: ReportType) -> Report {
        Report::assemble(
            report_type,
            date!(2024 - 12 - 01),
            date!(2024 - 12 - 31),
            &december_ledger(),
        )
    }

    #[test]
    fn statement_covers_both_kinds_within_the_period() {
        let report = december(ReportType::AccountStatement);

        assert_eq!(report.rows.len(), 3);
        assert_eq!(report.total_credit, 50_000.0);
        assert_eq!(report.total_debit, 30_000.0);
        assert_eq!(report.balance, 20_000.0);
    }

    #[test]
    fn rows_are_chronological() {
        let report = december(ReportType::AccountStatement);

        let dates: Vec<_> = report.rows.iter().map(|t| t.date).collect();
        assert_eq!(
            dates,
            vec![date!(2024 - 12 - 13), date!(2024 - 12 - 14), date!(2024 - 12 - 15)]
        );
    }

    #[test]
    fn credit_report_keeps_only_credits() {
        let report = december(ReportType::CreditReport);

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].category, "Fee");
    }

    #[test]
    fn salary_report_matches_category_case_insensitively() {
        let mut ledger = december_ledger();
        ledger.push(record(
            5,
            TransactionKind::Debit,
            8_000.0,
            "Support staff SALARY",
            date!(2024 - 12 - 20),
        ));

        let report = Report::assemble(
            ReportType::SalaryReport,
            date!(2024 - 12 - 01),
            date!(2024 - 12 - 31),
            &ledger,
        );

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.total_debit, 33_000.0);
    }

    #[test]
    fn salary_report_ignores_credits_mentioning_salary() {
        let ledger = vec![record(
            1,
            TransactionKind::Credit,
            1_000.0,
            "Salary refund",
            date!(2024 - 12 - 05),
        )];

        let report = Report::assemble(
            ReportType::SalaryReport,
            date!(2024 - 12 - 01),
            date!(2024 - 12 - 31),
            &ledger,
        );

        assert!(report.rows.is_empty());
    }

    #[test]
    fn expense_report_covers_all_debits() {
        let report = december(ReportType::ExpenseReport);

        assert_eq!(report.rows.len(), 2);
        assert_eq!(report.total_debit, 30_000.0);
    }

    #[test]
    fn only_the_statement_shows_the_running_balance() {
        for report_type in ReportType::ALL {
            assert_eq!(
                report_type.shows_running_balance(),
                report_type == ReportType::AccountStatement
            );
        }
    }

    #[test]
    fn period_defaults_to_the_current_month() {
        let (from, to) = ReportQuery::default().resolve_period(time::UtcOffset::UTC);

        assert_eq!(from.day(), 1);
        assert_eq!(from.month(), to.month());
        assert!(from <= to);
    }

    #[test]
    fn explicit_period_bounds_are_used() {
        let query = ReportQuery {
            report: None,
            from: Some("2024-06-01".to_owned()),
            to: Some("2024-06-30".to_owned()),
        };

        let (from, to) = query.resolve_period(time::UtcOffset::UTC);

        assert_eq!(from, date!(2024 - 06 - 01));
        assert_eq!(to, date!(2024 - 06 - 30));
    }

    #[test]
    fn unparseable_bounds_fall_back_to_defaults() {
        let query = ReportQuery {
            report: None,
            from: Some("soon".to_owned()),
            to: Some("later".to_owned()),
        };

        let (from, to) = query.resolve_period(time::UtcOffset::UTC);

        assert_eq!(from.day(), 1);
        assert!(from <= to);
    }
}
