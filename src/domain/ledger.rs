use super::{Cents, Kind, Transaction};

/// Compute the balance of a ledger snapshot.
/// Balance = sum of income amounts - sum of expense amounts
pub fn compute_balance(transactions: &[Transaction]) -> Cents {
    transactions.iter().fold(0, |balance, tx| match tx.kind {
        Kind::Income => balance + tx.amount_cents,
        Kind::Expense => balance - tx.amount_cents,
    })
}

/// Total income recorded in a snapshot.
pub fn total_income(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.kind == Kind::Income)
        .map(|tx| tx.amount_cents)
        .sum()
}

/// Total expenses recorded in a snapshot.
pub fn total_expense(transactions: &[Transaction]) -> Cents {
    transactions
        .iter()
        .filter(|tx| tx.kind == Kind::Expense)
        .map(|tx| tx.amount_cents)
        .sum()
}

/// Running totals over a ledger snapshot, one point per transaction.
///
/// Both series are step functions: every input transaction appends a value
/// to *both* series, so they always have the same length as the input and
/// can be plotted against the shared positional labels.
#[derive(Debug, Clone, PartialEq)]
pub struct CumulativeSeries {
    pub income: Vec<Cents>,
    pub expense: Vec<Cents>,
    pub labels: Vec<String>,
}

/// Walk the transactions in the order given (this function never re-sorts;
/// the caller decides chronological vs. reverse-chronological) and build the
/// cumulative income/expense series with positional labels "T1", "T2", ...
pub fn compute_cumulative_series(transactions: &[Transaction]) -> CumulativeSeries {
    let mut income_total = 0;
    let mut expense_total = 0;
    let mut series = CumulativeSeries {
        income: Vec::with_capacity(transactions.len()),
        expense: Vec::with_capacity(transactions.len()),
        labels: Vec::with_capacity(transactions.len()),
    };

    for (idx, tx) in transactions.iter().enumerate() {
        match tx.kind {
            Kind::Income => income_total += tx.amount_cents,
            Kind::Expense => expense_total += tx.amount_cents,
        }
        series.income.push(income_total);
        series.expense.push(expense_total);
        series.labels.push(format!("T{}", idx + 1));
    }

    series
}
