use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::{Category, NewTransaction, Transaction, TransactionKind};

/// Sort key for a server timestamp, in milliseconds. Unparseable dates get
/// `i64::MIN` so they sink to the end of a newest-first list.
pub fn date_sort_key(date: &str) -> i64 {
    let date = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return parsed.timestamp_millis();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.and_utc().timestamp_millis();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return parsed
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or(i64::MIN);
    }
    i64::MIN
}

/// Orders transactions newest first. The sort is stable, so records sharing
/// a date keep the order the server returned them in.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by_key(|tx| std::cmp::Reverse(date_sort_key(&tx.date)));
}

/// The running budget: income adds, expense subtracts. Always recomputed
/// from the full list rather than patched incrementally.
pub fn running_budget(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|tx| match tx.kind {
            TransactionKind::Income => tx.amount,
            TransactionKind::Expense => -tx.amount,
        })
        .sum()
}

/// Lookup from stringified category id to name, for display substitution.
pub fn category_names(categories: &[Category]) -> HashMap<String, String> {
    categories
        .iter()
        .map(|category| (category.id.to_string(), category.name.clone()))
        .collect()
}

/// The new-transaction entry form, holding raw input strings.
#[derive(Clone, Debug, PartialEq)]
pub struct EntryForm {
    pub category_id: String,
    pub kind: TransactionKind,
    pub amount: String,
    pub description: String,
}

impl Default for EntryForm {
    fn default() -> Self {
        Self {
            category_id: String::new(),
            kind: TransactionKind::Expense,
            amount: String::new(),
            description: String::new(),
        }
    }
}

impl EntryForm {
    /// Client-side validation; runs before any network call. Returns the
    /// payload to send, or a user-facing message.
    pub fn validate(&self) -> Result<NewTransaction, String> {
        let category_id =
            parse_positive(&self.category_id).ok_or_else(|| "Select a valid category".to_string())?;
        let amount =
            parse_positive(&self.amount).ok_or_else(|| "Enter a valid amount (> 0)".to_string())?;

        let description = match self.description.trim() {
            "" => None,
            text => Some(text.to_string()),
        };

        Ok(NewTransaction {
            category_id: category_id as i64,
            kind: self.kind,
            amount,
            description,
        })
    }

    /// The form after a successful submit: everything blank except the
    /// last-selected kind.
    pub fn cleared(&self) -> Self {
        Self {
            kind: self.kind,
            ..Self::default()
        }
    }
}

fn parse_positive(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n > 0.0)
}

fn group_thousands(value: i64) -> String {
    let digits: Vec<char> = value.to_string().chars().rev().collect();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as i64;
    format!("{}${}.{:02}", sign, group_thousands(cents / 100), cents % 100)
}

/// Display form of a server timestamp; falls back to the raw string when it
/// does not parse.
pub fn format_date(date: &str) -> String {
    let trimmed = date.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M").to_string();
    }
    trimmed.to_string()
}

#[cfg(test)]
mod ordering_tests {
    use crate::model::{Transaction, TransactionKind};

    use super::{date_sort_key, sort_newest_first};

    fn tx(id: i64, date: &str) -> Transaction {
        Transaction {
            id,
            category_id: 1,
            kind: TransactionKind::Expense,
            amount: 1.0,
            description: None,
            date: date.to_string(),
        }
    }

    #[test]
    fn sorts_by_date_descending() {
        let mut list = vec![
            tx(1, "2024-05-01T08:00:00"),
            tx(2, "2024-05-03T08:00:00"),
            tx(3, "2024-05-02T08:00:00"),
        ];

        sort_newest_first(&mut list);

        let ids: Vec<i64> = list.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        for pair in list.windows(2) {
            assert!(date_sort_key(&pair[0].date) >= date_sort_key(&pair[1].date));
        }
    }

    #[test]
    fn equal_dates_keep_fetch_order() {
        let mut list = vec![
            tx(10, "2024-05-01T08:00:00"),
            tx(11, "2024-05-01T08:00:00"),
            tx(12, "2024-05-02T08:00:00"),
        ];

        sort_newest_first(&mut list);

        let ids: Vec<i64> = list.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![12, 10, 11]);
    }

    #[test]
    fn unparseable_dates_sink_to_the_end() {
        let mut list = vec![tx(1, "not a date"), tx(2, "2024-05-01T08:00:00")];

        sort_newest_first(&mut list);

        assert_eq!(list[0].id, 2);
        assert_eq!(date_sort_key("not a date"), i64::MIN);
    }

    #[test]
    fn rfc3339_and_naive_timestamps_both_parse() {
        let with_offset = date_sort_key("2024-05-01T08:00:00Z");
        let naive = date_sort_key("2024-05-01T08:00:00");

        assert_eq!(with_offset, naive);
        assert!(date_sort_key("2024-05-02") > naive);
    }
}



#[cfg(test)]
mod form_tests {
    use crate::model::TransactionKind;

    use super::EntryForm;

    fn filled() -> EntryForm {
        EntryForm {
            category_id: "3".to_string(),
            kind: TransactionKind::Expense,
            amount: "42.50".to_string(),
            description: "  lunch  ".to_string(),
        }
    }

    #[test]
    fn valid_form_produces_the_wire_payload() {
        let payload = filled().validate().unwrap();

        assert_eq!(payload.category_id, 3);
        assert_eq!(payload.kind, TransactionKind::Expense);
        assert_eq!(payload.amount, 42.5);
        assert_eq!(payload.description.as_deref(), Some("lunch"));
    }

    #[test]
    fn blank_description_is_omitted_from_the_body() {
        let mut form = filled();
        form.description = "   ".to_string();

        let payload = form.validate().unwrap();
        assert_eq!(payload.description, None);

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"categoryId": 3, "type": "expense", "amount": 42.5})
        );
    }

    #[test]
    fn zero_or_negative_category_is_rejected_first() {
        let mut form = filled();
        form.category_id = "0".to_string();
        assert_eq!(form.validate().unwrap_err(), "Select a valid category");

        form.category_id = "-2".to_string();
        assert_eq!(form.validate().unwrap_err(), "Select a valid category");

        // category error wins even when the amount is also bad
        form.amount = "bogus".to_string();
        assert_eq!(form.validate().unwrap_err(), "Select a valid category");
    }

    #[test]
    fn non_numeric_or_non_positive_amount_is_rejected() {
        let mut form = filled();
        form.amount = "bogus".to_string();
        assert_eq!(form.validate().unwrap_err(), "Enter a valid amount (> 0)");

        form.amount = "0".to_string();
        assert_eq!(form.validate().unwrap_err(), "Enter a valid amount (> 0)");

        form.amount = "inf".to_string();
        assert_eq!(form.validate().unwrap_err(), "Enter a valid amount (> 0)");
    }

    #[test]
    fn empty_category_select_is_rejected() {
        let mut form = filled();
        form.category_id = String::new();

        assert_eq!(form.validate().unwrap_err(), "Select a valid category");
    }

    #[test]
    fn cleared_keeps_the_selected_kind_only() {
        let mut form = filled();
        form.kind = TransactionKind::Income;

        let next = form.cleared();

        assert_eq!(next.kind, TransactionKind::Income);
        assert!(next.category_id.is_empty());
        assert!(next.amount.is_empty());
        assert!(next.description.is_empty());
    }
}

#[cfg(test)]
mod format_tests {
    use super::{format_currency, format_date};

    #[test]
    fn currency_groups_thousands_and_pads_cents() {
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-20.0), "-$20.00");
        assert_eq!(format_currency(1000000.0), "$1,000,000.00");
    }

    #[test]
    fn dates_render_compact_or_fall_back_to_raw() {
        assert_eq!(format_date("2024-05-02T09:30:00"), "2024-05-02 09:30");
        assert_eq!(format_date("2024-05-02T09:30:00Z"), "2024-05-02 09:30");
        assert_eq!(format_date("whenever"), "whenever");
    }
}
