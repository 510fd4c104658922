use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether a transaction adds to or subtracts from the budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    /// Maps a `<select>` value back to a kind. Anything unknown reads as
    /// expense, mirroring the form's default.
    pub fn from_value(value: &str) -> Self {
        match value {
            "income" => TransactionKind::Income,
            _ => TransactionKind::Expense,
        }
    }
}

/// A transaction record as returned by the server. The id field arrives as
/// `transactionsId` but older deployments used other spellings, hence the
/// aliases.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(
        rename = "transactionsId",
        alias = "TransactionsId",
        alias = "transactionId",
        alias = "TransactionId",
        alias = "id"
    )]
    pub id: i64,
    #[serde(rename = "categoryId", alias = "CategoryId")]
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(default)]
    pub description: Option<String>,
    pub date: String,
}

/// The payload for creating a transaction. `description` is omitted from the
/// body entirely when blank.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// One segment of the category-spend breakdown.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub name: String,
    pub value: f64,
}

/// Built-in categories used when the remote set cannot be resolved.
pub fn default_categories() -> Vec<Category> {
    [
        (1, "Housing"),
        (2, "Food"),
        (3, "Transportation"),
        (4, "Entertainment"),
        (5, "Others"),
        (6, "Income"),
    ]
    .into_iter()
    .map(|(id, name)| Category {
        id,
        name: name.to_string(),
    })
    .collect()
}

/// First key present on the record with a non-null value.
fn first_present<'a>(record: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| record.get(key).filter(|v| !v.is_null()))
}

/// Reads a number that may arrive as a JSON number or a numeric string.
fn loose_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Reads a non-empty display string, stringifying numbers.
fn loose_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn display_id(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Normalizes one loosely-typed category record. Both casing conventions are
/// accepted for id and name; a record missing a numeric id or a non-empty
/// name is rejected.
pub fn normalize_category(record: &Value) -> Option<Category> {
    let id = first_present(record, &["categoryId", "CategoryId", "id", "Id"])
        .and_then(loose_number)?;
    let name = first_present(record, &["categoryName", "CategoryName", "name", "Name"])
        .and_then(loose_string)?;
    Some(Category {
        id: id as i64,
        name,
    })
}

/// Normalizes a category payload, dropping records that fail. Non-array
/// payloads yield an empty list, which the resolver treats as a failure.
pub fn normalize_categories(payload: &Value) -> Vec<Category> {
    payload
        .as_array()
        .map(|records| records.iter().filter_map(normalize_category).collect())
        .unwrap_or_default()
}

/// Normalizes one aggregation entry. A missing name falls back to
/// `Cat <id>`; a missing or non-numeric total falls back to zero.
pub fn normalize_pie_entry(record: &Value) -> PieSlice {
    let name = first_present(record, &["CategoryName", "categoryName"])
        .and_then(loose_string)
        .unwrap_or_else(|| {
            match first_present(record, &["CategoryId", "categoryId"]) {
                Some(id) => format!("Cat {}", display_id(id)),
                None => "Cat ?".to_string(),
            }
        });
    let value = first_present(record, &["Total", "total"])
        .and_then(loose_number)
        .unwrap_or(0.0);
    PieSlice { name, value }
}

pub fn normalize_pie(payload: &Value) -> Vec<PieSlice> {
    payload
        .as_array()
        .map(|records| records.iter().map(normalize_pie_entry).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod category_tests {
    use serde_json::json;

    use super::{default_categories, normalize_categories, normalize_category, Category};

    #[test]
    fn accepts_camel_case_fields() {
        let record = json!({"categoryId": 1, "categoryName": "Food"});

        assert_eq!(
            normalize_category(&record),
            Some(Category {
                id: 1,
                name: "Food".to_string()
            })
        );
    }

    #[test]
    fn accepts_pascal_case_fields() {
        let record = json!({"CategoryId": 2, "CategoryName": "Rent"});

        assert_eq!(
            normalize_category(&record),
            Some(Category {
                id: 2,
                name: "Rent".to_string()
            })
        );
    }

    #[test]
    fn accepts_bare_id_and_name_with_string_id() {
        let record = json!({"id": "3", "name": "Fuel"});

        assert_eq!(
            normalize_category(&record),
            Some(Category {
                id: 3,
                name: "Fuel".to_string()
            })
        );
    }

    #[test]
    fn null_fields_fall_through_to_the_next_spelling() {
        let record = json!({"categoryId": null, "CategoryId": 4, "name": "Travel"});

        assert_eq!(
            normalize_category(&record),
            Some(Category {
                id: 4,
                name: "Travel".to_string()
            })
        );
    }

    #[test]
    fn rejects_missing_or_empty_name() {
        assert_eq!(normalize_category(&json!({"categoryId": 1})), None);
        assert_eq!(
            normalize_category(&json!({"categoryId": 1, "categoryName": ""})),
            None
        );
    }

    #[test]
    fn rejects_non_numeric_id() {
        let record = json!({"categoryId": "abc", "categoryName": "Food"});

        assert_eq!(normalize_category(&record), None);
    }

    #[test]
    fn drops_bad_records_and_keeps_good_ones() {
        let payload = json!([
            {"categoryId": 1, "categoryName": "Food"},
            {"categoryName": "No Id"},
            {"CategoryId": 2, "CategoryName": "Rent"},
        ]);

        let names: Vec<String> = normalize_categories(&payload)
            .into_iter()
            .map(|c| c.name)
            .collect();

        assert_eq!(names, vec!["Food".to_string(), "Rent".to_string()]);
    }

    #[test]
    fn non_array_payload_yields_nothing() {
        assert!(normalize_categories(&json!({"error": "nope"})).is_empty());
    }

    #[test]
    fn default_set_has_six_entries_with_ids_one_through_six() {
        let defaults = default_categories();

        assert_eq!(defaults.len(), 6);
        assert_eq!(
            defaults.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![1, 2, 3, 4, 5, 6]
        );
        assert!(defaults.iter().all(|c| !c.name.is_empty()));
    }
}


#[cfg(test)]
mod transaction_tests {
    use serde_json::json;

    use super::{Transaction, TransactionKind};

    #[test]
    fn deserializes_the_server_field_names() {
        let record = json!({
            "transactionsId": 17,
            "categoryId": 3,
            "type": "expense",
            "amount": 42.5,
            "description": "groceries",
            "date": "2024-05-02T09:30:00"
        });

        let tx: Transaction = serde_json::from_value(record).unwrap();

        assert_eq!(tx.id, 17);
        assert_eq!(tx.category_id, 3);
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, 42.5);
        assert_eq!(tx.description.as_deref(), Some("groceries"));
    }

    #[test]
    fn id_aliases_are_accepted_and_description_is_optional() {
        let record = json!({
            "TransactionsId": 5,
            "categoryId": 6,
            "type": "income",
            "amount": 100.0,
            "date": "2024-05-01T00:00:00"
        });

        let tx: Transaction = serde_json::from_value(record).unwrap();

        assert_eq!(tx.id, 5);
        assert_eq!(tx.kind, TransactionKind::Income);
        assert_eq!(tx.description, None);
    }
}
