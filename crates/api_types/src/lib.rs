use serde::{Deserialize, Deserializer, Serialize};

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Must be paired with `#[serde(default)]` so an absent field stays `None`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Deserialize an optional amount given either as a JSON number or as a
/// numeric string such as `"12.5"`.
fn number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => Ok(Some(value)),
        Some(Raw::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            serde::de::Error::custom(format!("amount must be a number, got '{text}'"))
        }),
    }
}

pub mod envelope {
    use super::*;

    /// Success body: `{"ok": true, "data": ...}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ApiResponse<T> {
        pub ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub data: Option<T>,
    }

    impl<T> ApiResponse<T> {
        pub fn success(data: T) -> Self {
            Self {
                ok: true,
                data: Some(data),
            }
        }
    }

    /// Error body: `{"ok": false, "error": "..."}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ApiError {
        pub ok: bool,
        pub error: String,
    }

    impl ApiError {
        pub fn new(error: impl Into<String>) -> Self {
            Self {
                ok: false,
                error: error.into(),
            }
        }
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Expense {
        pub id: String,
        pub title: String,
        pub amount: f64,
        /// Upper-case category code (`RENT`, `FOOD`, ...).
        pub category: String,
        /// Calendar date, `YYYY-MM-DD`.
        pub expense_date: String,
        pub description: String,
    }

    /// Query string of `GET /expenses`.
    ///
    /// Every field is kept as raw text: the engine normalizes invalid values
    /// instead of rejecting the request.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseList {
        pub search: Option<String>,
        pub sort_by: Option<String>,
        pub sort_order: Option<String>,
        pub page: Option<String>,
        pub page_size: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub items: Vec<Expense>,
        /// Size of the whole filtered result set, not just this page.
        pub total: u64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: Option<String>,
        #[serde(default, deserialize_with = "number_or_string")]
        pub amount: Option<f64>,
        pub expense_date: Option<String>,
        pub category: Option<String>,
        pub description: Option<String>,
    }

    impl ExpenseNew {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.amount.is_none()
                && self.expense_date.is_none()
                && self.category.is_none()
                && self.description.is_none()
        }
    }

    /// Partial update: absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub title: Option<String>,
        #[serde(default, deserialize_with = "number_or_string")]
        pub amount: Option<f64>,
        pub expense_date: Option<String>,
        pub category: Option<String>,
        /// `null` clears the description, absence leaves it untouched.
        #[serde(
            default,
            deserialize_with = "double_option",
            skip_serializing_if = "Option::is_none"
        )]
        pub description: Option<Option<String>>,
    }

    impl ExpenseUpdate {
        pub fn is_empty(&self) -> bool {
            self.title.is_none()
                && self.amount.is_none()
                && self.expense_date.is_none()
                && self.category.is_none()
                && self.description.is_none()
        }
    }
}

pub mod ocr {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct OcrText {
        pub text: String,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
        pub store: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub message: Option<String>,
    }
}
