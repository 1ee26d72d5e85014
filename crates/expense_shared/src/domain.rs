use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

/// Store-assigned key of a bill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillId(pub String);

impl BillId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
    /// Any value the back end sends that is not one of the known states.
    Other(String),
}

impl BillStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
            Self::Other(raw) => raw,
        }
    }
}

impl Default for BillStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for BillStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Self::Pending,
            "accepted" => Self::Accepted,
            "refused" => Self::Refused,
            _ => Self::Other(value),
        }
    }
}

impl From<BillStatus> for String {
    fn from(value: BillStatus) -> Self {
        match value {
            BillStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bill exactly as the Store returns it.
///
/// Every field is optional on the wire and scalar fields accept either a JSON
/// string or a JSON number, so one oddly shaped record never fails the whole
/// list payload. `date` is kept verbatim; parsing it is the formatter's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawBill {
    #[serde(deserialize_with = "lenient::string")]
    pub id: BillId,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub vat: Option<String>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub amount: Option<Number>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub date: String,
    #[serde(rename = "type", deserialize_with = "lenient::opt_string")]
    pub expense_type: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub commentary: Option<String>,
    #[serde(deserialize_with = "lenient::opt_number")]
    pub pct: Option<Number>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub comment_admin: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub file_url: Option<String>,
    #[serde(deserialize_with = "lenient::opt_string")]
    pub file_name: Option<String>,
    #[serde(deserialize_with = "lenient::status")]
    pub status: BillStatus,
}

/// Response of a receipt upload: where the file landed and the key reserved
/// for the bill that will reference it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedBill {
    pub file_url: String,
    pub key: BillId,
}

mod lenient {
    use super::*;

    fn scalar_to_string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_to_string(Value::deserialize(deserializer)?))
    }

    pub fn string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        Ok(T::from(
            scalar_to_string(Value::deserialize(deserializer)?).unwrap_or_default(),
        ))
    }

    pub fn opt_number<'de, D>(deserializer: D) -> Result<Option<Number>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => Some(n),
            Value::String(s) => s.trim().parse::<Number>().ok(),
            _ => None,
        })
    }

    pub fn status<'de, D>(deserializer: D) -> Result<BillStatus, D::Error>
    where
        D: Deserializer<'de>,
    {
        string(deserializer)
    }
}

impl From<String> for BillId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_store_fixture_record() {
        let raw = r#"{
            "id": "47qAXb6fIm2zOKkLzMro",
            "vat": "80",
            "fileUrl": "https://test.storage.tld/v0/b/billable.appspot.com/o/justificatif.jpg",
            "status": "pending",
            "type": "Hôtel et logement",
            "commentary": "séminaire billed",
            "name": "encore",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "date": "2004-04-04",
            "amount": 400,
            "commentAdmin": "ok",
            "email": "a@a",
            "pct": 20
        }"#;

        let bill: RawBill = serde_json::from_str(raw).expect("decode");
        assert_eq!(bill.id, BillId::new("47qAXb6fIm2zOKkLzMro"));
        assert_eq!(bill.vat.as_deref(), Some("80"));
        assert_eq!(bill.amount, Some(Number::from(400)));
        assert_eq!(bill.expense_type.as_deref(), Some("Hôtel et logement"));
        assert_eq!(bill.comment_admin.as_deref(), Some("ok"));
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.pct, Some(Number::from(20)));
    }

    #[test]
    fn tolerates_missing_and_mistyped_fields() {
        let raw = r#"{ "id": 12, "vat": 20, "amount": "n/a", "date": null, "status": "archived" }"#;

        let bill: RawBill = serde_json::from_str(raw).expect("decode");
        assert_eq!(bill.id.as_str(), "12");
        assert_eq!(bill.vat.as_deref(), Some("20"));
        assert_eq!(bill.amount, None);
        assert_eq!(bill.date, "");
        assert_eq!(bill.name, None);
        assert_eq!(bill.status, BillStatus::Other("archived".to_string()));
    }

    #[test]
    fn status_round_trips_unknown_values_verbatim() {
        let status: BillStatus = serde_json::from_str("\"on-hold\"").expect("decode");
        assert_eq!(status.as_str(), "on-hold");
        assert_eq!(
            serde_json::to_string(&status).expect("encode"),
            "\"on-hold\""
        );
    }
}
