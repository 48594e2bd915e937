use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Store-assigned invoice identifier (a 12-byte ObjectId, 24 hex chars on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvoiceId(ObjectId);

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed invoice id {raw:?}: {reason}")]
pub struct InvalidInvoiceId {
    pub raw: String,
    pub reason: String,
}

impl InvoiceId {
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for InvoiceId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl FromStr for InvoiceId {
    type Err = InvalidInvoiceId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(Self)
            .map_err(|e| InvalidInvoiceId {
                raw: raw.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

/// A persisted invoice as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(rename = "_id")]
    #[schema(example = "65a1b2c3d4e5f60718293a4b")]
    pub id: String,
    pub invoice_number: String,
    pub invoice_date: String,
    pub due_date: String,
    pub client_name: String,
    pub invoice_description: String,
    pub invoice_amount: String,
    pub payment_link: String,
    pub payment_status: String,
}

impl Invoice {
    pub fn from_parts(id: InvoiceId, fields: ValidatedInvoice) -> Self {
        let n = fields.into_inner();
        Self {
            id: id.to_string(),
            invoice_number: n.invoice_number,
            invoice_date: n.invoice_date,
            due_date: n.due_date,
            client_name: n.client_name,
            invoice_description: n.invoice_description,
            invoice_amount: n.invoice_amount,
            payment_link: n.payment_link,
            payment_status: n.payment_status,
        }
    }
}

/// Create payload. Absent or `null` fields deserialize to empty strings so the
/// presence check can name them; numbers and booleans are kept in text form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewInvoice {
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "INV-1")]
    pub invoice_number: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "2024-01-01")]
    pub invoice_date: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "2024-02-01")]
    pub due_date: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "Acme")]
    pub client_name: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "Consulting")]
    pub invoice_description: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "100")]
    pub invoice_amount: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "http://pay/1")]
    pub payment_link: String,
    #[serde(default, deserialize_with = "text")]
    #[validate(length(min = 1))]
    #[schema(example = "unpaid")]
    pub payment_status: String,
}

/// Declaration order, Rust field name to wire name.
const FIELDS: [(&str, &str); 8] = [
    ("invoice_number", "invoiceNumber"),
    ("invoice_date", "invoiceDate"),
    ("due_date", "dueDate"),
    ("client_name", "clientName"),
    ("invoice_description", "invoiceDescription"),
    ("invoice_amount", "invoiceAmount"),
    ("payment_link", "paymentLink"),
    ("payment_status", "paymentStatus"),
];

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct MissingFields {
    /// Wire names, in declaration order.
    pub missing: Vec<&'static str>,
}

/// A `NewInvoice` whose fields are all present. Only `NewInvoice::validated`
/// builds one, so adapters never see an incomplete record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedInvoice(NewInvoice);

impl ValidatedInvoice {
    pub fn get(&self) -> &NewInvoice {
        &self.0
    }

    pub fn into_inner(self) -> NewInvoice {
        self.0
    }
}

impl NewInvoice {
    pub fn validated(self) -> Result<ValidatedInvoice, MissingFields> {
        match self.validate() {
            Ok(()) => Ok(ValidatedInvoice(self)),
            Err(errors) => {
                let failed = errors.field_errors();
                let missing = FIELDS
                    .iter()
                    .filter(|(field, _)| failed.contains_key(*field))
                    .map(|(_, wire)| *wire)
                    .collect();
                Err(MissingFields { missing })
            }
        }
    }
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string, number, boolean or null")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2: Deserializer<'de>>(self, d: D2) -> Result<String, D2::Error> {
            d.deserialize_any(TextVisitor)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewInvoice {
        NewInvoice {
            invoice_number: "INV-1".into(),
            invoice_date: "2024-01-01".into(),
            due_date: "2024-02-01".into(),
            client_name: "Acme".into(),
            invoice_description: "Consulting".into(),
            invoice_amount: "100".into(),
            payment_link: "http://pay/1".into(),
            payment_status: "unpaid".into(),
        }
    }

    #[test]
    fn complete_payload_validates() {
        let validated = sample().validated().unwrap();
        assert_eq!(validated.get().client_name, "Acme");
    }

    #[test]
    fn missing_fields_are_reported_by_wire_name() {
        let mut n = sample();
        n.due_date.clear();
        n.payment_status.clear();
        let err = n.validated().unwrap_err();
        assert_eq!(err.missing, vec!["dueDate", "paymentStatus"]);
        assert_eq!(
            err.to_string(),
            "missing required fields: dueDate, paymentStatus"
        );
    }

    #[test]
    fn absent_and_null_fields_deserialize_empty() {
        let n: NewInvoice =
            serde_json::from_str(r#"{"invoiceNumber":"INV-2","clientName":null}"#).unwrap();
        assert_eq!(n.invoice_number, "INV-2");
        assert!(n.client_name.is_empty());
        assert_eq!(n.validated().unwrap_err().missing.len(), 7);
    }

    #[test]
    fn numeric_amount_is_kept_as_text() {
        let n: NewInvoice =
            serde_json::from_str(r#"{"invoiceAmount":100,"paymentStatus":false}"#).unwrap();
        assert_eq!(n.invoice_amount, "100");
        assert_eq!(n.payment_status, "false");

        let n: NewInvoice = serde_json::from_str(r#"{"invoiceAmount":99.5}"#).unwrap();
        assert_eq!(n.invoice_amount, "99.5");
    }

    #[test]
    fn nested_values_are_rejected() {
        let res = serde_json::from_str::<NewInvoice>(r#"{"clientName":{"first":"A"}}"#);
        assert!(res.is_err());
    }

    #[test]
    fn invoice_serializes_with_store_id_key() {
        let id = InvoiceId::generate();
        let inv = Invoice::from_parts(id, sample().validated().unwrap());
        let json = serde_json::to_value(&inv).unwrap();
        assert_eq!(json["_id"], id.to_string());
        assert_eq!(json["invoiceNumber"], "INV-1");
        assert_eq!(json["paymentLink"], "http://pay/1");
    }

    #[test]
    fn invoice_id_parsing() {
        let id = InvoiceId::generate();
        let parsed: InvoiceId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.to_string().len(), 24);

        assert!("not-an-id".parse::<InvoiceId>().is_err());
        assert!("65a1b2c3d4e5f60718293a4".parse::<InvoiceId>().is_err());
    }
}
