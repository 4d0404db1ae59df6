//! Row to JSON conversion.
//!
//! Type conversion uses a two-phase approach:
//! 1. `TypeCategory` classifies column types into logical categories
//! 2. Database-specific decoders handle the actual value extraction
//!
//! Generated SQL runs over the simple query protocol, so PostgreSQL values
//! arrive in text format. Anything without a dedicated decoder falls back to
//! that text representation.

use crate::models::Row as JsonRow;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgRow, PgTypeInfo, PgValueRef};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Decode, Row, Type, TypeInfo};

// =============================================================================
// Type Classification
// =============================================================================

/// Logical category for database column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Json,
    Uuid,
    Binary,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    Text,
}

/// Classify a PostgreSQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    match type_name.to_ascii_uppercase().as_str() {
        "INT2" | "INT4" | "INT8" | "SMALLINT" | "INTEGER" | "BIGINT" | "OID" => {
            TypeCategory::Integer
        }
        "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE PRECISION" => TypeCategory::Float,
        "NUMERIC" | "DECIMAL" | "MONEY" => TypeCategory::Decimal,
        "BOOL" | "BOOLEAN" => TypeCategory::Boolean,
        "JSON" | "JSONB" => TypeCategory::Json,
        "UUID" => TypeCategory::Uuid,
        "BYTEA" => TypeCategory::Binary,
        "TIMESTAMP" => TypeCategory::Timestamp,
        "TIMESTAMPTZ" => TypeCategory::TimestampTz,
        "DATE" => TypeCategory::Date,
        "TIME" => TypeCategory::Time,
        _ => TypeCategory::Text,
    }
}

// =============================================================================
// Decimal Type Support
// =============================================================================

/// Raw NUMERIC text as sent by the server.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::Postgres> for RawDecimal {
    fn type_info() -> PgTypeInfo {
        <String as Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("numeric") || name.contains("decimal") || name == "money"
    }
}

impl<'r> Decode<'r, sqlx::Postgres> for RawDecimal {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::Postgres>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Decimal text → JSON number when it survives the round trip through f64,
/// otherwise the exact text.
pub fn decimal_to_json(raw: &str) -> JsonValue {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(raw.to_string()))
}

fn float_to_json(v: f64) -> JsonValue {
    serde_json::Number::from_f64(v)
        .map(JsonValue::Number)
        .unwrap_or_else(|| JsonValue::String(v.to_string()))
}

// =============================================================================
// Binary Encoding
// =============================================================================

/// UTF-8 text when valid, base64 otherwise.
pub fn decode_binary_value(bytes: &[u8]) -> JsonValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match std::str::from_utf8(bytes) {
        Ok(s) => JsonValue::String(s.to_string()),
        Err(_) => JsonValue::String(STANDARD.encode(bytes)),
    }
}

// =============================================================================
// Row to JSON Trait
// =============================================================================

/// Trait for converting database rows to JSON maps.
pub trait RowToJson {
    fn to_json_map(&self) -> JsonRow;
}

impl RowToJson for PgRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let category = categorize_type(col.type_info().name());
                let value = postgres::decode_column(self, idx, category);
                (col.name().to_string(), value)
            })
            .collect()
    }
}

impl RowToJson for SqliteRow {
    fn to_json_map(&self) -> JsonRow {
        self.columns()
            .iter()
            .enumerate()
            .map(|(idx, col)| (col.name().to_string(), sqlite::decode_column(self, idx)))
            .collect()
    }
}

// =============================================================================
// Database-Specific Decoders
// =============================================================================

mod postgres {
    use super::*;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

    pub fn decode_column(row: &PgRow, idx: usize, category: TypeCategory) -> JsonValue {
        let decoded = match category {
            TypeCategory::Integer => decode_integer(row, idx),
            TypeCategory::Float => decode_float(row, idx),
            TypeCategory::Decimal => decode_decimal(row, idx),
            TypeCategory::Boolean => get::<bool>(row, idx).map(JsonValue::Bool),
            TypeCategory::Json => get::<JsonValue>(row, idx),
            TypeCategory::Uuid => {
                get::<uuid::Uuid>(row, idx).map(|v| JsonValue::String(v.to_string()))
            }
            TypeCategory::Binary => get::<Vec<u8>>(row, idx).map(|v| decode_binary_value(&v)),
            TypeCategory::Timestamp => get::<NaiveDateTime>(row, idx)
                .map(|v| JsonValue::String(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
            TypeCategory::TimestampTz => {
                get::<DateTime<Utc>>(row, idx).map(|v| JsonValue::String(v.to_rfc3339()))
            }
            TypeCategory::Date => {
                get::<NaiveDate>(row, idx).map(|v| JsonValue::String(v.to_string()))
            }
            TypeCategory::Time => {
                get::<NaiveTime>(row, idx).map(|v| JsonValue::String(v.to_string()))
            }
            TypeCategory::Text => None,
        };

        decoded.unwrap_or_else(|| decode_text(row, idx))
    }

    /// Typed decode; `None` when the value is NULL or the decoder refuses it.
    fn get<'r, T>(row: &'r PgRow, idx: usize) -> Option<T>
    where
        T: Decode<'r, sqlx::Postgres> + Type<sqlx::Postgres>,
    {
        row.try_get::<Option<T>, _>(idx).ok().flatten()
    }

    fn decode_integer(row: &PgRow, idx: usize) -> Option<JsonValue> {
        if let Some(v) = get::<i64>(row, idx) {
            return Some(JsonValue::Number(v.into()));
        }
        if let Some(v) = get::<i32>(row, idx) {
            return Some(JsonValue::Number(v.into()));
        }
        get::<i16>(row, idx).map(|v| JsonValue::Number(v.into()))
    }

    fn decode_float(row: &PgRow, idx: usize) -> Option<JsonValue> {
        if let Some(v) = get::<f64>(row, idx) {
            return Some(float_to_json(v));
        }
        get::<f32>(row, idx).map(|v| float_to_json(v as f64))
    }

    fn decode_decimal(row: &PgRow, idx: usize) -> Option<JsonValue> {
        match row.try_get::<Option<RawDecimal>, _>(idx) {
            Ok(Some(v)) => Some(decimal_to_json(&v.0)),
            Ok(None) => Some(JsonValue::Null),
            Err(e) => {
                tracing::warn!("Failed to decode NUMERIC: {:?}", e);
                None
            }
        }
    }

    /// Text representation of any value, NULL-aware.
    fn decode_text(row: &PgRow, idx: usize) -> JsonValue {
        row.try_get_unchecked::<Option<String>, _>(idx)
            .ok()
            .flatten()
            .map(JsonValue::String)
            .unwrap_or(JsonValue::Null)
    }
}

mod sqlite {
    use super::*;
    use sqlx::ValueRef;

    /// SQLite is dynamically typed; decode by the value's storage class.
    pub fn decode_column(row: &SqliteRow, idx: usize) -> JsonValue {
        let storage_class = match row.try_get_raw(idx) {
            Ok(raw) if raw.is_null() => return JsonValue::Null,
            Ok(raw) => raw.type_info().name().to_ascii_uppercase(),
            Err(_) => return JsonValue::Null,
        };

        match storage_class.as_str() {
            "INTEGER" | "INT" | "BIGINT" | "BOOLEAN" => row
                .try_get::<i64, _>(idx)
                .map(|v| JsonValue::Number(v.into()))
                .unwrap_or(JsonValue::Null),
            "REAL" | "NUMERIC" => row
                .try_get::<f64, _>(idx)
                .map(float_to_json)
                .unwrap_or(JsonValue::Null),
            "BLOB" => row
                .try_get::<Vec<u8>, _>(idx)
                .map(|v| decode_binary_value(&v))
                .unwrap_or(JsonValue::Null),
            _ => row
                .try_get_unchecked::<String, _>(idx)
                .map(JsonValue::String)
                .unwrap_or(JsonValue::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_type_integer() {
        assert_eq!(categorize_type("INT4"), TypeCategory::Integer);
        assert_eq!(categorize_type("INT8"), TypeCategory::Integer);
        assert_eq!(categorize_type("int2"), TypeCategory::Integer);
    }

    #[test]
    fn test_categorize_type_temporal() {
        assert_eq!(categorize_type("TIMESTAMP"), TypeCategory::Timestamp);
        assert_eq!(categorize_type("TIMESTAMPTZ"), TypeCategory::TimestampTz);
        assert_eq!(categorize_type("DATE"), TypeCategory::Date);
        assert_eq!(categorize_type("TIME"), TypeCategory::Time);
    }

    #[test]
    fn test_categorize_type_other() {
        assert_eq!(categorize_type("NUMERIC"), TypeCategory::Decimal);
        assert_eq!(categorize_type("JSONB"), TypeCategory::Json);
        assert_eq!(categorize_type("UUID"), TypeCategory::Uuid);
        assert_eq!(categorize_type("BYTEA"), TypeCategory::Binary);
        assert_eq!(categorize_type("BOOL"), TypeCategory::Boolean);
        // user-defined enums and anything unknown come back as text
        assert_eq!(categorize_type("InvoiceStatus"), TypeCategory::Text);
        assert_eq!(categorize_type("VARCHAR"), TypeCategory::Text);
    }

    #[test]
    fn test_decimal_to_json() {
        assert_eq!(decimal_to_json("1250.50"), serde_json::json!(1250.5));
        assert_eq!(decimal_to_json("42"), serde_json::json!(42.0));
        assert_eq!(decimal_to_json("NaN"), JsonValue::String("NaN".to_string()));
    }

    #[test]
    fn test_decode_binary_value() {
        assert_eq!(
            decode_binary_value(b"hello world"),
            JsonValue::String("hello world".to_string())
        );
        let bytes: &[u8] = &[0xFF, 0xFE, 0x00, 0x01];
        assert_eq!(
            decode_binary_value(bytes),
            JsonValue::String("//4AAQ==".to_string())
        );
    }
}
