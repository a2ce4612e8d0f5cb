//! Runtime values that can be written as `OData` properties.
//!
//! Each value carries a [`TypeTag`]. The model maps tags back to schema types,
//! so a value never has to be inspected structurally to learn its type.

use std::borrow::Cow;
use std::fmt;

use base64::Engine;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::types::PrimitiveType;

/// Stable identifier linking a runtime value to the schema type it was
/// registered under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(Cow<'static, str>);

impl TypeTag {
    #[must_use]
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self(Cow::Owned(tag.into()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for TypeTag {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

/// Value of an EDM primitive type.
///
/// Serialized the way `OData` JSON writes primitives with
/// `IEEE754Compatible=true`: `Edm.Decimal` becomes a string so no digits are
/// lost, and non-finite doubles become `"NaN"`, `"INF"` or `"-INF"`.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
    Boolean(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    Guid(Uuid),
    Date(NaiveDate),
    DateTimeOffset(DateTime<Utc>),
    TimeOfDay(NaiveTime),
    Binary(Vec<u8>),
}

impl PrimitiveValue {
    #[must_use]
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveValue::Boolean(_) => PrimitiveType::Boolean,
            PrimitiveValue::Byte(_) => PrimitiveType::Byte,
            PrimitiveValue::Int16(_) => PrimitiveType::Int16,
            PrimitiveValue::Int32(_) => PrimitiveType::Int32,
            PrimitiveValue::Int64(_) => PrimitiveType::Int64,
            PrimitiveValue::Double(_) => PrimitiveType::Double,
            PrimitiveValue::Decimal(_) => PrimitiveType::Decimal,
            PrimitiveValue::String(_) => PrimitiveType::String,
            PrimitiveValue::Guid(_) => PrimitiveType::Guid,
            PrimitiveValue::Date(_) => PrimitiveType::Date,
            PrimitiveValue::DateTimeOffset(_) => PrimitiveType::DateTimeOffset,
            PrimitiveValue::TimeOfDay(_) => PrimitiveType::TimeOfDay,
            PrimitiveValue::Binary(_) => PrimitiveType::Binary,
        }
    }

    /// Primitives are tagged with their EDM name.
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        TypeTag::from_static(self.primitive_type().full_name())
    }
}

impl Serialize for PrimitiveValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PrimitiveValue::Boolean(b) => serializer.serialize_bool(*b),
            PrimitiveValue::Byte(n) => serializer.serialize_u8(*n),
            PrimitiveValue::Int16(n) => serializer.serialize_i16(*n),
            PrimitiveValue::Int32(n) => serializer.serialize_i32(*n),
            PrimitiveValue::Int64(n) => serializer.serialize_i64(*n),
            PrimitiveValue::Double(n) if n.is_nan() => serializer.serialize_str("NaN"),
            PrimitiveValue::Double(n) if n.is_infinite() => {
                serializer.serialize_str(if n.is_sign_positive() { "INF" } else { "-INF" })
            }
            PrimitiveValue::Double(n) => serializer.serialize_f64(*n),
            PrimitiveValue::String(s) => serializer.serialize_str(s),
            PrimitiveValue::Decimal(d) => serializer.collect_str(d),
            PrimitiveValue::Guid(u) => serializer.collect_str(u),
            PrimitiveValue::Date(d) => serializer.collect_str(d),
            PrimitiveValue::DateTimeOffset(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            PrimitiveValue::TimeOfDay(t) => serializer.collect_str(t),
            PrimitiveValue::Binary(bytes) => serializer
                .serialize_str(&base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)),
        }
    }
}

macro_rules! impl_primitive_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PrimitiveValue {
                fn from(v: $ty) -> Self {
                    PrimitiveValue::$variant(v)
                }
            }

            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::Primitive(v.into())
                }
            }

            impl From<$ty> for PropertyValue {
                fn from(v: $ty) -> Self {
                    PropertyValue::Single(v.into())
                }
            }
        )*
    };
}

impl_primitive_from! {
    bool => Boolean,
    u8 => Byte,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f64 => Double,
    BigDecimal => Decimal,
    String => String,
    Uuid => Guid,
    NaiveDate => Date,
    DateTime<Utc> => DateTimeOffset,
    NaiveTime => TimeOfDay,
}

impl From<&str> for PrimitiveValue {
    fn from(v: &str) -> Self {
        PrimitiveValue::String(v.to_owned())
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Primitive(v.into())
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Single(v.into())
    }
}

/// Instance of a complex or entity type.
///
/// Properties keep insertion order; a `None` entry is an explicit null.
#[derive(Clone, Debug, PartialEq)]
pub struct StructuredValue {
    type_tag: TypeTag,
    properties: Vec<(String, Option<PropertyValue>)>,
}

impl StructuredValue {
    #[must_use]
    pub fn new(type_tag: impl Into<TypeTag>) -> Self {
        Self {
            type_tag: type_tag.into(),
            properties: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push((name.into(), Some(value.into())));
        self
    }

    #[must_use]
    pub fn with_null(mut self, name: impl Into<String>) -> Self {
        self.properties.push((name.into(), None));
        self
    }

    #[must_use]
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    /// Value of a property; `None` both when absent and when explicitly null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn properties(&self) -> impl Iterator<Item = (&str, Option<&PropertyValue>)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v.as_ref()))
    }
}

impl Serialize for StructuredValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.properties.len()))?;
        for (name, value) in &self.properties {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Member of an enumeration type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValue {
    type_tag: TypeTag,
    member: String,
}

impl EnumValue {
    #[must_use]
    pub fn new(type_tag: impl Into<TypeTag>, member: impl Into<String>) -> Self {
        Self {
            type_tag: type_tag.into(),
            member: member.into(),
        }
    }

    #[must_use]
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    #[must_use]
    pub fn member(&self) -> &str {
        &self.member
    }
}

impl Serialize for EnumValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.member)
    }
}

/// A single non-null instance.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Primitive(PrimitiveValue),
    Structured(StructuredValue),
    Enum(EnumValue),
}

impl Value {
    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Primitive(p) => p.type_tag(),
            Value::Structured(s) => s.type_tag().clone(),
            Value::Enum(e) => e.type_tag().clone(),
        }
    }

    #[must_use]
    pub fn as_structured(&self) -> Option<&StructuredValue> {
        match self {
            Value::Structured(s) => Some(s),
            Value::Primitive(_) | Value::Enum(_) => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Primitive(p) => p.serialize(serializer),
            Value::Structured(s) => s.serialize(serializer),
            Value::Enum(e) => e.serialize(serializer),
        }
    }
}

impl From<PrimitiveValue> for Value {
    fn from(v: PrimitiveValue) -> Self {
        Value::Primitive(v)
    }
}

impl From<StructuredValue> for Value {
    fn from(v: StructuredValue) -> Self {
        Value::Structured(v)
    }
}

impl From<EnumValue> for Value {
    fn from(v: EnumValue) -> Self {
        Value::Enum(v)
    }
}

/// The value of a property: one instance or an ordered collection.
///
/// Collections are expected to be homogeneous; only the first element is
/// consulted when inferring the element type.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Single(Value),
    Collection(Vec<Value>),
}

impl PropertyValue {
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, PropertyValue::Collection(_))
    }

    #[must_use]
    pub fn is_empty_collection(&self) -> bool {
        matches!(self, PropertyValue::Collection(items) if items.is_empty())
    }

    /// The instance whose tag determines the value's type: the value itself,
    /// or the first element of a collection.
    #[must_use]
    pub fn representative(&self) -> Option<&Value> {
        match self {
            PropertyValue::Single(v) => Some(v),
            PropertyValue::Collection(items) => items.first(),
        }
    }

    /// Shape description used in error messages.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        if self.is_collection() {
            "collection"
        } else {
            "single value"
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Single(v) => v.serialize(serializer),
            PropertyValue::Collection(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl From<Value> for PropertyValue {
    fn from(v: Value) -> Self {
        PropertyValue::Single(v)
    }
}

impl From<PrimitiveValue> for PropertyValue {
    fn from(v: PrimitiveValue) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl From<StructuredValue> for PropertyValue {
    fn from(v: StructuredValue) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl From<EnumValue> for PropertyValue {
    fn from(v: EnumValue) -> Self {
        PropertyValue::Single(v.into())
    }
}

impl<T: Into<Value>> From<Vec<T>> for PropertyValue {
    fn from(items: Vec<T>) -> Self {
        PropertyValue::Collection(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn primitive_tags_follow_edm_names() {
        assert_eq!(Value::from("CEO").type_tag().as_str(), "Edm.String");
        assert_eq!(Value::from(42_i32).type_tag().as_str(), "Edm.Int32");
        assert_eq!(Value::from(Uuid::nil()).type_tag().as_str(), "Edm.Guid");
    }

    #[test]
    fn representative_of_collection_is_first_element() {
        let pv = PropertyValue::from(vec!["a", "b"]);
        assert!(pv.is_collection());
        assert!(!pv.is_empty_collection());
        assert_eq!(pv.representative(), Some(&Value::from("a")));

        let empty = PropertyValue::Collection(Vec::new());
        assert!(empty.is_empty_collection());
        assert_eq!(empty.representative(), None);
    }

    #[test]
    fn structured_value_lookup_treats_null_as_absent() {
        let address = StructuredValue::new("Model.Address")
            .with("City", "Berlin")
            .with_null("Region");

        assert_eq!(address.get("City"), Some(&PropertyValue::from("Berlin")));
        assert_eq!(address.get("Region"), None);
        assert_eq!(address.get("Missing"), None);
        assert_eq!(address.properties().count(), 2);
    }

    #[test]
    fn values_serialize_to_plain_json() {
        let address = StructuredValue::new("Model.Address")
            .with("City", "Berlin")
            .with("Numbers", vec![1_i32, 2])
            .with_null("Region");

        let json = serde_json::to_value(PropertyValue::from(address)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "City": "Berlin", "Numbers": [1, 2], "Region": null })
        );

        let color = EnumValue::new("Model.Color", "Red");
        assert_eq!(serde_json::to_value(Value::from(color)).unwrap(), "Red");
    }

    #[test]
    fn non_finite_doubles_serialize_as_odata_strings() {
        let json = serde_json::to_value(PropertyValue::from(vec![
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            1.5,
        ]))
        .unwrap();
        assert_eq!(json, serde_json::json!(["NaN", "INF", "-INF", 1.5]));
    }

    #[test]
    fn decimal_serializes_as_exact_string() {
        let amount: BigDecimal = "1234567890.0123456789".parse().unwrap();
        assert_eq!(
            serde_json::to_value(Value::from(amount)).unwrap(),
            "1234567890.0123456789"
        );
    }
}
