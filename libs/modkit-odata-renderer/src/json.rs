//! `OData` JSON encoding of individual properties.
//!
//! ```text
//! {"@odata.context":"<root>/$metadata#Customers(1)/Name","value":"CEO"}
//! {"@odata.context":"...","@odata.type":"#Model.Address","Street":"...","City":null}
//! {"@odata.context":"...","@odata.null":true}
//! ```

use modkit_odata_edm::{
    EntityDataModel, PropertyValue, StructuredType, StructuredValue, Type, Value,
};
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::RenderError;
use crate::format::PropertyFormat;
use crate::path::ResourcePath;

const CONTEXT: &str = "@odata.context";

/// [`PropertyFormat`] producing `OData` JSON property documents.
///
/// The model is consulted for the declared types of nested complex fields.
#[derive(Clone, Debug)]
pub struct JsonPropertyFormat<'a> {
    context_url: String,
    model: &'a EntityDataModel,
}

impl<'a> JsonPropertyFormat<'a> {
    #[must_use]
    pub fn new(service_root: &str, path: &ResourcePath, model: &'a EntityDataModel) -> Self {
        let root = service_root.trim_end_matches('/');
        Self {
            context_url: format!("{root}/$metadata#{}", path.context_fragment()),
            model,
        }
    }

    #[must_use]
    pub fn context_url(&self) -> &str {
        &self.context_url
    }

    fn encode(&self, body: Body<'_>) -> Result<String, RenderError> {
        let document = Document {
            context: &self.context_url,
            body,
        };
        serde_json::to_string(&document)
            .map_err(|e| RenderError::with_source("failed to encode JSON property", e))
    }
}

impl PropertyFormat for JsonPropertyFormat<'_> {
    fn null_property(&self) -> Result<String, RenderError> {
        self.encode(Body::Null)
    }

    fn primitive_property(&self, value: &PropertyValue, _ty: &Type) -> Result<String, RenderError> {
        self.encode(Body::Value(value))
    }

    fn complex_property(
        &self,
        value: &PropertyValue,
        ty: &StructuredType,
    ) -> Result<String, RenderError> {
        match value {
            PropertyValue::Single(item) => self.encode(Body::Fields(Fields::new(item, ty, self.model)?)),
            PropertyValue::Collection(items) => {
                let fields = items
                    .iter()
                    .map(|item| Fields::new(item, ty, self.model))
                    .collect::<Result<Vec<_>, _>>()?;
                self.encode(Body::Items(fields))
            }
        }
    }
}

struct Document<'a> {
    context: &'a str,
    body: Body<'a>,
}

enum Body<'a> {
    Null,
    Value(&'a PropertyValue),
    Fields(Fields<'a>),
    Items(Vec<Fields<'a>>),
}

/// Fields of one structured value, in the order the type declares them.
/// Missing fields are written as `null`; complex fields recurse.
struct Fields<'a> {
    value: &'a StructuredValue,
    ty: &'a StructuredType,
    model: &'a EntityDataModel,
}

impl<'a> Fields<'a> {
    fn new(
        value: &'a Value,
        ty: &'a StructuredType,
        model: &'a EntityDataModel,
    ) -> Result<Self, RenderError> {
        let value = value.as_structured().ok_or_else(|| {
            RenderError::new(format!(
                "expected a structured value for {}",
                ty.full_name()
            ))
        })?;
        Ok(Self { value, ty, model })
    }

    fn write_entries<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        for property in self.ty.properties() {
            let field = Field {
                value: self.value.get(&property.name),
                ty: self.model.structured_type(&property.type_name).ok(),
                model: self.model,
            };
            map.serialize_entry(&property.name, &field)?;
        }
        Ok(())
    }
}

impl Serialize for Fields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ty.properties().len()))?;
        self.write_entries(&mut map)?;
        map.end()
    }
}

/// One declared field. `ty` is set when the field's type is structured.
struct Field<'a> {
    value: Option<&'a PropertyValue>,
    ty: Option<&'a StructuredType>,
    model: &'a EntityDataModel,
}

impl Serialize for Field<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (Some(value), Some(ty)) = (self.value, self.ty) else {
            return self.value.serialize(serializer);
        };
        match value {
            PropertyValue::Single(item) => Fields::new(item, ty, self.model)
                .map_err(S::Error::custom)?
                .serialize(serializer),
            PropertyValue::Collection(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    let fields = Fields::new(item, ty, self.model).map_err(S::Error::custom)?;
                    seq.serialize_element(&fields)?;
                }
                seq.end()
            }
        }
    }
}

struct Items<'a>(&'a [Fields<'a>]);

impl Serialize for Items<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for item in self.0 {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

impl Serialize for Document<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(CONTEXT, self.context)?;
        match &self.body {
            Body::Null => map.serialize_entry("@odata.null", &true)?,
            Body::Value(value) => map.serialize_entry("value", value)?,
            Body::Fields(fields) => {
                map.serialize_entry("@odata.type", &format!("#{}", fields.ty.full_name()))?;
                fields.write_entries(&mut map)?;
            }
            Body::Items(items) => map.serialize_entry("value", &Items(items))?,
        }
        map.end()
    }
}
