//! Entity Data Model for `OData` property rendering.
//!
//! Provides schema type descriptors ([`Type`], [`StructuredType`]), the
//! runtime value model ([`PropertyValue`]) and the immutable registry that
//! connects the two ([`EntityDataModel`]).
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod error;
pub mod model;
pub mod types;
pub mod value;

pub use error::EdmError;
pub use model::{EntityDataModel, EntityDataModelBuilder, EntitySet};
pub use types::{EnumType, MetaType, PrimitiveType, StructuralProperty, StructuredType, Type};
pub use value::{EnumValue, PrimitiveValue, PropertyValue, StructuredValue, TypeTag, Value};
