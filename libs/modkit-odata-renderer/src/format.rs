//! Wire-format capability injected into the [`PropertyWriter`](crate::PropertyWriter).

use modkit_odata_edm::{PropertyValue, StructuredType, Type};

use crate::error::RenderError;

/// Produces the encoded representation of a single property.
///
/// Implementations own the concrete format (JSON, Atom XML, ...). The writer
/// has already validated `value` against the declared type before calling the
/// primitive and complex methods.
pub trait PropertyFormat: Send + Sync {
    /// Encoding of a property whose value is null.
    ///
    /// # Errors
    /// Returns `RenderError` if the output cannot be produced.
    fn null_property(&self) -> Result<String, RenderError>;

    /// Encoding of a primitive property or a collection of primitives.
    ///
    /// # Errors
    /// Returns `RenderError` if the output cannot be produced.
    fn primitive_property(&self, value: &PropertyValue, ty: &Type) -> Result<String, RenderError>;

    /// Encoding of a complex property or a collection of complex values.
    /// Nested fields are the implementation's responsibility.
    ///
    /// # Errors
    /// Returns `RenderError` if the output cannot be produced.
    fn complex_property(
        &self,
        value: &PropertyValue,
        ty: &StructuredType,
    ) -> Result<String, RenderError>;
}
