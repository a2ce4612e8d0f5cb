//! Property writer: validates a runtime value against the type declared by
//! the request and dispatches it to the injected [`PropertyFormat`].

use modkit_odata_edm::{EntityDataModel, PropertyValue, Type};
use tracing::{trace, warn};

use crate::config::PropertyWriterConfig;
use crate::error::Error;
use crate::format::PropertyFormat;
use crate::target::{RequestContext, TargetType, resolve_target_type};
use crate::validator::validate;

/// Writes the property addressed by one request.
///
/// The target type and its schema definition are resolved when the writer is
/// created; every later [`write`](Self::write) reuses them. A writer holds no mutable state and can
/// be shared between threads.
pub struct PropertyWriter<'a> {
    request: &'a dyn RequestContext,
    model: &'a EntityDataModel,
    format: &'a dyn PropertyFormat,
    config: PropertyWriterConfig,
    target_type: TargetType,
    declared: &'a Type,
}

impl<'a> PropertyWriter<'a> {
    /// Create a writer with the default configuration.
    ///
    /// # Errors
    /// Returns `Error::Configuration` if the request does not address a typed
    /// property and `Error::Schema` if the addressed type is unknown.
    pub fn new(
        request: &'a dyn RequestContext,
        model: &'a EntityDataModel,
        format: &'a dyn PropertyFormat,
    ) -> Result<Self, Error> {
        Self::with_config(request, model, format, PropertyWriterConfig::default())
    }

    /// Create a writer with an explicit configuration.
    ///
    /// # Errors
    /// Same as [`new`](Self::new).
    pub fn with_config(
        request: &'a dyn RequestContext,
        model: &'a EntityDataModel,
        format: &'a dyn PropertyFormat,
        config: PropertyWriterConfig,
    ) -> Result<Self, Error> {
        let target_type = resolve_target_type(request, model)?;
        let declared = model.get_type(target_type.type_name())?;
        Ok(Self {
            request,
            model,
            format,
            config,
            target_type,
            declared,
        })
    }

    /// Render `value` as the addressed property.
    ///
    /// `None` always renders as a null property, whatever the declared type.
    ///
    /// # Errors
    /// - `Error::TypeMismatch` / `Error::Schema` when the value does not match
    ///   the declared type
    /// - `Error::UnsupportedType` when the declared type is neither primitive
    ///   nor complex
    /// - `Error::Render` when the format fails
    pub fn write(&self, value: Option<&PropertyValue>) -> Result<String, Error> {
        trace!(target_type = %self.target_type, present = value.is_some(), "Writing property");

        let Some(value) = value else {
            return self.format.null_property().map_err(Error::from);
        };

        let declared = self.declared;
        validate(
            self.model,
            &self.target_type,
            value,
            self.config.empty_collection,
        )?;

        match declared {
            Type::Primitive(_) => {
                trace!(type_name = %declared.full_name(), "Property type is primitive");
                self.format
                    .primitive_property(value, declared)
                    .map_err(Error::from)
            }
            Type::Complex(structured) => {
                trace!(type_name = %declared.full_name(), "Property type is complex");
                self.format
                    .complex_property(value, structured)
                    .map_err(Error::from)
            }
            other => {
                warn!(
                    type_name = %other.full_name(),
                    meta_type = %other.meta_type(),
                    "Unhandled object type"
                );
                Err(Error::unsupported_type(other.full_name()))
            }
        }
    }

    #[must_use]
    pub fn target_type(&self) -> &TargetType {
        &self.target_type
    }

    /// Schema definition of the target type.
    #[must_use]
    pub fn declared_type(&self) -> &'a Type {
        self.declared
    }

    #[must_use]
    pub fn request(&self) -> &'a dyn RequestContext {
        self.request
    }

    #[must_use]
    pub fn model(&self) -> &'a EntityDataModel {
        self.model
    }

    #[must_use]
    pub fn format(&self) -> &'a dyn PropertyFormat {
        self.format
    }

    #[must_use]
    pub fn config(&self) -> &PropertyWriterConfig {
        &self.config
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use modkit_odata_edm::{EnumType, EnumValue, StructuredType};
    use tracing_test::traced_test;

    struct TagFormat;

    impl PropertyFormat for TagFormat {
        fn null_property(&self) -> Result<String, RenderError> {
            Ok("null".to_owned())
        }

        fn primitive_property(
            &self,
            _value: &PropertyValue,
            ty: &Type,
        ) -> Result<String, RenderError> {
            Ok(format!("primitive:{}", ty.full_name()))
        }

        fn complex_property(
            &self,
            _value: &PropertyValue,
            ty: &StructuredType,
        ) -> Result<String, RenderError> {
            Ok(format!("complex:{}", ty.full_name()))
        }
    }

    fn model() -> EntityDataModel {
        EntityDataModel::builder()
            .add_enum_type(EnumType::new("Model", "Color").with_member("Red"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_target_type_is_resolved_once_at_construction() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let calls = AtomicUsize::new(0);
        let request = |_: &EntityDataModel| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some(TargetType::single("Edm.String"))
        };
        let model = model();
        let writer = PropertyWriter::new(&request, &model, &TagFormat).unwrap();

        for _ in 0..3 {
            writer.write(Some(&"CEO".into())).unwrap();
            writer.write(None).unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(writer.target_type(), &TargetType::single("Edm.String"));
        assert_eq!(
            writer.declared_type(),
            model.get_type("Edm.String").unwrap()
        );
    }

    #[test]
    #[traced_test]
    fn test_enum_property_is_unsupported_and_logged() {
        let request = |_: &EntityDataModel| Some(TargetType::single("Model.Color"));
        let model = model();
        let writer = PropertyWriter::new(&request, &model, &TagFormat).unwrap();

        let err = writer
            .write(Some(&EnumValue::new("Model.Color", "Red").into()))
            .unwrap_err();

        assert!(matches!(err, Error::UnsupportedType(ref name) if name == "Model.Color"));
        assert!(logs_contain("Unhandled object type"));
    }

    #[test]
    fn test_writer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PropertyWriter<'static>>();
    }
}
