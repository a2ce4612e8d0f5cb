//! Validation of a runtime value against the declared target type.

use modkit_odata_edm::{EntityDataModel, PropertyValue};
use tracing::trace;

use crate::config::EmptyCollectionPolicy;
use crate::error::Error;
use crate::target::TargetType;

/// Check that `value` has the declared cardinality and element type.
///
/// Empty collections carry no element to infer a type from; `policy` decides
/// whether they are accepted outright or only for declared collections.
///
/// # Errors
/// - `Error::TypeMismatch` when the cardinality or the element type differs
/// - `Error::Schema` when the value's tag is not registered in the model
pub fn validate(
    model: &EntityDataModel,
    declared: &TargetType,
    value: &PropertyValue,
    policy: EmptyCollectionPolicy,
) -> Result<(), Error> {
    if value.is_empty_collection() && policy.accepts(declared.is_collection()) {
        trace!(target_type = %declared, "Accepting empty collection");
        return Ok(());
    }

    if value.is_collection() != declared.is_collection() {
        let expected = if declared.is_collection() {
            "collection"
        } else {
            "single value"
        };
        return Err(Error::type_mismatch(
            format!("{expected} of {}", declared.type_name()),
            value.shape(),
        ));
    }

    let actual = model.type_for_shape(value)?;
    if actual.full_name() != declared.type_name() {
        return Err(Error::type_mismatch(
            declared.type_name(),
            actual.full_name(),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use modkit_odata_edm::{EdmError, StructuredType, StructuredValue, TypeTag, Value};

    fn model() -> EntityDataModel {
        EntityDataModel::builder()
            .add_complex_type(StructuredType::new("Model", "Address"))
            .build()
            .unwrap()
    }

    const ACCEPT: EmptyCollectionPolicy = EmptyCollectionPolicy::AlwaysAccept;
    const STRICT: EmptyCollectionPolicy = EmptyCollectionPolicy::RequireDeclaredCollection;

    #[test]
    fn test_matching_scalar_passes() {
        let declared = TargetType::single("Edm.String");
        assert!(validate(&model(), &declared, &"CEO".into(), ACCEPT).is_ok());
    }

    #[test]
    fn test_matching_collection_passes() {
        let declared = TargetType::collection("Model.Address");
        let value = PropertyValue::from(vec![
            StructuredValue::new("Model.Address"),
            StructuredValue::new("Model.Address"),
        ]);
        assert!(validate(&model(), &declared, &value, ACCEPT).is_ok());
    }

    #[test]
    fn test_empty_collection_policy() {
        let empty = PropertyValue::Collection(Vec::<Value>::new());
        let scalar = TargetType::single("Edm.String");
        let collection = TargetType::collection("Edm.String");

        assert!(validate(&model(), &scalar, &empty, ACCEPT).is_ok());
        assert!(validate(&model(), &collection, &empty, ACCEPT).is_ok());
        assert!(validate(&model(), &collection, &empty, STRICT).is_ok());

        let err = validate(&model(), &scalar, &empty, STRICT).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { found, .. } if found == "collection"));
    }

    #[test]
    fn test_cardinality_mismatch() {
        let err = validate(
            &model(),
            &TargetType::collection("Edm.String"),
            &"CEO".into(),
            ACCEPT,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { expected, found }
                if expected == "collection of Edm.String" && found == "single value"
        ));

        let err = validate(
            &model(),
            &TargetType::single("Edm.String"),
            &vec!["a"].into(),
            ACCEPT,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { found, .. } if found == "collection"));
    }

    #[test]
    fn test_element_type_mismatch() {
        let err = validate(&model(), &TargetType::single("Edm.String"), &42_i32.into(), ACCEPT)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::TypeMismatch { expected, found }
                if expected == "Edm.String" && found == "Edm.Int32"
        ));
    }

    #[test]
    fn test_only_first_element_is_inspected() {
        let declared = TargetType::collection("Edm.String");
        let mixed = PropertyValue::Collection(vec![Value::from("a"), Value::from(1_i32)]);
        assert!(validate(&model(), &declared, &mixed, ACCEPT).is_ok());
    }

    #[test]
    fn test_unmapped_shape_is_schema_error() {
        let value = PropertyValue::from(StructuredValue::new("Model.Unknown"));
        let err = validate(&model(), &TargetType::single("Model.Address"), &value, ACCEPT)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(EdmError::UnmappedShape(tag)) if tag == TypeTag::from_static("Model.Unknown")
        ));
    }
}
