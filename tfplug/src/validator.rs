use crate::types::{Diagnostics, Dynamic};

/// Plan-time check on a single attribute value.
///
/// Problems are appended to `diagnostics`; a validator never stops at the
/// first one.
pub trait Validator: Send + Sync {
    fn validate(&self, value: &Dynamic, attribute_path: &str, diagnostics: &mut Diagnostics);
}

/// Run every validator against the same value.
pub fn validate_all(
    validators: &[&dyn Validator],
    value: &Dynamic,
    attribute_path: &str,
) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for validator in validators {
        validator.validate(value, attribute_path, &mut diagnostics);
    }
    diagnostics
}
