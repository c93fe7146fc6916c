//! Form field helpers keyed by element id.

use super::view::{ElementHandle, ViewModel};
use thiserror::Error;

/// Classes marking a field as being in error
pub const ERROR_CLASSES: [&str; 3] = ["border-danger-subtle", "bg-danger-subtle", "text-danger-emphasis"];

const DISABLED: &str = "disabled";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Field '{0}' not found")]
    NotFound(String),
}

fn field<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<ElementHandle, FieldError> {
    view.get_element(field_name)
        .ok_or_else(|| FieldError::NotFound(field_name.to_string()))
}

/// Disables the field and returns its value.
pub fn get_and_disable<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<String, FieldError> {
    let handle = field(view, field_name)?;
    view.set_attribute(&handle, DISABLED, "true");
    Ok(view.value(&handle))
}

pub fn get_value<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<String, FieldError> {
    let handle = field(view, field_name)?;
    Ok(view.value(&handle))
}

/// Integer value of the field, `None` when it does not start with a number.
pub fn get_int_value<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<Option<i64>, FieldError> {
    Ok(parse_leading_int(&get_value(view, field_name)?))
}

pub fn enable<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<(), FieldError> {
    let handle = field(view, field_name)?;
    view.remove_attribute(&handle, DISABLED);
    Ok(())
}

pub fn disable<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<(), FieldError> {
    let handle = field(view, field_name)?;
    view.set_attribute(&handle, DISABLED, "true");
    Ok(())
}

pub fn clear_field_in_error<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<(), FieldError> {
    let handle = field(view, field_name)?;
    view.remove_classes(&handle, &ERROR_CLASSES);
    Ok(())
}

pub fn field_in_error<V: ViewModel + ?Sized>(view: &V, field_name: &str) -> Result<(), FieldError> {
    let handle = field(view, field_name)?;
    view.add_classes(&handle, &ERROR_CLASSES);
    Ok(())
}

/// Parse the leading decimal integer of `input`: optional leading whitespace,
/// optional sign, then digits up to the first non-digit. Values past the
/// `i64` range saturate at `i64::MIN` / `i64::MAX`.
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit);
    let mut seen = false;
    let value = digits.fold(0i64, |acc, b| {
        seen = true;
        let digit = i64::from(b - b'0');
        if negative {
            acc.saturating_mul(10).saturating_sub(digit)
        } else {
            acc.saturating_mul(10).saturating_add(digit)
        }
    });
    seen.then_some(value)
}
