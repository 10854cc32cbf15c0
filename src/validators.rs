use regex::Regex;

use crate::masked::MaskParser;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Fails while any required free position of the parser's mask is still a
/// prompt character or invalid.
pub fn complete(parser: MaskParser, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if parser.is_valid_string(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

pub fn pattern(pattern: &str, message: impl Into<String>) -> Validator {
    let re = Regex::new(pattern).expect("Invalid regex pattern");
    let message = message.into();
    Box::new(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}
