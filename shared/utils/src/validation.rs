use crate::error::{BankdocError, BankdocResult};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> BankdocResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(BankdocError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, &error.code) {
                (Some(message), _) => message.to_string(),
                (None, std::borrow::Cow::Borrowed("email")) => "Invalid email format".to_string(),
                (None, std::borrow::Cow::Borrowed("length")) => {
                    format!("Length validation failed for field '{}'", field)
                }
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

pub fn validate_file_size(file_size: u64, max_size: u64) -> BankdocResult<()> {
    if file_size == 0 {
        return Err(BankdocError::validation("file_size", "Uploaded file is empty"));
    }

    if file_size > max_size {
        return Err(BankdocError::validation(
            "file_size",
            format!("File size {} bytes exceeds maximum allowed size {} bytes", file_size, max_size),
        ));
    }

    Ok(())
}

/// Bearer tokens are URL-safe base64 without padding.
pub fn validate_bearer_token(token: &str) -> BankdocResult<()> {
    let well_formed = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !well_formed {
        return Err(BankdocError::authentication("Malformed bearer token"));
    }

    Ok(())
}
