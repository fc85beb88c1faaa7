use validator::ValidationError;

/// Rejects strings that are empty or contain only whitespace.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be empty or whitespace-only".into());
        return Err(err);
    }
    Ok(())
}
