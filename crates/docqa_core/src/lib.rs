pub mod chunking;
pub mod domain;
pub mod error;
pub mod ingest;

#[cfg(test)]
mod tests {
    use super::error::AppError;

    #[test]
    fn app_error_is_structured() {
        let err = AppError::new("INGEST_TEST", "ingest failed")
            .with_details("path=/tmp/x")
            .with_retryable(false);
        assert_eq!(err.code, "INGEST_TEST");
        assert_eq!(err.message, "ingest failed");
        assert_eq!(err.retryable, false);
        assert_eq!(err.to_string(), "[INGEST_TEST] ingest failed");
        assert_eq!(err.describe(), "ingest failed (path=/tmp/x)");
    }
}
