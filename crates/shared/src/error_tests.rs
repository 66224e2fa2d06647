use super::*;

#[test]
fn test_app_error_error_codes() {
    assert_eq!(
        AppError::Configuration("test".into()).error_code(),
        "CONFIGURATION_ERROR"
    );
    assert_eq!(
        AppError::Transport("test".into()).error_code(),
        "TRANSPORT_ERROR"
    );
    assert_eq!(
        AppError::LocalIo("test".into()).error_code(),
        "LOCAL_IO_ERROR"
    );
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::InvalidInput("test".into()).error_code(),
        "INVALID_INPUT"
    );
    assert_eq!(
        AppError::Document("test".into()).error_code(),
        "DOCUMENT_ERROR"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Configuration("S3_BUCKET_NAME is not set".into())),
        "Configuration error: S3_BUCKET_NAME is not set. Please check your S3 environment variables."
    );
    assert_eq!(
        format!("{}", AppError::Transport("msg".into())),
        "Remote storage error: msg"
    );
    assert_eq!(
        format!("{}", AppError::LocalIo("msg".into())),
        "File system error: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::InvalidInput("msg".into())),
        "Invalid input: msg"
    );
    assert_eq!(
        format!("{}", AppError::Document("msg".into())),
        "Document error: msg"
    );
    assert_eq!(
        format!("{}", AppError::Internal("msg".into())),
        "Internal error: msg"
    );
}
