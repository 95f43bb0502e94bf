//! Error responses.
//!
//! Every failure leaves the API as `{ "error": <snake_code>, "message": <text> }`
//! with the status code of its [`AppError`] category.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bukubesar_core::auth::PasswordError;
use bukubesar_db::repositories::{AccountError, JournalError, ReportError, UserError};
use bukubesar_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde::Serialize;
use tracing::error;
use validator::ValidationErrors;

/// JSON error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable code.
    pub error: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An [`AppError`] with the code it is reported under.
#[derive(Debug)]
pub struct ApiError {
    code: &'static str,
    error: AppError,
}

impl ApiError {
    /// Reports `error` under a more specific code than its category's.
    #[must_use]
    pub const fn new(code: &'static str, error: AppError) -> Self {
        Self { code, error }
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Returns the wrapped error.
    #[must_use]
    pub const fn inner(&self) -> &AppError {
        &self.error
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_server_error() {
            error!(error = %self.error, code = self.code, "Request failed");
        }

        let body = ErrorBody {
            error: self.code,
            message: self.error.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self::new(error.error_code(), error)
    }
}

impl From<DbErr> for ApiError {
    fn from(e: DbErr) -> Self {
        AppError::Persistence(e.to_string()).into()
    }
}

impl From<PasswordError> for ApiError {
    fn from(e: PasswordError) -> Self {
        AppError::from(e).into()
    }
}

impl From<JwtError> for ApiError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::EncodingError(_) => AppError::Internal(e.to_string()).into(),
            JwtError::Expired => {
                Self::new("token_expired", AppError::Unauthorized("Token has expired".into()))
            }
            JwtError::DecodingError(_) => Self::new(
                "invalid_token",
                AppError::Unauthorized("Invalid or malformed token".into()),
            ),
        }
    }
}

// ============================================================================
// Repository errors
// ============================================================================

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::DuplicateCode(_) => {
                Self::new("duplicate_code", AppError::Conflict(e.to_string()))
            }
            AccountError::NotFound(_) => AppError::NotFound(e.to_string()).into(),
            AccountError::Invalid(inner) => AppError::from(inner).into(),
            AccountError::Database(db) => db.into(),
        }
    }
}

impl From<JournalError> for ApiError {
    fn from(e: JournalError) -> Self {
        match e {
            JournalError::NotFound(_) => AppError::NotFound(e.to_string()).into(),
            JournalError::Ledger(inner) => Self::new(inner.error_code(), inner.into()),
            JournalError::ReferenceTaken(_) => {
                Self::new("reference_conflict", AppError::Conflict(e.to_string()))
            }
            JournalError::Database(db) => db.into(),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(e: ReportError) -> Self {
        match e {
            ReportError::Report(inner) => AppError::from(inner).into(),
            ReportError::Database(db) => db.into(),
        }
    }
}

impl From<UserError> for ApiError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::AlreadyExists => {
                Self::new("user_exists", AppError::Conflict(e.to_string()))
            }
            UserError::Database(db) => db.into(),
        }
    }
}

// ============================================================================
// Request errors
// ============================================================================

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(describe_validation(&errors)).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new("invalid_body", AppError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new("invalid_query", AppError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::new("invalid_path", AppError::Validation(rejection.body_text()))
    }
}

/// Renders field errors as `field: message; field: message`, sorted by field.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    fields.sort();

    if fields.is_empty() {
        "Invalid request".to_string()
    } else {
        fields.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bukubesar_core::chart::ChartError;
    use bukubesar_core::ledger::{JournalStatus, LedgerError};
    use bukubesar_core::reports::ReportError as CoreReportError;
    use http_body_util::BodyExt;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use serde_json::Value;
    use uuid::Uuid;

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[rstest]
    #[case(AccountError::DuplicateCode("1-1001".into()).into(), StatusCode::CONFLICT, "duplicate_code")]
    #[case(AccountError::NotFound("9-9999".into()).into(), StatusCode::NOT_FOUND, "not_found")]
    #[case(AccountError::Invalid(ChartError::SelfParent("1-1001".into())).into(), StatusCode::BAD_REQUEST, "validation_error")]
    #[case(JournalError::NotFound(Uuid::nil()).into(), StatusCode::NOT_FOUND, "not_found")]
    #[case(JournalError::Ledger(LedgerError::InsufficientLines(1)).into(), StatusCode::BAD_REQUEST, "insufficient_lines")]
    #[case(JournalError::Ledger(LedgerError::NotPostable(Some(JournalStatus::Posted))).into(), StatusCode::CONFLICT, "not_postable")]
    #[case(JournalError::Ledger(LedgerError::NotDeletable(None)).into(), StatusCode::CONFLICT, "not_deletable")]
    #[case(JournalError::Ledger(LedgerError::AmountTooLarge { line: 1 }).into(), StatusCode::BAD_REQUEST, "amount_too_large")]
    #[case(JournalError::ReferenceTaken("JRN-20260301-AAAA".into()).into(), StatusCode::CONFLICT, "reference_conflict")]
    #[case(AccountError::Invalid(ChartError::InvalidName(String::new())).into(), StatusCode::BAD_REQUEST, "validation_error")]
    #[case(ReportError::Report(CoreReportError::AccountNotFound("9-9999".into())).into(), StatusCode::NOT_FOUND, "not_found")]
    #[case(UserError::AlreadyExists.into(), StatusCode::CONFLICT, "user_exists")]
    #[case(JwtError::Expired.into(), StatusCode::UNAUTHORIZED, "token_expired")]
    fn test_status_and_code(
        #[case] err: ApiError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        assert_eq!(err.status(), status);
        assert_eq!(err.code(), code);
    }

    #[tokio::test]
    async fn test_unbalanced_journal_body() {
        let err: ApiError = JournalError::Ledger(LedgerError::Unbalanced {
            debit: dec!(1000.00),
            credit: dec!(999.99),
        })
        .into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unbalanced_journal");
        assert_eq!(
            body["message"],
            "Journal entry is not balanced. Debit: 1000.00, Credit: 999.99"
        );
    }

    #[tokio::test]
    async fn test_database_error_is_hidden() {
        let err: ApiError =
            AccountError::Database(DbErr::Custom("relation \"chart_of_accounts\" missing".into()))
                .into();

        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "persistence_error");
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[test]
    fn test_validation_errors_are_sorted_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "password",
            validator::ValidationError::new("length").with_message("too short".into()),
        );
        errors.add("email", validator::ValidationError::new("email"));

        assert_eq!(describe_validation(&errors), "email: email; password: too short");
    }
}
