//! HTTP status for each error code

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::NotFound
            | Self::UserNotFound
            | Self::MemberNotFound
            | Self::IncomeNotFound
            | Self::ExpenseNotFound
            | Self::YearlyNotFound
            | Self::EventNotFound
            | Self::EventHistoryNotFound => StatusCode::NOT_FOUND,

            Self::AlreadyExists | Self::UsernameExists | Self::MemberHasUser => {
                StatusCode::CONFLICT
            }

            Self::OperatorRequired | Self::OperatorUnknown | Self::OperatorDisabled => {
                StatusCode::UNAUTHORIZED
            }

            Self::PermissionDenied
            | Self::CannotModifyAdmin
            | Self::CannotDeleteAdmin
            | Self::CannotDeleteSelf => StatusCode::FORBIDDEN,

            // Well-formed request that breaks a ledger rule
            Self::DuesIncomeLocked
            | Self::DuesStatusConflict
            | Self::ZeroAmountPayment
            | Self::OpeningBalanceCarried
            | Self::EventListEmpty => StatusCode::UNPROCESSABLE_ENTITY,

            Self::InternalError | Self::DatabaseError => StatusCode::INTERNAL_SERVER_ERROR,

            _ => StatusCode::BAD_REQUEST,
        }
    }
}
