//! Transfer outcome and error types

use thiserror::Error;

use crate::ledger::StoreError;
use crate::lock::LockError;

/// Non-success outcomes of a transfer.
///
/// The first five are business outcomes the orchestrator returns as values;
/// callers react to them (retry with backoff on `Conflict`, correct the
/// request on `RecipientMissing`). Only the two store variants are genuine
/// faults, propagated upward unmodified.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("transaction in progress for this account pair")]
    Conflict,

    #[error("not enough balance")]
    InsufficientFunds,

    #[error("recipient account not found")]
    RecipientMissing,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("source and destination account cannot be the same")]
    SameAccount,

    #[error(transparent)]
    Ledger(#[from] StoreError),

    #[error(transparent)]
    LockStore(#[from] LockError),
}

impl TransferError {
    /// Error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::Conflict => "TRANSACTION_CONFLICT",
            TransferError::InsufficientFunds => "INSUFFICIENT_FUNDS",
            TransferError::RecipientMissing => "RECIPIENT_NOT_FOUND",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::Ledger(_) => "STORAGE_ERROR",
            TransferError::LockStore(_) => "LOCK_STORE_ERROR",
        }
    }

    /// HTTP status code suggestion for the (external) transport layer.
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::Conflict => 409,
            TransferError::InsufficientFunds | TransferError::RecipientMissing => 422,
            TransferError::InvalidAmount | TransferError::SameAccount => 400,
            TransferError::Ledger(_) => 500,
            TransferError::LockStore(_) => 503,
        }
    }

    /// True for the caller-recoverable business outcomes, false for
    /// infrastructure faults.
    pub fn is_business_outcome(&self) -> bool {
        !matches!(
            self,
            TransferError::Ledger(_) | TransferError::LockStore(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TransferError::Conflict.code(), "TRANSACTION_CONFLICT");
        assert_eq!(TransferError::InsufficientFunds.code(), "INSUFFICIENT_FUNDS");
        assert_eq!(TransferError::RecipientMissing.code(), "RECIPIENT_NOT_FOUND");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(TransferError::Conflict.http_status(), 409);
        assert_eq!(TransferError::InsufficientFunds.http_status(), 422);
        assert_eq!(TransferError::InvalidAmount.http_status(), 400);
    }

    #[test]
    fn test_business_outcomes() {
        assert!(TransferError::Conflict.is_business_outcome());
        assert!(TransferError::SameAccount.is_business_outcome());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TransferError::InsufficientFunds.to_string(),
            "not enough balance"
        );
    }
}
