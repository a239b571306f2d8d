use thiserror::Error;

/// Errors that can arise while mutating or persisting the player profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Rejected onboarding name/specialty or a required field left empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Imported text is not valid JSON or not shaped like a profile.
    #[error("malformed profile data: {0}")]
    MalformedData(String),

    /// Purchase attempted with a balance below the item price.
    #[error("insufficient funds: balance {balance}, price {price}")]
    InsufficientFunds { balance: u64, price: u64 },

    /// Operation requires an onboarded profile.
    #[error("no active profile")]
    NoActiveProfile,

    /// Onboarding requested while a profile is already active.
    #[error("a profile is already active; reset it before onboarding again")]
    AlreadyOnboarded,

    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around JSON serialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Wrapper around IO errors (slot directory creation, atomic writes).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Slot bytes were not valid UTF-8.
    #[error("utf-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl ProfileError {
    /// Business-rule rejections leave state untouched and can simply be retried.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ProfileError::InvalidInput(_)
                | ProfileError::MalformedData(_)
                | ProfileError::InsufficientFunds { .. }
                | ProfileError::NoActiveProfile
                | ProfileError::AlreadyOnboarded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_are_recoverable() {
        assert!(ProfileError::InvalidInput("name".into()).is_recoverable());
        assert!(ProfileError::InsufficientFunds { balance: 1, price: 2 }.is_recoverable());
        let io = ProfileError::Io(std::io::Error::other("disk gone"));
        assert!(!io.is_recoverable());
    }

    #[test]
    fn insufficient_funds_message_names_amounts() {
        let err = ProfileError::InsufficientFunds { balance: 150, price: 400 };
        assert_eq!(err.to_string(), "insufficient funds: balance 150, price 400");
    }
}
