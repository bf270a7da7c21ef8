pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    InvalidArguments,
}

/// Failures of `expected_statuses(...)`. Messages are part of the script-facing contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("no arguments")]
    NoArguments,

    #[error(
        "argument number {position} to expectedStatuses was neither an integer nor an object like {{min:100, max:329}}"
    )]
    NotIntegerOrRange { position: usize },

    #[error("both min and max need to be number for argument number {position}")]
    RangeBoundsNotIntegers { position: usize },
}

impl Error {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidArguments
    }

    /// 1-based position of the offending argument.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::NoArguments => None,
            Self::NotIntegerOrRange { position } | Self::RangeBoundsNotIntegers { position } => {
                Some(*position)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_script_contract() {
        assert_eq!(Error::NoArguments.to_string(), "no arguments");
        assert_eq!(
            Error::NotIntegerOrRange { position: 2 }.to_string(),
            "argument number 2 to expectedStatuses was neither an integer nor an object like {min:100, max:329}"
        );
        assert_eq!(
            Error::RangeBoundsNotIntegers { position: 3 }.to_string(),
            "both min and max need to be number for argument number 3"
        );
    }

    #[test]
    fn every_error_is_invalid_arguments() {
        assert_eq!(Error::NoArguments.kind(), ErrorKind::InvalidArguments);
        assert_eq!(Error::NoArguments.position(), None);
        assert_eq!(Error::NotIntegerOrRange { position: 4 }.position(), Some(4));
        assert_eq!(ErrorKind::InvalidArguments.to_string(), "invalid_arguments");
    }
}
