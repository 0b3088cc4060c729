//! Error and result type for mail composition

use std::{
    error::Error as StdError,
    fmt::{self, Display, Formatter},
};

use crate::address::AddressError;

/// An enum of all error kinds.
#[derive(Debug)]
pub enum Error {
    /// A required configuration option is absent
    MissingConfiguration(&'static str),
    /// An address failed syntax validation
    InvalidAddress(String, AddressError),
    /// Missing destination address at send time
    MissingTo,
}

impl Error {
    /// Returns true if the error was raised while resolving configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::MissingConfiguration(_))
    }

    /// Returns true if the error comes from message validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidAddress(_, _) | Error::MissingTo)
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Error::MissingConfiguration(key) => {
                write!(fmt, "missing required configuration option {key}")
            }
            Error::InvalidAddress(input, err) => {
                write!(fmt, "invalid email address `{input}`: {err}")
            }
            Error::MissingTo => fmt.write_str("at least one recipient is required"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::InvalidAddress(_, err) => Some(err),
            _ => None,
        }
    }
}
