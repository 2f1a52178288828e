use crate::{
    definition::DefinitionError, paginate::PaginateError, registry::RegistryError,
    source::SourceError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Single error surface for the engine. Every failure condition is a
/// distinct variant of one of the subsystem enums below; nothing is
/// reduced to a bare message string.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Paginate(#[from] PaginateError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Registry(err) => err.class(),
            Self::Definition(err) => err.class(),
            Self::Paginate(err) => err.class(),
            Self::Source(err) => err.class(),
        }
    }

    #[must_use]
    pub const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::Registry(_) => ErrorOrigin::Registry,
            Self::Definition(_) => ErrorOrigin::Mode,
            Self::Paginate(_) => ErrorOrigin::Paginate,
            Self::Source(_) => ErrorOrigin::Source,
        }
    }

    /// Configuration errors are fatal at boot; everything else is
    /// recoverable per request.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(self.class(), ErrorClass::Configuration)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {self}", self.origin(), self.class())
    }
}

///
/// ErrorClass
/// Failure taxonomy used for boot-vs-request classification and for
/// status mapping by the embedding layer.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Unsupported,
    NotFound,
    InvalidOperation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Unsupported => "unsupported",
            Self::NotFound => "not_found",
            Self::InvalidOperation => "invalid_operation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Subsystem that produced the failure.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Registry,
    Mode,
    Paginate,
    Source,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Registry => "registry",
            Self::Mode => "mode",
            Self::Paginate => "paginate",
            Self::Source => "source",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///
