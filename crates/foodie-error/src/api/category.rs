use std::fmt;

/// Broad classification of an error, used both for the HTTP status code
/// and the `code`/`subcode` fields of an [`ApiError`](super::ApiError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// We don't know what is the cause of this error but the error
    /// is reported to the server logs.
    Unknown,
    InvalidRequest,
    NotFound,
    /// A unique constraint was violated while writing to the database.
    Conflict,
    /// The request requires an authenticated user.
    AccessDenied,
    /// The authenticated user is not allowed to touch the resource.
    Forbidden,
    ExpiredToken,
    /// One of the services we depend on (most likely the database)
    /// is down and the action cannot be performed.
    Outage,
    LoginUserFailed(LoginUserFailed),
    RegisterUserFailed(RegisterUserFailed),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginUserFailed {
    InvalidCredentials,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegisterUserFailed {
    EmailTaken,
    InvalidPassword,
    UnmatchedPassword,
}

impl ErrorCategory {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::InvalidRequest => "invalid_request",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::AccessDenied => "access_denied",
            Self::Forbidden => "forbidden",
            Self::ExpiredToken => "expired_token",
            Self::Outage => "outage",
            Self::LoginUserFailed(..) => "login_user_failed",
            Self::RegisterUserFailed(..) => "register_user_failed",
        }
    }

    #[must_use]
    pub const fn subcode(&self) -> Option<&'static str> {
        match self {
            Self::LoginUserFailed(LoginUserFailed::InvalidCredentials) => {
                Some("invalid_credentials")
            }
            Self::RegisterUserFailed(RegisterUserFailed::EmailTaken) => Some("email_taken"),
            Self::RegisterUserFailed(RegisterUserFailed::InvalidPassword) => {
                Some("invalid_password")
            }
            Self::RegisterUserFailed(RegisterUserFailed::UnmatchedPassword) => {
                Some("unmatched_password")
            }
            _ => None,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.subcode() {
            Some(subcode) => write!(f, "{}.{subcode}", self.code()),
            None => f.write_str(self.code()),
        }
    }
}
