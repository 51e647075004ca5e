use thiserror::Error;

/// Why the guard denied a request.
///
/// The guard only signals the kind (plus optional detail). Logging and the
/// HTTP status are decided by the caller, see `AppError::from_auth`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingCredential,
    #[error("authorization header must be in the form 'Bearer <token>'")]
    MalformedHeader,
    #[error("authorization token is malformed: {0}")]
    MalformedCredential(String),
    #[error("unable to find the appropriate signing key (kid '{0}')")]
    UnknownSigningKey(String),
    #[error("token expired")]
    CredentialExpired,
    #[error("token signature is invalid: {0}")]
    SignatureInvalid(String),
    #[error("incorrect claims, please check the audience and issuer: {0}")]
    ClaimsInvalid(String),
    #[error("permissions not included in token")]
    PermissionsClaimMissing,
    #[error("permission '{0}' not found in token")]
    PermissionDenied(String),
    #[error("signing key set unavailable: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// Stable machine-readable code (for logs).
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingCredential => "authorization_header_missing",
            Self::MalformedHeader => "invalid_header",
            Self::MalformedCredential(_) => "invalid_token",
            Self::UnknownSigningKey(_) => "unknown_signing_key",
            Self::CredentialExpired => "token_expired",
            Self::SignatureInvalid(_) => "invalid_signature",
            Self::ClaimsInvalid(_) => "invalid_claims",
            Self::PermissionsClaimMissing => "permissions_missing",
            Self::PermissionDenied(_) => "permission_denied",
            Self::KeySetUnavailable(_) => "key_set_unavailable",
        }
    }

    /// Everything except an unreachable key set is the caller's fault.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::KeySetUnavailable(_))
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => Self::CredentialExpired,
            ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => Self::ClaimsInvalid(e.to_string()),
            ErrorKind::InvalidToken | ErrorKind::Base64(_) => {
                Self::MalformedCredential(e.to_string())
            }
            // InvalidSignature, InvalidAlgorithm, key/crypto failures
            _ => Self::SignatureInvalid(e.to_string()),
        }
    }
}
