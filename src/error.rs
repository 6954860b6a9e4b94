use thiserror::Error;

/// Errors raised while issuing, decoding or authenticating a JWT
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwtError {
    /// Error raised when the compact token cannot be parsed
    #[error("malformed token: {0}")]
    MalformedToken(#[from] MalformedToken),

    /// Error raised when an algorithm name is unknown or a key does not belong
    /// to the algorithm family it is registered for
    #[error("algorithm is not supported")]
    UnsupportedAlgorithm,

    /// Error raised when the `alg` header does not match the algorithm of the
    /// key selected for verification, or key material does not match the
    /// algorithm it is registered for (e.g. a P-384 key registered as `ES256`)
    #[error("jwt 'alg' header did not match the algorithm of the selected key")]
    WrongAlgorithm,

    /// Error raised by [`KeyRegistry`] when no key is registered under the alias
    ///
    /// [`KeyRegistry`]: crate::keystore::KeyRegistry
    #[error("no key registered under the requested alias")]
    KeyNotFound,

    /// Error raised when key material cannot be parsed by the crypto backend
    #[error("key material was rejected by the crypto backend")]
    InvalidKey,

    /// Error raised when signing is attempted with a verification-only key
    #[error("key has no private half and cannot sign")]
    KeyCannotSign,

    /// Error raised when the crypto backend fails to produce a signature
    #[error("signature could not be produced")]
    SigningFailed,

    /// Error raised when the signature does not verify with the selected key
    #[error("invalid signature")]
    SignatureInvalid,

    /// Error raised when `exp` (Expiration Time) indicates the token is expired
    #[error("jwt 'exp' claim indicates token is expired")]
    TokenExpired,

    /// Error raised when `nbf` (Not Before) indicates the token is not yet valid
    #[error("jwt 'nbf' claim indicates token is not yet valid")]
    TokenNotYetValid,

    /// Error raised when `iat` (Issued At) lies in the future
    #[error("jwt 'iat' claim indicates token was issued in the future")]
    IssuedInFuture,

    /// Error raised when an identity claim (`iss`, `aud`, `sub`) does not
    /// match the expected value; carries the claim name
    #[error("jwt '{0}' claim did not match the expected value")]
    ClaimMismatch(&'static str),

    /// Error raised when the permissions claim lacks a required permission
    #[error("jwt does not grant a required permission")]
    MissingPermission,

    /// Generic error raised by any custom [`TokenValidator`]
    ///
    /// [`TokenValidator`]: crate::validation::TokenValidator
    #[error("custom validation error: {0}")]
    CustomValidationError(&'static str),

    /// Error raised when the token is larger than the configured size limit
    #[error("jwt was above set size threshold")]
    OverSizeThreshold,

    /// Error raised when claims or header cannot be serialized while issuing
    #[error("token could not be serialized")]
    Serialization,
}

/// Structural failures while parsing a compact-encoded JWT
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MalformedToken {
    /// Compact-encoded JWS contains less than three sections
    #[error("token contained less than three sections")]
    Undersized,

    /// Compact-encoded JWS contains more than three sections
    #[error("token contained more than three sections")]
    Oversized,

    /// A section is not base64 url-safe encoded without padding
    #[error("jwt must use base64 url safe encoding")]
    InvalidEncoding,

    /// Header is not a JSON object with a string `alg` member
    #[error("header could not be deserialized")]
    HeaderDeserialization,

    /// Payload is not a JSON object
    #[error("claims could not be deserialized")]
    ClaimsDeserialization,

    /// `typ` header is present but is not `JWT`
    #[error("jwt 'typ' header was not 'JWT'")]
    WrongType,

    /// A registered claim has the wrong JSON type; carries the claim name
    #[error("jwt '{0}' claim has an invalid type")]
    InvalidClaim(&'static str),
}
