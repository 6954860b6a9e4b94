//! JOSE header of a compact JWS
//!
//! Only the parameters this crate acts on are modelled: `alg`, `typ` and
//! `kid`. Unknown parameters are ignored on decode.

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    Algorithm,
    JwtError,
    error::MalformedToken,
};

/// Media type written to the `typ` header parameter
pub const JWT_TYPE: &str = "JWT";

/// Decoded JOSE header.
///
/// `alg` is kept as the raw string so that an unknown algorithm surfaces as
/// [`JwtError::UnsupportedAlgorithm`] rather than a deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenHeader {
    /// `alg` (Algorithm) Header Parameter
    ///
    /// Ref: [RFC 7515 4.1.1](<https://datatracker.ietf.org/doc/html/rfc7515#section-4.1.1>)
    pub alg: String,

    /// `typ` (Type) Header Parameter
    ///
    /// Ref: [RFC 7515 4.1.9](<https://datatracker.ietf.org/doc/html/rfc7515#section-4.1.9>)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typ: Option<String>,

    /// `kid` (Key ID) Header Parameter, holding the key alias when it differs
    /// from the algorithm name
    ///
    /// Ref: [RFC 7515 4.1.4](<https://datatracker.ietf.org/doc/html/rfc7515#section-4.1.4>)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl TokenHeader {
    /// Header for a token signed by the key registered under `alias`.
    #[must_use]
    pub fn new(alias: &str, algorithm: Algorithm) -> Self {
        let kid = (alias != algorithm.as_str()).then(|| alias.to_owned());
        Self {
            alg: algorithm.to_string(),
            typ: Some(JWT_TYPE.to_owned()),
            kid,
        }
    }

    /// Parses the `alg` parameter.
    ///
    /// # Errors
    ///
    /// [`JwtError::UnsupportedAlgorithm`] for `none` and any algorithm outside
    /// the supported set.
    pub fn algorithm(&self) -> Result<Algorithm, JwtError> {
        self.alg.parse()
    }

    /// Alias of the key that must verify this token: `kid` when present,
    /// otherwise the `alg` name.
    #[must_use]
    pub fn key_alias(&self) -> &str {
        self.kid.as_deref().unwrap_or(&self.alg)
    }

    pub(crate) fn from_json(bytes: &[u8]) -> Result<Self, JwtError> {
        let header: Self = serde_json::from_slice(bytes)
            .map_err(|_| MalformedToken::HeaderDeserialization)?;
        match header.typ.as_deref() {
            Some(typ) if !typ.eq_ignore_ascii_case(JWT_TYPE) => Err(MalformedToken::WrongType.into()),
            _ => Ok(header),
        }
    }
}
