#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![doc = include_str!("../README.md")]

/// JWT claim set and typed access to registered claims.
pub mod claims;

/// Provider options and their serde-facing configuration form.
pub mod config;

/// Key material and the sign/verify operations over it.
pub mod crypto;

/// Error enums
pub mod error;

/// JOSE header model.
pub mod header;

/// Functions and traits supporting JWT validation.
pub mod validation;

/// Functionality for encoding JWTs (including signing).
pub mod encoding;

/// Alias-addressed key registry.
pub mod keystore;

mod provider;

// WARNING: The decoding module is not considered part of the public API
// and is subject to breaking changes outside SemVer restrictions. It is
// marked `pub` purely for benchmarking purposes.
#[doc(hidden)]
pub mod decoding;

mod algorithm;
pub use algorithm::{
    Algorithm,
    AlgorithmFamily,
};
pub use claims::ClaimSet;
pub use config::{
    AuthenticateOptions,
    IssueOptions,
    JwtOptions,
};
pub use crypto::KeyEntry;
pub use error::JwtError;
pub use keystore::KeyRegistry;
pub use provider::{
    JwtAuth,
    JwtAuthBuilder,
};

/// Provides dangerous (i.e. non-signature-verifying) JWT decoding functionality.
pub mod dangerous {
    use crate::{
        ClaimSet,
        JwtError,
        decoding::CompactToken,
        header::TokenHeader,
    };

    /// Decodes JWT without any signature validation/verification
    ///
    /// DANGER: does NOT validate/verify JWT signature, nor any claim.
    ///
    /// Use [`JwtAuth::authenticate`] for anything that grants access.
    ///
    /// [`JwtAuth::authenticate`]: crate::JwtAuth::authenticate
    ///
    /// # Errors
    ///
    /// [`JwtError::MalformedToken`] when the JWT does not contain the
    /// requisite three sections (note: the signature may be empty), a section
    /// is not base64 url-safe encoded, or the header/claims are not JSON
    /// objects.
    pub fn decode(jwt: impl AsRef<[u8]>) -> Result<(TokenHeader, ClaimSet), JwtError> {
        Ok(CompactToken::try_from(jwt.as_ref())?.into_parts())
    }
}
