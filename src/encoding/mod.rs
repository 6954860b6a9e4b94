//! Functionality for encoding JWTs (including signing).
use base64_simd::URL_SAFE_NO_PAD as b64;

use crate::{
    JwtError,
    claims::ClaimSet,
    crypto::KeyEntry,
    header::TokenHeader,
};

/// Signs and encodes a JWT with the given `key`, `header`, and `claims`
///
/// # Errors
///
/// - [`JwtError::WrongAlgorithm`] when the header `alg` is not the key's algorithm
/// - [`JwtError::Serialization`] when header or claims cannot be serialized
/// - [`JwtError::KeyCannotSign`] or [`JwtError::SigningFailed`] from
///   [`KeyEntry::sign`]
pub fn encode(key: &KeyEntry, header: &TokenHeader, claims: &ClaimSet) -> Result<String, JwtError> {
    if header.algorithm()? != key.algorithm() {
        return Err(JwtError::WrongAlgorithm);
    }

    let serialized_header = serde_json::to_vec(header).map_err(|_| JwtError::Serialization)?;
    let serialized_claims = serde_json::to_vec(claims).map_err(|_| JwtError::Serialization)?;

    let mut jwt = String::with_capacity(
        b64.encoded_length(serialized_header.len())
            + 1
            + b64.encoded_length(serialized_claims.len())
            + 1
            + b64.encoded_length(key.siglen()),
    );

    #[cfg(debug_assertions)]
    let initial_cap = jwt.capacity();

    b64.encode_append(serialized_header, &mut jwt);
    jwt.push('.');
    b64.encode_append(serialized_claims, &mut jwt);

    let sig = key.sign(jwt.as_bytes())?;
    jwt.push('.');
    b64.encode_append(sig, &mut jwt);

    #[cfg(debug_assertions)]
    debug_assert_eq!(initial_cap, jwt.capacity());

    Ok(jwt)
}
