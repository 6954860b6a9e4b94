use aws_lc_rs::{
    hmac,
    rand::SystemRandom,
    signature::{
        RSA_PKCS1_SHA256,
        RSA_PKCS1_SHA384,
        RSA_PKCS1_SHA512,
        RsaSignatureEncoding,
    },
};

use super::{
    KeyEntry,
    KeyMaterial,
};
use crate::{
    Algorithm,
    JwtError,
};

const fn map_rsa_alg(algorithm: Algorithm) -> Option<&'static RsaSignatureEncoding> {
    match algorithm {
        Algorithm::RS256 => Some(&RSA_PKCS1_SHA256),
        Algorithm::RS384 => Some(&RSA_PKCS1_SHA384),
        Algorithm::RS512 => Some(&RSA_PKCS1_SHA512),
        _ => None,
    }
}

impl KeyEntry {
    /// Signs `message` (the dot-delimited base64url header and payload) with
    /// this entry's algorithm.
    ///
    /// ECDSA signatures use the fixed-length `r || s` encoding required by
    /// RFC 7518, not ASN.1 DER.
    ///
    /// # Errors
    ///
    /// - [`JwtError::KeyCannotSign`] when the entry only holds a public key
    /// - [`JwtError::SigningFailed`] when the crypto backend fails
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, JwtError> {
        match &self.material {
            KeyMaterial::Hmac(key) => Ok(hmac::sign(key, message).as_ref().to_vec()),
            KeyMaterial::Rsa { signing, .. } => {
                let pair = signing.as_deref().ok_or(JwtError::KeyCannotSign)?;
                let encoding = map_rsa_alg(self.algorithm).ok_or(JwtError::UnsupportedAlgorithm)?;
                let mut sig = vec![0; pair.public_modulus_len()];
                pair.sign(encoding, &SystemRandom::new(), message, &mut sig)
                    .map_err(|_| JwtError::SigningFailed)?;
                Ok(sig)
            }
            KeyMaterial::Ecdsa { signing, .. } => {
                let pair = signing.as_deref().ok_or(JwtError::KeyCannotSign)?;
                let sig = pair
                    .sign(&SystemRandom::new(), message)
                    .map_err(|_| JwtError::SigningFailed)?;
                Ok(sig.as_ref().to_vec())
            }
        }
    }

    /// Exact size, in bytes, of the signatures produced by [`KeyEntry::sign`].
    /// Zero for entries that cannot sign.
    #[must_use]
    pub fn siglen(&self) -> usize {
        match &self.material {
            KeyMaterial::Hmac(key) => key.algorithm().digest_algorithm().output_len(),
            KeyMaterial::Rsa { signing, .. } => signing
                .as_deref()
                .map_or(0, |pair| pair.public_modulus_len()),
            KeyMaterial::Ecdsa { signing: None, .. } => 0,
            KeyMaterial::Ecdsa { .. } => match self.algorithm {
                Algorithm::ES256 => 64,
                Algorithm::ES384 => 96,
                _ => 132,
            },
        }
    }
}
