use aws_lc_rs::hmac;

use super::{
    KeyEntry,
    KeyMaterial,
};
use crate::JwtError;

impl KeyEntry {
    /// Verifies `signature` over `message` (the dot-delimited base64url header
    /// and payload).
    ///
    /// HMAC tags are compared in constant time.
    ///
    /// # Errors
    ///
    /// [`JwtError::SignatureInvalid`] when the signature does not verify.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), JwtError> {
        match &self.material {
            KeyMaterial::Hmac(key) => hmac::verify(key, message, signature),
            KeyMaterial::Rsa { verifying, .. } | KeyMaterial::Ecdsa { verifying, .. } => {
                verifying.verify_sig(message, signature)
            }
        }
        .map_err(|_| JwtError::SignatureInvalid)
    }
}
