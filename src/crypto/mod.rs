//! [`aws-lc-rs`] backed key material
//!
//! A [`KeyEntry`] pairs an [`Algorithm`] with the key material able to sign
//! and/or verify under it. Dispatch over the key family is a closed enum, so a
//! key can only ever be used with the algorithm it was constructed for.
//!
//! [`aws-lc-rs`]: aws_lc_rs

mod sign;
mod verify;

use std::fmt;

use aws_lc_rs::{
    hmac::{
        HMAC_SHA256,
        HMAC_SHA384,
        HMAC_SHA512,
        Key as HmacKey,
    },
    signature::{
        ECDSA_P256_SHA256_FIXED,
        ECDSA_P256_SHA256_FIXED_SIGNING,
        ECDSA_P384_SHA384_FIXED,
        ECDSA_P384_SHA384_FIXED_SIGNING,
        ECDSA_P521_SHA512_FIXED,
        ECDSA_P521_SHA512_FIXED_SIGNING,
        EcdsaKeyPair,
        EcdsaSigningAlgorithm,
        KeyPair,
        ParsedPublicKey,
        RSA_PKCS1_2048_8192_SHA256,
        RSA_PKCS1_2048_8192_SHA384,
        RSA_PKCS1_2048_8192_SHA512,
        RsaKeyPair,
        VerificationAlgorithm,
    },
};

use crate::{
    Algorithm,
    AlgorithmFamily,
    JwtError,
};

pub(crate) enum KeyMaterial {
    Hmac(Box<HmacKey>),
    Rsa {
        signing: Option<Box<RsaKeyPair>>,
        verifying: ParsedPublicKey,
    },
    Ecdsa {
        signing: Option<Box<EcdsaKeyPair>>,
        verifying: ParsedPublicKey,
    },
}

impl KeyMaterial {
    const fn family(&self) -> AlgorithmFamily {
        match self {
            Self::Hmac(_) => AlgorithmFamily::Hmac,
            Self::Rsa { .. } => AlgorithmFamily::Rsa,
            Self::Ecdsa { .. } => AlgorithmFamily::Ecdsa,
        }
    }
}

/// Key material bound to a single [`Algorithm`].
///
/// Every constructor checks the material against the algorithm, so an entry
/// built for `RS256` holds an RSA key and nothing else.
pub struct KeyEntry {
    algorithm: Algorithm,
    material: KeyMaterial,
}

impl fmt::Debug for KeyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyEntry")
            .field("algorithm", &self.algorithm)
            .field("family", &self.family())
            .field("can_sign", &self.can_sign())
            .finish_non_exhaustive()
    }
}

impl KeyEntry {
    /// Creates an HMAC entry from a shared secret.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not `HS256`,
    ///   `HS384` or `HS512`
    /// - [`JwtError::InvalidKey`] when `secret` is empty
    pub fn hmac(algorithm: Algorithm, secret: &[u8]) -> Result<Self, JwtError> {
        let digest = match algorithm {
            Algorithm::HS256 => HMAC_SHA256,
            Algorithm::HS384 => HMAC_SHA384,
            Algorithm::HS512 => HMAC_SHA512,
            _ => return Err(JwtError::UnsupportedAlgorithm),
        };
        if secret.is_empty() {
            return Err(JwtError::InvalidKey);
        }
        Ok(Self {
            algorithm,
            material: KeyMaterial::Hmac(Box::new(HmacKey::new(digest, secret))),
        })
    }

    /// Creates a signing RSA entry from a PKCS#8 DER private key.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `RS*` algorithm
    /// - [`JwtError::InvalidKey`] when `der` is not an RSA PKCS#8 document
    pub fn rsa_pkcs8(algorithm: Algorithm, der: &[u8]) -> Result<Self, JwtError> {
        require_family(algorithm, AlgorithmFamily::Rsa)?;
        let pair = RsaKeyPair::from_pkcs8(der).map_err(|_| JwtError::InvalidKey)?;
        Self::rsa_key_pair(algorithm, pair)
    }

    /// Creates a signing RSA entry from an already parsed key pair.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `RS*` algorithm
    /// - [`JwtError::InvalidKey`] when the modulus is outside 2048..=8192 bits
    pub fn rsa_key_pair(algorithm: Algorithm, pair: RsaKeyPair) -> Result<Self, JwtError> {
        let verifying = parse_public_key(algorithm, AlgorithmFamily::Rsa, pair.public_key())?;
        Ok(Self {
            algorithm,
            material: KeyMaterial::Rsa {
                signing: Some(Box::new(pair)),
                verifying,
            },
        })
    }

    /// Creates a verification-only RSA entry from a DER `RSAPublicKey`.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `RS*` algorithm
    /// - [`JwtError::InvalidKey`] when `der` cannot be parsed
    pub fn rsa_public_key(algorithm: Algorithm, der: &[u8]) -> Result<Self, JwtError> {
        let verifying = parse_public_key(algorithm, AlgorithmFamily::Rsa, der)?;
        Ok(Self {
            algorithm,
            material: KeyMaterial::Rsa {
                signing: None,
                verifying,
            },
        })
    }

    /// Creates a signing ECDSA entry from a PKCS#8 DER private key.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `ES*` algorithm
    /// - [`JwtError::InvalidKey`] when `der` is not a PKCS#8 key on the curve
    ///   required by `algorithm`
    pub fn ecdsa_pkcs8(algorithm: Algorithm, der: &[u8]) -> Result<Self, JwtError> {
        let signing_alg = ecdsa_signing_algorithm(algorithm)?;
        let pair = EcdsaKeyPair::from_pkcs8(signing_alg, der).map_err(|_| JwtError::InvalidKey)?;
        Self::ecdsa_key_pair(algorithm, pair)
    }

    /// Creates a signing ECDSA entry from an already parsed key pair.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `ES*` algorithm
    /// - [`JwtError::WrongAlgorithm`] when the pair's curve or signature format
    ///   differs from the one `algorithm` requires
    pub fn ecdsa_key_pair(algorithm: Algorithm, pair: EcdsaKeyPair) -> Result<Self, JwtError> {
        let signing_alg = ecdsa_signing_algorithm(algorithm)?;
        if pair.algorithm() != signing_alg {
            return Err(JwtError::WrongAlgorithm);
        }
        let verifying = parse_public_key(algorithm, AlgorithmFamily::Ecdsa, pair.public_key())?;
        Ok(Self {
            algorithm,
            material: KeyMaterial::Ecdsa {
                signing: Some(Box::new(pair)),
                verifying,
            },
        })
    }

    /// Creates a verification-only ECDSA entry from an uncompressed public point.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when `algorithm` is not an `ES*` algorithm
    /// - [`JwtError::InvalidKey`] when `public_key` is not a point on the curve
    pub fn ecdsa_public_key(algorithm: Algorithm, public_key: &[u8]) -> Result<Self, JwtError> {
        let verifying = parse_public_key(algorithm, AlgorithmFamily::Ecdsa, public_key)?;
        Ok(Self {
            algorithm,
            material: KeyMaterial::Ecdsa {
                signing: None,
                verifying,
            },
        })
    }

    /// Algorithm this entry signs and verifies with
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Family of the underlying key material
    #[must_use]
    pub const fn family(&self) -> AlgorithmFamily {
        self.material.family()
    }

    /// `false` for verification-only entries
    #[must_use]
    pub const fn can_sign(&self) -> bool {
        match &self.material {
            KeyMaterial::Hmac(_) => true,
            KeyMaterial::Rsa { signing, .. } => signing.is_some(),
            KeyMaterial::Ecdsa { signing, .. } => signing.is_some(),
        }
    }
}

fn require_family(algorithm: Algorithm, family: AlgorithmFamily) -> Result<(), JwtError> {
    if algorithm.family() == family {
        Ok(())
    } else {
        Err(JwtError::UnsupportedAlgorithm)
    }
}

fn ecdsa_signing_algorithm(
    algorithm: Algorithm,
) -> Result<&'static EcdsaSigningAlgorithm, JwtError> {
    match algorithm {
        Algorithm::ES256 => Ok(&ECDSA_P256_SHA256_FIXED_SIGNING),
        Algorithm::ES384 => Ok(&ECDSA_P384_SHA384_FIXED_SIGNING),
        Algorithm::ES512 => Ok(&ECDSA_P521_SHA512_FIXED_SIGNING),
        _ => Err(JwtError::UnsupportedAlgorithm),
    }
}

fn verification_algorithm(algorithm: Algorithm) -> Option<&'static dyn VerificationAlgorithm> {
    match algorithm {
        Algorithm::RS256 => Some(&RSA_PKCS1_2048_8192_SHA256),
        Algorithm::RS384 => Some(&RSA_PKCS1_2048_8192_SHA384),
        Algorithm::RS512 => Some(&RSA_PKCS1_2048_8192_SHA512),
        Algorithm::ES256 => Some(&ECDSA_P256_SHA256_FIXED),
        Algorithm::ES384 => Some(&ECDSA_P384_SHA384_FIXED),
        Algorithm::ES512 => Some(&ECDSA_P521_SHA512_FIXED),
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => None,
    }
}

fn parse_public_key(
    algorithm: Algorithm,
    family: AlgorithmFamily,
    bytes: impl AsRef<[u8]>,
) -> Result<ParsedPublicKey, JwtError> {
    require_family(algorithm, family)?;
    let kalg = verification_algorithm(algorithm).ok_or(JwtError::UnsupportedAlgorithm)?;
    ParsedPublicKey::new(kalg, bytes.as_ref()).map_err(|_| JwtError::InvalidKey)
}
