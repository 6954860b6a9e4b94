use std::{
    fmt::Display,
    str::FromStr,
};

use crate::JwtError;

/// JWS Signature Algorithm
///
/// The algorithm name doubles as the default key alias in a
/// [`KeyRegistry`](crate::keystore::KeyRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Algorithm {
    /// `HMAC` using `SHA-256`
    HS256,

    /// `HMAC` using `SHA-384`
    HS384,

    /// `HMAC` using `SHA-512`
    HS512,

    /// `RSASSA-PKCS1-v1_5` using `SHA-256`
    RS256,

    /// `RSASSA-PKCS1-v1_5` using `SHA-384`
    RS384,

    /// `RSASSA-PKCS1-v1_5` using `SHA-512`
    RS512,

    /// `ECDSA` using `P-256` curve and `SHA-256` digest
    ES256,

    /// `ECDSA` using `P-384` curve and `SHA-384` digest
    ES384,

    /// `ECDSA` using `P-521` curve and `SHA-512` digest
    ES512,
}

/// Key family an [`Algorithm`] belongs to.
///
/// A key registered for one family can never be used to verify a token whose
/// header names an algorithm from another family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// Shared-secret MAC
    Hmac,
    /// `RSASSA-PKCS1-v1_5` signature
    Rsa,
    /// `ECDSA` signature over a NIST curve
    Ecdsa,
}

impl Algorithm {
    /// Every supported algorithm, in alias order.
    pub const ALL: [Self; 9] = [
        Self::HS256,
        Self::HS384,
        Self::HS512,
        Self::RS256,
        Self::RS384,
        Self::RS512,
        Self::ES256,
        Self::ES384,
        Self::ES512,
    ];

    /// Returns the key family used by this algorithm.
    #[must_use]
    pub const fn family(self) -> AlgorithmFamily {
        match self {
            Self::HS256 | Self::HS384 | Self::HS512 => AlgorithmFamily::Hmac,
            Self::RS256 | Self::RS384 | Self::RS512 => AlgorithmFamily::Rsa,
            Self::ES256 | Self::ES384 | Self::ES512 => AlgorithmFamily::Ecdsa,
        }
    }

    /// RFC 7518 name, as written to the `alg` header parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
            Self::RS256 => "RS256",
            Self::RS384 => "RS384",
            Self::RS512 => "RS512",
            Self::ES256 => "ES256",
            Self::ES384 => "ES384",
            Self::ES512 => "ES512",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = JwtError;

    /// Parses an RFC 7518 algorithm name. Names are case-sensitive and
    /// `none` is never accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|alg| alg.as_str() == s)
            .ok_or(JwtError::UnsupportedAlgorithm)
    }
}

impl serde::Serialize for Algorithm {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        name.parse()
            .map_err(|_| serde::de::Error::custom(format!("unsupported algorithm '{name}'")))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::{
        Algorithm,
        AlgorithmFamily,
    };
    use crate::JwtError;

    #[test]
    fn display_repr() {
        assert_eq!(format!("{}", Algorithm::HS256), "HS256");
        assert_eq!(format!("{}", Algorithm::HS384), "HS384");
        assert_eq!(format!("{}", Algorithm::HS512), "HS512");

        assert_eq!(format!("{}", Algorithm::RS256), "RS256");
        assert_eq!(format!("{}", Algorithm::RS384), "RS384");
        assert_eq!(format!("{}", Algorithm::RS512), "RS512");

        assert_eq!(format!("{}", Algorithm::ES256), "ES256");
        assert_eq!(format!("{}", Algorithm::ES384), "ES384");
        assert_eq!(format!("{}", Algorithm::ES512), "ES512");
    }

    #[test]
    fn parse_accepts_every_display_name() {
        for alg in Algorithm::ALL {
            assert_eq!(alg.to_string().parse::<Algorithm>().unwrap(), alg);
        }
    }

    #[test]
    fn parse_rejects_none_and_unknown() {
        assert_eq!(
            "none".parse::<Algorithm>().unwrap_err(),
            JwtError::UnsupportedAlgorithm
        );
        assert_eq!(
            "PS256".parse::<Algorithm>().unwrap_err(),
            JwtError::UnsupportedAlgorithm
        );
        assert_eq!(
            "hs256".parse::<Algorithm>().unwrap_err(),
            JwtError::UnsupportedAlgorithm
        );
    }

    #[test]
    fn families() {
        assert_eq!(Algorithm::HS384.family(), AlgorithmFamily::Hmac);
        assert_eq!(Algorithm::RS512.family(), AlgorithmFamily::Rsa);
        assert_eq!(Algorithm::ES256.family(), AlgorithmFamily::Ecdsa);
    }

    #[test]
    fn serde_uses_rfc_names() {
        let json = serde_json::to_string(&Algorithm::ES384).unwrap();
        assert_eq!(json, r#""ES384""#);
        let alg: Algorithm = serde_json::from_str(r#""RS256""#).unwrap();
        assert_eq!(alg, Algorithm::RS256);
        serde_json::from_str::<Algorithm>(r#""none""#).unwrap_err();
    }
}
