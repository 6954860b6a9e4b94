//! Typed access to the claims registered in RFC 7519
use serde_json::Value;

use super::ClaimSet;
use crate::{
    JwtError,
    error::MalformedToken,
};

impl ClaimSet {
    /// `iss` (Issuer) Claim
    ///
    /// Ref: [RFC 7519 4.1.1](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.1>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a string.
    pub fn iss(&self) -> Result<Option<&str>, JwtError> {
        self.string_claim("iss")
    }

    /// `sub` (Subject) Claim
    ///
    /// Ref: [RFC 7519 4.1.2](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.2>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a string.
    pub fn sub(&self) -> Result<Option<&str>, JwtError> {
        self.string_claim("sub")
    }

    /// `aud` (Audience) Claim, either a single string or an array of strings.
    /// Empty when absent.
    ///
    /// Ref: [RFC 7519 4.1.3](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.3>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present with any other shape.
    pub fn aud(&self) -> Result<Vec<&str>, JwtError> {
        match self.get("aud") {
            None => Ok(Vec::new()),
            Some(Value::String(aud)) => Ok(vec![aud.as_str()]),
            Some(Value::Array(auds)) => auds
                .iter()
                .map(|aud| aud.as_str().ok_or(invalid("aud")))
                .collect(),
            Some(_) => Err(invalid("aud")),
        }
    }

    /// `exp` (Expiration Time) Claim, in seconds since the epoch
    ///
    /// Ref: [RFC 7519 4.1.4](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.4>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a number.
    pub fn exp(&self) -> Result<Option<i64>, JwtError> {
        self.numeric_date("exp")
    }

    /// `nbf` (Not Before) Claim, in seconds since the epoch
    ///
    /// Ref: [RFC 7519 4.1.5](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.5>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a number.
    pub fn nbf(&self) -> Result<Option<i64>, JwtError> {
        self.numeric_date("nbf")
    }

    /// `iat` (Issued At) Claim, in seconds since the epoch
    ///
    /// Ref: [RFC 7519 4.1.6](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.6>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a number.
    pub fn iat(&self) -> Result<Option<i64>, JwtError> {
        self.numeric_date("iat")
    }

    /// `jti` (JWT ID) Claim
    ///
    /// Ref: [RFC 7519 4.1.7](<https://datatracker.ietf.org/doc/html/rfc7519#section-4.1.7>)
    ///
    /// # Errors
    ///
    /// [`MalformedToken::InvalidClaim`] when present but not a string.
    pub fn jti(&self) -> Result<Option<&str>, JwtError> {
        self.string_claim("jti")
    }

    fn string_claim(&self, name: &'static str) -> Result<Option<&str>, JwtError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(_) => Err(invalid(name)),
        }
    }

    // NumericDate may carry a fractional part, which is floored
    #[allow(clippy::cast_possible_truncation)]
    fn numeric_date(&self, name: &'static str) -> Result<Option<i64>, JwtError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.floor() as i64))
                .map(Some)
                .ok_or(invalid(name)),
            Some(_) => Err(invalid(name)),
        }
    }
}

const fn invalid(name: &'static str) -> JwtError {
    JwtError::MalformedToken(MalformedToken::InvalidClaim(name))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use crate::{
        JwtError,
        claims::ClaimSet,
        error::MalformedToken,
    };

    fn claims(value: serde_json::Value) -> ClaimSet {
        ClaimSet::try_from(value).unwrap()
    }

    #[test]
    fn registered_claims_absent() {
        let c = ClaimSet::new();
        assert_eq!(c.iss().unwrap(), None);
        assert_eq!(c.sub().unwrap(), None);
        assert!(c.aud().unwrap().is_empty());
        assert_eq!(c.exp().unwrap(), None);
        assert_eq!(c.nbf().unwrap(), None);
        assert_eq!(c.iat().unwrap(), None);
        assert_eq!(c.jti().unwrap(), None);
    }

    #[test]
    fn aud_single_or_many() {
        assert_eq!(claims(json!({"aud": "api"})).aud().unwrap(), ["api"]);
        assert_eq!(
            claims(json!({"aud": ["api", "web"]})).aud().unwrap(),
            ["api", "web"]
        );
    }

    #[test]
    fn aud_wrong_shape() {
        let err = claims(json!({"aud": ["api", 1]})).aud().unwrap_err();
        assert_eq!(err, JwtError::MalformedToken(MalformedToken::InvalidClaim("aud")));
        let err = claims(json!({"aud": {"x": 1}})).aud().unwrap_err();
        assert_eq!(err, JwtError::MalformedToken(MalformedToken::InvalidClaim("aud")));
    }

    #[test]
    fn numeric_dates() {
        let c = claims(json!({"exp": 1_865_131_776, "nbf": 1_760_644_834.9, "iat": -1}));
        assert_eq!(c.exp().unwrap(), Some(1_865_131_776));
        assert_eq!(c.nbf().unwrap(), Some(1_760_644_834));
        assert_eq!(c.iat().unwrap(), Some(-1));
    }

    #[test]
    fn numeric_date_wrong_type() {
        let err = claims(json!({"exp": "tomorrow"})).exp().unwrap_err();
        assert_eq!(err, JwtError::MalformedToken(MalformedToken::InvalidClaim("exp")));
        let err = claims(json!({"nbf": null})).nbf().unwrap_err();
        assert_eq!(err, JwtError::MalformedToken(MalformedToken::InvalidClaim("nbf")));
    }

    #[test]
    fn string_claim_wrong_type() {
        let err = claims(json!({"iss": 42})).iss().unwrap_err();
        assert_eq!(err, JwtError::MalformedToken(MalformedToken::InvalidClaim("iss")));
    }
}
