// JUSTIFICATION: using `pub(crate)` makes it immediately obvious that an item
// is not exposed via the public API.
#![allow(clippy::redundant_pub_crate)]
use std::time::{
    SystemTime,
    UNIX_EPOCH,
};

use crate::{
    JwtError,
    claims::ClaimSet,
    header::TokenHeader,
};

/// Trait for implementing custom token validator layers
///
/// Validators run after the signature has been verified, so `header` and
/// `claims` are authentic when [`TokenValidator::validate`] is called.
///
/// # Example Implementation
///
/// ```rust
/// use jwtauth::{
///     ClaimSet,
///     JwtError,
///     header::TokenHeader,
///     validation::TokenValidator,
/// };
///
/// pub struct TenantValidator {
///     tenant: String,
/// }
///
/// impl TokenValidator for TenantValidator {
///     fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _now: i64) -> Result<(), JwtError> {
///         match claims.get("tenant").and_then(|t| t.as_str()) {
///             Some(tenant) if tenant == self.tenant => Ok(()),
///             _ => Err(JwtError::CustomValidationError("wrong tenant")),
///         }
///     }
/// }
/// ```
pub trait TokenValidator {
    /// Given the `header` and `claims` of a JWT and the current unix time
    /// `now`, perform some validation step.
    ///
    /// # Errors
    ///
    /// This method MUST return a [`JwtError`] if the JWT `header` and/or `claims`
    /// do not pass the validation step performed by this [`TokenValidator`].
    fn validate(&self, header: &TokenHeader, claims: &ClaimSet, now: i64) -> Result<(), JwtError>;
}

pub(crate) struct ExpirationValidator {
    leeway: i64,
}
impl ExpirationValidator {
    pub(crate) const fn new(leeway: i64) -> Self {
        Self { leeway }
    }
}
impl TokenValidator for ExpirationValidator {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, now: i64) -> Result<(), JwtError> {
        match claims.exp()? {
            Some(exp) if now >= exp.saturating_add(self.leeway) => Err(JwtError::TokenExpired),
            _ => Ok(()),
        }
    }
}

pub(crate) struct NotBeforeValidator {
    leeway: i64,
}
impl NotBeforeValidator {
    pub(crate) const fn new(leeway: i64) -> Self {
        Self { leeway }
    }
}
impl TokenValidator for NotBeforeValidator {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, now: i64) -> Result<(), JwtError> {
        match claims.nbf()? {
            Some(nbf) if now.saturating_add(self.leeway) < nbf => Err(JwtError::TokenNotYetValid),
            _ => Ok(()),
        }
    }
}

pub(crate) struct IssuedAtValidator {
    leeway: i64,
}
impl IssuedAtValidator {
    pub(crate) const fn new(leeway: i64) -> Self {
        Self { leeway }
    }
}
impl TokenValidator for IssuedAtValidator {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, now: i64) -> Result<(), JwtError> {
        match claims.iat()? {
            Some(iat) if iat > now.saturating_add(self.leeway) => Err(JwtError::IssuedInFuture),
            _ => Ok(()),
        }
    }
}

pub(crate) struct IssuerValidator<'a> {
    expected_issuer: &'a str,
}
impl<'a> IssuerValidator<'a> {
    pub(crate) const fn new(iss: &'a str) -> Self {
        Self {
            expected_issuer: iss,
        }
    }
}
impl TokenValidator for IssuerValidator<'_> {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _: i64) -> Result<(), JwtError> {
        if claims.iss()? == Some(self.expected_issuer) {
            Ok(())
        } else {
            Err(JwtError::ClaimMismatch("iss"))
        }
    }
}

pub(crate) struct AudienceValidator<'a> {
    accepted_audiences: &'a [String],
}
impl<'a> AudienceValidator<'a> {
    pub(crate) const fn new(aud: &'a [String]) -> Self {
        Self {
            accepted_audiences: aud,
        }
    }
}
impl TokenValidator for AudienceValidator<'_> {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _: i64) -> Result<(), JwtError> {
        let aud = claims.aud()?;
        if self
            .accepted_audiences
            .iter()
            .any(|accepted| aud.contains(&accepted.as_str()))
        {
            Ok(())
        } else {
            Err(JwtError::ClaimMismatch("aud"))
        }
    }
}

pub(crate) struct SubjectValidator<'a> {
    expected_subject: &'a str,
}
impl<'a> SubjectValidator<'a> {
    pub(crate) const fn new(sub: &'a str) -> Self {
        Self {
            expected_subject: sub,
        }
    }
}
impl TokenValidator for SubjectValidator<'_> {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _: i64) -> Result<(), JwtError> {
        if claims.sub()? == Some(self.expected_subject) {
            Ok(())
        } else {
            Err(JwtError::ClaimMismatch("sub"))
        }
    }
}

pub(crate) struct PermissionsValidator<'a> {
    claim: &'a str,
    required: &'a [String],
}
impl<'a> PermissionsValidator<'a> {
    pub(crate) const fn new(claim: &'a str, required: &'a [String]) -> Self {
        Self { claim, required }
    }
}
impl TokenValidator for PermissionsValidator<'_> {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _: i64) -> Result<(), JwtError> {
        let granted = self.required.iter().all(|required| {
            claims
                .permissions(self.claim)
                .any(|granted| granted == required)
        });
        if granted {
            Ok(())
        } else {
            Err(JwtError::MissingPermission)
        }
    }
}

/// Current unix time in seconds
#[must_use]
pub fn now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .cast_signed()
}
