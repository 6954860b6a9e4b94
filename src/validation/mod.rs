//! Provides JWT claim validation functionality
pub(crate) mod validator;

pub use validator::{
    TokenValidator,
    now,
};

use crate::{
    JwtError,
    claims::ClaimSet,
    config::AuthenticateOptions,
    header::TokenHeader,
    validation::validator::{
        AudienceValidator,
        ExpirationValidator,
        IssuedAtValidator,
        IssuerValidator,
        NotBeforeValidator,
        PermissionsValidator,
        SubjectValidator,
    },
};

/// Custom validator as stored by [`JwtAuth`](crate::JwtAuth)
pub type BoxedValidator = Box<dyn TokenValidator + Send + Sync>;

/// Runs the built-in claim checks selected by [`AuthenticateOptions`], then
/// any custom validators in insertion order.
pub struct ClaimsValidator<'a> {
    options: &'a AuthenticateOptions,
    permissions_claim: &'a str,
    default_leeway: i64,
    custom: &'a [BoxedValidator],
}

impl<'a> ClaimsValidator<'a> {
    /// Validator for `options`, reading granted permissions from
    /// `permissions_claim`.
    #[must_use]
    pub const fn new(options: &'a AuthenticateOptions, permissions_claim: &'a str) -> Self {
        Self {
            options,
            permissions_claim,
            default_leeway: 0,
            custom: &[],
        }
    }

    /// Leeway, in seconds, used when `options` ask for a smaller one.
    #[must_use]
    pub const fn with_default_leeway(mut self, leeway: i64) -> Self {
        self.default_leeway = leeway;
        self
    }

    /// Appends `custom` validators after the built-in checks.
    #[must_use]
    pub const fn with_custom(mut self, custom: &'a [BoxedValidator]) -> Self {
        self.custom = custom;
        self
    }

    /// Validates `claims` at unix time `now`.
    ///
    /// # Errors
    ///
    /// - [`JwtError::TokenExpired`] unless expiration is ignored
    /// - [`JwtError::TokenNotYetValid`]
    /// - [`JwtError::IssuedInFuture`]
    /// - [`JwtError::ClaimMismatch`] for `iss`, `aud` and `sub`
    /// - [`JwtError::MissingPermission`]
    /// - [`JwtError::MalformedToken`] when a registered claim has the wrong type
    /// - any error raised by a custom validator
    pub fn validate(&self, header: &TokenHeader, claims: &ClaimSet, now: i64) -> Result<(), JwtError> {
        let options = self.options;
        let leeway = options.leeway_secs().max(self.default_leeway);

        if !options.ignore_expiration {
            ExpirationValidator::new(leeway).validate(header, claims, now)?;
        }
        NotBeforeValidator::new(leeway).validate(header, claims, now)?;
        IssuedAtValidator::new(leeway).validate(header, claims, now)?;

        if let Some(iss) = &options.issuer {
            IssuerValidator::new(iss).validate(header, claims, now)?;
        }
        if !options.audiences.is_empty() {
            AudienceValidator::new(&options.audiences).validate(header, claims, now)?;
        }
        if let Some(sub) = &options.subject {
            SubjectValidator::new(sub).validate(header, claims, now)?;
        }
        if !options.permissions.is_empty() {
            PermissionsValidator::new(self.permissions_claim, &options.permissions)
                .validate(header, claims, now)?;
        }

        self.custom
            .iter()
            .try_for_each(|validator| validator.validate(header, claims, now))
    }
}
