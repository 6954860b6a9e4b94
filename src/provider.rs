//! Provides [`JwtAuth`], the token issuer and authenticator
use std::{
    sync::Arc,
    time::Duration,
};

use arc_swap::ArcSwap;
use serde_json::Value;
use tracing::debug;

use crate::{
    JwtError,
    claims::ClaimSet,
    config::{
        AuthenticateOptions,
        DEFAULT_PERMISSIONS_CLAIM,
        IssueOptions,
        JwtOptions,
    },
    decoding::CompactToken,
    encoding::encode,
    header::TokenHeader,
    keystore::KeyRegistry,
    validation::{
        BoxedValidator,
        ClaimsValidator,
        TokenValidator,
        now,
    },
};

/// Builder for [`JwtAuth`]
pub struct JwtAuthBuilder {
    registry: KeyRegistry,
    validators: Vec<BoxedValidator>,
    size_limit: Option<usize>,
    leeway: Duration,
    permissions_claim: String,
}

impl JwtAuthBuilder {
    pub(crate) fn new(registry: KeyRegistry) -> Self {
        Self {
            registry,
            validators: Vec::new(),
            size_limit: None,
            leeway: Duration::ZERO,
            permissions_claim: DEFAULT_PERMISSIONS_CLAIM.to_owned(),
        }
    }

    /// Caps accepted JWT size to `size_limit` bytes
    ///
    /// JWTs above this size will return a [`JwtError::OverSizeThreshold`]
    #[must_use]
    pub const fn with_max_size(mut self, size_limit: usize) -> Self {
        self.size_limit = Some(size_limit);
        self
    }

    /// Minimum clock skew tolerance for every [`JwtAuth::authenticate`] call.
    /// A larger per-call leeway in [`AuthenticateOptions`] takes precedence.
    #[must_use]
    pub const fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Reads granted permissions from claim `name` instead of `permissions`
    #[must_use]
    pub fn with_permissions_claim(mut self, name: impl Into<String>) -> Self {
        self.permissions_claim = name.into();
        self
    }

    /// Applies the provider-wide settings of `options`: the permissions
    /// claim and the leeway.
    #[must_use]
    pub fn with_options(self, options: &JwtOptions) -> Self {
        self.with_permissions_claim(options.permissions_claim_key.as_str())
            .with_leeway(Duration::from_secs(options.leeway))
    }

    /// Adds a custom validator, run after the built-in claim checks.
    /// This method may be chained to add multiple custom validators.
    #[must_use]
    pub fn with(mut self, validator: impl TokenValidator + Send + Sync + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// Finalizes the provider construction.
    #[must_use]
    pub fn build(self) -> JwtAuth {
        JwtAuth {
            registry: ArcSwap::from_pointee(self.registry),
            validators: self.validators,
            size_limit: self.size_limit,
            leeway: i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX),
            permissions_claim: self.permissions_claim,
        }
    }
}

/// JWT authentication provider.
///
/// Issues compact JWS tokens signed with a key from its [`KeyRegistry`] and
/// authenticates them again: signature first, then claims. The registry can
/// be replaced at runtime with [`JwtAuth::reload`].
pub struct JwtAuth {
    registry: ArcSwap<KeyRegistry>,
    validators: Vec<BoxedValidator>,
    size_limit: Option<usize>,
    leeway: i64,
    permissions_claim: String,
}

impl JwtAuth {
    /// Returns a new [`JwtAuthBuilder`].
    #[must_use]
    pub fn builder(registry: KeyRegistry) -> JwtAuthBuilder {
        JwtAuthBuilder::new(registry)
    }

    /// Provider with default settings.
    #[must_use]
    pub fn new(registry: KeyRegistry) -> Self {
        Self::builder(registry).build()
    }

    /// Snapshot of the current key registry
    #[must_use]
    pub fn registry(&self) -> Arc<KeyRegistry> {
        self.registry.load_full()
    }

    /// Atomically replaces the key registry. Calls already in progress finish
    /// with the registry they started with.
    pub fn reload(&self, registry: KeyRegistry) {
        debug!(keys = registry.len(), insecure = registry.is_insecure(), "key registry reloaded");
        self.registry.store(Arc::new(registry));
    }

    /// Issues a token for `claims` signed with the key registered under
    /// `alias`. `iat` is set to the current time and, when `ttl` is given,
    /// `exp` to `iat + ttl`.
    ///
    /// # Errors
    ///
    /// - [`JwtError::KeyNotFound`] when no key is registered under `alias`
    /// - [`JwtError::KeyCannotSign`] when the key is verification-only
    /// - [`JwtError::SigningFailed`] or [`JwtError::Serialization`] on backend failures
    pub fn issue(
        &self,
        claims: ClaimSet,
        alias: &str,
        ttl: Option<Duration>,
    ) -> Result<String, JwtError> {
        let options = IssueOptions {
            expires_in: ttl,
            ..IssueOptions::new(alias)
        };
        self.issue_at(claims, &options, now())
    }

    /// Issues a token for `claims` as described by `options`.
    ///
    /// `iss`, `sub` and `aud` from `options` overwrite those in `claims`.
    ///
    /// # Errors
    ///
    /// See [`JwtAuth::issue`].
    pub fn issue_with(&self, claims: ClaimSet, options: &IssueOptions) -> Result<String, JwtError> {
        self.issue_at(claims, options, now())
    }

    /// [`JwtAuth::issue_with`] at an explicit unix time.
    ///
    /// # Errors
    ///
    /// See [`JwtAuth::issue`].
    pub fn issue_at(
        &self,
        mut claims: ClaimSet,
        options: &IssueOptions,
        now: i64,
    ) -> Result<String, JwtError> {
        let registry = self.registry.load();
        let key = registry.lookup(&options.alias)?;

        if !options.no_timestamp {
            claims.insert("iat", now);
        }
        if let Some(ttl) = options.expires_in {
            let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
            claims.insert("exp", now.saturating_add(ttl));
        }
        if let Some(iss) = &options.issuer {
            claims.insert("iss", iss.as_str());
        }
        if let Some(sub) = &options.subject {
            claims.insert("sub", sub.as_str());
        }
        match options.audience.as_slice() {
            [] => {}
            [aud] => {
                claims.insert("aud", aud.as_str());
            }
            many => {
                claims.insert("aud", Value::from(many.to_vec()));
            }
        }

        let header = TokenHeader::new(&options.alias, key.algorithm());
        let token = encode(key, &header, &claims)?;
        debug!(alias = %options.alias, alg = %key.algorithm(), "issued token");
        Ok(token)
    }

    /// Authenticates a compact-encoded JWT and returns its claims.
    ///
    /// The token is parsed, its signature verified with the key its header
    /// selects, and its claims validated against `options` at the current
    /// time. Each stage rejects the token outright.
    ///
    /// # Errors
    ///
    /// - [`JwtError::OverSizeThreshold`] when a size limit has been set and
    ///   the token is larger than it.
    /// - [`JwtError::MalformedToken`] when the token is not three base64url
    ///   segments holding a JSON header and a JSON object payload.
    /// - [`JwtError::UnsupportedAlgorithm`], [`JwtError::KeyNotFound`],
    ///   [`JwtError::WrongAlgorithm`] or [`JwtError::SignatureInvalid`] when
    ///   the signature cannot be verified.
    /// - [`JwtError::TokenExpired`], [`JwtError::TokenNotYetValid`],
    ///   [`JwtError::IssuedInFuture`], [`JwtError::ClaimMismatch`] or
    ///   [`JwtError::MissingPermission`] when the claims are rejected.
    /// - any error returned by a custom [`TokenValidator`].
    pub fn authenticate(&self, token: &str, options: &AuthenticateOptions) -> Result<ClaimSet, JwtError> {
        self.authenticate_at(token, options, now())
    }

    /// [`JwtAuth::authenticate`] at an explicit unix time.
    ///
    /// # Errors
    ///
    /// See [`JwtAuth::authenticate`].
    pub fn authenticate_at(
        &self,
        token: &str,
        options: &AuthenticateOptions,
        now: i64,
    ) -> Result<ClaimSet, JwtError> {
        self.check(token.as_bytes(), options, now)
            .inspect_err(|err| debug!(%err, "token rejected"))
    }

    fn check(&self, token: &[u8], options: &AuthenticateOptions, now: i64) -> Result<ClaimSet, JwtError> {
        if let Some(limit) = self.size_limit
            && token.len() > limit
        {
            return Err(JwtError::OverSizeThreshold);
        }

        let token = CompactToken::try_from(token)?;

        self.registry.load().verify(
            token.header(),
            token.signing_input(),
            token.signature(),
        )?;

        ClaimsValidator::new(options, &self.permissions_claim)
            .with_default_leeway(self.leeway)
            .with_custom(&self.validators)
            .validate(token.header(), token.claims(), now)?;

        let (_, claims) = token.into_parts();
        Ok(claims)
    }
}
