//! Options for issuing and authenticating tokens
//!
//! [`JwtOptions`] is the serde-facing form, suitable for loading from a JSON
//! configuration document. It converts into the typed [`IssueOptions`] and
//! [`AuthenticateOptions`] consumed by [`JwtAuth`](crate::JwtAuth).
use std::time::Duration;

use serde::{
    Deserialize,
    Deserializer,
};

use crate::Algorithm;

/// Claim holding the list of granted permissions unless configured otherwise
pub const DEFAULT_PERMISSIONS_CLAIM: &str = "permissions";

/// Provider options as they appear in a JSON configuration document.
///
/// ```rust
/// use jwtauth::config::JwtOptions;
///
/// let options: JwtOptions = serde_json::from_str(
///     r#"{ "algorithm": "ES256", "expiresInSeconds": 600, "audience": "api", "leeway": 5 }"#,
/// )
/// .unwrap();
/// assert_eq!(options.algorithm, "ES256");
/// assert_eq!(options.audience, ["api"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JwtOptions {
    /// Alias of the signing key, `HS256` by default
    pub algorithm: String,
    /// Lifetime of issued tokens
    pub expires_in_seconds: Option<u64>,
    /// `iss` written on issue, and required on authenticate
    pub issuer: Option<String>,
    /// `sub` written on issue, and required on authenticate
    pub subject: Option<String>,
    /// `aud` written on issue; on authenticate any one of them must be present
    #[serde(deserialize_with = "one_or_many")]
    pub audience: Vec<String>,
    /// Clock skew tolerance in seconds
    pub leeway: u64,
    /// Skip the `exp` check on authenticate
    pub ignore_expiration: bool,
    /// Do not write `iat` on issue
    pub no_timestamp: bool,
    /// Claim holding granted permissions
    pub permissions_claim_key: String,
}

impl Default for JwtOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::HS256.to_string(),
            expires_in_seconds: None,
            issuer: None,
            subject: None,
            audience: Vec::new(),
            leeway: 0,
            ignore_expiration: false,
            no_timestamp: false,
            permissions_claim_key: DEFAULT_PERMISSIONS_CLAIM.to_owned(),
        }
    }
}

impl JwtOptions {
    /// Options for [`JwtAuth::issue_with`](crate::JwtAuth::issue_with)
    #[must_use]
    pub fn issue_options(&self) -> IssueOptions {
        IssueOptions {
            alias: self.algorithm.clone(),
            expires_in: self.expires_in_seconds.map(Duration::from_secs),
            issuer: self.issuer.clone(),
            subject: self.subject.clone(),
            audience: self.audience.clone(),
            no_timestamp: self.no_timestamp,
        }
    }

    /// Options for [`JwtAuth::authenticate`](crate::JwtAuth::authenticate)
    #[must_use]
    pub fn authenticate_options(&self) -> AuthenticateOptions {
        AuthenticateOptions {
            issuer: self.issuer.clone(),
            audiences: self.audience.clone(),
            subject: self.subject.clone(),
            leeway: Duration::from_secs(self.leeway),
            ignore_expiration: self.ignore_expiration,
            permissions: Vec::new(),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(aud) => vec![aud],
        OneOrMany::Many(aud) => aud,
    })
}

/// Options applied when issuing a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueOptions {
    pub(crate) alias: String,
    pub(crate) expires_in: Option<Duration>,
    pub(crate) issuer: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) audience: Vec<String>,
    pub(crate) no_timestamp: bool,
}

impl IssueOptions {
    /// Sign with the key registered under `alias`
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            expires_in: None,
            issuer: None,
            subject: None,
            audience: Vec::new(),
            no_timestamp: false,
        }
    }

    /// Sets `exp` to the issue time plus `ttl`
    #[must_use]
    pub const fn with_expires_in(mut self, ttl: Duration) -> Self {
        self.expires_in = Some(ttl);
        self
    }

    /// Writes `iss`
    #[must_use]
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.issuer = Some(iss.into());
        self
    }

    /// Writes `sub`
    #[must_use]
    pub fn with_subject(mut self, sub: impl Into<String>) -> Self {
        self.subject = Some(sub.into());
        self
    }

    /// Adds an audience. A single audience is written as a string, several as
    /// an array.
    #[must_use]
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.audience.push(aud.into());
        self
    }

    /// Omits `iat`
    #[must_use]
    pub const fn without_timestamp(mut self) -> Self {
        self.no_timestamp = true;
        self
    }

    /// Alias of the signing key
    #[must_use]
    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl From<Algorithm> for IssueOptions {
    fn from(alg: Algorithm) -> Self {
        Self::new(alg.as_str())
    }
}

/// Expectations applied to the claims of a token with a valid signature.
///
/// The default accepts any issuer, audience and subject with zero leeway.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthenticateOptions {
    pub(crate) issuer: Option<String>,
    pub(crate) audiences: Vec<String>,
    pub(crate) subject: Option<String>,
    pub(crate) leeway: Duration,
    pub(crate) ignore_expiration: bool,
    pub(crate) permissions: Vec<String>,
}

impl AuthenticateOptions {
    /// Accepts any token with a valid signature and current time claims
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects tokens whose `iss` is missing or differs from `iss`
    #[must_use]
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.issuer = Some(iss.into());
        self
    }

    /// Accepts `aud` as an audience. Tokens must name at least one accepted
    /// audience once any is configured.
    #[must_use]
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.audiences.push(aud.into());
        self
    }

    /// Rejects tokens whose `sub` is missing or differs from `sub`
    #[must_use]
    pub fn with_subject(mut self, sub: impl Into<String>) -> Self {
        self.subject = Some(sub.into());
        self
    }

    /// Clock skew tolerance applied to `exp`, `nbf` and `iat`
    #[must_use]
    pub const fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    /// Accepts expired tokens
    #[must_use]
    pub const fn ignore_expiration(mut self) -> Self {
        self.ignore_expiration = true;
        self
    }

    /// Requires `permission` in the permissions claim
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.push(permission.into());
        self
    }

    /// Configured leeway in whole seconds, saturating at `i64::MAX`
    pub(crate) fn leeway_secs(&self) -> i64 {
        i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX)
    }
}
