#![allow(clippy::unwrap_used)]
//! Issues and authenticates tokens with a mixed HMAC / ECDSA registry.
//!
//! Run with `RUST_LOG=jwtauth=debug` to see the provider's decisions.
use std::time::Duration;

use aws_lc_rs::{
    rand::SystemRandom,
    signature::{
        ECDSA_P256_SHA256_FIXED_SIGNING,
        EcdsaKeyPair,
    },
};
use jwtauth::{
    Algorithm,
    ClaimSet,
    JwtAuth,
    JwtError,
    JwtOptions,
    KeyEntry,
    KeyRegistry,
    header::TokenHeader,
    validation::TokenValidator,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;

/// Rejects tokens issued for another tenant.
struct TenantValidator {
    tenant: &'static str,
}
impl TokenValidator for TenantValidator {
    fn validate(&self, _: &TokenHeader, claims: &ClaimSet, _: i64) -> Result<(), JwtError> {
        match claims.get("tenant").and_then(|t| t.as_str()) {
            Some(tenant) if tenant == self.tenant => Ok(()),
            _ => Err(JwtError::CustomValidationError("token belongs to another tenant")),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let pkcs8 =
        EcdsaKeyPair::generate_pkcs8(&ECDSA_P256_SHA256_FIXED_SIGNING, &SystemRandom::new()).unwrap();
    let registry = KeyRegistry::empty()
        .with_key(
            "HS256",
            KeyEntry::hmac(Algorithm::HS256, b"a-string-secret-at-least-256-bits-long").unwrap(),
        )
        .with_key(
            "service-signing",
            KeyEntry::ecdsa_pkcs8(Algorithm::ES256, pkcs8.as_ref()).unwrap(),
        );

    let options: JwtOptions = serde_json::from_value(json!({
        "algorithm": "service-signing",
        "expiresInSeconds": 600,
        "issuer": "issuer.example.org",
        "audience": ["api"],
        "leeway": 5,
        "permissionsClaimKey": "scopes"
    }))
    .unwrap();

    let auth = JwtAuth::builder(registry)
        .with_max_size(4 * 1024)
        .with_options(&options)
        .with(TenantValidator { tenant: "acme" })
        .build();

    let claims = ClaimSet::new()
        .with("sub", "paulo")
        .with("tenant", "acme")
        .with("scopes", json!(["orders:read"]));
    let token = auth
        .issue_with(claims, &options.issue_options())
        .unwrap();
    println!("issued: {token}");

    let authenticated = auth
        .authenticate(
            &token,
            &options
                .authenticate_options()
                .with_permission("orders:read"),
        )
        .unwrap();
    println!("authenticated: {}", serde_json::to_string(&authenticated).unwrap());

    let err = auth
        .authenticate(
            &token,
            &options
                .authenticate_options()
                .with_permission("orders:write"),
        )
        .unwrap_err();
    println!("without orders:write: {err}");

    let other_tenant = auth
        .issue(
            ClaimSet::new().with("tenant", "globex"),
            "HS256",
            Some(Duration::from_secs(60)),
        )
        .unwrap();
    let err = auth
        .authenticate(&other_tenant, &jwtauth::AuthenticateOptions::new())
        .unwrap_err();
    println!("other tenant: {err}");
}
