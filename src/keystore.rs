//! Provides [`KeyRegistry`], the alias-addressed store of signing and
//! verification keys
use std::collections::BTreeMap;

use tracing::{
    debug,
    warn,
};

use crate::{
    Algorithm,
    JwtError,
    crypto::KeyEntry,
    header::TokenHeader,
};

/// In-memory key store mapping an alias to a [`KeyEntry`].
///
/// Tokens select their key through the `kid` header, or through the `alg`
/// header when `kid` is absent, so entries registered under their algorithm
/// name (`HS256`, `RS256`, ...) are found without a `kid`.
///
/// A registry is filled once and then shared read-only; swap in a new one
/// through [`JwtAuth::reload`](crate::JwtAuth::reload) to change keys.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    keys: BTreeMap<String, KeyEntry>,
    insecure: bool,
}

impl KeyRegistry {
    /// Instantiates a new, empty [`KeyRegistry`] that rejects every token
    /// whose key alias is unknown.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
            insecure: false,
        }
    }

    /// Instantiates a new, empty [`KeyRegistry`] in insecure mode.
    ///
    /// DANGER: tokens whose key alias is not registered are accepted WITHOUT
    /// signature verification. Only use this when the payload is protected by
    /// external means.
    #[must_use]
    pub fn insecure() -> Self {
        warn!("key registry created in insecure mode, unknown key aliases skip signature verification");
        Self {
            keys: BTreeMap::new(),
            insecure: true,
        }
    }

    /// Adds a [`KeyEntry`] under `alias`, replacing any previous entry.
    pub fn register(&mut self, alias: impl Into<String>, key: KeyEntry) {
        let alias = alias.into();
        debug!(%alias, algorithm = %key.algorithm(), "registering key");
        if self.keys.insert(alias, key).is_some() {
            debug!("replaced existing key entry");
        }
    }

    /// Builder form of [`KeyRegistry::register`]
    #[must_use]
    pub fn with_key(mut self, alias: impl Into<String>, key: KeyEntry) -> Self {
        self.register(alias, key);
        self
    }

    /// Removes the [`KeyEntry`] registered under `alias`
    pub fn remove(&mut self, alias: impl AsRef<str>) -> Option<KeyEntry> {
        self.keys.remove(alias.as_ref())
    }

    /// Resolves the [`KeyEntry`] registered under `alias`.
    ///
    /// # Errors
    ///
    /// [`JwtError::KeyNotFound`] when no entry is registered under `alias`.
    pub fn lookup(&self, alias: &str) -> Result<&KeyEntry, JwtError> {
        self.keys.get(alias).ok_or(JwtError::KeyNotFound)
    }

    /// `true` when created through [`KeyRegistry::insecure`]
    #[must_use]
    pub const fn is_insecure(&self) -> bool {
        self.insecure
    }

    /// `true` when no keys are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of registered keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Registered aliases, in lexical order
    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.keys.keys().map(String::as_str)
    }

    /// `true` when any entry signs or verifies with `alg`
    fn has_algorithm(&self, alg: Algorithm) -> bool {
        self.keys.values().any(|key| key.algorithm() == alg)
    }

    /// Verifies a token signature with the key the `header` selects.
    ///
    /// An insecure registry skips verification only when no entry at all is
    /// registered for the `alg` of the token; an unknown `kid` cannot bypass
    /// a registered key.
    ///
    /// # Errors
    ///
    /// - [`JwtError::UnsupportedAlgorithm`] when the `alg` header is unknown
    /// - [`JwtError::KeyNotFound`] when the key alias is not registered and
    ///   the registry is not insecure, or holds a key for the `alg`
    /// - [`JwtError::WrongAlgorithm`] when the `alg` header differs from the
    ///   algorithm of the selected key
    /// - [`JwtError::SignatureInvalid`] when the signature does not verify
    pub fn verify(
        &self,
        header: &TokenHeader,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), JwtError> {
        let alg = header.algorithm()?;
        let alias = header.key_alias();
        let key = match self.keys.get(alias) {
            Some(key) => key,
            None if self.insecure && !self.has_algorithm(alg) => {
                warn!(%alias, "no key registered for alias, signature NOT verified (insecure mode)");
                return Ok(());
            }
            None => return Err(JwtError::KeyNotFound),
        };

        // alg validation is non-negotiable per RFC-7519
        if key.algorithm() != alg || key.family() != alg.family() {
            return Err(JwtError::WrongAlgorithm);
        }

        key.verify(message, signature)
    }
}

impl FromIterator<KeyEntry> for KeyRegistry {
    /// Registers every entry under its algorithm name.
    fn from_iter<T: IntoIterator<Item = KeyEntry>>(iter: T) -> Self {
        let mut registry = Self::empty();
        for key in iter {
            registry.register(key.algorithm().as_str(), key);
        }
        registry
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use aws_lc_rs::{
        rsa::KeySize,
        signature::{
            KeyPair,
            RsaKeyPair,
        },
    };

    use super::KeyRegistry;
    use crate::{
        Algorithm,
        JwtError,
        crypto::{
            KeyEntry,
            tests::hmac_entry,
        },
        header::TokenHeader,
    };

    fn header(alg: &str, kid: Option<&str>) -> TokenHeader {
        TokenHeader {
            alg: alg.into(),
            typ: Some("JWT".into()),
            kid: kid.map(Into::into),
        }
    }

    #[test]
    fn register_lookup_remove() {
        let mut registry = KeyRegistry::empty();
        registry.register("HS256", hmac_entry(Algorithm::HS256));
        registry.register("session", hmac_entry(Algorithm::HS512));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.aliases().collect::<Vec<_>>(), ["HS256", "session"]);

        assert_eq!(
            registry.lookup("session").unwrap().algorithm(),
            Algorithm::HS512
        );

        registry.remove("session");
        let err = registry.lookup("session").unwrap_err();
        assert_eq!(err, JwtError::KeyNotFound);
    }

    #[test]
    fn register_replaces_existing() {
        let registry = KeyRegistry::empty()
            .with_key("k", hmac_entry(Algorithm::HS256))
            .with_key("k", hmac_entry(Algorithm::HS384));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("k").unwrap().algorithm(), Algorithm::HS384);
    }

    #[test]
    fn from_iter_uses_algorithm_names() {
        let registry: KeyRegistry = [hmac_entry(Algorithm::HS256), hmac_entry(Algorithm::HS384)]
            .into_iter()
            .collect();
        registry.lookup("HS256").unwrap();
        registry.lookup("HS384").unwrap();
        assert!(!registry.is_insecure());
    }

    #[test]
    fn verify_selects_by_alg_without_kid() {
        let registry: KeyRegistry = [hmac_entry(Algorithm::HS256)].into_iter().collect();
        let sig = registry.lookup("HS256").unwrap().sign(b"m").unwrap();
        registry.verify(&header("HS256", None), b"m", &sig).unwrap();
    }

    #[test]
    fn verify_unknown_alias_fails_closed() {
        let registry = KeyRegistry::empty();
        let err = registry
            .verify(&header("HS256", None), b"m", b"sig")
            .unwrap_err();
        assert_eq!(err, JwtError::KeyNotFound);
    }

    #[test]
    fn verify_unknown_alias_skipped_when_insecure() {
        let registry = KeyRegistry::insecure();
        assert!(registry.is_insecure());
        registry
            .verify(&header("HS256", None), b"m", b"garbage")
            .unwrap();
    }

    #[test]
    fn insecure_registry_still_verifies_known_aliases() {
        let registry = KeyRegistry::insecure().with_key("HS256", hmac_entry(Algorithm::HS256));
        let err = registry
            .verify(&header("HS256", None), b"m", b"garbage")
            .unwrap_err();
        assert_eq!(err, JwtError::SignatureInvalid);
    }

    #[test]
    fn insecure_registry_unknown_kid_cannot_bypass_registered_alg() {
        let registry = KeyRegistry::insecure().with_key("HS256", hmac_entry(Algorithm::HS256));
        let err = registry
            .verify(&header("HS256", Some("bogus")), b"m", b"garbage")
            .unwrap_err();
        assert_eq!(err, JwtError::KeyNotFound);

        // a key registered under a custom alias still counts
        let registry = KeyRegistry::insecure().with_key("session", hmac_entry(Algorithm::HS512));
        let err = registry
            .verify(&header("HS512", None), b"m", b"garbage")
            .unwrap_err();
        assert_eq!(err, JwtError::KeyNotFound);

        // nothing registered for the alg at all
        registry
            .verify(&header("HS256", Some("bogus")), b"m", b"garbage")
            .unwrap();
    }

    #[test]
    fn verify_rejects_unknown_alg_even_when_insecure() {
        let registry = KeyRegistry::insecure();
        let err = registry.verify(&header("none", None), b"m", b"").unwrap_err();
        assert_eq!(err, JwtError::UnsupportedAlgorithm);
    }

    #[test]
    fn hs256_header_against_rsa_entry_is_wrong_algorithm() {
        let pair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
        let public_der = pair.public_key().as_ref().to_vec();
        let registry = KeyRegistry::empty().with_key(
            "RS256",
            KeyEntry::rsa_key_pair(Algorithm::RS256, pair).unwrap(),
        );

        // classic confusion: HMAC over the message keyed with the RSA public key
        let forged = KeyEntry::hmac(Algorithm::HS256, &public_der)
            .unwrap()
            .sign(b"m")
            .unwrap();
        let err = registry
            .verify(&header("HS256", Some("RS256")), b"m", &forged)
            .unwrap_err();
        assert_eq!(err, JwtError::WrongAlgorithm);
    }

    #[test]
    fn same_family_other_digest_is_wrong_algorithm() {
        let registry = KeyRegistry::empty().with_key("shared", hmac_entry(Algorithm::HS256));
        let err = registry
            .verify(&header("HS512", Some("shared")), b"m", b"sig")
            .unwrap_err();
        assert_eq!(err, JwtError::WrongAlgorithm);
    }
}
