#![allow(clippy::unwrap_used)]
use std::{
    hint::black_box,
    time::Duration,
};

use aws_lc_rs::{
    rand::SystemRandom,
    rsa::{
        KeyPair as RsaKeyPair,
        KeySize,
    },
    signature::{
        ECDSA_P256_SHA256_FIXED_SIGNING,
        ECDSA_P384_SHA384_FIXED_SIGNING,
        ECDSA_P521_SHA512_FIXED_SIGNING,
        EcdsaKeyPair,
        KeyPair,
    },
};
use criterion::{
    Criterion,
    Throughput,
    criterion_group,
    criterion_main,
};
use jsonwebtoken::{
    DecodingKey,
    Validation,
};
use jwtauth::{
    Algorithm,
    AlgorithmFamily,
    AuthenticateOptions,
    ClaimSet,
    IssueOptions,
    JwtAuth,
    KeyEntry,
    KeyRegistry,
    dangerous,
};
use serde_json::json;

const SECRET: &[u8] = b"a-string-secret-at-least-256-bits-long";

fn claims() -> ClaimSet {
    ClaimSet::new()
        .with("sub", "test")
        .with("permissions", json!(["read", "write"]))
}

fn options() -> AuthenticateOptions {
    AuthenticateOptions::new()
        .with_audience("jwtauth-test")
        .with_subject("test")
        .with_permission("read")
}

fn jwst_val(alg: jsonwebtoken::Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "aud", "sub", "iat"]);
    validation.set_audience(&["jwtauth-test"]);
    // permission checks are not possible in [`jsonwebtoken`] without a custom claims struct
    validation
}

/// Provider holding one key under the algorithm name, and the matching
/// `jsonwebtoken` decoding key.
fn genkey(alg: Algorithm) -> (JwtAuth, Option<DecodingKey>) {
    let (entry, decoding) = match alg.family() {
        AlgorithmFamily::Hmac => (
            KeyEntry::hmac(alg, SECRET).unwrap(),
            Some(DecodingKey::from_secret(SECRET)),
        ),
        AlgorithmFamily::Rsa => {
            let size = match alg {
                Algorithm::RS384 => KeySize::Rsa3072,
                Algorithm::RS512 => KeySize::Rsa4096,
                _ => KeySize::Rsa2048,
            };
            let pair = RsaKeyPair::generate(size).unwrap();
            let decoding = DecodingKey::from_rsa_raw_components(
                pair.public_key().modulus().big_endian_without_leading_zero(),
                pair.public_key()
                    .exponent()
                    .big_endian_without_leading_zero(),
            );
            (KeyEntry::rsa_key_pair(alg, pair).unwrap(), Some(decoding))
        }
        AlgorithmFamily::Ecdsa => {
            let signing = match alg {
                Algorithm::ES256 => &ECDSA_P256_SHA256_FIXED_SIGNING,
                Algorithm::ES384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
                _ => &ECDSA_P521_SHA512_FIXED_SIGNING,
            };
            let pkcs8 = EcdsaKeyPair::generate_pkcs8(signing, &SystemRandom::new()).unwrap();
            let pair = EcdsaKeyPair::from_pkcs8(signing, pkcs8.as_ref()).unwrap();
            // ES512 is unimplemented in [`jsonwebtoken`] as of 10.1.0
            let decoding = (alg != Algorithm::ES512)
                .then(|| DecodingKey::from_ec_der(pair.public_key().as_ref()));
            (KeyEntry::ecdsa_key_pair(alg, pair).unwrap(), decoding)
        }
    };
    let auth = JwtAuth::builder(KeyRegistry::empty().with_key(alg.as_str(), entry))
        .with_max_size(8 * 1024)
        .build();
    (auth, decoding)
}

fn authenticate(c: &mut Criterion) {
    for alg in Algorithm::ALL {
        let (auth, decoding) = genkey(alg);
        let token = auth
            .issue_with(
                claims(),
                &IssueOptions::from(alg)
                    .with_expires_in(Duration::from_secs(3600))
                    .with_audience("jwtauth-test"),
            )
            .unwrap();

        let mut group = c.benchmark_group(alg.as_str());
        group.throughput(Throughput::Bytes(token.len() as u64));

        group.bench_function("jwtauth", |b| {
            let options = options();
            b.iter(|| black_box(auth.authenticate(black_box(&token), &options).unwrap()));
        });

        if let Some(decoding) = decoding {
            group.bench_function("jsonwebtoken", |b| {
                let validation = jwst_val(alg.as_str().parse().unwrap());
                b.iter(|| {
                    jsonwebtoken::decode::<ClaimSet>(
                        black_box(&token),
                        black_box(&decoding),
                        black_box(&validation),
                    )
                    .unwrap()
                });
            });
        }

        group.finish();
    }
}

fn decode_unverified(c: &mut Criterion) {
    let (auth, _) = genkey(Algorithm::HS256);
    let token = auth.issue(claims(), "HS256", None).unwrap();

    let mut group = c.benchmark_group("dangerous");
    group.throughput(Throughput::Bytes(token.len() as u64));
    group.bench_function("decode", |b| {
        b.iter(|| black_box(dangerous::decode(black_box(&token)).unwrap()));
    });
    group.finish();
}

fn reject_garbage(c: &mut Criterion) {
    let (auth, _) = genkey(Algorithm::HS256);
    let options = AuthenticateOptions::new();
    let oversized = "a".repeat(16 * 1024);

    let mut group = c.benchmark_group("adversarial");
    group.bench_function("oversized", |b| {
        b.iter(|| black_box(auth.authenticate(black_box(&oversized), &options).unwrap_err()));
    });
    group.bench_function("undersized", |b| {
        b.iter(|| black_box(auth.authenticate(black_box("abc.def"), &options).unwrap_err()));
    });
    group.bench_function("none_alg", |b| {
        // header: {"alg":"none"}
        // claims: {"sub":"test"}
        let token = "eyJhbGciOiJub25lIn0.eyJzdWIiOiJ0ZXN0In0.";
        b.iter(|| black_box(auth.authenticate(black_box(token), &options).unwrap_err()));
    });
    group.finish();
}

criterion_group!(benches, authenticate, decode_unverified, reject_garbage);
criterion_main!(benches);
