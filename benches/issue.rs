#![allow(clippy::unwrap_used)]
use std::hint::black_box;

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
    },
};
use criterion::{
    Criterion,
    Throughput,
    criterion_group,
    criterion_main,
};
use jsonwebtoken::{
    EncodingKey,
    Header,
};
use jwtauth::{
    Algorithm,
    AlgorithmFamily,
    ClaimSet,
    JwtAuth,
    KeyEntry,
    KeyRegistry,
};
use serde_json::json;

const SECRET: &[u8] = b"a-string-secret-at-least-256-bits-long";

fn claims() -> ClaimSet {
    ClaimSet::new()
        .with("sub", "test")
        .with("aud", json!(["jwtauth-test"]))
        .with("exp", 1_865_013_100)
}

fn genkey(alg: Algorithm) -> (KeyEntry, Option<EncodingKey>) {
    match alg.family() {
        AlgorithmFamily::Hmac => (
            KeyEntry::hmac(alg, SECRET).unwrap(),
            Some(EncodingKey::from_secret(SECRET)),
        ),
        // `jsonwebtoken` only loads PKCS#1 RSA keys
        AlgorithmFamily::Rsa => {
            let pair = RsaKeyPair::generate(KeySize::Rsa2048).unwrap();
            (KeyEntry::rsa_key_pair(alg, pair).unwrap(), None)
        }
        AlgorithmFamily::Ecdsa => {
            let signing = match alg {
                Algorithm::ES256 => &ECDSA_P256_SHA256_FIXED_SIGNING,
                Algorithm::ES384 => &ECDSA_P384_SHA384_FIXED_SIGNING,
                _ => &ECDSA_P521_SHA512_FIXED_SIGNING,
            };
            let pkcs8 = EcdsaKeyPair::generate_pkcs8(signing, &SystemRandom::new()).unwrap();
            // ES512 is unimplemented in [`jsonwebtoken`] as of 10.1.0
            let encoding =
                (alg != Algorithm::ES512).then(|| EncodingKey::from_ec_der(pkcs8.as_ref()));
            (KeyEntry::ecdsa_pkcs8(alg, pkcs8.as_ref()).unwrap(), encoding)
        }
    }
}

fn issue(c: &mut Criterion) {
    for alg in Algorithm::ALL {
        let (entry, encoding) = genkey(alg);
        let auth = JwtAuth::new(KeyRegistry::empty().with_key(alg.as_str(), entry));
        let claims = claims();

        let mut group = c.benchmark_group(alg.as_str());
        group.throughput(Throughput::Elements(1));

        group.bench_function("jwtauth", |b| {
            b.iter(|| {
                black_box(
                    auth.issue(black_box(claims.clone()), alg.as_str(), None)
                        .unwrap(),
                )
            });
        });

        if let Some(encoding) = encoding {
            group.bench_function("jsonwebtoken", |b| {
                let header = Header::new(alg.as_str().parse().unwrap());
                b.iter(|| {
                    black_box(
                        jsonwebtoken::encode(black_box(&header), black_box(&claims), &encoding)
                            .unwrap(),
                    )
                });
            });
        }

        group.finish();
    }
}

criterion_group!(benches, issue);
criterion_main!(benches);
