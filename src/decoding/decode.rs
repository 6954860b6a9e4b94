use base64_simd::URL_SAFE_NO_PAD as b64;

use crate::{
    JwtError,
    claims::ClaimSet,
    decoding::SplitJwt,
    error::MalformedToken,
    header::TokenHeader,
};

fn decode_section(section: &[u8]) -> Result<Vec<u8>, MalformedToken> {
    b64.decode_to_vec(section)
        .map_err(|_| MalformedToken::InvalidEncoding)
}

/// Parsed compact token: header and claims deserialized, signature decoded,
/// signing input kept as a borrow of the raw token.
#[derive(Debug)]
pub struct CompactToken<'a> {
    header: TokenHeader,
    claims: ClaimSet,
    signature: Vec<u8>,
    signing_input: &'a [u8],
}

impl<'a> TryFrom<&'a [u8]> for CompactToken<'a> {
    type Error = JwtError;
    fn try_from(token: &'a [u8]) -> Result<Self, Self::Error> {
        let parts = SplitJwt::try_from(token)?;
        let header = decode_section(parts.b64_header())?;
        let claims = decode_section(parts.b64_payload())?;
        let signature = decode_section(parts.b64_signature())?;
        Ok(Self {
            header: TokenHeader::from_json(&header)?,
            claims: ClaimSet::from_json(&claims)?,
            signature,
            signing_input: parts.signing_input(),
        })
    }
}

impl CompactToken<'_> {
    #[must_use]
    pub const fn header(&self) -> &TokenHeader {
        &self.header
    }

    #[must_use]
    pub const fn claims(&self) -> &ClaimSet {
        &self.claims
    }

    #[must_use]
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    #[must_use]
    pub const fn signing_input(&self) -> &[u8] {
        self.signing_input
    }

    /// Drops everything but the header and claims
    #[must_use]
    pub fn into_parts(self) -> (TokenHeader, ClaimSet) {
        (self.header, self.claims)
    }
}
