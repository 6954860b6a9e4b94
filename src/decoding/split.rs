use memchr::memchr_iter;

use crate::error::MalformedToken;

/// Compact token split on its two `.` delimiters, without decoding.
#[derive(Debug)]
pub struct SplitJwt<'a> {
    data: &'a [u8],
    header_end: usize,
    payload_end: usize,
}

impl<'a> TryFrom<&'a [u8]> for SplitJwt<'a> {
    type Error = MalformedToken;
    fn try_from(value: &'a [u8]) -> Result<Self, Self::Error> {
        let mut dots = memchr_iter(b'.', value);
        let header_end = dots.next().ok_or(MalformedToken::Undersized)?;
        let payload_end = dots.next().ok_or(MalformedToken::Undersized)?;
        if dots.next().is_some() {
            return Err(MalformedToken::Oversized);
        }
        Ok(SplitJwt {
            data: value,
            header_end,
            payload_end,
        })
    }
}

impl<'a> SplitJwt<'a> {
    #[must_use]
    pub fn b64_header(&self) -> &'a [u8] {
        &self.data[..self.header_end]
    }

    #[must_use]
    pub fn b64_payload(&self) -> &'a [u8] {
        &self.data[self.header_end + 1..self.payload_end]
    }

    /// Signing input: header and payload with the dot between them
    #[must_use]
    pub fn signing_input(&self) -> &'a [u8] {
        &self.data[..self.payload_end]
    }

    #[must_use]
    pub fn b64_signature(&self) -> &'a [u8] {
        &self.data[self.payload_end + 1..]
    }
}
