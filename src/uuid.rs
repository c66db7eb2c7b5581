//! 128-bit identifiers used for topic ids.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

use crate::error::{Error, Result};

/// A 128-bit UUID stored as two 64-bit halves.
///
/// The string form is the 16 big-endian bytes encoded as unpadded URL-safe
/// base64, which is what brokers print and accept for topic ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Uuid {
    most_significant: i64,
    least_significant: i64,
}

impl Uuid {
    /// Denotes an absent id.
    pub const ZERO: Self = Self::new(0, 0);

    /// Id of the internal cluster metadata topic.
    pub const METADATA_TOPIC_ID: Self = Self::new(0, 1);

    /// Ids that [`Uuid::random`] never hands out.
    pub const RESERVED: [Self; 2] = [Self::ZERO, Self::METADATA_TOPIC_ID];

    pub const fn new(most_significant: i64, least_significant: i64) -> Self {
        Self {
            most_significant,
            least_significant,
        }
    }

    /// Generate a random, non-reserved id whose string form does not start with `-`.
    pub fn random() -> Self {
        Self::random_with_rng(&mut rand::rng())
    }

    pub fn random_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        loop {
            let candidate = Self::new(rng.random(), rng.random());
            if !candidate.is_reserved() && !candidate.to_string().starts_with('-') {
                return candidate;
            }
        }
    }

    pub const fn most_significant_bits(&self) -> i64 {
        self.most_significant
    }

    pub const fn least_significant_bits(&self) -> i64 {
        self.least_significant
    }

    pub fn is_reserved(&self) -> bool {
        Self::RESERVED.contains(self)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Big-endian byte representation.
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[..8].copy_from_slice(&self.most_significant.to_be_bytes());
        out[8..].copy_from_slice(&self.least_significant.to_be_bytes());
        out
    }

    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        let (high, low) = bytes.split_at(8);
        let mut h = [0u8; 8];
        let mut l = [0u8; 8];
        h.copy_from_slice(high);
        l.copy_from_slice(low);
        Self::new(i64::from_be_bytes(h), i64::from_be_bytes(l))
    }
}

impl Display for Uuid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&URL_SAFE_NO_PAD.encode(self.to_bytes()))
    }
}

impl FromStr for Uuid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let decoded = URL_SAFE_NO_PAD
            .decode(s)
            .map_err(|e| Error::InvalidUuid(format!("cannot decode \"{s}\": {e}")))?;

        let bytes: [u8; 16] = decoded.as_slice().try_into().map_err(|_| {
            Error::InvalidUuid(format!(
                "\"{s}\" decodes to {} bytes, expected 16",
                decoded.len()
            ))
        })?;

        Ok(Self::from_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use proptest::prelude::*;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_zero_string_form() {
        assert_eq!(Uuid::ZERO.to_string(), "AAAAAAAAAAAAAAAAAAAAAA");
        assert_eq!(Uuid::METADATA_TOPIC_ID.to_string(), "AAAAAAAAAAAAAAAAAAAAAQ");
    }

    #[test]
    fn test_parse_known_value() {
        let id: Uuid = "AAAAAAAAAAAAAAAAAAAAAQ".parse().unwrap();
        assert_eq!(id, Uuid::METADATA_TOPIC_ID);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert_matches!("AAAA".parse::<Uuid>(), Err(Error::InvalidUuid(_)));
        assert_matches!("not base64!".parse::<Uuid>(), Err(Error::InvalidUuid(_)));
    }

    #[test]
    fn test_ordering_is_signed_lexicographic() {
        let a = Uuid::new(-1, 5);
        let b = Uuid::new(0, 0);
        let c = Uuid::new(0, 1);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_random_is_not_reserved() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let id = Uuid::random_with_rng(&mut rng);
            assert!(!id.is_reserved());
            assert!(!id.to_string().starts_with('-'));
        }
    }

    proptest! {
        #[test]
        fn test_string_roundtrip(id: Uuid) {
            prop_assume!(!id.is_reserved());
            let s = id.to_string();
            prop_assume!(!s.starts_with('-'));
            prop_assert_eq!(s.len(), 22);
            prop_assert_eq!(s.parse::<Uuid>().unwrap(), id);
        }
    }
}
