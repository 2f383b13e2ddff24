//! Public key data types and input validation

use crate::math::parse_positive_decimal;
use anyhow::Result;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.filter(|s| !s.trim().is_empty()))
}

/// Raw textual form of an RSA public key, as it appears in input files.
///
/// The optional `d` field carries the known private exponent when the input
/// comes from a generated test dataset; batch analysis compares it against
/// the recovered exponent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicKeyInput {
    pub e: String,
    pub n: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub d: Option<String>,
}

/// A validated RSA public key: e and n are positive integers.
#[derive(Debug, Clone)]
pub struct PublicKey {
    pub e: BigUint,
    pub n: BigUint,
    pub expected_d: Option<BigUint>,
}

impl TryFrom<PublicKeyInput> for PublicKey {
    type Error = anyhow::Error;

    fn try_from(input: PublicKeyInput) -> Result<Self> {
        let e = parse_positive_decimal(&input.e, "e")?;
        let n = parse_positive_decimal(&input.n, "N")?;

        let expected_d = match input.d {
            Some(d) => Some(parse_positive_decimal(&d, "d")?),
            None => None,
        };

        Ok(PublicKey { e, n, expected_d })
    }
}
