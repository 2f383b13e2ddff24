//! Arbitrary-precision utilities for the continued-fraction attack

use anyhow::{anyhow, bail, Result};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use std::mem;

/// Parses a strict positive decimal integer.
///
/// Rejects empty strings, non-digit characters, leading zeros and zero
/// itself. `field` names the value being parsed for error messages.
pub fn parse_positive_decimal(s: &str, field: &str) -> Result<BigUint> {
    if s.is_empty() {
        bail!("Empty decimal string for {field}");
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        bail!("Invalid decimal string for {field}: only digits 0-9 allowed");
    }
    if s.len() > 1 && s.starts_with('0') {
        bail!("Invalid decimal string for {field}: no leading zeros allowed");
    }

    let value: BigUint = s
        .parse()
        .map_err(|e| anyhow!("Failed to parse {field}: {e}"))?;

    if value.is_zero() {
        bail!("{field} must be a positive integer");
    }

    Ok(value)
}

/// Computes the simple continued fraction terms of the rational e/n.
///
/// Repeated Euclidean division: q = num / den, then (num, den) becomes
/// (den, num - q * den). Terminates because den strictly decreases.
/// n = 0 yields an empty sequence.
pub fn continued_fraction(e: &BigUint, n: &BigUint) -> Vec<BigUint> {
    let mut terms = Vec::new();
    let mut num = e.clone();
    let mut den = n.clone();

    while !den.is_zero() {
        let q = &num / &den;
        let r = &num % &den;
        terms.push(q);
        num = mem::replace(&mut den, r);
    }
    terms
}

/// Builds the convergent numerators P and denominators Q from CF terms.
///
/// P0 = a0, Q0 = 1; P1 = a1*a0 + 1, Q1 = a1;
/// Pi = ai*P(i-1) + P(i-2), Qi = ai*Q(i-1) + Q(i-2).
pub fn convergents(terms: &[BigUint]) -> (Vec<BigUint>, Vec<BigUint>) {
    let mut p: Vec<BigUint> = Vec::with_capacity(terms.len());
    let mut q: Vec<BigUint> = Vec::with_capacity(terms.len());

    for (i, a) in terms.iter().enumerate() {
        match i {
            0 => {
                p.push(a.clone());
                q.push(BigUint::one());
            }
            1 => {
                p.push(a * &terms[0] + BigUint::one());
                q.push(a.clone());
            }
            _ => {
                p.push(a * &p[i - 1] + &p[i - 2]);
                q.push(a * &q[i - 1] + &q[i - 2]);
            }
        }
    }
    (p, q)
}

/// Returns the integer square root of n if n is a perfect square.
pub fn perfect_square_root(n: &BigUint) -> Option<BigUint> {
    let root = n.sqrt();
    if &root * &root == *n {
        Some(root)
    } else {
        None
    }
}
