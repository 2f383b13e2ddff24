//! Wiener's continued-fraction attack on small RSA private exponents

use super::*;
use crate::math::{continued_fraction, convergents, perfect_square_root};
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Signed, Zero};

/// Wiener's attack: when d < N^(1/4) / 3, the fraction k/d appears among
/// the convergents of e/N, exposing phi(N) and with it the factorization.
pub struct WienerAttack {
    verbose: bool,
}

impl WienerAttack {
    pub fn new(verbose: bool) -> Self {
        WienerAttack { verbose }
    }
}

impl Attack for WienerAttack {
    fn name(&self) -> &'static str {
        "wiener"
    }

    fn run(&self, key: &PublicKey) -> Result<AttackResult, AttackError> {
        let terms = continued_fraction(&key.e, &key.n);
        if terms.is_empty() {
            return Err(AttackError::NoSolutionFound);
        }
        if self.verbose {
            eprintln!("continued fraction of e/N has {} terms", terms.len());
        }

        let (p_seq, q_seq) = convergents(&terms);

        // Smaller convergents first; the first structurally valid candidate
        // wins, which keeps the result deterministic.
        for i in 0..p_seq.len() {
            let Some((q, d)) = try_recover_from_convergent(&p_seq[i], &q_seq[i], &key.e, &key.n)
            else {
                continue;
            };
            if self.verbose {
                eprintln!("convergent #{i} ({}/{}) yielded a candidate", p_seq[i], q_seq[i]);
            }
            return verify_candidate(q, d, &key.e, &key.n);
        }

        if self.verbose {
            eprintln!("all {} convergents exhausted", p_seq.len());
        }
        Err(AttackError::NoSolutionFound)
    }
}

/// Tests one convergent k/d against the public key.
///
/// If k divides e*d - 1, phi = (e*d - 1)/k is a candidate totient and the
/// factors of N are the roots of x^2 - ((N - phi) + 1)x + N = 0. The roots
/// are accepted only when the discriminant is a perfect square and the root
/// is a positive integer dividing N. Roots are tried (+) before (-); the
/// first valid one is returned as the factor q, paired with d.
fn try_recover_from_convergent(
    k: &BigUint,
    d: &BigUint,
    e: &BigUint,
    n: &BigUint,
) -> Option<(BigUint, BigUint)> {
    if k.is_zero() {
        return None;
    }

    let numer = e * d - BigUint::one();
    if !(&numer % k).is_zero() {
        return None;
    }
    let phi = numer / k;

    // phi may exceed N for bad convergents, so the quadratic is signed.
    let n_signed = BigInt::from(n.clone());
    let b = -((&n_signed - BigInt::from(phi)) + BigInt::one());
    let c = n_signed;

    let delta = &b * &b - BigInt::from(4) * &c;
    if delta.is_negative() {
        return None;
    }

    let root = perfect_square_root(delta.magnitude())?;
    let root = BigInt::from(root);

    let two = BigInt::from(2);
    for root_cand in [-&b + &root, -&b - &root] {
        if !(&root_cand % &two).is_zero() {
            continue;
        }
        let cand = root_cand / &two;
        if cand.sign() != Sign::Plus {
            continue;
        }
        let cand = cand.magnitude().clone();
        if !(n % &cand).is_zero() {
            continue;
        }
        return Some((cand, d.clone()));
    }

    None
}

/// Recomputes the full key material from a (q, d) candidate and checks
/// e * d = 1 (mod (p-1)(q-1)) before accepting it.
fn verify_candidate(
    q: BigUint,
    d: BigUint,
    e: &BigUint,
    n: &BigUint,
) -> Result<AttackResult, AttackError> {
    if !(n % &q).is_zero() {
        return Err(AttackError::DivisibilityInconsistency);
    }
    let p = n / &q;

    let phi = (&p - BigUint::one()) * (&q - BigUint::one());
    if phi.is_zero() {
        // q = N leaves phi = 0; the reduction below needs phi > 0
        return Err(AttackError::VerificationFailed {
            check: BigUint::zero(),
        });
    }

    let check = (e * &d) % &phi;
    if !check.is_one() {
        return Err(AttackError::VerificationFailed { check });
    }

    Ok(AttackResult {
        p,
        q,
        d,
        verified: true,
    })
}
