//! Attack trait and shared result types

use crate::key::PublicKey;
use num_bigint::BigUint;
use thiserror::Error;

pub mod wiener;
pub use wiener::WienerAttack;

pub trait Attack: Send + Sync {
    fn name(&self) -> &'static str;
    fn run(&self, key: &PublicKey) -> Result<AttackResult, AttackError>;
}

/// A verified key recovery: n = p * q and e * d = 1 (mod (p-1)(q-1)).
#[derive(Debug, Clone)]
pub struct AttackResult {
    pub p: BigUint,
    pub q: BigUint,
    pub d: BigUint,
    pub verified: bool,
}

/// Why an attack run produced no verified recovery.
///
/// `NoSolutionFound` is the expected negative outcome for keys that are not
/// vulnerable; the other two variants indicate an internal arithmetic fault
/// and should be unreachable.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttackError {
    /// Every convergent was exhausted without a structurally valid candidate.
    #[error("no small-exponent vulnerability found: all convergents exhausted")]
    NoSolutionFound,

    /// A recovered factor unexpectedly fails to divide the modulus.
    #[error("recovered factor does not divide N")]
    DivisibilityInconsistency,

    /// The recovered exponent fails the final e * d = 1 (mod phi) check.
    #[error("verification failed: e * d mod phi(N) = {check}, expected 1")]
    VerificationFailed { check: BigUint },
}
