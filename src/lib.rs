//! RSA small private exponent vulnerability analysis library
//!
//! This library provides tools for detecting and exploiting RSA public keys
//! whose private exponent is small enough to fall to Wiener's
//! continued-fraction attack.

pub mod attack;
pub mod key;
pub mod math;
pub mod provider;

pub use attack::{Attack, AttackError, AttackResult, WienerAttack};
pub use key::{PublicKey, PublicKeyInput};
