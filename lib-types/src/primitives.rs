//! Canonical Primitive Types for Ledger State
//!
//! These types are the foundational building blocks for all ledger-critical
//! data structures. They are designed to be:
//! - Fixed-size (no dynamic allocation)
//! - Deterministically serializable
//! - Efficient to copy and compare

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// TYPE ALIASES
// ============================================================================

/// Block height supplied by the host chain (0-indexed)
pub type BlockHeight = u64;

/// Token amounts (supports up to ~340 undecillion units)
pub type Amount = u128;

/// Whole-percent delegation weight (100 = 100%)
pub type Percentage = u8;

// ============================================================================
// IDENTITY TYPES
// ============================================================================

/// 32-byte account address (derived from public key)
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize, Default)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// Create a new Address from raw bytes
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create a zeroed Address
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Get the underlying bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Check if this is the zero address
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[..8]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_basics() {
        let addr = Address::new([3u8; 32]);
        assert!(!addr.is_zero());
        assert_eq!(addr.as_bytes(), &[3u8; 32]);

        let zero = Address::zero();
        assert!(zero.is_zero());
    }

    #[test]
    fn test_address_ordering_is_bytewise() {
        let low = Address::new([1u8; 32]);
        let high = Address::new([2u8; 32]);
        assert!(low < high);
    }

    #[test]
    fn test_address_display_is_full_hex() {
        let addr = Address::new([0xabu8; 32]);
        assert_eq!(format!("{}", addr), "ab".repeat(32));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let addr = Address::new([42u8; 32]);
        let serialized = bincode::serialize(&addr).unwrap();
        let deserialized: Address = bincode::deserialize(&serialized).unwrap();
        assert_eq!(addr, deserialized);
    }

    #[test]
    fn test_from_array() {
        let bytes = [5u8; 32];
        let addr: Address = bytes.into();
        assert_eq!(addr.0, bytes);
    }
}
