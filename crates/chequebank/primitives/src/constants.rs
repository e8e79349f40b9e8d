//! Protocol constants.

use alloy_primitives::FixedBytes;

/// Maximum number of links in a sign-over chain.
pub const MAX_SIGN_OVER_DEPTH: usize = 6;

/// Magic tag prefixed to every sign-over digest.
pub const SIGN_OVER_MAGIC: FixedBytes<4> = FixedBytes::new([0xFF, 0xFF, 0xDE, 0xAD]);

/// Length of a serialized ECDSA signature (r[32] + s[32] + v[1]).
pub const SIGNATURE_LENGTH: usize = 65;
