//! Host-supplied address syntax predicates, one per chain family. These are
//! pure shape checks handed into the engine context; on-chain validity is
//! the execution collaborator's problem.

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// `0x` followed by exactly 40 hex digits.
pub fn evm_address_ok(address: &str) -> bool {
    let Some(hex) = address.strip_prefix("0x") else {
        return false;
    };
    hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Base58-encoded 32-byte public key: 32 to 44 characters from the Bitcoin
/// base58 alphabet (no 0, O, I, l).
pub fn base58_address_ok(address: &str) -> bool {
    (32..=44).contains(&address.len())
        && address.chars().all(|c| BASE58_ALPHABET.contains(c))
}
