/// BLAKE3 hash (32 bytes).
pub type Hash = [u8; 32];

/// Hash arbitrary data using BLAKE3.
pub fn hash(data: &[u8]) -> Hash {
    *blake3::hash(data).as_bytes()
}

/// Hash a sequence of fields, each prefixed with its length so that
/// `["ab", "c"]` and `["a", "bc"]` never collide.
pub fn hash_parts(parts: &[&[u8]]) -> Hash {
    let mut hasher = blake3::Hasher::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    *hasher.finalize().as_bytes()
}

/// Domain-separated key derivation (BLAKE3 `derive_key` mode).
pub fn derive_key(context: &str, material: &[u8]) -> Hash {
    blake3::derive_key(context, material)
}
