/// Derive a sub-seed from a run seed and a stable key (FNV-1a over the key).
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

/// Derive the seed of one row from the table seed and the row index.
pub fn hash_row_seed(table_seed: u64, row_index: u64) -> u64 {
    let hash = table_seed ^ row_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash.wrapping_mul(0x100000001b3)
}
