/// Fallback colours for categories that carry none.
pub const PALETTE: [&str; 12] = [
    "#3b82f6", "#10b981", "#f59e0b", "#ef4444", "#8b5cf6", "#ec4899",
    "#14b8a6", "#f97316", "#6366f1", "#84cc16", "#06b6d4", "#a855f7",
];

/// Colour of the synthetic "Other" bucket.
pub const OTHER_COLOR: &str = "#9ca3af";

/// Seed of the name hash. Changing it reshuffles every fallback colour.
pub const HASH_SEED: u32 = 5381;

/// Deterministic fallback colour for a category name.
///
/// Same name, same colour, across calls and across sessions.
pub fn color_for(name: &str) -> &'static str {
    let index = name_hash(name, HASH_SEED) as usize % PALETTE.len();
    PALETTE[index]
}

/// djb2-style string hash over Unicode scalar values.
pub fn name_hash(name: &str, seed: u32) -> u32 {
    name.chars().fold(seed, |hash, c| {
        hash.wrapping_shl(5).wrapping_add(hash).wrapping_add(c as u32)
    })
}

