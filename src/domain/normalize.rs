//! Name normalization for fuzzy protocol/chain matching
//!
//! Config slugs ("aave-v3") and aggregator names ("Aave V3", "aave-v3") are reduced
//! to comparison keys. Aliases are substring rewrites applied until the key stops
//! changing, so normalizing a key again always returns it unchanged.

const PROTOCOL_ALIASES: &[(&str, &str)] = &[
    ("aavev3", "aave"),
    ("morphoblue", "morpho"),
    ("curvefinance", "curve"),
    ("curvedex", "curve"),
];

const CHAIN_ALIASES: &[(&str, &str)] = &[("mainnet", "ethereum")];

/// Lowercase, drop everything outside `[a-z0-9]`, collapse known aliases
pub fn normalize_protocol(name: &str) -> String {
    let stripped: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    apply_aliases(stripped, PROTOCOL_ALIASES)
}

/// Lowercase and map the legacy network name onto the canonical key
pub fn normalize_chain(name: &str) -> String {
    apply_aliases(name.to_lowercase(), CHAIN_ALIASES)
}

fn apply_aliases(mut key: String, aliases: &[(&str, &str)]) -> String {
    // Rewrites can expose a new occurrence ("aavev3v3" -> "aavev3"). A new
    // match always needs unconsumed input characters, so the loop terminates.
    loop {
        let next = aliases
            .iter()
            .fold(key.clone(), |acc, (from, to)| acc.replace(from, to));
        if next == key {
            return key;
        }
        key = next;
    }
}
