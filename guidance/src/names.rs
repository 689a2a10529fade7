use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Configured street name suffix variants ("Street", "Ave", "NE", ...). Two names that differ
/// only by a trailing suffix refer to the same base road.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SuffixTable {
    suffixes: BTreeSet<String>,
}

impl SuffixTable {
    pub fn new(suffixes: Vec<String>) -> SuffixTable {
        SuffixTable {
            suffixes: suffixes.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn is_suffix(&self, token: &str) -> bool {
        self.suffixes.contains(&token.to_lowercase())
    }
}

/// Whether switching between two street names is a change worth announcing to a driver. Names
/// that match modulo case and a single trailing suffix variant are the same road.
pub fn requires_name_announced(first: &str, second: &str, suffixes: &SuffixTable) -> bool {
    let first = first.trim().to_lowercase();
    let second = second.trim().to_lowercase();
    if first == second {
        return false;
    }
    if first.is_empty() || second.is_empty() {
        return true;
    }
    base_name(&first, suffixes) != base_name(&second, suffixes)
}

fn base_name(name: &str, suffixes: &SuffixTable) -> String {
    let mut tokens: Vec<&str> = name.split_whitespace().collect();
    // never strip a name down to nothing
    if tokens.len() > 1 && suffixes.is_suffix(tokens[tokens.len() - 1]) {
        tokens.pop();
    }
    tokens.join(" ")
}
