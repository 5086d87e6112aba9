use crate::core::types::ChainAliasEntry;

/// Result of an exact alias lookup: the owning chain plus the alias that
/// matched (the shortest one, when an entry carries several case variants).
#[derive(Debug, Clone, PartialEq)]
pub struct ExactMatch<'a> {
    pub chain: &'a ChainAliasEntry,
    pub alias: &'a str,
}

/// One strict-prefix hit. Not deduplicated by chain: two aliases of the
/// same entry can both appear.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch<'a> {
    pub chain: &'a ChainAliasEntry,
    pub alias: &'a str,
}

/// Case-insensitive equality against any alias of any entry. The first
/// matching entry in catalog order wins; within an entry the shortest
/// matching alias is preferred, which keeps exact-match semantics
/// predictable when aliases prefix each other.
pub fn resolve_exact<'a>(name: &str, chains: &'a [ChainAliasEntry]) -> Option<ExactMatch<'a>> {
    for entry in chains {
        let mut best: Option<&str> = None;
        for alias in &entry.aliases {
            if alias.eq_ignore_ascii_case(name) {
                let shorter = best.map_or(true, |b| alias.len() < b.len());
                if shorter {
                    best = Some(alias);
                }
            }
        }
        if let Some(alias) = best {
            return Some(ExactMatch { chain: entry, alias });
        }
    }
    None
}

/// Every alias that starts with the search string (case-insensitively) and
/// is not equal to it, in catalog order. Only meaningful when
/// `resolve_exact` came back empty.
pub fn resolve_fuzzy<'a>(name: &str, chains: &'a [ChainAliasEntry]) -> Vec<FuzzyMatch<'a>> {
    let needle = name.to_ascii_lowercase();
    let mut matches = Vec::new();

    for entry in chains {
        for alias in &entry.aliases {
            let lowered = alias.to_ascii_lowercase();
            if lowered.starts_with(&needle) && lowered != needle {
                matches.push(FuzzyMatch { chain: entry, alias });
            }
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ChainFamily;

    fn catalog() -> Vec<ChainAliasEntry> {
        vec![
            ChainAliasEntry::new("ethereum", ChainFamily::Evm, &["ethereum", "eth"]),
            ChainAliasEntry::new("polygon", ChainFamily::Evm, &["polygon", "matic"]),
            ChainAliasEntry::new("solana", ChainFamily::Solana, &["solana", "sol"]),
        ]
    }

    #[test]
    fn test_every_alias_resolves_case_insensitively() {
        let chains = catalog();
        for entry in &chains {
            for alias in &entry.aliases {
                let hit = resolve_exact(&alias.to_uppercase(), &chains)
                    .unwrap_or_else(|| panic!("alias '{}' did not resolve", alias));
                assert_eq!(hit.chain.chain_id, entry.chain_id);
            }
        }
    }

    #[test]
    fn test_exact_prefers_shortest_alias() {
        let chains = vec![ChainAliasEntry::new(
            "ethereum",
            ChainFamily::Evm,
            &["Eth", "ETH", "eth"],
        )];

        let hit = resolve_exact("eTh", &chains).unwrap();
        assert_eq!(hit.alias, "Eth");
    }

    #[test]
    fn test_exact_misses_outside_allow_list() {
        let chains = catalog();
        assert!(resolve_exact("bitcoin", &chains).is_none());
        assert!(resolve_exact("", &chains).is_none());
    }

    #[test]
    fn test_fuzzy_returns_strict_prefix_matches_in_order() {
        let chains = catalog();
        let hits = resolve_fuzzy("e", &chains);

        let aliases: Vec<&str> = hits.iter().map(|h| h.alias).collect();
        assert_eq!(aliases, vec!["ethereum", "eth"]);
        assert!(hits.iter().all(|h| h.chain.chain_id == "ethereum"));
    }

    #[test]
    fn test_fuzzy_never_returns_the_search_string() {
        let chains = catalog();
        for needle in ["eth", "ETH", "sol", "polygon"] {
            for hit in resolve_fuzzy(needle, &chains) {
                assert!(!hit.alias.eq_ignore_ascii_case(needle));
            }
        }
    }

    #[test]
    fn test_fuzzy_misses_on_non_prefix() {
        let chains = catalog();
        assert!(resolve_fuzzy("xyz", &chains).is_empty());
        assert!(resolve_fuzzy("thereum", &chains).is_empty());
    }
}
