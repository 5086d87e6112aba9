use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::core::chains;
use crate::core::types::{BridgeMode, EngineContext, ParsedCommand};

/// The structured record handed to the external execution collaborator
/// after a successful final validation. Chain aliases are resolved to
/// canonical ids here; the raw text is kept for the recency cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeIntent {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: BridgeMode,
    pub source_chain: String,
    pub target_chain: String,
    pub amount: Option<String>,
    pub symbol: Option<String>,
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
    pub raw: String,
}

impl BridgeIntent {
    /// Only meaningful after `validate_finalize` reported no error; an
    /// unresolvable chain here means the caller skipped that step.
    pub fn from_parsed(parsed: &ParsedCommand, ctx: &EngineContext) -> Result<Self, String> {
        let source_chain = resolve_id(parsed.source_chain.as_deref(), ctx, "source")?;
        let target_chain = resolve_id(parsed.target_chain.as_deref(), ctx, "target")?;

        Ok(Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            mode: ctx.mode,
            source_chain,
            target_chain,
            amount: parsed.amount.clone(),
            symbol: parsed.symbol.clone(),
            contract_address: parsed.contract_address.clone(),
            token_id: parsed.token_id.clone(),
            raw: parsed.unparsed_command.clone(),
        })
    }
}

fn resolve_id(name: Option<&str>, ctx: &EngineContext, role: &str) -> Result<String, String> {
    let name = name.ok_or_else(|| format!("No {} chain in command", role))?;
    chains::resolve_exact(name, ctx.chains)
        .map(|hit| hit.chain.chain_id.clone())
        .ok_or_else(|| format!("Unknown {} chain: {}", role, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use crate::core::parser::parse;
    use crate::core::recent::RecentSnapshot;
    use crate::core::types::{
        AddressValidators, ChainAliasEntry, ChainFamily, TokenBalances, WalletSnapshot,
    };

    #[test]
    fn test_intent_resolves_aliases_to_ids() {
        let chains = vec![
            ChainAliasEntry::new("ethereum", ChainFamily::Evm, &["ethereum", "eth"]),
            ChainAliasEntry::new("solana", ChainFamily::Solana, &["solana", "sol"]),
        ];
        let wallet = WalletSnapshot::default();
        let balances = TokenBalances::default();
        let recent = RecentSnapshot::default();
        let ctx = EngineContext {
            mode: BridgeMode::Token,
            chains: &chains,
            wallet: &wallet,
            balances: &balances,
            validators: AddressValidators {
                evm: address::evm_address_ok,
                base58: address::base58_address_ok,
            },
            recent: &recent,
        };

        let parsed = parse("bridge from ETH to sol, 10 USDC", BridgeMode::Token, &chains);
        let intent = BridgeIntent::from_parsed(&parsed, &ctx).unwrap();

        assert_eq!(intent.source_chain, "ethereum");
        assert_eq!(intent.target_chain, "solana");
        assert_eq!(intent.amount.as_deref(), Some("10"));
        assert_eq!(intent.symbol.as_deref(), Some("USDC"));
        assert_eq!(intent.raw, "bridge from ETH to sol, 10 USDC");
    }

    #[test]
    fn test_unresolvable_chain_is_an_error() {
        let chains = vec![ChainAliasEntry::new(
            "ethereum",
            ChainFamily::Evm,
            &["ethereum", "eth"],
        )];
        let wallet = WalletSnapshot::default();
        let balances = TokenBalances::default();
        let recent = RecentSnapshot::default();
        let ctx = EngineContext {
            mode: BridgeMode::Token,
            chains: &chains,
            wallet: &wallet,
            balances: &balances,
            validators: AddressValidators {
                evm: address::evm_address_ok,
                base58: address::base58_address_ok,
            },
            recent: &recent,
        };

        let parsed = parse("bridge from eth to mars, 1 ETH", BridgeMode::Token, &chains);
        assert!(BridgeIntent::from_parsed(&parsed, &ctx).is_err());
    }
}
