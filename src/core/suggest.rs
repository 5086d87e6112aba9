use log::debug;

use crate::core::chains;
use crate::core::parser;
use crate::core::recent::RecentToken;
use crate::core::types::{
    Action, ActionStyle, BridgeMode, ChainAliasEntry, ChainFamily, EngineContext, ParsedCommand,
    WalletConnection,
};
use crate::core::validate::{self, messages, PartialFlags};

pub const MAX_CHAIN_CANDIDATES: usize = 10;
pub const MAX_RECENT_COMMANDS: usize = 10;
pub const MAX_AMOUNT_CANDIDATES: usize = 10;

/// Everything a recomputation depends on, bundled per keystroke.
pub struct SuggestInput<'a> {
    pub raw: &'a str,
    pub parsed: &'a ParsedCommand,
    pub flags: &'a PartialFlags,
    /// Error reported by the external execution collaborator, if any.
    pub execution_error: Option<&'a str>,
    /// Host is busy submitting.
    pub processing: bool,
    pub ctx: &'a EngineContext<'a>,
}

/// One row of the decision table. The first rule whose predicate matches
/// produces the whole output; evaluation stops there.
struct Rule {
    name: &'static str,
    applies: fn(&SuggestInput) -> bool,
    produce: fn(&SuggestInput) -> Vec<Action>,
}

/// Ordered to mirror the final validator's precedence, with a
/// suggestion-only `to`-keyword row between source and target. The last row
/// always matches.
static RULES: &[Rule] = &[
    Rule { name: "execution-error", applies: execution_error_applies, produce: execution_error_produce },
    Rule { name: "processing", applies: processing_applies, produce: processing_produce },
    Rule { name: "empty-input", applies: empty_applies, produce: empty_produce },
    Rule { name: "command", applies: command_applies, produce: command_produce },
    Rule { name: "from-keyword", applies: from_applies, produce: from_produce },
    Rule { name: "source-chain", applies: source_applies, produce: source_produce },
    Rule { name: "to-keyword", applies: to_applies, produce: to_produce },
    Rule { name: "target-chain", applies: target_applies, produce: target_produce },
    Rule { name: "fragment-splitter", applies: fragment_applies, produce: fragment_produce },
    Rule { name: "amount", applies: amount_applies, produce: amount_produce },
    Rule { name: "asset", applies: asset_applies, produce: asset_produce },
    Rule { name: "token-id", applies: token_id_applies, produce: token_id_produce },
    Rule { name: "contract-address", applies: contract_applies, produce: contract_produce },
    Rule { name: "finish", applies: finish_applies, produce: finish_produce },
];

pub fn build_suggestions(input: &SuggestInput) -> Vec<Action> {
    for rule in RULES {
        if (rule.applies)(input) {
            debug!("suggestion rule '{}' matched for {:?}", rule.name, input.raw);
            return (rule.produce)(input);
        }
    }
    Vec::new()
}

/// Pure ranking over a fresh sequence: connected chain first, then recency
/// order, then catalog order. The allow-list itself is never reordered.
pub fn rank_chains<'a>(
    chains_list: &'a [ChainAliasEntry],
    recent_ids: &[String],
    connected: Option<&str>,
) -> Vec<&'a ChainAliasEntry> {
    let mut ranked: Vec<&ChainAliasEntry> = Vec::new();

    let push = |ranked: &mut Vec<&'a ChainAliasEntry>, entry: &'a ChainAliasEntry| {
        if !ranked.iter().any(|r| r.chain_id == entry.chain_id) {
            ranked.push(entry);
        }
    };

    if let Some(id) = connected {
        if let Some(entry) = chains_list.iter().find(|c| c.chain_id == id) {
            push(&mut ranked, entry);
        }
    }
    for id in recent_ids {
        if let Some(entry) = chains_list.iter().find(|c| &c.chain_id == id) {
            push(&mut ranked, entry);
        }
    }
    for entry in chains_list {
        push(&mut ranked, entry);
    }

    ranked
}

// ---- rule 1: externally reported execution error -------------------------

fn execution_error_applies(input: &SuggestInput) -> bool {
    input.execution_error.is_some()
}

fn execution_error_produce(input: &SuggestInput) -> Vec<Action> {
    let message = input.execution_error.unwrap_or_default();
    vec![Action::new("execution-error", message, ActionStyle::Error)]
}

// ---- rule 2: submission in flight ----------------------------------------

fn processing_applies(input: &SuggestInput) -> bool {
    input.processing
}

fn processing_produce(_input: &SuggestInput) -> Vec<Action> {
    vec![Action::new(
        "processing",
        "Submitting, hang tight...",
        ActionStyle::Info,
    )]
}

// ---- rule 3: nothing typed yet -------------------------------------------

fn empty_applies(input: &SuggestInput) -> bool {
    input.raw.trim().is_empty()
}

fn empty_produce(input: &SuggestInput) -> Vec<Action> {
    let format_hint = match input.ctx.mode {
        BridgeMode::Token => "Type: bridge from <chain> to <chain>, <amount> <token>",
        BridgeMode::Nft => "Type: bridge from <chain> to <chain>, <nft>#<token id>",
    };
    let mut actions = vec![Action::new("tip", format_hint, ActionStyle::Hint)];

    // Only history that would still submit cleanly today is offered back.
    let replayable: Vec<&String> = input
        .ctx
        .recent
        .commands
        .iter()
        .filter(|cmd| {
            let parsed = parser::parse(cmd, input.ctx.mode, input.ctx.chains);
            validate::validate_finalize(&parsed, input.ctx).all_valid()
        })
        .take(MAX_RECENT_COMMANDS)
        .collect();

    if !replayable.is_empty() {
        let children = replayable
            .iter()
            .enumerate()
            .map(|(i, cmd)| {
                Action::new(&format!("recent:{}", i), cmd, ActionStyle::Candidate)
                    .replaces(cmd.to_string())
            })
            .collect();
        actions.push(
            Action::new("recent", "Recently used", ActionStyle::Group).with_children(children),
        );
    }

    actions
}

// ---- rule 4a: command word -----------------------------------------------

fn command_applies(input: &SuggestInput) -> bool {
    input.parsed.command.is_none() || !input.flags.is_valid_command
}

fn command_produce(input: &SuggestInput) -> Vec<Action> {
    if input.parsed.command.is_some() && !input.flags.is_valid_command {
        return vec![Action::new("command-error", messages::COMMAND, ActionStyle::Error)];
    }
    vec![Action::new(
        "command:bridge",
        validate::COMMAND_KEYWORD,
        ActionStyle::Candidate,
    )
    .replaces(format!("{} ", validate::COMMAND_KEYWORD))]
}

// ---- rule 4b: 'from' keyword ---------------------------------------------

fn from_applies(input: &SuggestInput) -> bool {
    input.parsed.from_keyword.is_none() || !input.flags.is_valid_from_keyword
}

fn from_produce(input: &SuggestInput) -> Vec<Action> {
    if input.parsed.from_keyword.is_some() && !input.flags.is_valid_from_keyword {
        return vec![Action::new("from-error", messages::FROM_KEYWORD, ActionStyle::Error)];
    }
    let command = typed_command(input.parsed);
    vec![Action::new("keyword:from", "from", ActionStyle::Candidate)
        .replaces(format!("{} from ", command))]
}

// ---- rule 4c: source chain -----------------------------------------------

fn source_applies(input: &SuggestInput) -> bool {
    input.parsed.source_chain.is_none() || !input.flags.is_valid_source_chain
}

fn source_produce(input: &SuggestInput) -> Vec<Action> {
    let command = typed_command(input.parsed);
    let complete = |alias: &str| format!("{} from {} to ", command, alias);

    if let Some(name) = input.parsed.source_chain.as_deref() {
        // Typed but not resolvable: near-miss aliases become candidates, a
        // bare error only when nothing prefixes.
        let fuzzy = chains::resolve_fuzzy(name, input.ctx.chains);
        if fuzzy.is_empty() {
            return vec![Action::new("source-error", messages::SOURCE_CHAIN, ActionStyle::Error)];
        }
        return fuzzy
            .iter()
            .take(MAX_CHAIN_CANDIDATES)
            .enumerate()
            .map(|(i, hit)| {
                Action::new(
                    &format!("source:{}:{}", i, hit.alias),
                    hit.alias,
                    ActionStyle::Candidate,
                )
                .replaces(complete(hit.alias))
            })
            .collect();
    }

    ranked_chain_candidates(
        input,
        &input.ctx.recent.source_chains,
        "source",
        None,
        &complete,
    )
}

// ---- rule 4d: 'to' keyword (suggestion-level only) -----------------------

fn to_applies(input: &SuggestInput) -> bool {
    input.parsed.to_keyword.is_none() || !input.flags.is_valid_to_keyword
}

fn to_produce(input: &SuggestInput) -> Vec<Action> {
    if input.parsed.to_keyword.is_some() && !input.flags.is_valid_to_keyword {
        return vec![Action::new(
            "to-error",
            "Expected 'to' before the target chain",
            ActionStyle::Error,
        )];
    }
    let command = typed_command(input.parsed);
    let source = input.parsed.source_chain.as_deref().unwrap_or_default();
    vec![Action::new("keyword:to", "to", ActionStyle::Candidate)
        .replaces(format!("{} from {} to ", command, source))]
}

// ---- rule 4e: target chain -----------------------------------------------

fn target_applies(input: &SuggestInput) -> bool {
    input.parsed.target_chain.is_none() || !input.flags.is_valid_target_chain
}

fn target_produce(input: &SuggestInput) -> Vec<Action> {
    let command = typed_command(input.parsed);
    let source = input.parsed.source_chain.as_deref().unwrap_or_default().to_string();
    let complete = move |alias: &str| format!("{} from {} to {}, ", command, source, alias);

    let typed_source = input.parsed.source_chain.as_deref();
    let excluded = |alias: &str| {
        typed_source.map_or(false, |s| alias.eq_ignore_ascii_case(s))
    };

    if let Some(name) = input.parsed.target_chain.as_deref() {
        let fuzzy: Vec<_> = chains::resolve_fuzzy(name, input.ctx.chains)
            .into_iter()
            .filter(|hit| !excluded(hit.alias))
            .collect();
        if fuzzy.is_empty() {
            return vec![Action::new("target-error", messages::TARGET_CHAIN, ActionStyle::Error)];
        }
        return fuzzy
            .iter()
            .take(MAX_CHAIN_CANDIDATES)
            .enumerate()
            .map(|(i, hit)| {
                Action::new(
                    &format!("target:{}:{}", i, hit.alias),
                    hit.alias,
                    ActionStyle::Candidate,
                )
                .replaces(complete(hit.alias))
            })
            .collect();
    }

    ranked_chain_candidates(
        input,
        &input.ctx.recent.target_chains,
        "target",
        typed_source,
        &complete,
    )
}

// ---- rule 4f: comma between route and asset ------------------------------

fn fragment_applies(input: &SuggestInput) -> bool {
    input.parsed.fragment_splitter.is_none()
}

fn fragment_produce(input: &SuggestInput) -> Vec<Action> {
    vec![Action::new(
        "comma",
        "Add ',' before the asset",
        ActionStyle::Candidate,
    )
    .replaces(format!("{}, ", input.raw.trim_end()))]
}

// ---- rule 4g: amount (token mode) ----------------------------------------

fn amount_applies(input: &SuggestInput) -> bool {
    input.ctx.mode == BridgeMode::Token
        && (input.parsed.amount.is_none() || !input.flags.is_valid_amount)
}

fn amount_produce(input: &SuggestInput) -> Vec<Action> {
    if input.parsed.amount.is_some() && !input.flags.is_valid_amount {
        return vec![Action::new("amount-error", messages::AMOUNT, ActionStyle::Error)];
    }

    let route = route_text(input.parsed);
    let candidates: Vec<Action> = input
        .ctx
        .balances
        .tokens
        .iter()
        .filter(|token| token.ui_amount > 0.0)
        .filter_map(|token| token.symbol.as_deref().map(|s| (s, token.ui_amount)))
        .take(MAX_AMOUNT_CANDIDATES)
        .enumerate()
        .map(|(i, (symbol, ui_amount))| {
            let display = format!("{} {}", ui_amount, symbol);
            Action::new(&format!("amount:{}:{}", i, symbol), &display, ActionStyle::Candidate)
                .replaces(format!("{}, {} {}", route, ui_amount, symbol))
        })
        .collect();

    if candidates.is_empty() {
        return vec![Action::new(
            "amount-hint",
            "Enter an amount, e.g. 10 or 1.5",
            ActionStyle::Hint,
        )];
    }
    candidates
}

// ---- rule 4h: asset reference --------------------------------------------

fn asset_applies(input: &SuggestInput) -> bool {
    input.parsed.symbol.is_none() && input.parsed.contract_address.is_none()
}

fn asset_produce(input: &SuggestInput) -> Vec<Action> {
    let mut groups = Vec::new();

    // Group one: previously bridged tokens, identity is the full tuple.
    let recent: Vec<Action> = input
        .ctx
        .recent
        .tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let display = token_reference(token);
            Action::new(&format!("recent-token:{}", i), &display, ActionStyle::Candidate)
                .replaces(complete_asset(input, &token_reference(token)))
        })
        .collect();
    if !recent.is_empty() {
        groups.push(
            Action::new("recent-tokens", "Recently used", ActionStyle::Group)
                .with_children(recent),
        );
    }

    // Group two: wallet holdings, deduplicated by symbol, zero balances out.
    let mut seen: Vec<String> = Vec::new();
    let wallet: Vec<Action> = input
        .ctx
        .balances
        .tokens
        .iter()
        .filter(|token| token.ui_amount > 0.0)
        .filter_map(|token| {
            let key = token
                .symbol
                .clone()
                .unwrap_or_else(|| token.contract_address.clone())
                .to_ascii_lowercase();
            if seen.contains(&key) {
                return None;
            }
            seen.push(key);
            let label = token
                .symbol
                .clone()
                .unwrap_or_else(|| token.contract_address.clone());
            Some((label, token.ui_amount))
        })
        .enumerate()
        .map(|(i, (label, ui_amount))| {
            let display = format!("{} ({})", label, ui_amount);
            Action::new(&format!("wallet-token:{}", i), &display, ActionStyle::Candidate)
                .replaces(complete_asset(input, &label))
        })
        .collect();
    if !wallet.is_empty() {
        groups.push(
            Action::new("wallet-tokens", "In wallet", ActionStyle::Group).with_children(wallet),
        );
    }

    if groups.is_empty() {
        let hint = match input.ctx.mode {
            BridgeMode::Token => "Type a token symbol or contract address",
            BridgeMode::Nft => "Type an NFT symbol or contract address",
        };
        return vec![Action::new("asset-hint", hint, ActionStyle::Hint)];
    }
    groups
}

// ---- rule 4i: NFT token id -----------------------------------------------

fn token_id_applies(input: &SuggestInput) -> bool {
    if input.ctx.mode != BridgeMode::Nft || input.parsed.token_id.is_some() {
        return false;
    }
    source_family(input) == Some(ChainFamily::Evm)
}

fn token_id_produce(input: &SuggestInput) -> Vec<Action> {
    vec![Action::new(
        "token-id",
        "Append #<token id>",
        ActionStyle::Candidate,
    )
    .replaces(format!("{}#", input.raw.trim_end()))]
}

// ---- rule 4j: contract address -------------------------------------------

fn contract_applies(input: &SuggestInput) -> bool {
    input.parsed.contract_address.is_some() && !input.flags.is_valid_contract_address
}

fn contract_produce(_input: &SuggestInput) -> Vec<Action> {
    vec![Action::new(
        "contract-error",
        messages::CONTRACT_ADDRESS,
        ActionStyle::Error,
    )]
}

// ---- rule 5: terminal call-to-action -------------------------------------

fn finish_applies(_input: &SuggestInput) -> bool {
    true
}

fn finish_produce(input: &SuggestInput) -> Vec<Action> {
    let wallet = input.ctx.wallet;
    let source_id = input
        .parsed
        .source_chain
        .as_deref()
        .and_then(|name| chains::resolve_exact(name, input.ctx.chains))
        .map(|hit| {
            debug!("source '{}' resolved via alias '{}'", hit.chain.chain_id, hit.alias);
            hit.chain.chain_id.clone()
        });

    let display = match wallet.connection {
        WalletConnection::Disconnected | WalletConnection::Connecting => {
            "Connect wallet to continue".to_string()
        }
        WalletConnection::Connected => match (&wallet.chain_id, &source_id) {
            (Some(connected), Some(source)) if connected != source => {
                format!("Switch wallet to {} and submit", source)
            }
            (None, Some(source)) => format!("Switch wallet to {} and submit", source),
            _ => "Confirm and submit".to_string(),
        },
    };

    vec![Action::new("finish", &display, ActionStyle::Submit).finishes()]
}

// ---- shared producers ----------------------------------------------------

fn ranked_chain_candidates(
    input: &SuggestInput,
    recent_ids: &[String],
    key_prefix: &str,
    excluded_alias: Option<&str>,
    complete: &dyn Fn(&str) -> String,
) -> Vec<Action> {
    let connected = match input.ctx.wallet.connection {
        WalletConnection::Connected => input.ctx.wallet.chain_id.as_deref(),
        _ => None,
    };

    rank_chains(input.ctx.chains, recent_ids, connected)
        .into_iter()
        .filter(|entry| {
            excluded_alias.map_or(true, |ex| {
                !entry.aliases.iter().any(|a| a.eq_ignore_ascii_case(ex))
            })
        })
        .take(MAX_CHAIN_CANDIDATES)
        .enumerate()
        .map(|(i, entry)| {
            let alias = entry.primary_alias();
            Action::new(
                &format!("{}:{}:{}", key_prefix, i, entry.chain_id),
                alias,
                ActionStyle::Candidate,
            )
            .replaces(complete(alias))
        })
        .collect()
}

fn typed_command(parsed: &ParsedCommand) -> &str {
    parsed.command.as_deref().unwrap_or(validate::COMMAND_KEYWORD)
}

/// Canonical route clause rebuilt from the typed chains. Only called once
/// both chains are present and valid.
fn route_text(parsed: &ParsedCommand) -> String {
    format!(
        "{} from {} to {}",
        typed_command(parsed),
        parsed.source_chain.as_deref().unwrap_or_default(),
        parsed.target_chain.as_deref().unwrap_or_default(),
    )
}

fn complete_asset(input: &SuggestInput, reference: &str) -> String {
    let route = route_text(input.parsed);
    match input.ctx.mode {
        BridgeMode::Token => {
            let amount = input.parsed.amount.as_deref().unwrap_or_default();
            format!("{}, {} {}", route, amount, reference)
        }
        BridgeMode::Nft => format!("{}, {}", route, reference),
    }
}

fn token_reference(token: &RecentToken) -> String {
    let base = token.display();
    match &token.token_id {
        Some(id) => format!("{}#{}", base, id),
        None => base,
    }
}

fn source_family(input: &SuggestInput) -> Option<ChainFamily> {
    input
        .parsed
        .source_chain
        .as_deref()
        .and_then(|name| chains::resolve_exact(name, input.ctx.chains))
        .map(|hit| hit.chain.family)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address;
    use crate::core::recent::RecentSnapshot;
    use crate::core::types::{
        ActionEffect, AddressValidators, TokenBalance, TokenBalances, WalletSnapshot,
    };
    use crate::core::validate::validate_partial;

    struct Fixture {
        mode: BridgeMode,
        chains: Vec<ChainAliasEntry>,
        wallet: WalletSnapshot,
        balances: TokenBalances,
        recent: RecentSnapshot,
        execution_error: Option<String>,
        processing: bool,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                mode: BridgeMode::Token,
                chains: vec![
                    ChainAliasEntry::new("ethereum", ChainFamily::Evm, &["ethereum", "eth"]),
                    ChainAliasEntry::new("polygon", ChainFamily::Evm, &["polygon", "matic"]),
                    ChainAliasEntry::new("avalanche", ChainFamily::Evm, &["avalanche", "avax"]),
                    ChainAliasEntry::new("solana", ChainFamily::Solana, &["solana", "sol"]),
                ],
                wallet: WalletSnapshot::default(),
                balances: TokenBalances::default(),
                recent: RecentSnapshot::default(),
                execution_error: None,
                processing: false,
            }
        }

        fn suggest(&self, raw: &str) -> Vec<Action> {
            let ctx = EngineContext {
                mode: self.mode,
                chains: &self.chains,
                wallet: &self.wallet,
                balances: &self.balances,
                validators: AddressValidators {
                    evm: address::evm_address_ok,
                    base58: address::base58_address_ok,
                },
                recent: &self.recent,
            };
            let parsed = crate::core::parser::parse(raw, self.mode, ctx.chains);
            let flags = validate_partial(&parsed, &ctx);
            build_suggestions(&SuggestInput {
                raw,
                parsed: &parsed,
                flags: &flags,
                execution_error: self.execution_error.as_deref(),
                processing: self.processing,
                ctx: &ctx,
            })
        }
    }

    fn replacements(actions: &[Action]) -> Vec<String> {
        let mut out = Vec::new();
        for action in actions {
            if let Some(ActionEffect::Replace(text)) = &action.effect {
                out.push(text.clone());
            }
            for child in &action.children {
                if let Some(ActionEffect::Replace(text)) = &child.effect {
                    out.push(text.clone());
                }
            }
        }
        out
    }

    #[test]
    fn test_execution_error_wins_over_everything() {
        let mut fixture = Fixture::new();
        fixture.execution_error = Some("Token not found in wallet".to_string());
        fixture.processing = true;

        let actions = fixture.suggest("bridge from eth");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].style, ActionStyle::Error);
        assert_eq!(actions[0].display, "Token not found in wallet");
    }

    #[test]
    fn test_processing_is_a_single_childless_action() {
        let mut fixture = Fixture::new();
        fixture.processing = true;

        let actions = fixture.suggest("bridge from eth to solana, 1 ETH");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].style, ActionStyle::Info);
        assert!(actions[0].children.is_empty());
    }

    #[test]
    fn test_empty_input_without_history_is_just_the_tip() {
        let fixture = Fixture::new();
        let actions = fixture.suggest("");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].key, "tip");
        assert_eq!(actions[0].style, ActionStyle::Hint);
    }

    #[test]
    fn test_empty_input_offers_still_valid_history() {
        let mut fixture = Fixture::new();
        fixture.recent.commands = vec![
            "bridge from eth to solana, 1 ETH".to_string(),
            "bridge from eth to nowhere, 1 ETH".to_string(),
        ];

        let actions = fixture.suggest("  ");
        assert_eq!(actions.len(), 2);
        let group = &actions[1];
        assert_eq!(group.display, "Recently used");
        assert_eq!(group.children.len(), 1);
        assert_eq!(
            group.children[0].effect,
            Some(ActionEffect::Replace("bridge from eth to solana, 1 ETH".to_string()))
        );
    }

    #[test]
    fn test_source_chain_candidates_rank_connected_then_recent() {
        let mut fixture = Fixture::new();
        fixture.wallet.connection = WalletConnection::Connected;
        fixture.wallet.chain_id = Some("solana".to_string());
        fixture.recent.source_chains = vec!["avalanche".to_string()];

        let actions = fixture.suggest("bridge from ");
        let displays: Vec<&str> = actions.iter().map(|a| a.display.as_str()).collect();
        assert_eq!(displays, vec!["solana", "avalanche", "ethereum", "polygon"]);
    }

    #[test]
    fn test_chain_candidates_are_capped() {
        let mut fixture = Fixture::new();
        fixture.chains = (0..15)
            .map(|i| ChainAliasEntry {
                chain_id: format!("chain{}", i),
                family: ChainFamily::Evm,
                aliases: vec![format!("chain{}", i)],
            })
            .collect();

        let actions = fixture.suggest("bridge from ");
        assert_eq!(actions.len(), MAX_CHAIN_CANDIDATES);
    }

    #[test]
    fn test_typed_chain_prefix_yields_fuzzy_candidates() {
        let fixture = Fixture::new();
        let actions = fixture.suggest("bridge from et");
        let displays: Vec<&str> = actions.iter().map(|a| a.display.as_str()).collect();
        assert_eq!(displays, vec!["ethereum", "eth"]);
    }

    #[test]
    fn test_typed_chain_with_no_prefix_match_is_an_error() {
        let fixture = Fixture::new();
        let actions = fixture.suggest("bridge from xyz");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].style, ActionStyle::Error);
    }

    #[test]
    fn test_target_candidates_exclude_the_typed_source_alias() {
        let fixture = Fixture::new();
        let actions = fixture.suggest("bridge from eth to ");
        for action in &actions {
            assert_ne!(action.display, "ethereum");
            assert_ne!(action.display, "eth");
        }
    }

    #[test]
    fn test_amount_candidates_come_from_nonzero_balances() {
        let mut fixture = Fixture::new();
        fixture.balances.tokens = vec![
            TokenBalance {
                symbol: Some("ETH".to_string()),
                contract_address: "native".to_string(),
                token_id: None,
                ui_amount: 1.25,
            },
            TokenBalance {
                symbol: Some("USDC".to_string()),
                contract_address: "0xa0b8".to_string(),
                token_id: None,
                ui_amount: 0.0,
            },
        ];

        let actions = fixture.suggest("bridge from eth to solana, ");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].display, "1.25 ETH");
    }

    #[test]
    fn test_asset_rule_builds_two_labeled_groups() {
        let mut fixture = Fixture::new();
        fixture.recent.tokens = vec![crate::core::recent::RecentToken {
            symbol: Some("WETH".to_string()),
            contract_address: None,
            token_id: None,
        }];
        fixture.balances.tokens = vec![
            TokenBalance {
                symbol: Some("USDC".to_string()),
                contract_address: "0xa0b8".to_string(),
                token_id: None,
                ui_amount: 512.0,
            },
            TokenBalance {
                symbol: Some("USDC".to_string()),
                contract_address: "0x2791".to_string(),
                token_id: None,
                ui_amount: 3.0,
            },
        ];

        let actions = fixture.suggest("bridge from eth to solana, 10 ");
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].display, "Recently used");
        assert_eq!(actions[0].children.len(), 1);
        assert_eq!(actions[1].display, "In wallet");
        // Wallet group is deduplicated by symbol.
        assert_eq!(actions[1].children.len(), 1);
    }

    #[test]
    fn test_nft_token_id_hint_on_evm_source_only() {
        let mut fixture = Fixture::new();
        fixture.mode = BridgeMode::Nft;

        let actions = fixture.suggest("bridge from eth to solana, CoolCats");
        assert_eq!(actions[0].key, "token-id");

        let mint = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";
        let actions = fixture.suggest(&format!("bridge from solana to ethereum, {}", mint));
        assert_eq!(actions[0].key, "finish");
    }

    #[test]
    fn test_terminal_action_branches_on_wallet_state() {
        let mut fixture = Fixture::new();

        let actions = fixture.suggest("bridge from eth to solana, 1 ETH");
        assert_eq!(actions[0].display, "Connect wallet to continue");
        assert_eq!(actions[0].effect, Some(ActionEffect::Finish));

        fixture.wallet.connection = WalletConnection::Connected;
        fixture.wallet.chain_id = Some("polygon".to_string());
        let actions = fixture.suggest("bridge from eth to solana, 1 ETH");
        assert_eq!(actions[0].display, "Switch wallet to ethereum and submit");

        fixture.wallet.chain_id = Some("ethereum".to_string());
        let actions = fixture.suggest("bridge from eth to solana, 1 ETH");
        assert_eq!(actions[0].display, "Confirm and submit");
        assert_eq!(actions[0].effect, Some(ActionEffect::Finish));
    }

    #[test]
    fn test_candidates_always_re_parse_cleanly() {
        let mut fixture = Fixture::new();
        fixture.recent.source_chains = vec!["polygon".to_string()];
        fixture.balances.tokens = vec![TokenBalance {
            symbol: Some("ETH".to_string()),
            contract_address: "native".to_string(),
            token_id: None,
            ui_amount: 2.5,
        }];

        let inputs = [
            "",
            "b",
            "bridge ",
            "bridge from ",
            "bridge from et",
            "bridge from eth ",
            "bridge from eth to ",
            "bridge from eth to sol",
            "bridge from eth to solana",
            "bridge from eth to solana, ",
            "bridge from eth to solana, 2.5 ",
        ];

        let ctx_chains = fixture.chains.clone();
        for raw in inputs {
            for text in replacements(&fixture.suggest(raw)) {
                let ctx = EngineContext {
                    mode: fixture.mode,
                    chains: &ctx_chains,
                    wallet: &fixture.wallet,
                    balances: &fixture.balances,
                    validators: AddressValidators {
                        evm: address::evm_address_ok,
                        base58: address::base58_address_ok,
                    },
                    recent: &fixture.recent,
                };
                let parsed = crate::core::parser::parse(&text, fixture.mode, ctx.chains);
                let flags = validate_partial(&parsed, &ctx);
                assert!(flags.all_valid(), "candidate {:?} re-parses invalid", text);
            }
        }
    }
}
