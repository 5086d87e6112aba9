use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::chains::{self, ExactMatch};
use crate::core::types::{BridgeMode, ChainFamily, EngineContext, ParsedCommand};

pub const COMMAND_KEYWORD: &str = "bridge";
pub const FROM_KEYWORD: &str = "from";
pub const TO_KEYWORD: &str = "to";

static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9.]+$").expect("amount pattern compiles"));

/// One fixed message per final flag, surfaced in precedence order.
pub mod messages {
    pub const COMMAND: &str = "Unknown command: commands start with 'bridge'";
    pub const FROM_KEYWORD: &str = "Expected 'from' after the command";
    pub const SOURCE_CHAIN: &str = "Source chain is missing or not supported";
    pub const TARGET_CHAIN: &str =
        "Target chain is missing, not supported, or the same as the source";
    pub const FRAGMENT_SPLITTER: &str = "Missing ',' between the route and the asset";
    pub const AMOUNT: &str = "Amount must contain only digits and '.'";
    pub const SYMBOL: &str = "A token symbol or contract address is required";
    pub const TOKEN_ID: &str = "A token id is required, e.g. 'CoolCats#42'";
    pub const CONTRACT_ADDRESS: &str = "Contract address is not valid for the source chain";
}

/// Permissive per-field verdicts used while typing: a flag is valid whenever
/// its field is still absent, so the user is never shown premature errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialFlags {
    pub is_valid_command: bool,
    pub is_valid_from_keyword: bool,
    pub is_valid_source_chain: bool,
    pub is_valid_to_keyword: bool,
    pub is_valid_target_chain: bool,
    pub is_valid_amount: bool,
    pub is_valid_contract_address: bool,
}

impl PartialFlags {
    pub fn all_valid(&self) -> bool {
        self.is_valid_command
            && self.is_valid_from_keyword
            && self.is_valid_source_chain
            && self.is_valid_to_keyword
            && self.is_valid_target_chain
            && self.is_valid_amount
            && self.is_valid_contract_address
    }
}

/// Strict verdicts used on submit: required fields fail when absent. A
/// missing or wrong `to` keyword folds into the target-chain flag, which is
/// the slot the public precedence list gives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalFlags {
    pub is_valid_command: bool,
    pub is_valid_from_keyword: bool,
    pub is_valid_source_chain: bool,
    pub is_valid_target_chain: bool,
    pub is_valid_fragment_splitter: bool,
    pub is_valid_amount: bool,
    pub is_valid_symbol: bool,
    pub is_valid_token_id: bool,
    pub is_valid_contract_address: bool,
}

impl FinalFlags {
    /// The fixed precedence contract: exactly one message ever surfaces for
    /// an invalid input, chosen by this order.
    pub fn first_error(&self) -> Option<&'static str> {
        let checks = [
            (self.is_valid_command, messages::COMMAND),
            (self.is_valid_from_keyword, messages::FROM_KEYWORD),
            (self.is_valid_source_chain, messages::SOURCE_CHAIN),
            (self.is_valid_target_chain, messages::TARGET_CHAIN),
            (self.is_valid_fragment_splitter, messages::FRAGMENT_SPLITTER),
            (self.is_valid_amount, messages::AMOUNT),
            (self.is_valid_symbol, messages::SYMBOL),
            (self.is_valid_token_id, messages::TOKEN_ID),
            (self.is_valid_contract_address, messages::CONTRACT_ADDRESS),
        ];

        checks.iter().find(|(ok, _)| !ok).map(|(_, message)| *message)
    }

    pub fn all_valid(&self) -> bool {
        self.first_error().is_none()
    }
}

pub fn validate_partial(parsed: &ParsedCommand, ctx: &EngineContext) -> PartialFlags {
    let source_hit = parsed
        .source_chain
        .as_deref()
        .and_then(|name| chains::resolve_exact(name, ctx.chains));

    PartialFlags {
        is_valid_command: check_optional(&parsed.command, |c| {
            is_keyword_prefix(c, COMMAND_KEYWORD)
        }),
        is_valid_from_keyword: check_optional(&parsed.from_keyword, |k| {
            is_keyword_prefix(k, FROM_KEYWORD)
        }),
        is_valid_source_chain: check_optional(&parsed.source_chain, |name| {
            chains::resolve_exact(name, ctx.chains).is_some()
        }),
        is_valid_to_keyword: check_optional(&parsed.to_keyword, |k| {
            is_keyword_prefix(k, TO_KEYWORD)
        }),
        is_valid_target_chain: check_optional(&parsed.target_chain, |name| {
            target_chain_ok(name, parsed.source_chain.as_deref(), ctx)
        }),
        is_valid_amount: check_optional(&parsed.amount, |a| AMOUNT_PATTERN.is_match(a)),
        is_valid_contract_address: check_optional(&parsed.contract_address, |address| {
            address_ok(address, source_hit.as_ref(), ctx)
        }),
    }
}

pub fn validate_finalize(parsed: &ParsedCommand, ctx: &EngineContext) -> FinalFlags {
    let partial = validate_partial(parsed, ctx);
    let source_family = parsed
        .source_chain
        .as_deref()
        .and_then(|name| chains::resolve_exact(name, ctx.chains))
        .map(|hit| hit.chain.family);

    FinalFlags {
        is_valid_command: parsed.command.is_some() && partial.is_valid_command,
        is_valid_from_keyword: parsed.from_keyword.is_some() && partial.is_valid_from_keyword,
        is_valid_source_chain: parsed.source_chain.is_some() && partial.is_valid_source_chain,
        is_valid_target_chain: parsed.to_keyword.is_some()
            && partial.is_valid_to_keyword
            && parsed.target_chain.is_some()
            && partial.is_valid_target_chain,
        is_valid_fragment_splitter: parsed.fragment_splitter.as_deref() == Some(","),
        // The NFT grammar has no amount slot, so the requirement binds in
        // token mode only.
        is_valid_amount: match ctx.mode {
            BridgeMode::Token => parsed.amount.is_some() && partial.is_valid_amount,
            BridgeMode::Nft => partial.is_valid_amount,
        },
        is_valid_symbol: parsed.symbol.is_some() || parsed.contract_address.is_some(),
        is_valid_token_id: token_id_ok(parsed, ctx.mode, source_family),
        is_valid_contract_address: partial.is_valid_contract_address,
    }
}

fn check_optional(field: &Option<String>, check: impl Fn(&str) -> bool) -> bool {
    field.as_deref().map_or(true, check)
}

fn is_keyword_prefix(field: &str, keyword: &str) -> bool {
    keyword
        .to_ascii_lowercase()
        .starts_with(&field.to_ascii_lowercase())
}

fn target_chain_ok(target: &str, source: Option<&str>, ctx: &EngineContext) -> bool {
    // The typed alias strings are compared, not resolved ids: only a target
    // literally equal to the source alias is rejected here.
    if let Some(source) = source {
        if target.eq_ignore_ascii_case(source) {
            return false;
        }
    }
    chains::resolve_exact(target, ctx.chains).is_some()
}

fn address_ok(address: &str, source_hit: Option<&ExactMatch>, ctx: &EngineContext) -> bool {
    match source_hit {
        // No resolved source chain means no family to check against yet.
        None => true,
        Some(hit) => match hit.chain.family {
            ChainFamily::Evm => (ctx.validators.evm)(address),
            ChainFamily::Solana => (ctx.validators.base58)(address),
        },
    }
}

fn token_id_ok(parsed: &ParsedCommand, mode: BridgeMode, family: Option<ChainFamily>) -> bool {
    // Required only in NFT mode when the source resolves to a non-Solana
    // chain; Solana mints carry no decimal token id.
    match (mode, family) {
        (BridgeMode::Nft, Some(ChainFamily::Evm)) => parsed.token_id.is_some(),
        _ => true,
    }
}
