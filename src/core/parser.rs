use crate::core::chains;
use crate::core::types::{BridgeMode, ChainAliasEntry, ChainFamily, ParsedCommand};

/// Splits raw input into the flat `ParsedCommand` record. Pure function of
/// the string, the bridge mode and the (static) chain list; never panics,
/// absent input yields an all-`None` record.
pub fn parse(raw: &str, mode: BridgeMode, chains_list: &[ChainAliasEntry]) -> ParsedCommand {
    let mut parsed = ParsedCommand {
        unparsed_command: raw.to_string(),
        ..Default::default()
    };

    // First comma separates the route clause from the asset clause.
    let (route, asset) = match raw.split_once(',') {
        Some((route, asset)) => {
            parsed.fragment_splitter = Some(",".to_string());
            (route, Some(asset))
        }
        None => (raw, None),
    };

    // Up to five positional route tokens; extras are ignored.
    let mut tokens = route.split_whitespace();
    parsed.command = tokens.next().map(str::to_string);
    parsed.from_keyword = tokens.next().map(str::to_string);
    parsed.source_chain = tokens.next().map(str::to_string);
    parsed.to_keyword = tokens.next().map(str::to_string);
    parsed.target_chain = tokens.next().map(str::to_string);

    if let Some(asset) = asset {
        match mode {
            BridgeMode::Token => parse_token_asset(&mut parsed, asset),
            BridgeMode::Nft => parse_nft_asset(&mut parsed, asset, chains_list),
        }
    }

    parsed
}

fn parse_token_asset(parsed: &mut ParsedCommand, asset: &str) {
    let mut parts = asset.split_whitespace();
    parsed.amount = parts.next().map(str::to_string);

    if let Some(reference) = parts.next() {
        classify_reference(parsed, reference);
    }
}

fn parse_nft_asset(parsed: &mut ParsedCommand, asset: &str, chains_list: &[ChainAliasEntry]) {
    let (reference, token_id) = match asset.split_once('#') {
        Some((reference, id)) => (reference.trim(), Some(id.trim())),
        None => (asset.trim(), None),
    };

    let source_is_solana = parsed
        .source_chain
        .as_deref()
        .and_then(|name| chains::resolve_exact(name, chains_list))
        .map(|hit| hit.chain.family == ChainFamily::Solana)
        .unwrap_or(false);

    if source_is_solana {
        // This family encodes identity in the mint address: the reference is
        // always an address and the token id is forced out, even when the
        // text looks like a symbol.
        if !reference.is_empty() {
            parsed.contract_address = Some(reference.to_string());
        }
        return;
    }

    if !reference.is_empty() {
        classify_reference(parsed, reference);
    }
    parsed.token_id = token_id.filter(|id| !id.is_empty()).map(str::to_string);
}

fn classify_reference(parsed: &mut ParsedCommand, reference: &str) {
    // Substring, not prefix: the observed classifier treats anything
    // containing "0x" as an address.
    if reference.contains("0x") {
        parsed.contract_address = Some(reference.to_string());
    } else {
        parsed.symbol = Some(reference.to_string());
    }
}
