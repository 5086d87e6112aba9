use serde::{Serialize, Deserialize};

use crate::core::recent::RecentSnapshot;

/// Which grammar variant the asset clause uses, and which chain allow-list
/// applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeMode {
    Token,
    Nft,
}

impl BridgeMode {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeMode::Token => "token",
            BridgeMode::Nft => "nft",
        }
    }
}

/// Chain family selects the address predicate and the NFT field semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainFamily {
    Evm,
    Solana,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainAliasEntry {
    pub chain_id: String,
    pub family: ChainFamily,
    /// Non-empty, ordered; the first alias is the display name.
    pub aliases: Vec<String>,
}

impl ChainAliasEntry {
    pub fn new(chain_id: &str, family: ChainFamily, aliases: &[&str]) -> Self {
        Self {
            chain_id: chain_id.to_string(),
            family,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn primary_alias(&self) -> &str {
        self.aliases.first().map(|a| a.as_str()).unwrap_or(&self.chain_id)
    }
}

/// Flat record produced by the tokenizer. Every field except
/// `unparsed_command` is derived and optional; re-parsing
/// `unparsed_command` reproduces the same record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedCommand {
    pub unparsed_command: String,
    pub command: Option<String>,
    pub from_keyword: Option<String>,
    pub source_chain: Option<String>,
    pub to_keyword: Option<String>,
    pub target_chain: Option<String>,
    pub fragment_splitter: Option<String>,
    pub symbol: Option<String>,
    pub amount: Option<String>,
    pub contract_address: Option<String>,
    pub token_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStyle {
    Error,
    Info,
    Hint,
    Group,
    Candidate,
    Submit,
}

/// What activating an action does. Data instead of a closure so suggestion
/// trees stay inspectable in tests.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEffect {
    /// Re-inject this string as the new raw input.
    Replace(String),
    /// Run the submit path on the current input.
    Finish,
}

/// One node of the suggestion tree, depth at most 2. `key` is unique among
/// siblings and used for identity only, never ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub key: String,
    pub display: String,
    pub style: ActionStyle,
    pub effect: Option<ActionEffect>,
    pub children: Vec<Action>,
}

impl Action {
    pub fn new(key: &str, display: &str, style: ActionStyle) -> Self {
        Self {
            key: key.to_string(),
            display: display.to_string(),
            style,
            effect: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Action>) -> Self {
        self.children = children;
        self
    }

    pub fn replaces(mut self, text: String) -> Self {
        self.effect = Some(ActionEffect::Replace(text));
        self
    }

    pub fn finishes(mut self) -> Self {
        self.effect = Some(ActionEffect::Finish);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletConnection {
    Disconnected,
    #[allow(dead_code)]
    Connecting,
    Connected,
}

/// Read-only wallet snapshot supplied by the host on every recomputation.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSnapshot {
    pub connection: WalletConnection,
    pub address: Option<String>,
    pub chain_id: Option<String>,
    pub error: Option<String>,
}

impl Default for WalletSnapshot {
    fn default() -> Self {
        Self {
            connection: WalletConnection::Disconnected,
            address: None,
            chain_id: None,
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenBalance {
    pub symbol: Option<String>,
    pub contract_address: String,
    pub token_id: Option<String>,
    pub ui_amount: f64,
}

/// Merged (cached + remote) balance snapshot; merging happens on the host
/// side before the engine sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TokenBalances {
    pub tokens: Vec<TokenBalance>,
    pub loading: bool,
    pub error: Option<String>,
}

pub type AddressPredicate = fn(&str) -> bool;

/// Host-supplied pure syntax predicates, one per chain family.
#[derive(Clone, Copy)]
pub struct AddressValidators {
    pub evm: AddressPredicate,
    pub base58: AddressPredicate,
}

/// The one immutable context value every engine function receives by
/// argument, never read from ambient scope. `chains` is already scoped to
/// the current mode's allow-list.
#[derive(Clone, Copy)]
pub struct EngineContext<'a> {
    pub mode: BridgeMode,
    pub chains: &'a [ChainAliasEntry],
    pub wallet: &'a WalletSnapshot,
    pub balances: &'a TokenBalances,
    pub validators: AddressValidators,
    pub recent: &'a RecentSnapshot,
}
