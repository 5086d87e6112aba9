mod address;
mod core;
mod output;
mod repl;

use crate::core::intent::BridgeIntent;
use crate::core::parser;
use crate::core::recent::{RecencyManager, RecentSnapshot, RecentToken};
use crate::core::store::{FileStore, KvStore, MemoryStore};
use crate::core::suggest::{build_suggestions, SuggestInput};
use crate::core::types::{
    AddressValidators, BridgeMode, ChainAliasEntry, ChainFamily, EngineContext, ParsedCommand,
    TokenBalance, TokenBalances, WalletConnection, WalletSnapshot,
};
use crate::core::validate::{validate_finalize, validate_partial};
use crate::core::chains;
use crate::output::Printer;
use crate::repl::Repl;

fn main() {
    env_logger::init();

    // Ctrl+C clears the line instead of killing the process.
    ctrlc::set_handler(|| {}).expect("Error setting Ctrl-C handler");

    match FileStore::open() {
        Ok(store) => run(RecencyManager::new(store)),
        Err(e) => {
            let printer = Printer::new();
            printer.warning(&format!("Recent history unavailable: {}", e));
            run(RecencyManager::new(MemoryStore::new()));
        }
    }
}

/// Mutable host-side state: everything the engine itself refuses to own.
struct Session {
    mode: BridgeMode,
    wallet: WalletSnapshot,
    balances: TokenBalances,
    current_input: String,
    execution_error: Option<String>,
    processing: bool,
}

impl Session {
    fn new() -> Self {
        Self {
            mode: BridgeMode::Token,
            wallet: WalletSnapshot::default(),
            balances: demo_balances(),
            current_input: String::new(),
            execution_error: None,
            processing: false,
        }
    }
}

fn run<S: KvStore>(mut recency: RecencyManager<S>) {
    let mut repl = match Repl::new() {
        Ok(repl) => repl,
        Err(e) => {
            let printer = Printer::new();
            printer.error(&e);
            std::process::exit(1);
        }
    };

    let catalog = chain_catalog();
    let token_chains = token_bridge_chains(&catalog);
    let nft_chains = nft_bridge_chains(&catalog);

    show_ferry_logo(repl.printer());
    println!("Type a bridge command, ':help' for session commands, 'exit' to quit.");
    println!();

    let mut session = Session::new();

    loop {
        let line = match repl.read_line("ferry> ") {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                repl.printer().error(&format!("Input error: {}", e));
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed == "exit" || trimmed == "quit" {
            break;
        }
        if trimmed == "help" || trimmed == ":help" {
            print_help(repl.printer());
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix(':') {
            let allow_list = mode_chains(session.mode, &token_chains, &nft_chains);
            handle_meta(
                rest,
                &mut session,
                &mut recency,
                &catalog,
                allow_list,
                repl.printer(),
            );
            continue;
        }

        // Fresh keystroke: the previous submission error is consumed.
        session.current_input = line;
        session.execution_error = None;

        let allow_list = mode_chains(session.mode, &token_chains, &nft_chains);
        let snapshot = recency.snapshot();
        render_suggestions(&session, allow_list, &snapshot, repl.printer());
    }

    if let Err(e) = repl.save_history() {
        repl.printer().warning(&e);
    }
}

fn render_suggestions(
    session: &Session,
    allow_list: &[ChainAliasEntry],
    snapshot: &RecentSnapshot,
    printer: &Printer,
) {
    let ctx = engine_ctx(session, allow_list, snapshot);
    let parsed = parser::parse(&session.current_input, session.mode, allow_list);
    let flags = validate_partial(&parsed, &ctx);

    let actions = build_suggestions(&SuggestInput {
        raw: &session.current_input,
        parsed: &parsed,
        flags: &flags,
        execution_error: session.execution_error.as_deref(),
        processing: session.processing,
        ctx: &ctx,
    });

    printer.render_actions(&actions);
}

fn handle_meta<S: KvStore>(
    command: &str,
    session: &mut Session,
    recency: &mut RecencyManager<S>,
    catalog: &[ChainAliasEntry],
    allow_list: &[ChainAliasEntry],
    printer: &Printer,
) {
    let mut parts = command.split_whitespace();
    match parts.next().unwrap_or_default() {
        "connect" => {
            session.wallet.connection = WalletConnection::Connected;
            session.wallet.address = Some("0xFe71ab1e0f7e58A3eD4e7a".to_string());
            if session.wallet.chain_id.is_none() {
                session.wallet.chain_id = Some("ethereum".to_string());
            }
            printer.success("Wallet connected");
        }
        "disconnect" => {
            session.wallet = WalletSnapshot::default();
            printer.info("Wallet disconnected");
        }
        "network" => match parts.next() {
            Some(name) => match chains::resolve_exact(name, catalog) {
                Some(hit) => {
                    session.wallet.chain_id = Some(hit.chain.chain_id.clone());
                    printer.success(&format!("Wallet network set to {}", hit.chain.chain_id));
                }
                None => printer.error(&format!("Unknown chain: {}", name)),
            },
            None => printer.error("Usage: :network <chain>"),
        },
        "mode" => {
            match parts.next() {
                Some("token") => session.mode = BridgeMode::Token,
                Some("nft") => session.mode = BridgeMode::Nft,
                _ => {
                    printer.error("Usage: :mode token|nft");
                    return;
                }
            }
            printer.success(&format!("Bridge mode: {}", session.mode.name()));
        }
        "balances" => {
            printer.header("Wallet balances");
            if session.balances.loading {
                printer.info("Balances are still loading");
            }
            if let Some(err) = &session.balances.error {
                printer.warning(err);
            }
            for token in &session.balances.tokens {
                let label = token.symbol.as_deref().unwrap_or(&token.contract_address);
                printer.print_key_value(label, &token.ui_amount.to_string(), 2);
            }
        }
        "recent" => {
            let snapshot = recency.snapshot();
            printer.header("Recent history");
            printer.print_key_value("commands", &snapshot.commands.join(" | "), 2);
            printer.print_key_value("source chains", &snapshot.source_chains.join(", "), 2);
            printer.print_key_value("target chains", &snapshot.target_chains.join(", "), 2);
            let tokens: Vec<String> = snapshot.tokens.iter().map(|t| t.display()).collect();
            printer.print_key_value("tokens", &tokens.join(", "), 2);
        }
        "submit" => submit(session, recency, allow_list, printer),
        other => printer.error(&format!("Unknown session command: :{}", other)),
    }
}

/// The explicit "finish" event: strict validation, then the post-resolution
/// wallet check, then hand-off and recency writes.
fn submit<S: KvStore>(
    session: &mut Session,
    recency: &mut RecencyManager<S>,
    allow_list: &[ChainAliasEntry],
    printer: &Printer,
) {
    if session.current_input.trim().is_empty() {
        printer.warning("Nothing to submit: type a bridge command first");
        return;
    }
    if session.wallet.connection != WalletConnection::Connected {
        printer.warning("Connect the wallet first (:connect)");
        return;
    }
    if let Some(err) = &session.wallet.error {
        printer.warning(&format!("Wallet reported an error: {}", err));
    }

    let snapshot = recency.snapshot();
    let raw = session.current_input.clone();
    let parsed = parser::parse(&raw, session.mode, allow_list);

    let ctx = engine_ctx(session, allow_list, &snapshot);
    if let Some(message) = validate_finalize(&parsed, &ctx).first_error() {
        printer.error(message);
        return;
    }

    let intent = match BridgeIntent::from_parsed(&parsed, &ctx) {
        Ok(intent) => intent,
        Err(e) => {
            printer.error(&e);
            return;
        }
    };

    // Post-resolution data error: a well-formed reference that matches
    // nothing in the wallet set clears the whole in-progress submission and
    // is reported separately from parse-time errors.
    if !wallet_has_token(&parsed, &session.balances) {
        let reference = parsed
            .symbol
            .clone()
            .or_else(|| parsed.contract_address.clone())
            .unwrap_or_default();
        let message = format!("Token '{}' not found in wallet", reference);
        printer.error(&message);
        session.execution_error = Some(message);
        session.processing = false;
        session.current_input.clear();
        return;
    }

    printer.success("Bridge intent handed to the execution collaborator");
    match serde_json::to_string_pretty(&intent) {
        Ok(json) => println!("{}", json),
        Err(e) => printer.warning(&format!("Could not render intent: {}", e)),
    }

    record_success(recency, &parsed, &intent, printer);
    session.current_input.clear();
    session.execution_error = None;
}

fn record_success<S: KvStore>(
    recency: &mut RecencyManager<S>,
    parsed: &ParsedCommand,
    intent: &BridgeIntent,
    printer: &Printer,
) {
    let writes = [
        recency.record_command(&parsed.unparsed_command),
        recency.record_source_chain(&intent.source_chain),
        recency.record_target_chain(&intent.target_chain),
        recency.record_token(RecentToken {
            symbol: parsed.symbol.clone(),
            contract_address: parsed.contract_address.clone(),
            token_id: parsed.token_id.clone(),
        }),
    ];
    for result in writes {
        if let Err(e) = result {
            printer.warning(&format!("Could not update recent history: {}", e));
        }
    }
}

fn wallet_has_token(parsed: &ParsedCommand, balances: &TokenBalances) -> bool {
    balances.tokens.iter().any(|token| {
        let symbol_match = match (&parsed.symbol, &token.symbol) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        };
        let address_match = parsed
            .contract_address
            .as_deref()
            .map_or(false, |a| a.eq_ignore_ascii_case(&token.contract_address));
        let id_match = match &parsed.token_id {
            Some(id) => token.token_id.as_deref() == Some(id.as_str()),
            None => true,
        };
        (symbol_match || address_match) && id_match
    })
}

fn engine_ctx<'a>(
    session: &'a Session,
    allow_list: &'a [ChainAliasEntry],
    snapshot: &'a RecentSnapshot,
) -> EngineContext<'a> {
    EngineContext {
        mode: session.mode,
        chains: allow_list,
        wallet: &session.wallet,
        balances: &session.balances,
        validators: AddressValidators {
            evm: address::evm_address_ok,
            base58: address::base58_address_ok,
        },
        recent: snapshot,
    }
}

fn mode_chains<'a>(
    mode: BridgeMode,
    token_chains: &'a [ChainAliasEntry],
    nft_chains: &'a [ChainAliasEntry],
) -> &'a [ChainAliasEntry] {
    match mode {
        BridgeMode::Token => token_chains,
        BridgeMode::Nft => nft_chains,
    }
}

fn chain_catalog() -> Vec<ChainAliasEntry> {
    vec![
        ChainAliasEntry::new("ethereum", ChainFamily::Evm, &["ethereum", "eth"]),
        ChainAliasEntry::new("polygon", ChainFamily::Evm, &["polygon", "matic"]),
        ChainAliasEntry::new("arbitrum", ChainFamily::Evm, &["arbitrum", "arb"]),
        ChainAliasEntry::new("optimism", ChainFamily::Evm, &["optimism", "op"]),
        ChainAliasEntry::new("bsc", ChainFamily::Evm, &["bsc", "binance"]),
        ChainAliasEntry::new("avalanche", ChainFamily::Evm, &["avalanche", "avax"]),
        ChainAliasEntry::new("solana", ChainFamily::Solana, &["solana", "sol"]),
    ]
}

fn token_bridge_chains(catalog: &[ChainAliasEntry]) -> Vec<ChainAliasEntry> {
    catalog.to_vec()
}

fn nft_bridge_chains(catalog: &[ChainAliasEntry]) -> Vec<ChainAliasEntry> {
    catalog
        .iter()
        .filter(|entry| matches!(entry.chain_id.as_str(), "ethereum" | "polygon" | "solana"))
        .cloned()
        .collect()
}

fn demo_balances() -> TokenBalances {
    TokenBalances {
        tokens: vec![
            TokenBalance {
                symbol: Some("ETH".to_string()),
                contract_address: "native".to_string(),
                token_id: None,
                ui_amount: 1.25,
            },
            TokenBalance {
                symbol: Some("USDC".to_string()),
                contract_address: "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48".to_string(),
                token_id: None,
                ui_amount: 512.0,
            },
            TokenBalance {
                symbol: Some("SOL".to_string()),
                contract_address: "So11111111111111111111111111111111111111112".to_string(),
                token_id: None,
                ui_amount: 3.1,
            },
            TokenBalance {
                symbol: Some("CoolCats".to_string()),
                contract_address: "0x1A92f7381B9F03921564a437210bB9396471050C".to_string(),
                token_id: Some("42".to_string()),
                ui_amount: 1.0,
            },
        ],
        loading: false,
        error: None,
    }
}

fn show_ferry_logo(printer: &Printer) {
    printer.header("FERRY — free-text bridge palette");
    println!("  bridge from <chain> to <chain>, <amount> <token>");
}

fn print_help(printer: &Printer) {
    printer.header("Session commands");
    printer.print_key_value(":connect", "connect the demo wallet", 2);
    printer.print_key_value(":disconnect", "drop the wallet connection", 2);
    printer.print_key_value(":network <chain>", "switch the wallet network", 2);
    printer.print_key_value(":mode token|nft", "select the bridge mode", 2);
    printer.print_key_value(":balances", "show demo wallet balances", 2);
    printer.print_key_value(":recent", "show the recency cache", 2);
    printer.print_key_value(":submit", "finalize the last typed command", 2);
    printer.print_key_value("exit", "quit", 2);
    println!();
    println!("Anything else is treated as bridge-command text and answered");
    println!("with the current suggestion tree.");
}
