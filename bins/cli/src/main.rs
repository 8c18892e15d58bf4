//! Coffer command-line tool.
//!
//! Reads and edits loot documents kept in a JSON flag store file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coffer_core::currency::{CurrencyDistributor, DenominationTable, Recipient};
use coffer_core::flags::{FlagScope, FlagStore, JsonFileFlagStore};
use coffer_core::loot::{LootService, Submission, WriteAuthority};
use coffer_core::pricing::{PriceAdjustments, ShopItem};
use coffer_shared::types::{CoinPurse, DenominationId, DocumentId, RecipientId};
use coffer_shared::{AppConfig, AppError};

#[derive(Parser, Debug)]
#[command(name = "coffer")]
#[command(about = "Split, transfer and inspect loot currency")]
struct Args {
    /// Flag store file (defaults to `store.path` from configuration)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every flag on a document
    Show {
        /// Document id
        document: String,
    },

    /// Distribute a loot document's coin among characters
    Distribute {
        /// Loot document id
        loot: String,

        /// Receiving character ids
        #[arg(long = "to", required = true, num_args = 1..)]
        to: Vec<String>,

        /// Split every denomination evenly
        #[arg(long)]
        split: bool,

        /// Leave remainders unconverted
        #[arg(long)]
        no_convert: bool,

        /// Give whatever is left to this character
        #[arg(long)]
        assign: Option<String>,
    },

    /// Move coin between a loot document and a character
    Transfer {
        /// Loot document id
        loot: String,

        /// Character document id
        actor: String,

        /// Amounts as `denomination=amount`; negative pays into the loot
        #[arg(required = true, allow_hyphen_values = true)]
        amounts: Vec<String>,

        /// Print the request for the document owner instead of writing
        #[arg(long)]
        relay: bool,
    },

    /// Show the adjusted selling cost of an item
    Price {
        /// Item type, e.g. `weapon`
        item_type: String,

        /// List price, e.g. `15 gp`
        price: String,
    },
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "coffer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err
                .downcast_ref::<AppError>()
                .map_or(1, AppError::exit_code);
            error!(error = %err, "command failed");
            eprintln!("error: {err:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = AppConfig::load().map_err(AppError::from)?;
    let path = args.store.unwrap_or_else(|| config.store.path.clone());
    let mut store = JsonFileFlagStore::open(&path)
        .map_err(|e| AppError::Storage(e.to_string()))
        .with_context(|| format!("opening {}", path.display()))?;
    let scope = |document: &str| FlagScope::new(document, config.store.namespace.as_str());
    let table = DenominationTable::new(config.currency.denominations.clone()).finalize();

    match args.command {
        Command::Show { document } => {
            let flags = store
                .flags(&scope(&document))
                .map_err(|e| AppError::Storage(e.to_string()))?;
            if flags.is_empty() {
                return Err(AppError::NotFound(format!("no flags on {document}")).into());
            }
            println!("{}", serde_json::to_string_pretty(&flags)?);
        }

        Command::Distribute {
            loot,
            to,
            split,
            no_convert,
            assign,
        } => {
            let loot = DocumentId::from(loot);
            let recipients = to.iter().map(|id| Recipient::new(id.as_str(), id.as_str())).collect();
            let mut distributor = LootService::open_distribution(
                &store,
                &scope(loot.as_str()),
                &loot,
                recipients,
                table,
                &config.distribution,
            )
            .map_err(AppError::from)?;

            if split {
                distributor.split_evenly(config.distribution.convert_remainder && !no_convert);
            }
            if let Some(target) = assign {
                let target = RecipientId::from(target);
                if !distributor.assign_remainder(&target) {
                    bail!(AppError::NotFound(format!("recipient {target}")));
                }
            }

            print_distribution(&distributor);
            LootService::commit_distribution(
                &mut store,
                &scope(loot.as_str()),
                &loot,
                &distributor.outcome(),
            )
            .map_err(AppError::from)?;
            store.flush().map_err(|e| AppError::Storage(e.to_string()))?;
        }

        Command::Transfer {
            loot,
            actor,
            amounts,
            relay,
        } => {
            let loot = DocumentId::from(loot);
            let actor = DocumentId::from(actor);
            let pairs = amounts
                .iter()
                .map(|raw| parse_pair(raw))
                .collect::<Result<Vec<_>, _>>()?;

            let transfer =
                LootService::draft_transfer(&store, &scope(loot.as_str()), &loot, &table, &pairs)
                    .map_err(AppError::from)?;
            let result = LootService::commit_transfer(
                &mut store,
                &scope(loot.as_str()),
                &loot,
                &actor,
                &transfer,
                authority(relay),
            )
            .map_err(AppError::from)?;
            match result {
                Submission::Relayed(request) => {
                    println!("{}", serde_json::to_string_pretty(&request)?);
                }
                Submission::Stored => {
                    store.flush().map_err(|e| AppError::Storage(e.to_string()))?;
                    info!(loot = %loot, actor = %actor, moved = %format_purse(transfer.amounts()), "transfer done");
                }
            }
        }

        Command::Price { item_type, price } => {
            let adjustments = PriceAdjustments::from_config(&config.pricing);
            let mut items = [ShopItem {
                id: "cli".to_string(),
                name: item_type.clone(),
                item_type,
                price,
                cost: None,
            }];
            adjustments.apply_to_items(&mut items, &config.pricing.default_currency);
            println!("{}", items[0].cost.as_deref().unwrap_or_default());
        }
    }

    Ok(())
}

fn authority(relay: bool) -> WriteAuthority {
    if relay {
        WriteAuthority::Relay
    } else {
        WriteAuthority::Owner
    }
}

fn parse_pair(raw: &str) -> Result<(DenominationId, String), AppError> {
    let (denomination, amount) = raw
        .split_once('=')
        .ok_or_else(|| AppError::Validation(format!("expected denomination=amount, got '{raw}'")))?;
    Ok((DenominationId::from(denomination.trim()), amount.trim().to_string()))
}

fn format_purse(purse: &CoinPurse) -> String {
    purse
        .iter()
        .filter(|(_, amount)| !amount.is_zero())
        .map(|(id, amount)| format!("{} {id}", amount.normalize()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_distribution(distributor: &CurrencyDistributor) {
    for recipient in distributor.recipients() {
        println!("{:<16} {}", recipient.name, format_purse(&recipient.payout()));
    }
    println!("{:<16} {}", "(remainder)", format_purse(distributor.pool()));
}
