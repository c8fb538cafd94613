use clap::Parser;
use rathe::{
    CardFilter,
    DataDir,
    SetFilter,
    Store,
    error,
    view::{
        CardDetail,
        CardSummary,
        KeywordView,
        LegalityReport,
        SetDetail,
        SetSummary,
    },
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if let Ok(env) = std::env::var("RATHE_LOG") {
        EnvFilter::new(env)
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn main() -> error::Result<()> {
    let cli = Cli::parse();

    if let Command::Completions(args) = &cli.command {
        args.generate();
        return Ok(());
    }

    init_tracing(cli.verbose, cli.quiet);

    let data_dir = DataDir::resolve(cli.data_dir.as_deref())?;
    let store = data_dir.open_store()?;

    match cli.command {
        Command::Search(args) => cmd_search(&store, &args)?,
        Command::Card(args) => {
            let card = find_card(&store, &args.reference)?;
            let detail = CardDetail::from(card);
            if args.json {
                print_json(&detail)?;
            } else {
                println!("{}", detail.render());
            }
        }
        Command::Legality(args) => {
            let card = find_card(&store, &args.reference)?;
            let report = LegalityReport::from(card);
            if args.json {
                print_json(&report)?;
            } else {
                println!("{}", report.render());
            }
        }
        Command::Sets(args) => {
            let filter = SetFilter {
                name: args.name,
                code: args.code,
                query: args.query,
            };
            let sets: Vec<SetSummary> = store
                .search_sets(&filter)
                .into_iter()
                .map(SetSummary::from)
                .collect();
            if args.json {
                print_json(&sets)?;
            } else {
                for set in &sets {
                    println!("{:<5} {}", set.id, set.name);
                }
            }
        }
        Command::Set(args) => cmd_set(&store, &args)?,
        Command::Keyword(args) => {
            let keyword =
                store.keyword_by_name(&args.name).ok_or_else(|| {
                    error::Error::NotFound {
                        kind: "keyword",
                        name: args.name.clone(),
                    }
                })?;
            let view = KeywordView::from(keyword);
            if args.json {
                print_json(&view)?;
            } else {
                println!("{}\n\n{}", view.name, view.description);
            }
        }
        Command::Keywords(args) => {
            let keywords: Vec<KeywordView> =
                store.keywords().iter().map(KeywordView::from).collect();
            if args.json {
                print_json(&keywords)?;
            } else {
                for keyword in &keywords {
                    println!("{}", keyword.name);
                }
            }
        }
        Command::Abilities(args) => {
            let names: Vec<&str> =
                store.abilities().iter().map(|a| a.name.as_str()).collect();
            if args.json {
                print_json(&names)?;
            } else {
                for name in names {
                    println!("{name}");
                }
            }
        }
        Command::Status(args) => cmd_status(&store, &data_dir, args.json)?,
        Command::Mcp => rathe::mcp::run_mcp(store)?,
        // Printed before the store is loaded.
        Command::Completions(_) => {}
    }

    Ok(())
}

fn find_card<'a>(
    store: &'a Store,
    reference: &str,
) -> error::Result<&'a rathe::Card> {
    store
        .resolve_card(reference)
        .ok_or_else(|| error::Error::NotFound {
            kind: "card",
            name: reference.to_string(),
        })
}

fn print_json(value: &impl Serialize) -> error::Result<()> {
    let out = serde_json::to_string_pretty(value)
        .map_err(|e| error::Error::Server(format!("JSON output: {e}")))?;
    println!("{out}");
    Ok(())
}

fn cmd_search(store: &Store, args: &cli::SearchArgs) -> error::Result<()> {
    let mut filter = CardFilter {
        name: args.name.clone(),
        type_name: args.type_name.clone(),
        class: args.class.clone(),
        set: args.set.clone(),
        pitch: args.pitch.clone(),
        keyword: args.keyword.clone(),
        text: args.text.clone(),
        ..Default::default()
    }
    .paged(args.limit, args.offset);
    if let Some(format) = &args.format {
        filter = filter.legal_in_token(format);
        if filter.legal_in.is_none() {
            tracing::warn!(format = %format, "unknown format, ignoring");
        }
    }

    let page = store.search_cards(&filter);

    if args.json {
        #[derive(Serialize)]
        struct Output<'a> {
            total: usize,
            count: usize,
            plan: &'a rathe::IndexPlan,
            results: Vec<CardSummary>,
        }
        return print_json(&Output {
            total: page.total,
            count: page.cards.len(),
            plan: &page.plan,
            results: page.cards.iter().map(|&c| c.into()).collect(),
        });
    }

    if args.explain {
        eprintln!("index: {:?}", page.plan);
    }
    for card in &page.cards {
        println!("{}", CardSummary::from(*card).line());
    }
    eprintln!("{} of {} cards", page.cards.len(), page.total);
    Ok(())
}

fn cmd_set(store: &Store, args: &cli::SetArgs) -> error::Result<()> {
    let set =
        store
            .set_by_id(&args.code)
            .ok_or_else(|| error::Error::NotFound {
                kind: "set",
                name: args.code.clone(),
            })?;
    let cards = args.cards.then(|| store.cards_in_set(&set.id));
    let detail = SetDetail::new(set, cards.as_deref());

    if args.json {
        return print_json(&detail);
    }

    println!("{} {}", detail.id, detail.name);
    for printing in &detail.printings {
        let released = if printing.initial_release_date.is_empty() {
            "unreleased"
        } else {
            printing.initial_release_date.as_str()
        };
        println!("  {} edition, released {released}", printing.edition);
    }
    if let Some(cards) = &detail.cards {
        println!("Cards: {}", cards.len());
        for card in cards {
            println!("  {}", card.line());
        }
    }
    Ok(())
}

fn cmd_status(
    store: &Store,
    data_dir: &DataDir,
    json: bool,
) -> error::Result<()> {
    let stats = store.stats();

    if json {
        #[derive(Serialize)]
        struct Status {
            source: String,
            #[serde(flatten)]
            stats: rathe::Stats,
        }
        return print_json(&Status {
            source: data_dir.describe(),
            stats,
        });
    }

    println!("Source: {}", data_dir.describe());
    println!("Cards: {}", stats.data.cards);
    println!("Sets: {}", stats.data.sets);
    println!("Keywords: {}", stats.data.keywords);
    println!("Abilities: {}", stats.data.abilities);
    println!("Types: {}", stats.data.types);
    println!("Indexed names: {}", stats.index.cards_by_name);
    println!("Indexed classes: {}", stats.index.cards_by_class);
    println!("Indexed types: {}", stats.index.cards_by_type);
    println!("Indexed keywords: {}", stats.index.cards_by_keyword);
    if store.hybrid_cards() > 0 {
        println!("Cards with several classes: {}", store.hybrid_cards());
    }
    Ok(())
}
