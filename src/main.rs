use ammo_inventory::{cli, commands, config, error, http, render};
use ammo_inventory_common::chart::default_thresholds;
use ammo_inventory_common::csv::EXPECTED_HEADER;
use ammo_inventory_common::{
    api::paths, DeleteConfirmation, Error, InventoryClient, InventoryForm, NoticeBoard, NoticeLevel,
    Thresholds, UpcForm,
};
use clap::Parser;
use cli::{Cli, Commands, UpcCommands};
use config::Config;
use dialoguer::{Confirm, Input};
use error::Result;
use http::ReqwestTransport;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

type Client = InventoryClient<ReqwestTransport>;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn connect(config: &Config) -> Result<Client> {
    let client_config = config.client_config();
    let transport = ReqwestTransport::new(config.base_url()?, &client_config)?;
    Ok(InventoryClient::with_config(transport, client_config))
}

/// 削除確認（`--yes` なら確認しない）
fn confirm_delete(yes: bool) -> impl FnOnce(&DeleteConfirmation) -> Result<bool> {
    move |confirmation| {
        if yes {
            return Ok(true);
        }
        Ok(Confirm::new()
            .with_prompt(confirmation.prompt())
            .default(false)
            .interact()?)
    }
}

/// 空の必須項目を対話で埋める
fn prompt_missing(form: &mut InventoryForm) -> Result<()> {
    let fields: [(&str, &mut String); 3] = [
        ("Name", &mut form.name),
        ("Caliber", &mut form.caliber),
        ("Rounds per box", &mut form.count_per_box),
    ];
    for (label, value) in fields {
        if value.trim().is_empty() {
            *value = Input::<String>::new().with_prompt(label).interact_text()?;
        }
    }
    Ok(())
}

fn print_notices(board: &NoticeBoard) {
    for notice in board.notices() {
        let mark = match notice.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Info => "-",
            NoticeLevel::Warning => "⚠",
            NoticeLevel::Danger => "✘",
        };
        println!("{} {}", mark, notice.message);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("✘ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load()?;

    match cli.command {
        Commands::Config { set_url, show } => {
            if let Some(url) = set_url {
                config.set_base_url(url)?;
                println!("✔ Server URL saved: {}", Config::config_path()?.display());
            }
            if show {
                println!("{}", serde_json::to_string_pretty(&config)?);
                match config.base_url() {
                    Ok(url) => println!("Effective server URL: {}", url),
                    Err(e) => println!("{}", e),
                }
            }
        }

        Commands::Lookup { code } => {
            let client = connect(&config)?;
            let outcome = client.lookup_upc(&code).await?;
            println!("{}", outcome.status_message());
            println!("{}", serde_json::to_string_pretty(outcome.form())?);
        }

        Commands::List { filter } => {
            let client = connect(&config)?;
            let items = commands::list_items(&client, &filter.to_filter()).await?;
            println!("{}", render::inventory_table(&items));
            println!("\n{} item(s)", items.len());
        }

        Commands::Add { from_upc, fields } => {
            let client = connect(&config)?;
            let (mut form, outcome) =
                commands::draft_item(&client, from_upc.as_deref(), &fields).await?;
            if let Some(outcome) = &outcome {
                println!("{}", outcome.status_message());
            }
            prompt_missing(&mut form)?;
            let message = client.add_inventory(&form).await?;
            println!("✔ {}", message);
        }

        Commands::Update { id, fields } => {
            let client = connect(&config)?;
            let message = commands::update_item(&client, id, &fields).await?;
            println!("✔ {}", message);
        }

        Commands::Delete { id, yes } => {
            let client = connect(&config)?;
            match commands::delete_item(&client, id, confirm_delete(yes)).await? {
                Some(message) => println!("✔ {}", message),
                None => println!("Cancelled"),
            }
        }

        Commands::Upc { command } => {
            let client = connect(&config)?;
            run_upc(&client, command).await?;
        }

        Commands::Thresholds { caliber, set } => {
            let client = connect(&config)?;
            match set.as_deref() {
                Some([critical, low, target]) => {
                    let thresholds = Thresholds::new(*critical, *low, *target);
                    if !thresholds.is_ordered() {
                        tracing::warn!(?thresholds, "thresholds are not ascending");
                    }
                    let message = client.save_thresholds(&caliber, thresholds).await?;
                    println!("✔ {}", message);
                }
                _ => {
                    let (thresholds, source) = match client.get_thresholds(&caliber).await {
                        Ok(t) => (t, "saved"),
                        Err(Error::NotFound(_) | Error::Rejected(_)) => {
                            (default_thresholds(&caliber), "default")
                        }
                        Err(e) => return Err(e.into()),
                    };
                    println!(
                        "{} ({}): critical={} low={} target={}",
                        caliber, source, thresholds.critical, thresholds.low, thresholds.target
                    );
                }
            }
        }

        Commands::Export { output } => {
            let client = connect(&config)?;
            let output = output.unwrap_or_else(|| {
                commands::default_export_name(chrono::Local::now().date_naive()).into()
            });
            let bytes = commands::download_to(&client, paths::EXPORT_CSV, &output).await?;
            println!("✔ Exported {} bytes: {}", bytes, output.display());
        }

        Commands::Template { output } => {
            let client = connect(&config)?;
            commands::download_to(&client, paths::CSV_TEMPLATE, &output).await?;
            println!("✔ Template saved: {}", output.display());
            println!("  Columns: {}", EXPECTED_HEADER);
        }

        Commands::Import { file } => {
            let client = connect(&config)?;
            let report = commands::import_file(&client, &file).await?;
            let mut board = NoticeBoard::new();
            report.publish(&mut board);
            print_notices(&board);
        }

        Commands::Search { query, max, import } => {
            let client = connect(&config)?;
            let pb = spinner("Searching online stores...");
            let results = client
                .search_products(&query, max.unwrap_or(config.default_max_products))
                .await;
            pb.finish_and_clear();
            let results = results?;

            if results.is_empty() {
                println!("No products found");
                return Ok(());
            }
            println!("{}", render::product_list(&results));

            if let Some(index) = import {
                let message = commands::import_result(&client, &results, index).await?;
                println!("\n✔ {}", message);
            }
        }

        Commands::Chart => {
            let client = connect(&config)?;
            let bars = commands::load_chart(&client).await?;
            if bars.is_empty() {
                println!("No inventory");
            } else {
                println!("{}", render::chart(&bars));
            }
        }
    }

    Ok(())
}

async fn run_upc(client: &Client, command: UpcCommands) -> Result<()> {
    match command {
        UpcCommands::List { filter } => {
            let records = commands::list_upcs(client, &filter.to_filter()).await?;
            println!("{}", render::upc_table(&records));
            println!("\n{} UPC(s)", records.len());
        }
        UpcCommands::Add { upc, fields } => {
            let mut form = UpcForm { upc, ..Default::default() };
            fields.apply_to(&mut form);
            let message = client.add_upc(&form).await?;
            println!("✔ {}", message);
        }
        UpcCommands::Update { id, upc, fields } => {
            let message = commands::update_upc(client, id, upc.as_deref(), &fields).await?;
            println!("✔ {}", message);
        }
        UpcCommands::Delete { id, yes } => {
            match commands::delete_upc(client, id, confirm_delete(yes)).await? {
                Some(message) => println!("✔ {}", message),
                None => println!("Cancelled"),
            }
        }
    }
    Ok(())
}
