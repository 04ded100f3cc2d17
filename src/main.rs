use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

use parqlab::config::WorkbenchConfig;
use parqlab::engine::EngineProvisioner;
use parqlab::route::episode_redirect_path;
use parqlab::workbench::{Workbench, RENDER_ROW_LIMIT};

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = WorkbenchConfig::load().context("failed to load configuration")?;
    init_tracing(&config);
    info!("workbench config:\n{:?}", config);

    let provisioner = Arc::new(EngineProvisioner::new(config.engine_config()));
    let mut workbench = Workbench::new(provisioner, config.table_name.clone());

    println!("parqlab - load a Parquet URL into DuckDB and query it");
    println!("commands: \\load <url> [table], \\close, \\route <org> <dataset>, \\quit");
    println!("anything else runs as SQL against the loaded table");

    let stdin = io::stdin();
    loop {
        print!("parqlab> ");
        io::stdout().flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["\\quit"] | ["\\q"] => break,
            ["\\load", url] => workbench.load(url, None),
            ["\\load", url, table] => workbench.load(url, Some(table)),
            ["\\close"] => {
                workbench.close();
                println!("session closed");
                continue;
            }
            ["\\route", org, dataset] => {
                println!(
                    "{}",
                    episode_redirect_path(org, dataset, &config.episode_indices())
                );
                continue;
            }
            _ => workbench.query(line),
        }

        if let Some(error) = workbench.last_error() {
            eprintln!("error: {error}");
            continue;
        }
        if let Some(rendered) = workbench.render_results(RENDER_ROW_LIMIT) {
            println!("{rendered}");
        } else if let (Some(table), Some(rows)) = (workbench.table_name(), workbench.row_count()) {
            println!("loaded {rows} rows into table \"{table}\"");
        }
    }

    workbench.close();
    info!("workbench shut down");
    Ok(())
}

fn init_tracing(config: &WorkbenchConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .init();
    } else {
        tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .init();
    }
}
