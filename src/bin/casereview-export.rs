extern crate casereview;

use std::env;
use std::io;
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use getopts::Options;

use tracing::info;
use tracing_subscriber::EnvFilter;

use casereview::store::EntityStore;
use casereview::ui_state::UiState;
use casereview::web::config::Config;
use casereview::web::export::{write_tsv, ExportEntity};
use casereview::web::views::{ProjectViews, ViewScope};

fn usage_message(program: &str) -> String {
    format!("Usage: {} [options]

Reads an entity store and UI state from JSON files, and writes the families,
individuals or samples of the current project table to STDOUT, filtered and
sorted using the table's UI state.
",
            program)
}

fn print_usage(program: &str, opts: &Options) {
    let message = usage_message(program);
    print!("{}", opts.usage(&message));
}

fn eprint_usage(program: &str, opts: &Options) {
    let message = usage_message(program);
    eprint!("{}", opts.usage(&message));
}

fn run(store_file_name: &str, ui_state_file_name: &str, config_file_name: Option<&str>,
       scope: &ViewScope, entity: ExportEntity, output_format: &str)
    -> Result<()>
{
    let config =
        match config_file_name {
            Some(config_file_name) => Config::read(config_file_name)?,
            None => Config::default(),
        };

    let store = EntityStore::read(store_file_name)?;
    let ui_state = UiState::read(ui_state_file_name)?;

    let views = ProjectViews::new(Arc::new(config));

    let tables = views.project_export_tables(&store, &ui_state, scope)
        .ok_or_else(|| anyhow!("no current project in {}", ui_state_file_name))?;
    let table = tables.into_iter()
        .find(|table| table.entity == entity)
        .ok_or_else(|| anyhow!("no export table for {}", entity.name()))?;

    let rows = views.export_data(&store, &ui_state, scope, entity);

    info!("writing {} rows of {}", rows.len(), table.config.filename);

    let stdout = io::stdout();

    match output_format {
        "tsv" => {
            write_tsv(stdout.lock(), &table.config, &rows)
                .with_context(|| format!("failed to write {}", table.config.filename))?;
        },
        "json" => {
            serde_json::to_writer_pretty(stdout.lock(), &*rows)
                .context("failed to write JSON")?;
            println!();
        },
        _ => return Err(anyhow!("unknown output format: {}", output_format)),
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("casereview=warn"))
                .unwrap(),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();

    opts.optflag("h", "help", "print this help message");
    opts.optopt("c", "config", "Configuration file name", "CONFIG");
    opts.optopt("s", "store", "Entity store JSON file", "STORE_FILE");
    opts.optopt("u", "ui-state", "UI state JSON file", "UI_STATE_FILE");
    opts.optopt("t", "table", "Table name, eg. \"Case Review\"", "TABLE");
    opts.optopt("g", "analysis-group", "Restrict to the families of an analysis group", "GUID");
    opts.optopt("e", "entity", "families, individuals or samples (default: families)", "ENTITY");
    opts.optopt("f", "format", "tsv or json (default: tsv)", "FORMAT");

    let program = args[0].clone();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            eprint_usage(&program, &opts);
            eprintln!("\noption error: {}", e);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, &opts);
        process::exit(0);
    }

    if !matches.opt_present("store") || !matches.opt_present("ui-state") {
        eprintln!("needs --store and --ui-state arguments");
        eprint_usage(&program, &opts);
        process::exit(1);
    }

    let store_file_name = matches.opt_str("store").unwrap();
    let ui_state_file_name = matches.opt_str("ui-state").unwrap();
    let config_file_name = matches.opt_str("config");

    let entity_name = matches.opt_str("entity").unwrap_or_else(|| "families".into());
    let Some(entity) = ExportEntity::from_name(&entity_name)
    else {
        eprintln!("unknown entity: {}", entity_name);
        eprint_usage(&program, &opts);
        process::exit(1);
    };

    let output_format = matches.opt_str("format").unwrap_or_else(|| "tsv".into());

    let scope = ViewScope::new(matches.opt_str("table").as_deref(),
                               matches.opt_str("analysis-group").as_deref());

    if let Err(err) = run(&store_file_name, &ui_state_file_name, config_file_name.as_deref(),
                          &scope, entity, &output_format) {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
