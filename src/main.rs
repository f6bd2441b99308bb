// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::env;
use std::path::Path;

// Use library instead of local modules
use item_resolver::{
    get_import_runs, import_csv, init_logging, resolve_text, setup_database, verify_count, Config,
    Family, Selection, SqliteCatalog,
};

fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config);

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("import") => run_import(&config, &args[2..])?,
        Some("resolve") => run_resolve(&config, &args[2..])?,
        Some("runs") => run_list_imports(&config)?,
        Some("help") | Some("--help") | Some("-h") => print_usage(),
        Some(other) => {
            eprintln!("❌ Unknown command: {}", other);
            print_usage();
            std::process::exit(2);
        }
        // UI mode (default)
        None => run_ui_mode(&config)?,
    }

    Ok(())
}

fn print_usage() {
    println!("Usage:");
    println!("  item-resolver                       interactive search (TUI)");
    println!("  item-resolver import <family> <csv> load skins|containers|agents|stickers|tools");
    println!("  item-resolver resolve <query...>    e.g. resolve w ak-47 redline ft st");
    println!("  item-resolver runs                  list import runs");
}

fn run_import(config: &Config, args: &[String]) -> Result<()> {
    let (family_name, csv_file) = match args {
        [family, csv] => (family, csv),
        _ => anyhow::bail!("usage: item-resolver import <family> <csv>"),
    };
    let family = Family::from_name(family_name)
        .with_context(|| format!("Unknown family '{}'", family_name))?;
    let csv_path = Path::new(csv_file);

    println!("🗄️  Catalog Import - CSV → SQLite + WAL");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Setup database
    println!("\n🔧 Opening {}...", config.database_path.display());
    let conn = Connection::open(&config.database_path)?;
    setup_database(&conn)?;
    println!("✓ Database initialized with WAL mode");

    // 2. Load + insert + audit
    println!("\n💾 Importing {} from {}...", family, csv_path.display());
    let stats = import_csv(&conn, family, csv_path)?;
    println!("✓ Inserted: {} {}", stats.inserted, family);
    println!("✓ Skipped duplicates: {}", stats.skipped);

    // 3. Verify count
    println!("\n🔍 Verifying database...");
    let count = verify_count(&conn, family)?;
    println!("✓ Table {} contains {} rows", family, count);

    Ok(())
}

fn run_resolve(config: &Config, args: &[String]) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("usage: item-resolver resolve <query...>");
    }
    let query = args.join(" ");

    let catalog = SqliteCatalog::open(&config.database_path)?;
    let (category, names) = resolve_text(&catalog, &query)?;
    let selection = Selection::from_names(names, config.max_selectable);

    println!("🔎 {} query: {}", category, query);
    match &selection {
        Selection::NotFound => println!("❌ {}", selection.message()),
        Selection::Single(name) => println!("✅ {}", name),
        Selection::Choose(_) => {
            println!("📋 {}", selection.message());
            for line in selection.numbered() {
                println!("   {}", line);
            }
        }
        Selection::TooMany(_) => println!("⚠️  {}", selection.message()),
    }

    Ok(())
}

fn run_list_imports(config: &Config) -> Result<()> {
    let conn = Connection::open(&config.database_path)?;
    setup_database(&conn)?;

    let runs = get_import_runs(&conn)?;
    println!("📜 {} import runs", runs.len());
    for run in runs {
        println!(
            "  {}  {:<10} +{:<6} ={:<6} {}",
            run.imported_at.format("%Y-%m-%d %H:%M:%S"),
            run.family.table(),
            run.inserted,
            run.skipped,
            run.source_file
        );
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &Config) -> Result<()> {
    use std::sync::Arc;

    println!("🖥️  Loading Item Resolver UI...\n");

    if !config.database_path.exists() {
        eprintln!("❌ Database not found: {}", config.database_path.display());
        eprintln!("   Run: item-resolver import <family> <csv>");
        eprintln!("   to import the catalog first.");
        std::process::exit(1);
    }

    let catalog = SqliteCatalog::open(&config.database_path)?;
    let counts = catalog.counts()?;
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    println!("✓ Catalog holds {} records\n", total);
    println!("Starting UI... (Press Esc to quit)\n");

    let mut app = ui::App::new(Arc::new(catalog), counts, config.max_selectable);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &Config) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: item-resolver resolve <query...>");
    std::process::exit(1);
}
