//! queryfilter: render filters from the command line
//!
//! # Usage
//!
//! ```bash
//! # Show the SQL and bindings
//! queryfilter -f 'age,op=gte:18' -f 'color,op=in:["yellow","red"]'
//!
//! # Numbered placeholders, OR between clauses
//! queryfilter -f 'age,op=gte:18' -f 'color:yellow' --placeholder dollar --connective or
//!
//! # Run it against a table
//! queryfilter -f 'status,op=in:["todo","doing"]' --database-url sqlite://tasks.db --table tasks
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use queryfilter::clause::build_clauses;
use queryfilter::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "queryfilter")]
#[command(version)]
#[command(about = "Render tagged filters into parameterized SQL", long_about = None)]
#[command(after_help = "FILTERS:
    Each -f takes TAG:VALUE. TAG is `column` or `column,op=<operator>`,
    VALUE is JSON (18, \"text\", [1,2], true, null) or a bare string.

EXAMPLES:
    queryfilter -f 'age,op=gte:18' -f 'color:yellow'
    queryfilter -f 'price,op=between:[10.21,30.66]' --placeholder dollar
    queryfilter explain -f 'title,op=is-null:true'")]
struct Cli {
    /// Filters as TAG:VALUE
    #[arg(short, long = "filter", value_name = "TAG:VALUE", global = true)]
    filters: Vec<String>,

    /// Connective between clauses (and, or)
    #[arg(long, global = true)]
    connective: Option<Connective>,

    /// Placeholder dialect (anonymous, colon, dollar)
    #[arg(long, global = true)]
    placeholder: Option<Placeholder>,

    /// First number for numbered placeholders
    #[arg(long, global = true)]
    offset: Option<usize>,

    /// Defaults file (TOML)
    #[arg(long, env = "QUERYFILTER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, env = "QUERYFILTER_DATABASE_URL")]
    database_url: Option<String>,

    /// Table to select from when a database URL is given
    #[arg(long)]
    table: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Show each clause before rendering
    Explain,
    /// List the registered operators
    Operators,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(Commands::Explain) => explain(&cli),
        Some(Commands::Operators) => {
            show_operators();
            Ok(())
        }
        None => run(&cli).await,
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "queryfilter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Install config-file defaults, then apply command line overrides.
fn options(cli: &Cli) -> anyhow::Result<Options> {
    let loaded = match &cli.config {
        Some(path) => Some(Defaults::load(path)?),
        None => Defaults::discover()?,
    };
    if let Some(defaults) = loaded {
        set_defaults(defaults);
    }

    let mut opts = Options::default();
    if let Some(c) = cli.connective {
        opts = opts.connective(c);
    }
    if let Some(p) = cli.placeholder {
        opts = opts.placeholder(p);
    }
    if let Some(n) = cli.offset {
        opts = opts.placeholder_offset(n);
    }
    Ok(opts)
}

/// Build a record with one field per `-f TAG:VALUE`.
fn record(filters: &[String], tag_name: &str) -> anyhow::Result<Reflected> {
    let mut fields = Vec::with_capacity(filters.len());

    for (i, raw) in filters.iter().enumerate() {
        let (tag, value) = raw
            .split_once(':')
            .with_context(|| format!("filter '{}' is not TAG:VALUE", raw))?;
        let value = serde_json::from_str::<serde_json::Value>(value)
            .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));

        fields.push(Field::new(format!("f{}", i), value.reflect()).with_tag(tag_name, tag));
    }

    Ok(Reflected::Record(fields))
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let opts = options(cli)?;
    let record = record(&cli.filters, &opts.tag_name)?;

    if let (Some(url), Some(table)) = (&cli.database_url, &cli.table) {
        if cli.verbose {
            println!("{} {}", "Connecting to:".dimmed(), url);
        }
        let db = FilterDB::connect(url).await?;
        let query = db.select_sql(table, &record, &opts)?;
        if cli.verbose {
            print_fragment(&query);
            println!();
        }
        let rows = db.select(table, &record, &opts).await?;
        format_output(&rows, &cli.format)?;
        return Ok(());
    }

    let fragment = to_sql_with(&record, &opts)?;
    print_fragment(&fragment);

    if cli.database_url.is_some() && cli.table.is_none() {
        println!();
        println!("{}", "⚠ Database URL given without --table; nothing executed.".yellow());
    }
    Ok(())
}

fn print_fragment(fragment: &Fragment) {
    println!("{}", "Generated SQL:".green().bold());
    if fragment.is_empty() {
        println!("{}", "(empty: no filter holds a value)".dimmed());
    } else {
        println!("{}", fragment.sql.white());
    }

    if !fragment.args.is_empty() {
        println!();
        println!("{}", "Bindings:".cyan());
        for (i, arg) in fragment.args.iter().enumerate() {
            println!("  {} = {}", i + 1, arg.to_string().yellow());
        }
    }
}

fn explain(cli: &Cli) -> anyhow::Result<()> {
    let opts = options(cli)?;
    let record = record(&cli.filters, &opts.tag_name)?;

    println!("{}", "queryfilter explanation".cyan().bold());
    println!();
    println!("  {} {}", "Connective:".dimmed(), opts.connective.to_string().cyan());
    println!(
        "  {} {} (from {})",
        "Placeholder:".dimmed(),
        opts.placeholder.to_string().cyan(),
        opts.placeholder_offset
    );
    println!();

    let clauses = build_clauses(record.clone(), &opts.tag_name)?;
    println!("{}", "Clauses:".green().bold());
    for clause in &clauses {
        let state = if clause.is_set() {
            clause.value.to_string().yellow()
        } else {
            "unset, skipped".dimmed()
        };
        println!(
            "  {} {} [{}] {}",
            clause.column.white(),
            clause.operator.cyan(),
            clause.kind(),
            state
        );
    }

    println!();
    print_fragment(&to_sql_with(&record, &opts)?);
    Ok(())
}

fn show_operators() {
    println!("{}", "Registered operators".cyan().bold());
    println!();

    let examples: HashMap<&str, &str> = [
        ("eq", "col = ?"),
        ("gt", "col > ?"),
        ("gte", "col >= ?"),
        ("lt", "col < ?"),
        ("lte", "col <= ?"),
        ("in", "col IN(?,?,...)"),
        ("not-in", "col NOT IN(?,?,...)"),
        ("between", "col BETWEEN ? AND ?"),
        ("is-null", "col IS NULL | IS NOT NULL"),
        ("not-null", "col IS NOT NULL | IS NULL"),
    ]
    .into_iter()
    .collect();

    for name in Registry::global().names() {
        let sql = examples.get(name.as_str()).copied().unwrap_or("(custom)");
        println!("  {:10} {}", name.yellow().bold(), sql.dimmed());
    }
}

type Row = HashMap<String, serde_json::Value>;

fn format_output(rows: &[Row], format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(rows)?),
        OutputFormat::Table => print_table(rows),
    }
    Ok(())
}

fn print_table(rows: &[Row]) {
    let Some(first) = rows.first() else {
        println!("{}", "(no rows)".dimmed());
        return;
    };

    let mut columns: Vec<&str> = first.keys().map(String::as_str).collect();
    columns.sort_unstable();

    let cell = |row: &Row, column: &str| match row.get(column) {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Null) | None => "NULL".to_string(),
        Some(v) => v.to_string(),
    };
    let widths: Vec<usize> = columns
        .iter()
        .map(|c| rows.iter().map(|r| cell(r, *c).len()).fold(c.len(), usize::max))
        .collect();
    let line = |cells: Vec<String>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(text, width)| format!("{:width$}", text, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(columns.iter().map(|c| c.to_string()).collect()).bold());
    for row in rows {
        println!("{}", line(columns.iter().map(|c| cell(row, *c)).collect()));
    }
    println!();
    println!("{} row(s)", rows.len().to_string().cyan());
}
