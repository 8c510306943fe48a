use clap::{Args, Parser, Subcommand};
use quick_db::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quickdb", version, about = "Table helper operations from the command line")]
struct Cli {
    #[command(flatten)]
    conn: ConnectionArgs,

    /// Primary-key column used by get-id and delete
    #[arg(long, default_value = DEFAULT_PRIMARY_KEY)]
    primary_key: String,

    /// More logging (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct ConnectionArgs {
    #[arg(long, value_enum)]
    backend: DatabaseType,

    /// SQLite database path
    #[arg(long, default_value = ":memory:")]
    path: String,

    #[arg(long, default_value = "localhost")]
    host: String,

    #[arg(long, default_value_t = 5432)]
    port: u16,

    #[arg(long, default_value = "postgres")]
    dbname: String,

    #[arg(long, default_value = "postgres")]
    user: String,

    #[arg(long, env = "QUICKDB_PASSWORD", default_value = "", hide_env_values = true)]
    password: String,
}

impl ConnectionArgs {
    fn into_options(self) -> ConnectOptions {
        match self.backend {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => {
                PostgresOptions::new(self.host, self.dbname, self.user, self.password)
                    .with_port(self.port)
                    .into()
            }
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => SqliteOptions::new(self.path).into(),
        }
    }
}

#[derive(Debug, Args)]
struct Filter {
    table: String,

    /// Trailing clause, e.g. "WHERE type=? ORDER BY id"
    #[arg(long = "where")]
    conditions: Option<String>,

    /// Value for the next `?` (repeatable)
    #[arg(short = 'p', long = "param")]
    params: Vec<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the row with the given primary key
    GetId { table: String, id: String },
    /// Print the first matching row
    GetOne(Filter),
    /// Print every matching row
    GetAll(Filter),
    /// Print the number of matching rows
    Count(Filter),
    /// Run arbitrary SQL and print the rows it returns
    Exec {
        query: String,
        #[arg(short = 'p', long = "param")]
        params: Vec<String>,
    },
    /// Delete the row with the given primary key
    Delete { table: String, id: String },
}

fn parse_params(raw: &[String]) -> Vec<RowValues> {
    raw.iter().map(|p| RowValues::parse_loose(p)).collect()
}

fn print_records<'a>(records: impl IntoIterator<Item = &'a Record>) -> Result<(), serde_json::Error> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

async fn run(db: &Database, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::GetId { table, id } => {
            print_records(&db.get_id(&table, RowValues::parse_loose(&id)).await?)?;
        }
        Command::GetOne(filter) => {
            let params = parse_params(&filter.params);
            let record = db
                .get_one(&filter.table, filter.conditions.as_deref(), &params)
                .await?;
            print_records(&record)?;
        }
        Command::GetAll(filter) => {
            let params = parse_params(&filter.params);
            let records = db
                .get_all(&filter.table, filter.conditions.as_deref(), &params)
                .await?;
            print_records(&records)?;
        }
        Command::Count(filter) => {
            let params = parse_params(&filter.params);
            let count = db
                .count(&filter.table, filter.conditions.as_deref(), &params)
                .await?;
            println!("{count}");
        }
        Command::Exec { query, params } => {
            print_records(&db.exec_all(&query, &parse_params(&params)).await?)?;
        }
        Command::Delete { table, id } => {
            let deleted = db.delete(&table, RowValues::parse_loose(&id)).await?;
            println!("{}", serde_json::to_string(&deleted)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let db = Database::connect_or_exit(cli.conn.into_options()).await;
    let db = db.with_primary_key(cli.primary_key).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(2);
    });

    if let Err(err) = run(&db, cli.command).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
