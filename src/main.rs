use anyhow::{Context, Result};
use asset_dbtest::asset::AssetTarget;
use asset_dbtest::config::{AppConfig, CliConfig, FileConfig, LogFormat};
use asset_dbtest::dsn::DEFAULT_DSN;
use asset_dbtest::loader::{self, LoadOptions};
use asset_dbtest::logging::init_logging;
use asset_dbtest::query_runner::{self, QueryOptions, DEFAULT_MAX_DRAWS};
use asset_dbtest::{open_store, RunContext};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, Instrument};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let path = path_buf
        .canonicalize()
        .with_context(|| format!("Error resolving path: {}", s))?;
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(path))
}

#[derive(Parser, Debug)]
#[command(
    name = "asset-dbtest",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("DBTEST_BUILD_ID"), ")"),
    about = "Loads synthetic assets into a database and times batched reads of them"
)]
struct CliArgs {
    /// Path to a TOML config file. Its values override the command line.
    #[clap(long, global = true, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Format of the log lines written to stderr.
    #[clap(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Loads the database.
    Dbload(DbloadArgs),
    /// Queries the database.
    Query(QueryArgs),
}

#[derive(Args, Debug)]
struct DbloadArgs {
    /// The number of records to load.
    #[clap(long, default_value_t = 1_000_000)]
    pub records: u64,

    /// Load the sample table instead of the metadata table.
    #[clap(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub sample: bool,

    /// Database connection string.
    #[clap(long, default_value = DEFAULT_DSN)]
    pub dsn: String,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// The number of times to run the test.
    #[clap(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub samplesize: u32,

    /// The number of assets to retrieve per test.
    #[clap(long, default_value_t = 100)]
    pub retrievesize: usize,

    /// Query the sample table instead of the metadata table.
    #[clap(
        long,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        action = clap::ArgAction::Set,
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub sample: bool,

    /// Database connection string.
    #[clap(long, default_value = DEFAULT_DSN)]
    pub dsn: String,

    /// Give up picking assets for a test after this many random draws.
    #[clap(long, default_value_t = DEFAULT_MAX_DRAWS)]
    pub max_draws: u64,
}

fn resolve_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let (dsn, max_draws) = match &cli_args.command {
        Command::Dbload(args) => (args.dsn.clone(), DEFAULT_MAX_DRAWS),
        Command::Query(args) => (args.dsn.clone(), args.max_draws),
    };
    let cli_config = CliConfig {
        dsn,
        log_format: cli_args.log_format,
        max_draws,
    };
    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    AppConfig::resolve(&cli_config, file_config)
}

async fn run(cli_args: CliArgs, config: AppConfig, ctx: &RunContext) -> Result<()> {
    let store = open_store(&config.dsn)
        .instrument(ctx.span().clone())
        .await?;
    let mut rng = StdRng::from_os_rng();

    match cli_args.command {
        Command::Dbload(args) => {
            let options = LoadOptions {
                target: AssetTarget::from_sample_flag(args.sample),
                records: args.records,
                progress_interval: config.progress_interval,
            };
            let loaded = loader::load(ctx, store.as_ref(), &options, &mut rng).await?;
            info!(parent: ctx.span(), "Done, {} records written to {}", loaded, config.dsn);
        }
        Command::Query(args) => {
            let options = QueryOptions {
                target: AssetTarget::from_sample_flag(args.sample),
                sample_size: args.samplesize,
                retrieve_size: args.retrievesize,
                max_draws: config.max_draws,
            };
            let report = query_runner::run_queries(ctx, store.as_ref(), &options, &mut rng).await?;
            let mut stdout = std::io::stdout().lock();
            report
                .write_to(&mut stdout)
                .and_then(|_| stdout.flush())
                .context("Failed to print latency report")?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let config = resolve_config(&cli_args)?;
    init_logging(config.log_format)?;

    let ctx = RunContext::default();
    if let Err(err) = run(cli_args, config, &ctx).await {
        error!(parent: ctx.span(), "{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("asset-dbtest").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn sample_flag_accepts_bare_and_explicit_values() {
        for (args, expected) in [
            (vec!["dbload", "--records=5", "--sample=true"], true),
            (vec!["dbload", "--sample"], true),
            (vec!["dbload", "--sample=false"], false),
            (vec!["dbload"], false),
        ] {
            match parse(&args).command {
                Command::Dbload(load) => assert_eq!(load.sample, expected, "{:?}", args),
                other => panic!("expected dbload, got {:?}", other),
            }
        }
    }

    #[test]
    fn query_accepts_sample_true_with_sizes() {
        let cli_args = parse(&[
            "query",
            "--sample=true",
            "--samplesize=1",
            "--retrievesize=5",
        ]);
        match cli_args.command {
            Command::Query(query) => {
                assert!(query.sample);
                assert_eq!(query.samplesize, 1);
                assert_eq!(query.retrievesize, 5);
            }
            other => panic!("expected query, got {:?}", other),
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn dbload_lines_carry_service_field() {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let cli_args = parse(&["dbload", "--records=2", "--sample", "--dsn", "sqlite::memory:"]);
        let config = resolve_config(&cli_args).unwrap();
        let ctx = RunContext::default();
        run(cli_args, config, &ctx).await.unwrap();

        let output = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        for needle in ["Opening asset store", "Done, 2 records written"] {
            let line = output
                .lines()
                .find(|l| l.contains(needle))
                .unwrap_or_else(|| panic!("no {:?} line in {}", needle, output));
            assert!(line.contains("service=\"dbtest\""), "{}", line);
        }
    }

    #[test]
    fn zero_samplesize_is_rejected() {
        assert!(CliArgs::try_parse_from(["asset-dbtest", "query", "--samplesize=0"]).is_err());
    }
}
