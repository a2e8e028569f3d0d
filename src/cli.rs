//! Command-line arguments and command dispatch.

use dynamodb_bulk::bulk::Bulk;
use dynamodb_bulk::common::key::TableKeys;
use dynamodb_bulk::config::{self, ClientConfig, DumpOptions, SeedOptions};
use dynamodb_bulk::emitter::Publisher;
use dynamodb_bulk::error::Result;
use dynamodb_bulk::write::common::RetryConfig;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Span;

/// Purge, dump and seed DynamoDB tables.
#[derive(Debug, Parser)]
#[command(name = "dynamodb-bulk", version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options available to all commands.
#[derive(Args, Clone, Debug)]
pub struct GlobalOptions {
    /// Log at debug level instead of showing a spinner.
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Print what would be written without writing anything.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// AWS region.
    #[arg(long, default_value = config::DEFAULT_REGION, global = true)]
    pub aws_region: String,
}

/// Bulk commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Delete every item of a table using batched deletes.
    Purge(PurgeArgs),

    /// Write every item of a table to a JSON file.
    Dump(DumpArgs),

    /// Put every item of a JSON file into a table.
    Seed(SeedArgs),
}

#[derive(Args, Debug)]
pub struct PurgeArgs {
    /// Table name.
    #[arg(short, long)]
    pub table: String,

    /// DynamoDB endpoint to connect to instead of the AWS one.
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Name of the partition key.
    #[arg(short, long, default_value = "pk")]
    pub partition_key: String,

    /// Name of the sort key. Empty for tables without one.
    #[arg(short, long, default_value = "sk")]
    pub sort_key: String,

    /// Resubmissions of unprocessed deletes allowed per batch.
    #[arg(long, default_value_t = RetryConfig::default().max_retries)]
    pub max_retries: usize,

    /// Delay before the first resubmission, in milliseconds. Doubles on each one.
    #[arg(long, default_value_t = 50)]
    pub retry_delay_ms: u64,
}

impl PurgeArgs {
    fn retry(&self) -> RetryConfig {
        let defaults = RetryConfig::default();
        let initial_delay = Duration::from_millis(self.retry_delay_ms);
        RetryConfig {
            max_retries: self.max_retries,
            initial_delay,
            max_delay: defaults.max_delay.max(initial_delay),
        }
    }
}

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Table name.
    #[arg(short, long)]
    pub table: String,

    /// File to write the items to.
    #[arg(short, long)]
    pub path: PathBuf,

    /// DynamoDB endpoint to connect to instead of the AWS one.
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Attributes to extract, comma separated. Nested attributes use dots.
    #[arg(short, long, value_delimiter = ',')]
    pub attributes: Vec<String>,

    /// Page size of each scan call.
    #[arg(short, long)]
    pub limit: Option<i32>,

    /// Filter expression, e.g. '#s = :s'.
    #[arg(short, long)]
    pub filter: Option<String>,

    /// Attribute name substitutions, e.g. '#s=status,#t=type'.
    #[arg(short = 'N', long, default_value = "")]
    pub expression_attribute_names: String,

    /// Attribute value substitutions, e.g. ':s=active'. Values are strings.
    #[arg(short = 'V', long, default_value = "")]
    pub expression_attribute_values: String,

    /// Write items in DynamoDB's tagged form.
    #[arg(short = 'R', long)]
    pub raw_output: bool,
}

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Table name.
    #[arg(short, long)]
    pub table: String,

    /// JSON file holding an array of items.
    #[arg(short, long)]
    pub file: PathBuf,

    /// DynamoDB endpoint to connect to instead of the AWS one.
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Read items in DynamoDB's tagged form.
    #[arg(short = 'R', long)]
    pub raw_input: bool,
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Purge(_) => "purge",
            Self::Dump(_) => "dump",
            Self::Seed(_) => "seed",
        }
    }

    /// Validate the arguments, connect and run the command.
    pub async fn execute(
        self,
        global: &GlobalOptions,
        publisher: &dyn Publisher,
        cancel: CancellationToken,
        span: Span,
    ) -> Result<()> {
        match self {
            Self::Purge(args) => {
                let table_name = config::table_name(&args.table)?;
                let keys = TableKeys::new(&args.partition_key, Some(args.sort_key.as_str()))?;
                let client = ClientConfig::new(&global.aws_region, args.endpoint.as_deref())?
                    .connect()
                    .await;
                Bulk::new(&client, publisher, cancel, span)
                    .with_dry_run(global.dry_run)
                    .with_retry(args.retry())
                    .purge(&table_name, &keys)
                    .await?;
            }
            Self::Dump(args) => {
                let table_name = config::table_name(&args.table)?;
                let options = DumpOptions::new(
                    &args.attributes,
                    args.limit,
                    args.filter.as_deref(),
                    &args.expression_attribute_names,
                    &args.expression_attribute_values,
                    args.raw_output,
                )?;
                let client = ClientConfig::new(&global.aws_region, args.endpoint.as_deref())?
                    .connect()
                    .await;
                let bulk = Bulk::new(&client, publisher, cancel, span).with_dry_run(global.dry_run);
                if global.dry_run {
                    bulk.dump(&table_name, &mut tokio::io::sink(), &options)
                        .await?;
                } else {
                    if let Some(parent) = args
                        .path
                        .parent()
                        .filter(|parent| !parent.as_os_str().is_empty())
                    {
                        tokio::fs::create_dir_all(parent).await?;
                    }
                    let file = tokio::fs::File::create(&args.path).await?;
                    let mut writer = tokio::io::BufWriter::new(file);
                    bulk.dump(&table_name, &mut writer, &options).await?;
                }
            }
            Self::Seed(args) => {
                let table_name = config::table_name(&args.table)?;
                let options = SeedOptions {
                    raw_input: args.raw_input,
                };
                let mut file = tokio::fs::File::open(&args.file).await?;
                let client = ClientConfig::new(&global.aws_region, args.endpoint.as_deref())?
                    .connect()
                    .await;
                Bulk::new(&client, publisher, cancel, span)
                    .with_dry_run(global.dry_run)
                    .seed(&table_name, &mut file, &options)
                    .await?;
            }
        }
        Ok(())
    }
}
