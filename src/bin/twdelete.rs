use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use twdelete::{
    archive, cli,
    config::Config,
    filter::Criteria,
    output,
    twitter::{self, Client},
    Error, Result,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let opts: Opts = Opts::parse();

    if let Err(error) = cli::init_logging(opts.verbose, opts.debug, opts.logfile.as_deref()) {
        eprintln!("{} (exiting)", error);
        std::process::exit(1);
    }

    if let Err(error) = run(opts).await {
        log::error!("{} (exiting)", error);
        log::logger().flush();
        std::process::exit(1);
    }
}

async fn run(opts: Opts) -> Result<()> {
    let started = Instant::now();

    cli::check_options(opts.skip_auth, opts.delete, opts.archive.is_some())?;

    let criteria = Criteria::from_args(
        opts.start_date.as_deref(),
        opts.end_date.as_deref(),
        opts.retweets,
        opts.replies,
    )?;

    let client = if opts.skip_auth {
        log::warn!("Skipping OAuth with Twitter!");
        None
    } else {
        let config_path = match &opts.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        let config = Config::from_file(&config_path)?;
        let client = Client::from_config(&config).await?;
        log::info!("Authenticated with Twitter as {}", client.screen_name());

        if !client.screen_name().eq_ignore_ascii_case(&opts.username) {
            log::warn!(
                "Authenticated as {}, not {}",
                client.screen_name(),
                opts.username
            );
        }

        Some(client)
    };

    let records = match (&opts.archive, &client) {
        (Some(path), _) => archive::load_filter_archive(path, &criteria)?,
        (None, Some(client)) => client.filter_timeline(&criteria).await?,
        (None, None) => return Err(Error::InvalidOptions("no archive file or API client")),
    };
    log::info!("Filtered set contains {} records for deletion", records.len());

    if let Some(path) = &opts.outfile {
        output::write_records(path, &records)?;
    }

    if opts.delete {
        if let Some(client) = &client {
            let report = twitter::delete_records(client, &records).await;
            log::info!(
                "Deleted {} records, skipped {}",
                report.deleted,
                report.skipped.len()
            );
        }
    }

    log::info!("Time taken: {:.2}s", started.elapsed().as_secs_f64());
    Ok(())
}

#[derive(Parser)]
#[clap(name = "twdelete", version, author)]
/// Filter and delete tweets and direct messages by date and type
struct Opts {
    /// Twitter username
    username: String,
    /// Path to Twitter archive file
    #[clap(short, long)]
    archive: Option<PathBuf>,
    /// Write filtered records to this file
    #[clap(short, long)]
    outfile: Option<PathBuf>,
    /// YAML file containing Twitter API keys (default: ~/.twitter/twdelete/conf.yml)
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Start date for deletion (YYYY-MM-DD)
    #[clap(long)]
    start_date: Option<String>,
    /// End date for deletion (YYYY-MM-DD)
    #[clap(long)]
    end_date: Option<String>,
    /// Only delete tweets that are retweets
    #[clap(long)]
    retweets: bool,
    /// Only delete tweets that are replies
    #[clap(long)]
    replies: bool,
    /// Report verbose progress to log
    #[clap(short, long)]
    verbose: bool,
    /// Report debug messages to log
    #[clap(long)]
    debug: bool,
    /// Log file location
    #[clap(short, long)]
    logfile: Option<PathBuf>,
    /// Actually delete records from Twitter
    #[clap(long)]
    delete: bool,
    /// Skip Twitter OAuth (e.g. for searching an archive)
    #[clap(long)]
    skip_auth: bool,
}
