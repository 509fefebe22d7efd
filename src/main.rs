use std::{
    error::Error,
    fs,
    io::{self, Read},
    path::PathBuf,
    str::FromStr,
};

use chrono::{Local, TimeZone, Utc};
use stopboard::{
    collector,
    query::{StopTimesQuery, HSL_ENDPOINT},
    ranker, render, Config, Timestamp,
};
use structopt::StructOpt;

#[macro_use]
extern crate log;

#[derive(StructOpt, Debug)]
#[structopt(name = "stopboard", about = "Departure board for Digitransit stops")]
struct Opts {
    #[structopt(long, default_value = "17", env = "STOPBOARD_MAX_ROWS")]
    max_rows: usize,
    #[structopt(long, default_value = "360", env = "STOPBOARD_NEAR_THRESHOLD")]
    near_threshold: i64,
    #[structopt(long, default_value = "120", env = "STOPBOARD_REQUEST_OFFSET")]
    request_offset: i64,
    /// Reference time in epoch seconds; defaults to the system clock.
    #[structopt(long)]
    now: Option<Timestamp>,
    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt, Debug)]
enum Command {
    /// Print the GraphQL request body for the given stops.
    Query {
        #[structopt(long = "stop", required = true, env = "STOPBOARD_STOPS", use_delimiter = true)]
        stops: Vec<String>,
        #[structopt(long, default_value = "17")]
        departures_per_stop: u32,
        /// Print a JSON body instead of plain GraphQL.
        #[structopt(long)]
        json: bool,
    },
    /// Render a saved API response, read from FILE or stdin.
    Render {
        #[structopt(parse(from_os_str))]
        input: Option<PathBuf>,
        #[structopt(long, default_value = "table")]
        format: OutputFormat,
        /// Show clock times in UTC instead of the local zone.
        #[structopt(long)]
        utc: bool,
        /// One list per route mode.
        #[structopt(long)]
        by_mode: bool,
    },
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown format '{}'", other)),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    pretty_env_logger::formatted_timed_builder()
        .parse_filters(&std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let opts = Opts::from_args();
    let now = opts.now.unwrap_or_else(|| Utc::now().timestamp());

    let mut config = Config {
        max_rows: opts.max_rows,
        near_threshold_secs: opts.near_threshold,
        request_offset_secs: opts.request_offset,
        ..Config::default()
    };

    match opts.command {
        Command::Query {
            stops,
            departures_per_stop,
            json,
        } => {
            config.stop_ids = stops;
            config.departures_per_stop = departures_per_stop;

            info!("POST to {}", HSL_ENDPOINT);
            let query = StopTimesQuery::new(&config, now);
            if json {
                println!("{}", query.to_json_body());
            } else {
                println!("{}", query.to_graphql());
            }
        }
        Command::Render {
            input,
            format,
            utc,
            by_mode,
        } => {
            let body = match input {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut body = String::new();
                    io::stdin().read_to_string(&mut body)?;
                    body
                }
            };

            if utc {
                render_board(&body, now, &config, &Utc, format, by_mode)?;
            } else {
                render_board(&body, now, &config, &Local, format, by_mode)?;
            }
        }
    }

    Ok(())
}

fn render_board<Tz: TimeZone>(
    body: &str,
    now: Timestamp,
    config: &Config,
    tz: &Tz,
    format: OutputFormat,
    by_mode: bool,
) -> Result<(), Box<dyn Error>> {
    let departures = match collector::collect(body) {
        Ok(departures) => departures,
        Err(err) => {
            error!("{}", err);
            println!("{}", render::error_message(&err));
            return Ok(());
        }
    };
    info!(
        "Ranking {} departures, at most {} rows",
        departures.len(),
        config.max_rows
    );

    if by_mode {
        let groups = ranker::rank_by_mode(departures, now, config, tz);
        match format {
            OutputFormat::Json => println!("{}", render::json(&groups)?),
            OutputFormat::Csv => {
                let rows: Vec<_> = groups.into_values().flatten().collect();
                render::write_csv(&rows, io::stdout())?;
            }
            OutputFormat::Table => {
                for (mode, rows) in groups {
                    println!("[{}]", mode);
                    print!("{}", render::table(&rows));
                }
            }
        }
    } else {
        let rows = ranker::rank(departures, now, config, tz);
        match format {
            OutputFormat::Json => println!("{}", render::json(&rows)?),
            OutputFormat::Csv => render::write_csv(&rows, io::stdout())?,
            OutputFormat::Table => print!("{}", render::table(&rows)),
        }
    }

    Ok(())
}
