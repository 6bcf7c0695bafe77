use crate::config::{Config, Mode};
use crate::errors::ProcessorError::{self, CommandLineError};
use clap::{App, Arg, ArgMatches};
use rusoto_core::Region;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug)]
pub struct Cli {
    maybe_local: Option<String>,
    maybe_region: Option<String>,
    maybe_queue: Option<String>,
    maybe_retries: Option<String>,
    maybe_deadline: Option<String>,
    debug: bool,
}

impl Cli {
    pub fn new() -> Self {
        let matches = get_matches();
        Cli {
            maybe_local: matches.value_of("local").map(|s| s.to_owned()),
            maybe_region: matches.value_of("region").map(|s| s.to_owned()),
            maybe_queue: matches.value_of("queue").map(|s| s.to_owned()),
            maybe_retries: matches.value_of("retries").map(|s| s.to_owned()),
            maybe_deadline: matches.value_of("deadline").map(|s| s.to_owned()),
            debug: matches.is_present("debug"),
        }
    }

    #[cfg(test)]
    fn new_with(
        maybe_local: Option<String>,
        maybe_region: Option<String>,
        maybe_queue: Option<String>,
    ) -> Self {
        Cli {
            maybe_local,
            maybe_region,
            maybe_queue,
            maybe_retries: None,
            maybe_deadline: None,
            debug: false,
        }
    }

    pub fn determine_mode(&self) -> Result<Mode, ProcessorError> {
        if self.debug {
            return Ok(Mode::Debug);
        }
        if let Some(queue) = self.maybe_queue.clone() {
            if let Some(port_string) = self.maybe_local.clone() {
                port_string
                    .parse::<u32>()
                    .map_err(|_| CommandLineError("Invalid Port"))
                    .map(|port| Mode::Local(port, queue.to_owned()))
            } else if let Some(region_string) = self.maybe_region.clone() {
                Region::from_str(region_string.as_ref())
                    .map_err(|_| CommandLineError("Invalid region specified"))
                    .map(|region| Mode::AWS(region, queue.to_owned()))
            } else {
                Err(CommandLineError(
                    "No local or region parameter was specified",
                ))
            }
        } else {
            Err(CommandLineError("No queue was specified"))
        }
    }

    pub fn determine_config(&self) -> Result<Config, ProcessorError> {
        let mut config = Config::default().with_mode(self.determine_mode()?);
        if let Some(retries_string) = self.maybe_retries.clone() {
            let retries = retries_string
                .parse::<u64>()
                .map_err(|_| CommandLineError("Invalid retries value"))?;
            config = config.with_retries(retries);
        }
        if let Some(deadline_string) = self.maybe_deadline.clone() {
            let seconds = deadline_string
                .parse::<u64>()
                .map_err(|_| CommandLineError("Invalid deadline value"))?;
            config = config.with_batch_deadline(Duration::from_secs(seconds));
        }
        Ok(config)
    }
}

fn get_matches<'a>() -> ArgMatches<'a> {
    App::new("rs-sqs-redriver")
        .version("0.1")
        .about("Redrives a batch of messages off of an SQS queue")
        .arg(
            Arg::with_name("local")
                .short("l")
                .long("local")
                .help("Run against a local Elastic MQ server running on port")
                .value_name("PORT")
                .takes_value(true)
                .conflicts_with_all(&["region", "debug"])
                .required_unless_one(&["region", "debug"]),
        )
        .arg(
            Arg::with_name("region")
                .short("r")
                .long("region")
                .help("The Amazon region of the sqs server")
                .value_name("REGION")
                .takes_value(true)
                .conflicts_with_all(&["local", "debug"])
                .required_unless_one(&["local", "debug"]),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .long("debug")
                .help("Process a synthetic batch without touching any queue"),
        )
        .arg(
            Arg::with_name("queue")
                .short("q")
                .long("queue")
                .help("The url of the queue")
                .value_name("QUEUE")
                .takes_value(true)
                .conflicts_with("debug")
                .required_unless("debug"),
        )
        .arg(
            Arg::with_name("retries")
                .long("retries")
                .help("Maximum attempts per message before it counts as failed")
                .value_name("RETRIES")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("deadline")
                .long("deadline")
                .help("Overall batch deadline in seconds")
                .value_name("SECONDS")
                .takes_value(true),
        )
        .get_matches()
}
