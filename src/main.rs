use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use structopt::StructOpt;

#[macro_use]
extern crate log;

use grib2_drt::config::Config;
use grib2_drt::grib::sections::sect5::TemplateNumber;
use grib2_drt::grib::{read_template, SliceBitReader, Template, TemplateDescriptor};

#[derive(Debug, StructOpt)]
#[structopt(name = "grib2-drt", about = "Decode GRIB2 Data Representation Templates and their packed values")]
struct Cli {
    /// config file
    #[structopt(long = "config", short = "c", parse(from_os_str))]
    config_file: Option<PathBuf>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(Debug, StructOpt)]
enum Command {
    /// Read a template header followed by its packed data and print the values
    Resolve {
        /// Data Representation Template number
        #[structopt(long = "template", short = "t")]
        template: u16,
        /// Number of packed values
        #[structopt(long = "num-vals", short = "n")]
        num_vals: usize,
        /// Header octets followed by the data section
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
    /// Print the descriptor of the template header found at the start of a file
    Describe {
        #[structopt(long = "template", short = "t")]
        template: u16,
        #[structopt(long = "num-vals", short = "n")]
        num_vals: usize,
        #[structopt(parse(from_os_str))]
        input: PathBuf,
    },
    /// Decode a data section with a template descriptor
    Decode {
        /// JSON template descriptor
        #[structopt(long = "descriptor", short = "d", parse(from_os_str))]
        descriptor: PathBuf,
        /// Data section
        #[structopt(parse(from_os_str))]
        data: PathBuf,
    },
}

fn main() {
    let args = Cli::from_args();

    let config = match &args.config_file {
        Some(path) => Config::load(path),
        None => Ok(Config::default()),
    };

    let log = config.as_ref().map(|c| c.log.clone()).unwrap_or_else(|_| Config::default().log);
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log)).init();

    let result = config
        .context("Error loading config")
        .and_then(|config| run(&config, args.command));

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Resolve { template, num_vals, input } => {
            let input = read(&input)?;
            let mut reader = SliceBitReader::new(&input);

            let template = read_template(&mut reader, TemplateNumber(template), num_vals)?;
            info!("Decode {} values with template {}", num_vals, template.number());

            let values = template.read_all_data(&mut reader)?;
            println!("{}", config.render(&values)?);
        }
        Command::Describe { template, num_vals, input } => {
            let input = read(&input)?;
            let template = read_template(&mut SliceBitReader::new(&input), TemplateNumber(template), num_vals)?;

            println!("{}", serde_json::to_string(&TemplateDescriptor::from(&template))?);
        }
        Command::Decode { descriptor, data } => {
            let template = Template::load(&descriptor)
                .with_context(|| format!("Error loading descriptor `{}`", descriptor.display()))?;
            info!("Decode {} values with template {}", template.num_vals(), template.number());

            let data = read(&data)?;
            let values = template.read_all_data(&mut SliceBitReader::new(&data))?;
            println!("{}", config.render(&values)?);
        }
    }

    Ok(())
}

fn read(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Error reading `{}`", path.display()))
}
