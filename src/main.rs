use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pgm_dataset::{Config, Converter, Reporter, Result};

/// Path and size overrides shared by every subcommand. Unset flags keep the
/// value from the config file, or the built-in default.
#[derive(Args, Debug, Default)]
struct Overrides {
    /// Input root holding one directory per class
    #[clap(short, long, value_parser)]
    input: Option<PathBuf>,
    /// Output root, mirrored per class
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,
    #[clap(long, value_parser)]
    width: Option<u32>,
    #[clap(long, value_parser)]
    height: Option<u32>,
    /// Source extension, without the dot
    #[clap(long, value_parser)]
    extension: Option<String>,
}

impl Overrides {
    fn apply(self, mut config: Config) -> Config {
        if let Some(input) = self.input {
            config.input_dir = input;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(extension) = self.extension {
            config.extension = extension;
        }
        config
    }
}

/// Convert every image to a grayscale PGM (the default)
#[derive(Parser, Debug, Default)]
struct Convert {
    #[clap(flatten)]
    overrides: Overrides,
}

impl Convert {
    fn exec(self, config: Config, reporter: Reporter) -> Result<()> {
        Converter::new(self.overrides.apply(config), reporter).run()?;
        Ok(())
    }
}

/// List what would be converted, without writing anything
#[derive(Parser, Debug)]
struct Scan {
    #[clap(flatten)]
    overrides: Overrides,
}

impl Scan {
    fn exec(self, config: Config, reporter: Reporter) -> Result<()> {
        Converter::new(self.overrides.apply(config), reporter).plan()?;
        Ok(())
    }
}

#[derive(Subcommand, Debug)]
enum SubCommand {
    Convert(Convert),
    Scan(Scan),
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// YAML or JSON file with input_dir, output_dir, width, height, extension
    #[clap(short, long, global = true, value_parser)]
    config: Option<PathBuf>,
    /// Only print errors
    #[clap(short, long, global = true)]
    quiet: bool,
    #[clap(subcommand)]
    command: Option<SubCommand>,
}

impl Cli {
    fn exec(self, reporter: Reporter) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        match self.command.unwrap_or_else(|| SubCommand::Convert(Convert::default())) {
            SubCommand::Convert(convert) => convert.exec(config, reporter),
            SubCommand::Scan(scan) => scan.exec(config, reporter),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let reporter = Reporter::new(cli.quiet);
    if let Err(error) = cli.exec(reporter) {
        reporter.error(&error);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_default_convert() {
        let cli = Cli::try_parse_from(["pgm_dataset"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "pgm_dataset", "convert", "-i", "photos", "--width", "28", "--height", "28", "-q",
        ])
        .unwrap();
        assert!(cli.quiet);

        let config = match cli.command {
            Some(SubCommand::Convert(convert)) => convert.overrides.apply(Config::default()),
            other => panic!("unexpected subcommand: {:?}", other),
        };
        assert_eq!(config.input_dir, PathBuf::from("photos"));
        assert_eq!(config.output_dir, PathBuf::from("pgm_images"));
        assert_eq!((config.width, config.height), (28, 28));
    }

    #[test]
    fn scan_accepts_global_config() {
        let cli = Cli::try_parse_from(["pgm_dataset", "scan", "--config", "dataset.yaml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dataset.yaml")));
        assert!(matches!(cli.command, Some(SubCommand::Scan(_))));
    }
}
