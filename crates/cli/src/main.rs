//! `sitcom` command line.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use log::{Level, LevelFilter};
use sitcom::{Input, Sitcom, SitcomOptions, Wrap};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "sitcom", version, about = "Bundle markdown documents into HTML")]
struct Cli {
    /// Entry markdown file or mapping name
    #[arg(value_name = "ENTRY")]
    input: Option<String>,

    /// Use this config file (.json, .yaml or .yml) [default: .sitcomrc.json]
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    dist: Option<PathBuf>,

    /// Output file (if absent, prints to stdout)
    #[arg(short = 'o', long, value_name = "OUTPUT")]
    file: Option<PathBuf>,

    /// Content to insert at the top of every document
    #[arg(long)]
    intro: Option<String>,

    /// Content to insert at the end of every document
    #[arg(long)]
    outro: Option<String>,

    /// Don't print warnings to the console
    #[arg(long)]
    silent: bool,

    /// Markdown appended to every document, usually link definitions
    #[arg(long, value_name = "FILE")]
    declare: Option<PathBuf>,

    /// Working directory
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Print pipeline steps
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Applies command line flags over the config file values.
    fn merge_into(self, mut options: SitcomOptions) -> SitcomOptions {
        if let Some(input) = self.input {
            options.input = Some(Input::from(input));
        }
        if self.root.is_some() {
            options.root = self.root;
        }
        if self.silent {
            options.silent = Some(true);
        }
        if self.declare.is_some() {
            options.declare = self.declare;
        }
        if self.dist.is_some() {
            options.output.dist = self.dist;
        }
        if self.file.is_some() {
            options.output.file = self.file;
        }
        if let Some(intro) = self.intro {
            options.output.intro = Some(Wrap::Text(intro));
        }
        if let Some(outro) = self.outro {
            options.output.outro = Some(Wrap::Text(outro));
        }
        options
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("cannot read the working directory")?;
    let options = config::load(cli.config.as_deref(), &cwd)?;
    let options = cli.merge_into(options);

    let sitcom = Sitcom::new();
    let mut bundle = sitcom.make(options).await?;
    let report = bundle.write().await?;
    if let Some(outfile) = report.outfile {
        log::info!("Success! {}", outfile.display());
    }
    Ok(())
}

fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "[err] ",
        Level::Warn => "[warn]",
        Level::Info => "[ok]  ",
        Level::Debug | Level::Trace => "[log] ",
    }
}

/// Level-tagged lines on stdout; `RUST_LOG` overrides the level.
fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(env_logger::Target::Stdout)
        .format(|buf, record| writeln!(buf, "{} {}", tag(record.level()), record.args()))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let started = Instant::now();
    let cli = Cli::parse();
    init_logger(if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });

    let code = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    };
    println!("Done in {:.2}s", started.elapsed().as_secs_f64());
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_values() {
        let cli = Cli::parse_from(["sitcom", "doc.md", "-d", "build", "--intro", "<main>", "--silent"]);
        let config = SitcomOptions {
            input: Some(Input::from("from-config.md")),
            root: Some(PathBuf::from("docs")),
            ..Default::default()
        };

        let options = cli.merge_into(config);
        assert_eq!(options.input, Some(Input::from("doc.md")));
        assert_eq!(options.root, Some(PathBuf::from("docs")));
        assert_eq!(options.output.dist, Some(PathBuf::from("build")));
        assert_eq!(options.silent, Some(true));
        assert!(matches!(options.output.intro, Some(Wrap::Text(ref text)) if text == "<main>"));
        assert!(options.output.file.is_none());
    }

    #[test]
    fn library_errors_convert_into_anyhow() {
        let err: anyhow::Error = sitcom::Error::Config("\"input\" is required".into()).into();
        assert_eq!(err.to_string(), "configuration error: \"input\" is required");
    }

    #[test]
    fn level_tags_line_up() {
        assert_eq!(tag(Level::Warn), "[warn]");
        assert_eq!(tag(Level::Info).len(), tag(Level::Warn).len());
        assert_eq!(tag(Level::Trace), tag(Level::Debug));
    }

    #[test]
    fn command_line_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
