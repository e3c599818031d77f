//! spawn_robots CLI

use clap::{Args, Parser, Subcommand, ValueEnum};
use spawn_robots::{
    generate_record, launch::LaunchDescription, literal_launch_description,
    load_launch_description, xml::to_launch_xml,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process,
};

#[derive(Parser)]
#[command(name = "spawn_robots")]
#[command(about = "Assemble Gazebo robot spawn launch descriptions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Two-robot factory cell with the built-in robot definitions
    Literal {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Robot groups read from a YAML configuration file
    Config {
        /// Robot configuration file
        path: PathBuf,

        /// Robots to include (default: all, in file order)
        #[arg(short, long = "robot")]
        robots: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Launch arguments (key:=value)
    #[arg(value_parser = parse_launch_arg)]
    args: Vec<(String, String)>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Record)]
    format: OutputFormat,

    /// Output file path (default depends on the format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Package install prefix (package=path), checked before AMENT_PREFIX_PATH
    #[arg(long = "package-prefix", value_parser = parse_package_prefix)]
    package_prefixes: Vec<(String, PathBuf)>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Resolved record.json
    Record,
    /// ROS 2 XML launch file
    Xml,
    /// Unresolved directive list as JSON
    Json,
}

impl OutputFormat {
    fn default_path(self) -> &'static str {
        match self {
            OutputFormat::Record => "record.json",
            OutputFormat::Xml => "spawn_robots.launch.xml",
            OutputFormat::Json => "directives.json",
        }
    }
}

fn parse_launch_arg(s: &str) -> Result<(String, String), String> {
    match s.split_once(":=") {
        Some((key, value)) if !key.is_empty() && !value.contains(":=") => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => Err(format!("Invalid launch argument format: {}", s)),
    }
}

fn parse_package_prefix(s: &str) -> Result<(String, PathBuf), String> {
    match s.split_once('=') {
        Some((package, prefix)) if !package.is_empty() && !prefix.is_empty() => {
            Ok((package.to_string(), PathBuf::from(prefix)))
        }
        _ => Err(format!("Invalid package prefix format (expected package=path): {}", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Literal { output } => {
            log::info!("Building literal two-robot launch description");
            literal_launch_description()
                .map_err(Into::into)
                .and_then(|description| write_output(&description, output))
        }
        Commands::Config {
            path,
            robots,
            output,
        } => {
            log::info!("Building launch description from {}", path.display());
            load_launch_description(&path, &robots)
                .map_err(Into::into)
                .and_then(|description| write_output(&description, output))
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn write_output(
    description: &LaunchDescription,
    output: OutputArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = output
        .output
        .unwrap_or_else(|| PathBuf::from(output.format.default_path()));

    let content = match output.format {
        OutputFormat::Record => {
            let cli_args: HashMap<String, String> = output.args.into_iter().collect();
            let prefixes: HashMap<String, PathBuf> = output.package_prefixes.into_iter().collect();
            let record = generate_record(description, cli_args, prefixes)?;
            log::info!("  {} nodes, {} includes", record.node.len(), record.include.len());
            record.to_json()?
        }
        OutputFormat::Xml => {
            warn_unused_args(&output.args);
            to_launch_xml(description)
        }
        OutputFormat::Json => {
            warn_unused_args(&output.args);
            description.to_json()?
        }
    };

    write_file(&path, &content)?;
    log::info!("Generated {}", path.display());
    Ok(())
}

fn warn_unused_args(args: &[(String, String)]) {
    if !args.is_empty() {
        log::warn!(
            "Launch arguments are only applied to record output; ignoring {} argument(s)",
            args.len()
        );
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}
