use clap::{Parser, Subcommand};
use frontstage::output::{Console, Reporter};
use frontstage::{collect, config, materialize};
use std::path::PathBuf;

/// Shared flags for commands that collect resources.
#[derive(clap::Args, Clone)]
struct CollectArgs {
    /// Additional resource location (directory or zip archive); repeatable
    #[arg(long = "from", value_name = "LOCATION")]
    from: Vec<PathBuf>,
}

#[derive(Parser)]
#[command(name = "frontstage")]
#[command(about = "Stages frontend assets and bundler configuration for web projects")]
#[command(long_about = "\
Stages frontend assets and bundler configuration for web projects

Dependencies ship frontend resources under conventional roots; frontstage
pulls them out of directories and zip archives into one flat folder the
bundler can serve, then writes the bundler and dev-server configuration
files patched to the project layout.

Resource roots recognized inside each location:

  resources/frontend/           # .js .css .ts .map (current layout)
  resources/static/frontend/    # .js .css .ts .map (legacy layout)
  resources/**/themes/**        # theme files, archive locations only

Project layout after a full build:

  <project root>/
  ├── frontstage.toml               # optional config
  ├── bundler.config.js             # user-owned; created once
  ├── bundler.generated.js          # tool-owned; rewritten every run
  ├── devserver.config.js           # user-owned; created once
  ├── devserver.generated.js        # tool-owned; rewritten every run
  ├── devserver-plugin-inline-css.js
  └── build/
      └── bundled-frontend/         # collected resources, flattened

Run 'frontstage gen-config' to print a documented frontstage.toml.")]
#[command(version)]
struct Cli {
    /// Project root directory
    #[arg(long, default_value = ".", global = true)]
    project_root: PathBuf,

    /// Config file (defaults to <project-root>/frontstage.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show per-location and per-file detail
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Collect frontend resources from the configured locations
    Collect(CollectArgs),
    /// Materialize bundler and dev-server configuration files
    Config,
    /// Run the full pipeline: collect → config
    Build(CollectArgs),
    /// Load and validate the project configuration without writing anything
    Check,
    /// Print a stock frontstage.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let reporter = Console::new(cli.verbose);

    match &cli.command {
        Command::Collect(args) => {
            let project = load_project(&cli)?;
            run_collect(&project, args, &reporter)?;
        }
        Command::Config => {
            let project = load_project(&cli)?;
            run_materialize(&project, &reporter)?;
        }
        Command::Build(args) => {
            let project = load_project(&cli)?;

            println!("==> Stage 1: Collecting frontend resources");
            run_collect(&project, args, &reporter)?;

            println!("==> Stage 2: Materializing bundler configuration");
            run_materialize(&project, &reporter)?;

            println!("==> Build complete: {}", project.root.display());
        }
        Command::Check => {
            let project = load_project(&cli)?;
            println!("==> Checking {}", project.config_path.display());
            print_layout(&project);
            println!("==> Configuration is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// A loaded project: root directory plus validated config.
struct Project {
    root: PathBuf,
    config_path: PathBuf,
    config: config::ProjectConfig,
}

fn load_project(cli: &Cli) -> Result<Project, config::ConfigError> {
    let root = cli.project_root.clone();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => root.join(config::CONFIG_FILE_NAME),
    };
    let config = config::load_config(&config_path)?;
    Ok(Project {
        root,
        config_path,
        config,
    })
}

fn run_collect(
    project: &Project,
    args: &CollectArgs,
    reporter: &impl Reporter,
) -> Result<(), collect::CollectError> {
    let target = project.root.join(&project.config.bundled_frontend_dir);
    let locations = project
        .config
        .locations
        .iter()
        .map(|location| project.root.join(location))
        .chain(args.from.iter().cloned());
    let options = collect::CollectOptions::new(target, locations);
    collect::collect(&options, reporter)?;
    Ok(())
}

fn run_materialize(
    project: &Project,
    reporter: &impl Reporter,
) -> Result<(), materialize::MaterializeError> {
    let options = materialize::MaterializeOptions::for_project(&project.root, &project.config);
    materialize::materialize(&options, reporter)
}

/// Print the resolved layout for `check`.
fn print_layout(project: &Project) {
    let root = &project.root;
    let config = &project.config;
    println!("Project root:       {}", root.display());
    println!(
        "Frontend sources:   {}",
        root.join(&config.frontend_dir).display()
    );
    println!(
        "Collector target:   {}",
        root.join(&config.bundled_frontend_dir).display()
    );
    println!(
        "Bundler output:     {}",
        root.join(&config.build_output_dir).display()
    );
    if config.locations.is_empty() {
        println!("Resource locations: none");
        return;
    }
    println!("Resource locations: {}", config.locations.len());
    for location in &config.locations {
        let path = root.join(location);
        let state = if path.exists() { "" } else { " (missing)" };
        println!("  {}{}", path.display(), state);
    }
}
