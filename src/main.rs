use blog_viz::{config, features::FeatureFlags, generate, output, scan, toc};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Name of the scan manifest inside the temp directory.
const POSTS_MANIFEST: &str = "posts.json";

/// Shared flags for commands that generate artifacts.
#[derive(clap::Args, Clone)]
struct GenerateArgs {
    /// Disable the generation cache and rewrite every artifact
    #[arg(long)]
    no_cache: bool,

    /// Day the heatmap ends on (YYYY-MM-DD); defaults to the current UTC date
    #[arg(long)]
    today: Option<NaiveDate>,
}

impl GenerateArgs {
    fn options(&self) -> generate::GenerateOptions {
        let mut options = generate::GenerateOptions::at(Utc::now());
        if let Some(today) = self.today {
            options.today = today;
        }
        options.use_cache = !self.no_cache;
        options
    }
}

#[derive(Parser)]
#[command(name = "blog-viz")]
#[command(about = "Activity heatmap, tag treemap and TOC data for a static blog")]
#[command(long_about = "\
Activity heatmap, tag treemap and TOC data for a static blog

Post frontmatter is the data source. Dated, published posts become per-day
activity; their tags become a (optionally hierarchical) treemap.

Content structure:

  content/
  ├── config.toml                  # Visualization config (optional)
  ├── github-events.json           # Saved GitHub events (optional)
  ├── hello-world.md               # Post
  └── rust/
      ├── index.md                 # Category index (excluded from charts)
      └── ownership.mdx            # Post

Output:

  public/
  ├── activity-data.json
  ├── tag-data.json
  ├── visualization-stats.json
  └── visualizations.html          # Static preview

Run 'blog-viz gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory for the artifacts
    #[arg(long, default_value = "public", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (scan manifest)
    #[arg(long, default_value = ".blog-viz-temp", global = true)]
    temp_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a post manifest
    Scan,
    /// Write the JSON artifacts and preview from the post manifest
    Generate(GenerateArgs),
    /// Run the full pipeline: scan → generate
    Build(GenerateArgs),
    /// Validate the configuration and show the effective feature flags
    Check {
        /// Also print the resolved configuration
        #[arg(long)]
        verbose: bool,
    },
    /// Print the table of contents of a post
    Toc {
        /// Post slug or source path relative to the content directory
        post: String,
    },
    /// Remove generated artifacts and intermediate files
    Clean,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _logger = flexi_logger::Logger::try_with_env_or_str(&cli.log_level)?
        .log_to_stderr()
        .start()?;

    match &cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, config_present(&cli.source));
        }
        Command::Generate(args) => {
            let manifest_content = std::fs::read_to_string(cli.temp_dir.join(POSTS_MANIFEST))?;
            let manifest: scan::PostManifest = serde_json::from_str(&manifest_content)?;
            let report = generate::generate(&manifest, &cli.source, &cli.output, &args.options())?;
            output::print_generate_output(&report);
        }
        Command::Build(args) => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, config_present(&cli.source));

            println!("==> Stage 2: Generating → {}", cli.output.display());
            let report = generate::generate(&manifest, &cli.source, &cli.output, &args.options())?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check { verbose } => {
            println!("==> Checking {}", cli.source.display());
            let loaded = config::load_config(&cli.source)?;
            let validation = loaded.config.validate();
            let flags = FeatureFlags::new(loaded.config.clone());
            output::print_check_output(&flags, &validation, &loaded.warnings);
            if *verbose {
                println!();
                for line in output::format_config(&loaded.config) {
                    println!("{}", line);
                }
            }
            validation?;
        }
        Command::Toc { post } => {
            let manifest = scan::scan(&cli.source)?;
            let found = manifest
                .posts
                .iter()
                .find(|p| p.slug == *post || p.source_path == *post)
                .ok_or_else(|| format!("no post with slug or path '{post}'"))?;
            let items = toc::post_toc(found, &manifest.config.toc);
            output::print_toc_output(found, items.as_deref());
        }
        Command::Clean => {
            for name in generate::cleanup(&cli.output)? {
                println!("Removed {}", cli.output.join(name).display());
            }
            let manifest_path = cli.temp_dir.join(POSTS_MANIFEST);
            if manifest_path.exists() {
                std::fs::remove_file(&manifest_path)?;
                println!("Removed {}", manifest_path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn write_manifest(manifest: &scan::PostManifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join(POSTS_MANIFEST), json)
}

fn config_present(source: &Path) -> bool {
    source.join(config::CONFIG_FILENAME).exists()
}
