//! Build command implementation.
//!
//! Combines each source directory into a sprite, optimizes it and writes
//! (or prints) the matching stylesheet.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser};

use crate::config::{runcontrol, Format, Manifest, Options, RC_FILENAME};
use crate::error::{Result, SpriteError};
use crate::optimizer::{PngOptimizer, Tool};
use crate::output::{display_path, plural, Printer};
use crate::sprite::{find_sprite_directories, Orientation, SpriteSet};
use crate::style::Stylesheet;

use super::files::{write_file, WriteOutcome};
use super::{Cli, Commands};

/// Rails directory scanned for sprite sources.
const RAILS_SOURCES: &str = "app/assets/images/sprites";
/// Rails default for combined images.
const RAILS_DESTINATION: &str = "app/assets/images/sprites";
/// Rails default for stylesheets.
const RAILS_STYLESHEETS: &str = "app/assets/stylesheets/sprites";

/// Combine image directories into sprites and write their stylesheets
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Source directories, one sprite per directory
    pub sources: Vec<PathBuf>,

    /// Directory for stylesheets (printed to stdout when omitted)
    #[arg(long, short)]
    pub stylesheets: Option<PathBuf>,

    /// Stylesheet format
    #[arg(long, short, value_enum)]
    pub format: Option<Format>,

    /// Directory for combined images (default: current directory)
    #[arg(long, short)]
    pub destination: Option<PathBuf>,

    /// Follow Rails asset pipeline conventions
    #[arg(long, short)]
    pub rails: bool,

    /// Use SCSS mixins instead of placeholder selectors
    #[arg(long)]
    pub mixin: bool,

    /// Root directory sprites are served from (URLs become absolute)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Custom stylesheet template
    #[arg(long, short)]
    pub template: Option<PathBuf>,

    /// Stack images left to right instead of top to bottom
    #[arg(long)]
    pub horizontal: bool,

    /// Pixels between images
    #[arg(long)]
    pub spacing: Option<u32>,

    /// Treat images as double density (retina)
    #[arg(long)]
    pub scale: bool,

    /// Skip PNG optimization
    #[arg(long)]
    pub no_optimize: bool,

    /// Embed SVG sources without minifying them
    #[arg(long)]
    pub no_optimize_svg: bool,

    /// Keep existing output files
    #[arg(long)]
    pub skip_existing: bool,

    /// Save these arguments to .spritefulrc for later runs
    #[arg(long)]
    pub save: bool,
}

/// Everything a build needs, resolved against the working directory.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub stylesheets: Option<PathBuf>,
    pub options: Options,
}

impl BuildPlan {
    /// Merge flags over the manifest. Relative paths resolve against `cwd`.
    pub fn resolve(args: &BuildArgs, manifest: &Manifest, raw_args: &[String], cwd: &Path) -> Self {
        let rails = args.rails || manifest.rails.unwrap_or(false);
        let absolute = |p: &PathBuf| cwd.join(p);

        let mut sources: Vec<PathBuf> = if args.sources.is_empty() {
            manifest.sources.iter().map(absolute).collect()
        } else {
            args.sources.iter().map(absolute).collect()
        };
        if rails {
            for dir in find_sprite_directories(&cwd.join(RAILS_SOURCES)) {
                if !sources.contains(&dir) {
                    sources.push(dir);
                }
            }
        }

        let rails_default = |path: &str| rails.then(|| PathBuf::from(path));
        let destination = args
            .destination
            .clone()
            .or_else(|| manifest.destination.clone())
            .or_else(|| rails_default(RAILS_DESTINATION))
            .map(|p| cwd.join(p))
            .unwrap_or_else(|| cwd.to_path_buf());
        let stylesheets = args
            .stylesheets
            .clone()
            .or_else(|| manifest.stylesheets.clone())
            .or_else(|| rails_default(RAILS_STYLESHEETS))
            .map(|p| cwd.join(p));

        let orientation = if args.horizontal {
            Orientation::Horizontal
        } else {
            manifest.orientation.unwrap_or_default()
        };

        let options = Options {
            format: args.format.or(manifest.format).unwrap_or_default(),
            orientation,
            spacing: args.spacing.or(manifest.spacing).unwrap_or(0),
            mixin: args.mixin || manifest.mixin.unwrap_or(false),
            rails,
            scale: args.scale || manifest.scale.unwrap_or(false),
            root: args.root.as_ref().or(manifest.root.as_ref()).map(absolute),
            template: args
                .template
                .as_ref()
                .or(manifest.template.as_ref())
                .map(absolute),
            optimize: !args.no_optimize && manifest.optimize.unwrap_or(true),
            optimize_svg: !args.no_optimize_svg && manifest.optimize_svg.unwrap_or(true),
            overwrite: !args.skip_existing,
            cli_args: raw_args.to_vec(),
        };

        Self {
            sources,
            destination,
            stylesheets,
            options,
        }
    }
}

/// Run `spriteful build` in the current directory. `raw_args` are the
/// arguments that followed `build` on the command line.
pub fn run(args: BuildArgs, raw_args: Vec<String>, printer: &Printer) -> Result<()> {
    let cwd = env::current_dir()?;
    run_in(args, raw_args, &cwd, printer)
}

/// Run `spriteful build` as if invoked from `cwd`.
pub fn run_in(args: BuildArgs, raw_args: Vec<String>, cwd: &Path, printer: &Printer) -> Result<()> {
    let manifest = Manifest::find(cwd)?.unwrap_or_default();
    let plan = BuildPlan::resolve(&args, &manifest, &raw_args, cwd);

    if !plan.sources.is_empty() {
        return execute(&plan, args.save, cwd, printer);
    }

    // Explicit sources are required when saving, so a replay never re-saves
    if args.save || !args.sources.is_empty() {
        return Err(no_sources());
    }

    let Some(saved) = runcontrol::load(cwd)? else {
        return Err(no_sources());
    };
    printer.info("Replaying", &format!("{} ({})", RC_FILENAME, saved.join(" ")));

    let replayed = parse_saved(&saved)?;
    let plan = BuildPlan::resolve(&replayed, &manifest, &saved, cwd);
    if plan.sources.is_empty() {
        return Err(no_sources());
    }
    execute(&plan, false, cwd, printer)
}

fn no_sources() -> SpriteError {
    SpriteError::Build {
        message: "No source directories to build".to_string(),
        help: Some(format!(
            "Pass directories as arguments, list them under `sources:` in spriteful.yaml, \
             or save a previous invocation with --save to {}",
            RC_FILENAME
        )),
    }
}

/// Parse a saved argument list as `build` arguments.
fn parse_saved(saved: &[String]) -> Result<BuildArgs> {
    let argv = ["spriteful", "build"]
        .into_iter()
        .map(String::from)
        .chain(saved.iter().cloned());
    let cli = Cli::try_parse_from(argv).map_err(|e| SpriteError::Parse {
        message: format!("Invalid arguments in {}: {}", RC_FILENAME, e),
        help: Some(format!("Fix or delete {}", RC_FILENAME)),
    })?;
    match cli.command {
        Commands::Build(args) => Ok(args),
        _ => Err(SpriteError::Parse {
            message: format!("{} does not hold build arguments", RC_FILENAME),
            help: Some(format!("Fix or delete {}", RC_FILENAME)),
        }),
    }
}

fn execute(plan: &BuildPlan, save: bool, cwd: &Path, printer: &Printer) -> Result<()> {
    let options = &plan.options;
    let optimizer = if options.optimize {
        PngOptimizer::detect()
    } else {
        PngOptimizer::with_tools(Vec::new())
    };
    if options.optimize && !optimizer.enabled() {
        let names: Vec<&str> = Tool::ALL.iter().map(|t| t.name()).collect();
        printer.warning(
            "Warning",
            &format!("No PNG optimizer found; install one of: {}", names.join(", ")),
        );
    }

    let mut built = 0;
    let mut failed = 0;

    for source in &plan.sources {
        let sprite = match combine_sprite(source, plan, &optimizer, printer) {
            Ok(sprite) => sprite,
            Err(e) => {
                failed += 1;
                printer.error("Failed", &format!("{}: {}", display_path(source), e));
                continue;
            }
        };

        if let Err(e) = write_stylesheet(&sprite, plan, cwd, printer) {
            failed += 1;
            printer.error(
                "Failed",
                &format!(
                    "stylesheet for {} ({} was written): {}",
                    sprite.name,
                    display_path(&sprite.path()),
                    e
                ),
            );
            continue;
        }
        built += 1;
    }

    if failed > 0 {
        return Err(SpriteError::Build {
            message: format!(
                "{} failed, {} built",
                plural(failed, "sprite", "sprites"),
                built
            ),
            help: None,
        });
    }

    if save {
        let args: Vec<String> = options
            .cli_args
            .iter()
            .filter(|a| a.as_str() != "--save")
            .cloned()
            .collect();
        runcontrol::save(cwd, &args)?;
        printer.info("Saved", RC_FILENAME);
    }

    printer.status("Finished", &plural(built, "sprite", "sprites"));
    Ok(())
}

/// Combine one source directory and write its image.
fn combine_sprite(
    source: &Path,
    plan: &BuildPlan,
    optimizer: &PngOptimizer,
    printer: &Printer,
) -> Result<SpriteSet> {
    printer.status("Scanning", &display_path(source));
    let mut sprite = SpriteSet::new(source, &plan.destination, &plan.options)?;
    let path = sprite.path();
    let blob = sprite.combine()?;
    let outcome = write_file(&path, blob, plan.options.overwrite)?;
    printer.status(
        "Combined",
        &format!(
            "{} ({}, {}x{})",
            sprite.name,
            plural(sprite.len(), "image", "images"),
            sprite.width,
            sprite.height
        ),
    );
    printer.status(outcome.verb(), &display_path(&path));

    if matches!(outcome, WriteOutcome::Created | WriteOutcome::Overwritten) && optimizer.enabled() {
        match optimizer.optimize(&path) {
            Ok(()) => {
                let tools: Vec<&str> = optimizer.tools().iter().map(|t| t.name()).collect();
                printer.status(
                    "Optimized",
                    &format!("{} ({})", display_path(&path), tools.join(", ")),
                );
            }
            Err(e) => printer.warning("Warning", &e.to_string()),
        }
    }

    Ok(sprite)
}

/// Render the stylesheet and write it, or print it when no stylesheet
/// directory is configured.
fn write_stylesheet(sprite: &SpriteSet, plan: &BuildPlan, cwd: &Path, printer: &Printer) -> Result<()> {
    match &plan.stylesheets {
        Some(dir) => {
            let stylesheet = Stylesheet::new(sprite, dir, &plan.options);
            let css = stylesheet.render()?;
            let path = stylesheet.path();
            let outcome = write_file(&path, css.as_bytes(), plan.options.overwrite)?;
            printer.status(outcome.verb(), &display_path(&path));
        }
        None => {
            let css = Stylesheet::new(sprite, cwd, &plan.options).render()?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(css.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
