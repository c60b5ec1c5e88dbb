use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use camino::Utf8PathBuf;
use tracing::{error, info};

use crate::cli::{Cli, Command};
use crate::materialize::{ErrorPolicy, Materializer};
use crate::tree::TreeNode;
use crate::{blueprint, config, fsops, render};

const DEFAULT_DESCRIPTION: &str = "skeleton.toml";

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::from(&cli);
    match cli.command.unwrap_or(Command::Create) {
        Command::Create => handle_create(&ctx),
        Command::Show => handle_show(&ctx),
        Command::Generate { path, force } => handle_generate(&ctx, path, force),
    }
}

/// Flags shared by every command.
#[derive(Debug)]
struct CliContext {
    chdir: Option<PathBuf>,
    file: Option<PathBuf>,
    dry_run: bool,
    keep_going: bool,
}

impl From<&Cli> for CliContext {
    fn from(cli: &Cli) -> Self {
        Self {
            chdir: cli.chdir.clone(),
            file: cli.file.clone(),
            dry_run: cli.dry_run,
            keep_going: cli.keep_going,
        }
    }
}

impl CliContext {
    fn destination(&self) -> Result<Utf8PathBuf> {
        match &self.chdir {
            Some(dir) => utf8(dir.clone()),
            None => current_working_dir(),
        }
    }

    fn load_tree(&self) -> Result<TreeNode> {
        match &self.file {
            Some(file) => {
                let path = utf8(file.clone())?;
                info!(description = %path, "loading description");
                config::load_from_path(&path)
            }
            None => Ok(blueprint::default_tree()),
        }
    }

    fn materializer(&self) -> Materializer {
        let policy = if self.keep_going {
            ErrorPolicy::BestEffort
        } else {
            ErrorPolicy::FailFast
        };
        Materializer::new(policy, self.dry_run)
    }
}

fn handle_create(ctx: &CliContext) -> Result<()> {
    let tree = ctx.load_tree()?;
    let destination = ctx.destination()?;

    if !ctx.dry_run {
        fsops::ensure_directory(&destination)
            .with_context(|| format!("preparing destination {}", destination))?;
    }

    let report = ctx
        .materializer()
        .run(&destination, &tree)
        .with_context(|| format!("creating skeleton under {}", destination))?;

    if !report.is_success() {
        let count = report.failures.len();
        let mut summary = format!(
            "{} {} could not be created under {}",
            count,
            if count == 1 { "entry" } else { "entries" },
            destination
        );
        for failure in report.failures {
            let path = failure.path().clone();
            let line = format!("{:#}", anyhow::Error::from(failure));
            error!(path = %path, "{}", line);
            summary.push_str("\n  ");
            summary.push_str(&line);
        }
        bail!(summary);
    }

    info!(
        destination = %destination,
        directories = report.directories,
        files = report.files,
        "skeleton complete"
    );
    if ctx.dry_run {
        println!(
            "Dry run: would create {} directories and {} files under {}.",
            report.directories, report.files, destination
        );
    } else {
        println!("File structure created successfully.");
    }
    Ok(())
}

fn handle_show(ctx: &CliContext) -> Result<()> {
    let tree = ctx.load_tree()?;
    let destination = ctx.destination()?;
    let name = destination.file_name().unwrap_or(destination.as_str());
    print!("{}", render::listing(name, &tree));
    Ok(())
}

fn handle_generate(ctx: &CliContext, path: Option<PathBuf>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => utf8(path)?,
        None => Utf8PathBuf::from(DEFAULT_DESCRIPTION),
    };
    let target = match &ctx.chdir {
        Some(dir) if target.is_relative() => utf8(dir.clone())?.join(target),
        _ => target,
    };
    if ctx.dry_run {
        println!("Dry run: would write the built-in description to {}.", target);
        return Ok(());
    }
    config::write_description(&target, &blueprint::default_tree(), force)?;
    println!("Wrote description to {}.", target);
    Ok(())
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|p| anyhow!("path {} is not valid UTF-8", p.display()))
}

fn current_working_dir() -> Result<Utf8PathBuf> {
    let cwd = std::env::current_dir().context("determining current directory")?;
    utf8(cwd)
}
