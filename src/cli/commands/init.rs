//! `jobroute init` command - create a new project

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};

use crate::core::project::{Project, ProjectError, JOBS_DIR, PROJECT_DIR};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rewrite the configuration even if .jobroute/ already exists
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    if !path.exists() {
        std::fs::create_dir_all(&path).into_diagnostic()?;
        println!(
            "{} Created directory {}",
            style("✓").green(),
            style(path.display()).cyan()
        );
    }

    let project = if args.force {
        Project::init_force(&path)
    } else {
        Project::init(&path)
    };

    match project {
        Ok(project) => {
            println!(
                "{} Initialized jobroute project at {}",
                style("✓").green(),
                style(project.root().display()).cyan()
            );
            println!();
            print_structure(project.root());
            println!();
            println!("Next steps:");
            println!(
                "  {} Create your first job",
                style("jobroute job new --number 170888").yellow()
            );
            println!(
                "  {} Show departments and operations",
                style("jobroute catalog").yellow()
            );
            Ok(())
        }
        Err(ProjectError::AlreadyExists(path)) => {
            println!(
                "{} jobroute project already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!(
                "Use {} to reinitialize",
                style("jobroute init --force").yellow()
            );
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}

fn print_structure(root: &Path) {
    let config = format!("{}/config.yaml", PROJECT_DIR);
    let jobs = format!("{}/", JOBS_DIR);
    for entry in [config.as_str(), jobs.as_str()] {
        if root.join(entry).exists() {
            println!("  {}", style(entry).dim());
        }
    }
}
