use std::{ffi::OsStr, path::Path};

use colored::Colorize;

use crate::{dataset::ImageFolder, Error, Summary};

/// Colored status lines for a run. Errors go to stderr and ignore `quiet`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    pub quiet: bool,
}

impl Reporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    pub fn silent() -> Self {
        Self { quiet: true }
    }

    pub fn start(&self, input: &Path, output: &Path, count: usize) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} image(s) from {} into {}",
            "converting".cyan().bold(),
            count,
            input.display(),
            output.display()
        );
    }

    pub fn converted(&self, source: &Path, target: &Path) {
        if self.quiet {
            return;
        }
        println!("{} {} -> {}", "converted".green(), source.display(), target.display());
    }

    pub fn planned(&self, source: &Path, target: &Path) {
        if self.quiet {
            return;
        }
        println!("  {} -> {}", source.display(), target.display());
    }

    pub fn class_header(&self, class: &OsStr, count: usize) {
        if self.quiet {
            return;
        }
        println!("{}: {} image(s)", class.to_string_lossy().bold(), count);
    }

    pub fn summary(&self, summary: &Summary) {
        if self.quiet {
            return;
        }
        for (class, count) in &summary.per_class {
            println!("{:>12} {}", count.to_string().bold(), class.to_string_lossy());
        }
        println!("{} {} image(s)", "done".green().bold(), summary.converted);
    }

    pub fn scan(&self, folder: &ImageFolder) {
        if self.quiet {
            return;
        }
        println!(
            "{} {} image(s) in {} class(es) under {}",
            "found".cyan().bold(),
            folder.len(),
            folder.classes().len(),
            folder.root().display()
        );
    }

    pub fn error(&self, error: &Error) {
        eprintln!("{} {}", "error:".red().bold(), error);
    }
}
