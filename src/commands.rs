//! CLI command implementations

use crate::config::{OutputFormat, Settings};
use crate::output::{render_modules, render_paths};
use anyhow::Context;
use monoscope_core::{ImpactAnalyzer, with_root_module};
use monoscope_git::{ChangeSetOptions, GitRepository};
use std::path::{Path, PathBuf};

/// Revision range to diff.
pub struct Revisions {
    pub base: String,
    pub head: String,
}

pub fn impacted(root: &Path, settings: &Settings, revisions: &Revisions, path_only: bool) -> anyhow::Result<()> {
    let mut changes = changed_dirs(root, settings, revisions)?;
    tracing::info!("Found {} changed paths", changes.len());

    if settings.include_root_module {
        changes = with_root_module(root, changes)?;
    }

    let mut analyzer = ImpactAnalyzer::new(root);
    let modules = analyzer
        .impacted(&changes)
        .context("resolving impacted modules")?;
    tracing::info!("{} modules impacted", modules.len());

    emit(render_modules(&modules, settings.format, path_only)?);
    Ok(())
}

pub fn changed(root: &Path, settings: &Settings, revisions: &Revisions) -> anyhow::Result<()> {
    let changes = changed_dirs(root, settings, revisions)?;
    tracing::info!("Found {} changed paths", changes.len());

    emit(render_paths(&changes, settings.format)?);
    Ok(())
}

pub fn dependents(
    root: &Path,
    module: &Path,
    include_self: bool,
    format: OutputFormat,
    path_only: bool,
) -> anyhow::Result<()> {
    tracing::info!("Resolving dependents of {}", module.display());

    let mut analyzer = ImpactAnalyzer::new(root);
    let modules = analyzer
        .dependents_of(module, include_self)
        .with_context(|| format!("finding dependents of {}", module.display()))?;

    emit(render_modules(&modules, format, path_only)?);
    Ok(())
}

fn changed_dirs(root: &Path, settings: &Settings, revisions: &Revisions) -> anyhow::Result<Vec<PathBuf>> {
    let repo = GitRepository::open(root)?;
    let opts = ChangeSetOptions::new(settings.depth, settings.regex()?);
    let changes = repo
        .changed_paths(&revisions.base, &revisions.head, &opts)
        .with_context(|| {
            format!(
                "computing changes between {:?} and {:?}",
                revisions.base, revisions.head
            )
        })?;
    Ok(changes)
}

fn emit(rendered: String) {
    if !rendered.is_empty() {
        println!("{rendered}");
    }
}
