//! Command implementations
//!
//! Each command works through its targets one advisory at a time. A target
//! that fails to load or evaluate is logged and skipped.

use std::collections::BTreeSet;
use std::io::Write;

use tracing::{error, info};

use crate::advisory::render;
use crate::advisory::types::Advisory;
use crate::cli::context::Context;
use crate::version::catalog::PackageVersionRecord;
use crate::version::resolver::{Resolution, UpgradeStrategy};

/// Load each expanded target, logging the ones that fail
fn advisories(ctx: &Context, targets: &[String]) -> impl Iterator<Item = Advisory> {
    ctx.expand_targets(targets)
        .into_iter()
        .filter_map(|target| match ctx.repository.load(&target) {
            Ok(advisory) => Some(advisory),
            Err(e) => {
                error!("Failed to load {}: {}", target, e);
                None
            }
        })
}

pub fn list(
    ctx: &Context,
    targets: &[String],
    only_affected: bool,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let evaluator = ctx.evaluator();
    for advisory in advisories(ctx, targets) {
        let vulnerable = match evaluator.is_vulnerable(&advisory) {
            Ok(vulnerable) => vulnerable,
            Err(e) => {
                error!("Failed to check {}: {}", advisory.id, e);
                continue;
            }
        };
        if only_affected && !vulnerable {
            continue;
        }

        let applied = match ctx.applied.contains(&advisory.id) {
            Ok(applied) => applied,
            Err(e) => {
                error!("{}", e);
                false
            }
        };
        let marker = if applied {
            "[A]"
        } else if vulnerable {
            "[N]"
        } else {
            "[U]"
        };
        writeln!(
            out,
            "{} {} {} ({})",
            advisory.id,
            marker,
            advisory.title,
            advisory.packages().join(" ")
        )?;
    }
    Ok(())
}

pub fn dump(ctx: &Context, targets: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
    for advisory in advisories(ctx, targets) {
        writeln!(out, "{}", render::dump(&advisory, ctx.print_width))?;
    }
    Ok(())
}

pub fn test(ctx: &Context, targets: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
    let evaluator = ctx.evaluator();
    for advisory in advisories(ctx, targets) {
        match evaluator.is_vulnerable(&advisory) {
            Ok(true) => writeln!(out, "{}", advisory.id)?,
            Ok(false) => {}
            Err(e) => error!("Failed to check {}: {}", advisory.id, e),
        }
    }
    Ok(())
}

pub fn pretend(
    ctx: &Context,
    targets: &[String],
    strategy: UpgradeStrategy,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let evaluator = ctx.evaluator();
    for advisory in advisories(ctx, targets) {
        let table = match evaluator.affection_table(&advisory, strategy) {
            Ok(table) => table,
            Err(e) => {
                error!("Failed to check {}: {}", advisory.id, e);
                continue;
            }
        };
        let merge: BTreeSet<&PackageVersionRecord> = table
            .iter()
            .flat_map(|(_, resolution)| resolution.upgrades())
            .collect();

        writeln!(out, "Checking GLSA {}", advisory.id)?;
        let mut affected = false;
        for (_, resolution) in &table {
            if let Resolution::Affected(pairs) = resolution {
                affected = true;
                for pair in pairs {
                    writeln!(out, "     {pair}")?;
                }
            }
        }
        if !affected {
            writeln!(out, "  >>> this system is not affected")?;
        } else if merge.is_empty() {
            writeln!(out, "  >>> no upgrades available for this GLSA")?;
        } else {
            writeln!(out, "  The following updates will be performed for this GLSA:")?;
            for record in &merge {
                writeln!(out, "     {record}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn inject(ctx: &Context, targets: &[String], out: &mut dyn Write) -> anyhow::Result<()> {
    for advisory in advisories(ctx, targets) {
        match ctx.applied.add(&advisory.id) {
            Ok(true) => {
                info!("Injected {}", advisory.id);
                writeln!(out, "injecting {}", advisory.id)?;
            }
            Ok(false) => writeln!(out, "{} is already applied", advisory.id)?,
            Err(e) => error!("Failed to inject {}: {}", advisory.id, e),
        }
    }
    Ok(())
}
