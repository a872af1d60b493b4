//! Purge command (drop superseded versions)

use anyhow::Result;
use ghinst_core::Reporter;
use ghinst_core::store;
use ghinst_schema::Target;

use crate::Cli;
use crate::ops::context::resolve_layout;
use crate::ui::Output;

/// Keep only the most recently installed version of the named package.
pub fn purge(cli: &Cli, output: &Output) -> Result<()> {
    let target = Target::parse(&cli.target)?;
    if let Some(tag) = &target.tag {
        output.warning(&format!("ignoring @{tag}: purge keeps the newest install"));
    }

    let layout = resolve_layout(cli)?;
    let removed = store::purge(&layout, &target.owner, &target.repo, output)?;

    if removed.is_empty() {
        output.info(&format!(
            "nothing to purge for {} in {}",
            target.slug(),
            layout.root().display()
        ));
    } else {
        output.success(&format!(
            "purged {} old version{} of {}",
            removed.len(),
            if removed.len() == 1 { "" } else { "s" },
            target.slug()
        ));
    }
    Ok(())
}
