//! Install command

use std::sync::Arc;

use anyhow::Result;
use ghinst_schema::Target;

use crate::Cli;
use crate::ops::{self, Context};
use crate::ui::Output;

/// Install the release named on the command line.
pub async fn install(cli: &Cli, output: &Output) -> Result<()> {
    let target = Target::parse(&cli.target)?;
    let ctx = Context::from_cli(cli, Arc::new(output.clone()))?;

    match ops::install::install(&ctx, &target).await {
        Ok(outcome) => {
            output.result(&format!(
                "installed {} ({}) -> {}",
                target.repo,
                outcome.tag,
                outcome.installed.link.display()
            ));
            Ok(())
        }
        Err(e) => {
            if let Some(names) = e.available_assets() {
                output.available_assets(names);
            }
            Err(e.into())
        }
    }
}
