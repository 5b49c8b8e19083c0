//! Reset command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, ResetArgs};
use crate::commands::common::{database_path, load_project, open_warehouse, ExitCode};

/// Execute the reset command
pub(crate) fn execute(args: &ResetArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let path = database_path(&project, global);

    if !args.yes {
        eprintln!("Refusing to drop every table in {path} without --yes");
        return Err(ExitCode(1).into());
    }

    let warehouse = open_warehouse(&project, global)?;
    warehouse
        .reset()
        .with_context(|| format!("Failed to reset warehouse at {path}"))?;

    println!("Reset warehouse at {path}");
    Ok(())
}
