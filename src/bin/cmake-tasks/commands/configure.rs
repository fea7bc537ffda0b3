//! `cmake-tasks configure` command

use std::path::Path;

use anyhow::Result;

use crate::cli::ConfigureArgs;
use cmake_tasks::core::{TaskKind, DEFAULT_CONFIGURE_TASK};
use cmake_tasks::util::GlobalContext;

pub fn execute(args: ConfigureArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let name = args.task.as_deref().unwrap_or(DEFAULT_CONFIGURE_TASK);

    super::execute_task(
        &ctx,
        manifest_path,
        name,
        Some(TaskKind::Configure),
        args.overrides(ctx.cwd()),
        args.common.dry_run,
    )
}
