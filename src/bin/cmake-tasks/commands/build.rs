//! `cmake-tasks build` command

use std::path::Path;

use anyhow::Result;

use crate::cli::BuildArgs;
use cmake_tasks::core::{TaskKind, DEFAULT_BUILD_TASK};
use cmake_tasks::util::GlobalContext;

pub fn execute(args: BuildArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let name = args.task.as_deref().unwrap_or(DEFAULT_BUILD_TASK);

    super::execute_task(
        &ctx,
        manifest_path,
        name,
        Some(TaskKind::Build),
        args.overrides(ctx.cwd()),
        args.common.dry_run,
    )
}
