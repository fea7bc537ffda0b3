//! `cmake-tasks run` command

use std::path::Path;

use anyhow::Result;

use crate::cli::RunArgs;
use cmake_tasks::util::config::SettingsConfig;
use cmake_tasks::util::GlobalContext;

pub fn execute(args: RunArgs, manifest_path: Option<&Path>) -> Result<()> {
    let ctx = GlobalContext::new()?;

    super::execute_task(
        &ctx,
        manifest_path,
        &args.task,
        None,
        SettingsConfig::default(),
        args.dry_run,
    )
}
