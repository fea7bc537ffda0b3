//! `cmake-tasks tasks` command

use std::path::Path;

use anyhow::Result;

use cmake_tasks::ops::Project;
use cmake_tasks::util::GlobalContext;

pub fn execute(manifest_path: Option<&Path>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let project = Project::load(&ctx, manifest_path)?;

    for (name, kind) in project.config.task_names()? {
        println!("{:<24} {}", name, kind);
    }

    Ok(())
}
