//! `cmake-tasks doctor` command

use std::path::Path;

use anyhow::Result;

use cmake_tasks::core::SystemHost;
use cmake_tasks::ops::{doctor, format_report};
use cmake_tasks::util::GlobalContext;

pub fn execute(verbose: bool, manifest_path: Option<&Path>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let report = doctor(&ctx, manifest_path, &SystemHost)?;

    print!("{}", format_report(&report, verbose));

    // Exit with error code if required checks failed
    if !report.all_required_passed() {
        std::process::exit(1);
    }

    Ok(())
}
