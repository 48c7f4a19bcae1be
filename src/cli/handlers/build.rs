//! Build command handler

use crate::config::{Mode, Settings};
use crate::error::AppResult;
use crate::pipeline::{BuildPlan, BuildReport, Bundler, EntryStatus};

pub struct BuildCommandHandler {
    config: Settings,
    mode: Mode,
}

impl BuildCommandHandler {
    pub fn new(config: Settings, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub fn execute(&self, dry_run: bool) -> AppResult<()> {
        let plan = self.plan()?;
        if dry_run {
            println!("{}", plan.to_json()?);
            return Ok(());
        }

        let report = Bundler::new(&plan).run()?;
        println!(
            "Built {} files into {} ({} left for the JS toolchain)",
            report.manifest.len(),
            plan.output_dir.display(),
            report.manifest.count(EntryStatus::Pending)
        );
        Ok(())
    }

    pub fn plan(&self) -> AppResult<BuildPlan> {
        let env = super::resolve_env(&self.config, self.mode);
        Ok(BuildPlan::new(&self.config, self.mode, &env, self.config.build.analyze)?)
    }

    pub fn run(&self) -> AppResult<BuildReport> {
        let plan = self.plan()?;
        Ok(Bundler::new(&plan).run()?)
    }
}
