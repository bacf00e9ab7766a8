//! `dspack build` entry point.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use crate::config::{OutputMode, ToolConfig};
use crate::log;
use crate::pipeline::{BuildContext, PipelineRunner, stages::packaging_stages};

/// Run the packaging pipeline once.
///
/// Any stage failure aborts the run and surfaces through `main` unmodified;
/// partial output is worse than a hard stop.
pub fn run_build(config: &ToolConfig, mode: OutputMode) -> Result<()> {
    let started = Instant::now();
    log!("build"; "packaging in {} mode", mode.as_str());

    let stages = packaging_stages(config);
    let stage_count = stages.len();
    let context = BuildContext::resolve(Arc::new(config.clone()), mode)?;
    let runner = PipelineRunner::new(stages)?;
    runner.run(&context)?;

    log!(
        "build";
        "{} v{} packaged ({} stages, {:.2?}) -> {}",
        config.package.display_name,
        context.metadata.version,
        stage_count,
        started.elapsed(),
        context.layout.output_root.display()
    );
    Ok(())
}
