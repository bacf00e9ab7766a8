//! Build pipeline: sequential stage driver.
//!
//! A pipeline is an ordered, fixed sequence of stages. The runner executes
//! them strictly one-after-another; the first failure stops scheduling and
//! surfaces unmodified to the caller. Completed stages are never rolled
//! back: the output root is recreated from a clean state on the next run.

mod context;
pub mod stages;

pub use context::BuildContext;

use anyhow::{Result, bail};

/// One unit of the build pipeline.
///
/// A stage signals completion exactly once through its return value. Each
/// stage may mutate the filesystem; the runner itself only sequences.
pub trait Stage {
    /// Stage name for logging.
    fn name(&self) -> &'static str;

    /// Execute the stage.
    fn run(&self, ctx: &BuildContext) -> Result<()>;
}

/// Strictly sequential stage driver.
///
/// Constructed once, consumed once per run. A hung stage hangs the
/// pipeline; there is no built-in timeout.
pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineRunner {
    /// Create a runner over a non-empty stage list.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Result<Self> {
        if stages.is_empty() {
            bail!("pipeline requires at least one stage");
        }
        Ok(Self { stages })
    }

    /// Run all stages in order.
    ///
    /// Stage N+1 starts only after stage N returned success. The first
    /// error is returned as-is, without wrapping, so the failing stage's
    /// error value reaches the top-level caller untouched.
    pub fn run(self, ctx: &BuildContext) -> Result<()> {
        let total = self.stages.len();
        for (index, stage) in self.stages.into_iter().enumerate() {
            crate::debug!("build"; "[{}/{}] {}", index + 1, total, stage.name());
            stage.run(ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, thiserror::Error)]
    #[error("stage blew up: {0}")]
    struct Boom(&'static str);

    struct Recording {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    }

    impl Stage for Recording {
        fn name(&self) -> &'static str {
            self.name
        }

        fn run(&self, _ctx: &BuildContext) -> Result<()> {
            self.log.borrow_mut().push(self.name);
            if self.fail {
                return Err(Boom(self.name).into());
            }
            Ok(())
        }
    }

    fn stage(
        name: &'static str,
        log: &Rc<RefCell<Vec<&'static str>>>,
        fail: bool,
    ) -> Box<dyn Stage> {
        Box::new(Recording {
            name,
            log: Rc::clone(log),
            fail,
        })
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert!(PipelineRunner::new(Vec::new()).is_err());
    }

    #[test]
    fn test_stages_run_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let runner = PipelineRunner::new(vec![
            stage("clean", &log, false),
            stage("copy", &log, false),
            stage("archive", &log, false),
        ])
        .unwrap();

        runner.run(&BuildContext::for_tests()).unwrap();
        assert_eq!(*log.borrow(), vec!["clean", "copy", "archive"]);
    }

    #[test]
    fn test_failure_stops_scheduling() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let runner = PipelineRunner::new(vec![
            stage("clean", &log, false),
            stage("copy", &log, true),
            stage("archive", &log, false),
        ])
        .unwrap();

        let err = runner.run(&BuildContext::for_tests()).unwrap_err();
        // Stage after the failing one never executed
        assert_eq!(*log.borrow(), vec!["clean", "copy"]);
        assert!(err.to_string().contains("copy"));
    }

    #[test]
    fn test_error_propagates_unmodified() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let runner = PipelineRunner::new(vec![stage("minify", &log, true)]).unwrap();

        let err = runner.run(&BuildContext::for_tests()).unwrap_err();
        // The error value reaching the caller is exactly the stage's error
        let boom = err.downcast_ref::<Boom>().expect("original error type");
        assert_eq!(boom.0, "minify");
    }
}
