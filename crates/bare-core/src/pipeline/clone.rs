use tracing::info;

use crate::detect;
use crate::git;
use crate::pipeline::{Pipeline, PipelineError};
use crate::progress::{ProgressSink, Reporter};
use crate::registry::types::Repository;

impl Pipeline {
    /// Clone a remote into the workspace layout and return a populated
    /// [`Repository`] record (the caller owns persisting it to whatever
    /// registry it uses).
    pub fn clone_repository(
        &self,
        url: &str,
        target_dir: &str,
        sink: Box<dyn ProgressSink>,
    ) -> Result<Repository, PipelineError> {
        let mut reporter = Reporter::new(sink);
        match self.run_clone(url, target_dir, &mut reporter) {
            Ok(repository) => {
                reporter.complete();
                Ok(repository)
            }
            Err(e) => {
                reporter.fail(e.to_string());
                Err(e)
            }
        }
    }

    fn run_clone(
        &self,
        url: &str,
        target_dir: &str,
        reporter: &mut Reporter,
    ) -> Result<Repository, PipelineError> {
        let op_id = uuid::Uuid::new_v4().to_string();
        info!(
            event = "core.pipeline.clone_started",
            op_id = %op_id,
            url = url,
            target = target_dir
        );

        reporter.line("Starting clone...");
        let root = git::clone::clone_repository(&self.config, url, target_dir, reporter)?;
        reporter.line("Clone complete!");

        reporter.line("Detecting repository type...");
        let kind = detect::detect_repo_kind(&root);
        reporter.line(format!("Detected type: {}", kind));

        let remote_url = git::clone::remote_url(&root);
        let repository = Repository::new(target_dir.to_string(), root, remote_url, kind);

        info!(
            event = "core.pipeline.clone_completed",
            op_id = %op_id,
            repository_id = %repository.id,
            path = %repository.path.display(),
            kind = %repository.kind
        );

        Ok(repository)
    }
}
