use anyhow::Result;

use legwork_core::command::Executor;
use legwork_core::probe::PathProbe;
use legwork_core::{Config, DocsTasks};

pub fn docs_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).docs()?;
    Ok(())
}

pub fn clean_docs_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).clean_docs()?;
    Ok(())
}

/// `rsync-docs` always uploads a fresh build, so the `docs` task runs
/// first.
pub fn rsync_docs_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    let tasks = DocsTasks::new(config, executor, &probe);
    tasks.docs()?;
    tasks.rsync_docs()?;
    Ok(())
}

pub fn ghpages_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).ghpages()?;
    Ok(())
}

pub fn showhtml_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).show_html()?;
    Ok(())
}

pub fn showpdf_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).show_pdf()?;
    Ok(())
}

pub fn pdf_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    DocsTasks::new(config, executor, &probe).pdf()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use legwork_core::command::RecordingExecutor;

    #[test]
    fn test_rsync_docs_builds_the_docs_before_uploading() {
        let mut config = Config::default();
        config.docs.upload_location = Some("deploy@host:/srv/docs".to_string());
        let executor = RecordingExecutor::new();

        rsync_docs_command(&config, &executor).unwrap();

        let calls = executor.recorded();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].program, "make");
        assert_eq!(calls[1].program, "rsync");
    }

    #[test]
    fn test_rsync_docs_does_not_upload_when_the_build_fails() {
        let mut config = Config::default();
        config.docs.upload_location = Some("deploy@host:/srv/docs".to_string());
        let executor = RecordingExecutor::failing_at(0);

        assert!(rsync_docs_command(&config, &executor).is_err());
        assert_eq!(executor.recorded().len(), 1, "rsync must not run");
    }
}
