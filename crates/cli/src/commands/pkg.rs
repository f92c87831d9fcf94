use anyhow::Result;

use legwork_core::command::Executor;
use legwork_core::probe::PathProbe;
use legwork_core::{Config, PkgTasks};

pub fn pip_install_command(
    config: &Config,
    executor: &dyn Executor,
    args: &[String],
) -> Result<()> {
    let probe = PathProbe;
    PkgTasks::new(config, executor, &probe).pip_install(args)?;
    Ok(())
}

pub fn easy_install_command(
    config: &Config,
    executor: &dyn Executor,
    args: &[String],
) -> Result<()> {
    let probe = PathProbe;
    PkgTasks::new(config, executor, &probe).easy_install(args)?;
    Ok(())
}

pub fn pypi_pip_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    PkgTasks::new(config, executor, &probe).pypi_pip()?;
    Ok(())
}

pub fn pypi_easy_install_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    PkgTasks::new(config, executor, &probe).pypi_easy_install()?;
    Ok(())
}

pub fn pypi_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PathProbe;
    PkgTasks::new(config, executor, &probe).pypi()?;
    Ok(())
}
