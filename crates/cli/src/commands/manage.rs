use anyhow::Result;

use legwork_core::command::Executor;
use legwork_core::probe::PythonProbe;
use legwork_core::{Config, ManageTasks};

pub fn manage_command(config: &Config, executor: &dyn Executor, args: &[String]) -> Result<()> {
    let probe = PythonProbe;
    ManageTasks::new(config, executor, &probe).manage(args)?;
    Ok(())
}

pub fn test_command(config: &Config, executor: &dyn Executor, args: &[String]) -> Result<()> {
    let probe = PythonProbe;
    ManageTasks::new(config, executor, &probe).test(args)?;
    Ok(())
}

pub fn syncdb_command(config: &Config, executor: &dyn Executor, args: &[String]) -> Result<()> {
    let probe = PythonProbe;
    ManageTasks::new(config, executor, &probe).syncdb(args)?;
    Ok(())
}

pub fn shell_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PythonProbe;
    ManageTasks::new(config, executor, &probe).shell()?;
    Ok(())
}

pub fn start_command(config: &Config, executor: &dyn Executor) -> Result<()> {
    let probe = PythonProbe;
    ManageTasks::new(config, executor, &probe).start()?;
    Ok(())
}
