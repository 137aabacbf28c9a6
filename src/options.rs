use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;

use crate::backend::Aslr;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "JDB (jason's debugger)")]
pub struct Options {
    pub executable: PathBuf,
    #[arg(long, short = 'p', required = false)]
    pub pid: Option<i32>,
    /// Attach to the first process matching this name instead of
    /// launching `executable` (spec.md §4.6 `attach_name`).
    #[arg(long, required = false)]
    pub name: Option<String>,
    /// Block until a matching process starts, rather than failing
    /// immediately when no match exists yet.
    #[arg(long, required = false, default_value_t = false)]
    pub wait_for_launch: bool,
    #[arg(long, required = false, default_value_t = false)]
    pub no_aslr: bool,
    #[arg(long, required = false)]
    pub history_file: Option<PathBuf>,
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if let Some(pid) = self.pid
            && pid <= 0
        {
            return Err(anyhow!("PID must be greater than zero: {:?}", pid));
        }
        if self.pid.is_some() && self.name.is_some() {
            return Err(anyhow!("--pid and --name are mutually exclusive"));
        }
        Ok(())
    }

    pub fn aslr(&self) -> Aslr {
        if self.no_aslr {
            Aslr::Disabled
        } else {
            Aslr::Enabled
        }
    }

    pub fn launch_type(&self) -> LaunchType {
        if let Some(pid) = self.pid {
            LaunchType::AttachPid(pid)
        } else if let Some(name) = &self.name {
            LaunchType::AttachName(name.clone())
        } else {
            LaunchType::Launch
        }
    }
}

/// How the inferior is obtained (spec.md §4.6: launch vs. the two
/// attach variants).
#[derive(Clone, Debug)]
pub enum LaunchType {
    Launch,
    AttachPid(i32),
    AttachName(String),
}
