use anyhow::{Result, anyhow};
use tracing::trace;

use crate::history::CommandHistory;
use crate::options::Options;
use crate::process::Process;
use crate::registry::{self, RegistryId};
use crate::stoppoint::watchpoint::{WatchKind, WatchSize};
use crate::stoppoint::{BreakpointId, VirtualAddress, WatchpointId};

pub struct Debugger {
    /// Flag if the program is currently being debugged.
    debugging: bool,
    /// A log of all the commands executed against the debugger, historical and current.
    history: CommandHistory,
    /// This debugger's entry in the process-wide registry, removed on
    /// `Command::Quit`.
    registry_id: Option<RegistryId>,
}

impl Debugger {
    pub fn new(options: &Options) -> Result<Debugger> {
        let history = CommandHistory::new(options.history_file.clone())?;
        // A second `Debugger` in the same process is fine; only the
        // first call actually opens the registry.
        match registry::init() {
            Ok(()) | Err(_) => {}
        }
        let registry_id = registry::register(options.executable.display().to_string())?;
        Ok(Debugger {
            debugging: false,
            history,
            registry_id: Some(registry_id),
        })
    }

    pub fn next(&mut self, command: String, process: &mut Process) -> Result<DispatchResult> {
        let mut command = command;
        if command.is_empty() {
            trace!("next editor command is empty line, will replay last command");
            match self.history.last_command() {
                Some(cmd) => command = cmd,
                None => return Ok(DispatchResult::Normal),
            }
        } else {
            self.history.add(&command)?;
        }

        let cmd = Command::try_from(command)?;
        let result = self.dispatch_command(cmd, process)?;

        Ok(result)
    }

    fn dispatch_command(
        &mut self,
        command: Command,
        process: &mut Process,
    ) -> Result<DispatchResult> {
        let mut res = DispatchResult::Normal;
        match command {
            Command::Run(args) => {
                process.launch(args)?;
                self.debugging = true;
            }
            Command::Continue => {
                process.resume()?;
            }
            Command::Halt => {
                process.halt()?;
            }
            Command::Breakpoint(cmd) => {
                process.breakpoint_command(cmd)?;
            }
            Command::Watchpoint(cmd) => {
                process.watchpoint_command(cmd)?;
            }
            Command::Quit => {
                process.destroy()?;
                self.debugging = false;
                if let Some(id) = self.registry_id.take() {
                    registry::unregister(id);
                }
                let _ = registry::shutdown();
                res = DispatchResult::Exit;
            }
        }

        Ok(res)
    }

    pub fn is_debugging(&self) -> bool {
        self.debugging
    }
}

#[derive(Clone, Debug)]
pub enum DispatchResult {
    Normal,
    Exit,
}

#[derive(Clone, Debug)]
pub enum BreakpointCommand {
    Create(VirtualAddress),
    Delete(BreakpointId),
    Enable(BreakpointId),
    Disable(BreakpointId),
}

#[derive(Clone, Debug)]
pub enum WatchpointCommand {
    Create(VirtualAddress, WatchKind, WatchSize),
    Delete(WatchpointId),
}

#[derive(Clone, Debug)]
pub enum Command {
    /// Start or connect to the inferior process.
    Run(Vec<String>),
    Continue,
    /// Asynchronously interrupt a running inferior (spec.md §4.6 `halt`).
    Halt,
    Breakpoint(BreakpointCommand),
    Watchpoint(WatchpointCommand),
    /// Exit the debugger (and kill inferior process if it was launched).
    Quit,
}

impl TryFrom<String> for Command {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Command> {
        let mut words = value.split_whitespace();
        let cmd = words.next().unwrap_or("").to_string();
        let args: Vec<String> = words.map(|s| s.to_string()).collect();

        let command = match cmd.to_lowercase().as_str() {
            "run" | "r" => Command::Run(args),
            "continue" | "c" => Command::Continue,
            "halt" => Command::Halt,
            "quit" | "q" => Command::Quit,
            "break" | "b" => {
                Command::Breakpoint(BreakpointCommand::Create(VirtualAddress::try_from(args)?))
            }
            "delete" => {
                Command::Breakpoint(BreakpointCommand::Delete(breakpoint_id_from(args)?))
            }
            "enable" => {
                Command::Breakpoint(BreakpointCommand::Enable(breakpoint_id_from(args)?))
            }
            "disable" => {
                Command::Breakpoint(BreakpointCommand::Disable(breakpoint_id_from(args)?))
            }
            "watch" => {
                let address = VirtualAddress::try_from(vec![
                    args.first().cloned().ok_or_else(|| anyhow!("watch requires an address"))?,
                ])?;
                Command::Watchpoint(WatchpointCommand::Create(
                    address,
                    WatchKind::Write,
                    WatchSize::Eight,
                ))
            }
            _ => return Err(anyhow!("unknown command: {:?}", value)),
        };

        Ok(command)
    }
}

fn breakpoint_id_from(args: Vec<String>) -> Result<BreakpointId> {
    if args.len() != 1 {
        return Err(anyhow!("wrong number of arguments: {:?}", args));
    }
    Ok(BreakpointId(args[0].parse::<i32>()?))
}
