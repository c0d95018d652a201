use wheel_core::{DriverError, WheelHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    Spin,
    Reset,
    Resize(i64),
    State,
    Help,
    Quit,
}

pub const HELP: &str = "commands: spin | reset | resize <size> | state | help | quit";

pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "spin" | "start" | "s" => ShellCommand::Spin,
        "reset" | "r" => ShellCommand::Reset,
        "resize" | "size" => {
            let raw = parts.next().ok_or("resize needs a size, e.g. `resize 50`")?;
            let size = raw
                .parse::<i64>()
                .map_err(|_| format!("'{raw}' is not a whole number"))?;
            ShellCommand::Resize(size)
        }
        "state" | "show" => ShellCommand::State,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'. {HELP}")),
    };

    if parts.next().is_some() {
        return Err(format!("unexpected arguments after '{verb}'"));
    }
    Ok(Some(command))
}

pub fn dispatch_host_command(handle: &WheelHandle, command: ShellCommand) -> Result<(), DriverError> {
    let result = match command {
        ShellCommand::Spin => handle.start_spin(),
        ShellCommand::Reset => handle.reset(),
        ShellCommand::Resize(size) => handle.resize(size),
        ShellCommand::State | ShellCommand::Help | ShellCommand::Quit => return Ok(()),
    };
    if result.is_ok() {
        tracing::debug!(command = ?command, "queued host command");
    }
    result
}
