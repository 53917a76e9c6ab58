use std::io::Write;

use crate::lookup;
use crate::status::Status;

/// The list of all builtin command names.
const BUILTINS: &[&str] = &["cd", "pwd", "which", "exit"];

#[derive(Debug, PartialEq)]
pub enum BuiltinAction {
    Continue(Status),
    Exit,
}

/// Returns true if the command name is a shell builtin.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Execute a builtin command, writing output to the provided streams.
pub fn execute(
    program: &str,
    args: &[String],
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> BuiltinAction {
    match program {
        "cd" => BuiltinAction::Continue(builtin_cd(args, stderr)),
        "pwd" => BuiltinAction::Continue(builtin_pwd(stdout, stderr)),
        "which" => BuiltinAction::Continue(builtin_which(args, stdout, stderr)),
        "exit" => builtin_exit(args, stdout),
        _ => {
            let _ = writeln!(stderr, "mysh: unknown builtin: {program}");
            BuiltinAction::Continue(Status::Failure)
        }
    }
}

fn builtin_cd(args: &[String], stderr: &mut dyn Write) -> Status {
    let target = match args {
        [dir] => dir,
        [] => {
            let _ = writeln!(stderr, "cd: missing argument");
            return Status::Failure;
        }
        _ => {
            let _ = writeln!(stderr, "cd: too many arguments");
            return Status::Failure;
        }
    };

    if let Err(e) = std::env::set_current_dir(target) {
        let _ = writeln!(stderr, "cd: {target}: {e}");
        return Status::Failure;
    }

    Status::Success
}

fn builtin_pwd(stdout: &mut dyn Write, stderr: &mut dyn Write) -> Status {
    match std::env::current_dir() {
        Ok(path) => {
            let _ = writeln!(stdout, "{}", path.display());
            Status::Success
        }
        Err(e) => {
            let _ = writeln!(stderr, "pwd: {e}");
            Status::Failure
        }
    }
}

fn builtin_which(args: &[String], stdout: &mut dyn Write, stderr: &mut dyn Write) -> Status {
    let name = match args {
        [name] => name,
        _ => {
            let _ = writeln!(stderr, "which: usage: which <name>");
            return Status::Failure;
        }
    };

    if is_builtin(name) {
        let _ = writeln!(stderr, "which: {name} is a shell builtin");
        return Status::Failure;
    }

    match lookup::find_in_path(name) {
        Some(path) => {
            let _ = writeln!(stdout, "{}", path.display());
            Status::Success
        }
        None => Status::Failure,
    }
}

/// Echo the arguments (each followed by a space) and the farewell line.
/// The caller terminates the process.
fn builtin_exit(args: &[String], stdout: &mut dyn Write) -> BuiltinAction {
    for arg in args {
        let _ = write!(stdout, "{arg} ");
    }
    let _ = writeln!(stdout, "\nExitting mysh");
    let _ = stdout.flush();
    BuiltinAction::Exit
}
