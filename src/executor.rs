use std::io;
use std::os::fd::{AsRawFd, RawFd};

use crate::ast::Segment;
use crate::builtins::{self, BuiltinAction};
use crate::error::ShellError;
use crate::lookup;
use crate::process::{self, Fork, Program};
use crate::redirect::{self, Redirections, StdioGuard};
use crate::status::{self, Status};

/// What running one line did to the interpreter.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// Nothing ran; the status stays as it was.
    Skipped,
    /// A command ran and left this status.
    Completed(Status),
    /// `exit` was run in the interpreter process.
    Exit,
}

/// What the first word of a segment resolved to.
enum Target {
    Empty,
    Builtin,
    External(Program),
    NotFound,
}

/// A segment that passed its gate, ready to be bound and dispatched.
struct Plan {
    args: Vec<String>,
    redirections: Redirections,
    target: Target,
}

enum Prepared {
    Skip,
    Fail,
    Run(Plan),
}

impl Prepared {
    /// Whether the parent already knows this segment fails: a syntax or
    /// argument error, or a command that resolves to nothing.
    fn is_known_failure(&self) -> bool {
        matches!(
            self,
            Prepared::Fail
                | Prepared::Run(Plan {
                    target: Target::NotFound,
                    ..
                })
        )
    }
}

/// Gate a segment on the last status, pull out its redirections and
/// resolve its command. Nothing is opened or executed yet.
fn prepare(segment: Segment, last: Status) -> Prepared {
    if !segment.condition.allows(last) {
        log::debug!("skipping {:?} segment after {last:?}", segment.condition);
        return Prepared::Skip;
    }

    let (args, redirections) = match redirect::extract_redirections(&segment.words) {
        Ok(parts) => parts,
        Err(msg) => {
            eprintln!("{msg}");
            return Prepared::Fail;
        }
    };

    let target = match args.first() {
        None => Target::Empty,
        Some(name) if builtins::is_builtin(name) => Target::Builtin,
        Some(name) => match lookup::resolve_command(name) {
            Some(path) => match Program::new(&path.to_string_lossy(), &args) {
                Ok(program) => {
                    log::debug!("resolved {name} to {}", path.display());
                    Target::External(program)
                }
                Err(e) => {
                    eprintln!("mysh: {name}: {e}");
                    return Prepared::Fail;
                }
            },
            None => Target::NotFound,
        },
    };

    Prepared::Run(Plan {
        args,
        redirections,
        target,
    })
}

/// Execute one segment in the interpreter process.
///
/// Stdin and stdout are restored before returning, on every path.
/// Failing to open a redirection target is fatal to the interpreter.
pub fn run_segment(segment: Segment, last: Status) -> Result<Outcome, ShellError> {
    let _guard = StdioGuard::save().map_err(ShellError::Descriptor)?;

    let plan = match prepare(segment, last) {
        Prepared::Skip => return Ok(Outcome::Skipped),
        Prepared::Fail => return Ok(Outcome::Completed(Status::Failure)),
        Prepared::Run(plan) => plan,
    };

    plan.redirections.apply()?;
    Ok(dispatch(plan))
}

fn dispatch(plan: Plan) -> Outcome {
    let Plan { args, target, .. } = plan;

    match target {
        Target::Empty => Outcome::Skipped,
        Target::Builtin => {
            match builtins::execute(&args[0], &args[1..], &mut io::stdout(), &mut io::stderr()) {
                BuiltinAction::Continue(status) => Outcome::Completed(status),
                BuiltinAction::Exit => Outcome::Exit,
            }
        }
        Target::NotFound => {
            println!("Command not found: {}", args[0]);
            Outcome::Completed(Status::Failure)
        }
        Target::External(program) => Outcome::Completed(run_external(&program)),
    }
}

/// Fork, exec `program` in the child and wait for it.
///
/// A completed wait counts as success whatever the child's own exit code.
fn run_external(program: &Program) -> Status {
    let pid = match process::fork() {
        Ok(Fork::Child) => exec_child(program),
        Ok(Fork::Parent(pid)) => pid,
        Err(e) => {
            eprintln!("mysh: fork: {e}");
            return Status::Failure;
        }
    };

    log::debug!("started pid {pid} with {} args", program.arg_count());
    match process::wait_for_pid(pid) {
        Ok(raw_status) => {
            log::debug!(
                "pid {pid} finished with code {:?}",
                status::exit_code_from_wait_status(raw_status)
            );
            Status::Success
        }
        Err(e) => {
            eprintln!("mysh: wait: {e}");
            Status::Failure
        }
    }
}

/// Replace the child with `program`; on failure report and exit 1.
fn exec_child(program: &Program) -> ! {
    process::reset_child_signals();
    let err = program.exec();
    eprintln!("mysh: {}: {err}", program.path().to_string_lossy());
    process::exit_child(1)
}

/// Run `left | right` as two children joined by a pipe.
///
/// Both children are started before either is waited on. Each side is gated
/// and redirected on its own, inside its child, so builtins run there too.
/// Failing to create the pipe or either child is fatal to the interpreter.
/// The status is Failure when either side failed to prepare or names an
/// unknown command, as it would be for the same segment on its own.
pub fn run_pipeline(left: Segment, right: Segment, last: Status) -> Result<Outcome, ShellError> {
    let left = prepare(left, last);
    let right = prepare(right, last);

    if matches!((&left, &right), (Prepared::Skip, Prepared::Skip)) {
        return Ok(Outcome::Skipped);
    }
    let known_failure = left.is_known_failure() || right.is_known_failure();

    let (reader, writer) = os_pipe::pipe().map_err(ShellError::Pipe)?;

    let left_pid = match process::fork().map_err(ShellError::Fork)? {
        Fork::Child => {
            drop(reader);
            bind_or_exit(writer.as_raw_fd(), libc::STDOUT_FILENO);
            drop(writer);
            run_child(left)
        }
        Fork::Parent(pid) => pid,
    };

    let right_pid = match process::fork().map_err(ShellError::Fork)? {
        Fork::Child => {
            drop(writer);
            bind_or_exit(reader.as_raw_fd(), libc::STDIN_FILENO);
            drop(reader);
            run_child(right)
        }
        Fork::Parent(pid) => pid,
    };

    // The parent keeps no pipe ends, or the reader would never see EOF.
    drop(reader);
    drop(writer);

    log::debug!("pipeline started pids {left_pid} | {right_pid}");
    let mut status = if known_failure {
        Status::Failure
    } else {
        Status::Success
    };
    for pid in [left_pid, right_pid] {
        match process::wait_for_pid(pid) {
            Ok(raw_status) => log::debug!(
                "pid {pid} finished with code {:?}",
                status::exit_code_from_wait_status(raw_status)
            ),
            Err(e) => {
                eprintln!("mysh: wait: {e}");
                status = Status::Failure;
            }
        }
    }

    Ok(Outcome::Completed(status))
}

fn bind_or_exit(source: RawFd, target: RawFd) {
    if let Err(e) = process::redirect_fd(source, target) {
        eprintln!("mysh: dup2: {e}");
        process::exit_child(1);
    }
}

/// Execute a prepared segment inside a pipeline child. Never returns.
fn run_child(prepared: Prepared) -> ! {
    process::reset_child_signals();

    let plan = match prepared {
        Prepared::Skip => process::exit_child(0),
        Prepared::Fail => process::exit_child(1),
        Prepared::Run(plan) => plan,
    };

    if let Err(e) = plan.redirections.apply() {
        eprintln!("mysh: {e}");
        process::exit_child(1);
    }

    let Plan { args, target, .. } = plan;
    match target {
        Target::Empty => process::exit_child(0),
        Target::Builtin => {
            match builtins::execute(&args[0], &args[1..], &mut io::stdout(), &mut io::stderr()) {
                BuiltinAction::Continue(status) => process::exit_child(status.code()),
                BuiltinAction::Exit => process::exit_child(0),
            }
        }
        Target::NotFound => {
            println!("Command not found: {}", args[0]);
            process::exit_child(1)
        }
        Target::External(program) => exec_child(&program),
    }
}
