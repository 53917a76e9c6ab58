#[cfg(not(unix))]
compile_error!("mysh drives fork/exec directly and only builds on Unix");

mod ast;
mod builtins;
mod error;
mod executor;
mod expander;
mod logging;
mod lookup;
mod parser;
mod pipeline;
mod process;
mod redirect;
mod shell;
mod status;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use argh::FromArgs;
use crossterm::tty::IsTty;

use shell::{Flow, Shell};

/// A small line-oriented command interpreter.
#[derive(FromArgs)]
struct Args {
    /// script file to run instead of reading standard input
    #[argh(positional)]
    script: Option<PathBuf>,
}

fn main() {
    let args: Args = argh::from_env();
    logging::init();

    let (input, interactive): (Box<dyn BufRead>, bool) = match &args.script {
        Some(path) => match File::open(path) {
            Ok(file) => (Box::new(BufReader::new(file)), false),
            Err(e) => {
                eprintln!("mysh: {}: {e}", path.display());
                std::process::exit(1);
            }
        },
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_tty();
            (Box::new(stdin.lock()), interactive)
        }
    };

    if interactive {
        if let Err(e) = ctrlc::set_handler(|| {
            println!();
            let _ = io::stdout().flush();
        }) {
            log::warn!("cannot install Ctrl-C handler: {e}");
        }
        println!("Welcome to my shell!");
    }

    let code = run(input, interactive);
    std::process::exit(code);
}

/// Read and execute lines until end of input or `exit`.
/// Returns the process exit code.
fn run(mut input: Box<dyn BufRead>, interactive: bool) -> i32 {
    let mut shell = Shell::new();
    let mut stdout = io::stdout();

    loop {
        if interactive {
            print!("mysh> ");
            if stdout.flush().is_err() {
                break;
            }
        }

        let mut raw = Vec::new();
        match input.read_until(b'\n', &mut raw) {
            Ok(0) => {
                if interactive {
                    println!("exiting");
                }
                break;
            }
            Ok(_) => match String::from_utf8(raw) {
                Ok(line) => match shell.run_line(&line) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => return 0,
                    Err(e) => {
                        eprintln!("mysh: {e}");
                        return 1;
                    }
                },
                Err(e) => {
                    let line = String::from_utf8_lossy(e.as_bytes());
                    eprintln!("mysh: skipping line with invalid UTF-8: {}", line.trim_end());
                }
            },
            Err(error) => {
                eprintln!("mysh: error reading input: {error}");
                break;
            }
        }
    }

    shell.status().code()
}
