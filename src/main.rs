use anyhow::{Context, Result};
use argh::FromArgs;
use chainsh::Interpreter;
use chainsh::io_adapters::{BufferedLines, LineSource, TerminalLines};
use std::fs::File;
use std::io::{BufReader, Cursor, IsTerminal};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::{debug, warn};

#[derive(FromArgs)]
/// Line-oriented command interpreter with `;`, `&&` and `||` chaining.
struct Args {
    #[argh(option, short = 'c')]
    /// run the given command text instead of reading input, then exit.
    command: Option<String>,

    #[argh(option, default = "String::from(\"warn\")")]
    /// log filter used when RUST_LOG is not set (default: warn).
    log_level: String,

    #[argh(positional)]
    /// script file to read commands from; standard input when omitted.
    script: Option<PathBuf>,
}

fn main() {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level)),
        )
        .init();

    match run(args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn run(args: Args) -> Result<i32> {
    let mut interpreter = Interpreter::default();

    let flag = interpreter.interrupt_flag();
    if let Err(err) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("interrupts will not be handled: {err}");
    }

    let interactive = args.command.is_none() && args.script.is_none() && std::io::stdin().is_terminal();
    let mut source: Box<dyn LineSource> = match (args.command, args.script) {
        (Some(command), _) => Box::new(BufferedLines::new(Cursor::new(command))),
        (None, Some(path)) => {
            let file = File::open(&path)
                .with_context(|| format!("can't open {}", path.display()))?;
            Box::new(BufferedLines::new(BufReader::new(file)))
        }
        (None, None) if interactive => Box::new(TerminalLines::new()?),
        (None, None) => Box::new(BufferedLines::new(std::io::stdin().lock())),
    };
    debug!(interactive, "starting");

    let code = interpreter.repl(source.as_mut())?;
    if interactive && !interpreter.session().should_exit() {
        println!();
    }
    Ok(code)
}
