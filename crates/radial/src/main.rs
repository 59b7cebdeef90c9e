use clap::{Parser, Subcommand};
use dwell::arbiter::SessionCommand;
use radial::config;
use radial::driver::Driver;
use radial::sys::runtime;
use radial::trace;
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "radial", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Run the selection loop on frames received over the unix socket
    Serve,
    /// Run a recorded JSON-lines trace and print each selection
    Replay {
        /// Trace file, one input frame per line
        path: PathBuf,
    },
    /// Stream a recorded trace to a running `radial serve`
    Feed {
        path: PathBuf,

        /// Socket to write to (defaults to the configured one)
        #[arg(short = 's', long)]
        socket: Option<PathBuf>,
    },
    /// Write the default configuration file if none exists
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve(),
        Commands::Replay { path } => replay(path),
        Commands::Feed { path, socket } => feed(path, socket),
        Commands::InitConfig => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn serve() -> anyhow::Result<()> {
    let config = config::load_or_default();
    let mut driver = Driver::new(&config)?;
    driver.on_selection(|hand, gesture, selection| {
        log::debug!("{} {} selection delivered: {:?}", hand, gesture, selection);
    });

    let (tx, rx) = async_channel::bounded(256);

    // Start Background Services
    runtime::start_background_services(tx, config.socket_path.clone(), driver.status_handle());

    while let Ok(event) = rx.recv_blocking() {
        if !driver.handle(event) {
            break;
        }
    }
    log::info!("Shutting down");
    Ok(())
}

fn replay(path: PathBuf) -> anyhow::Result<()> {
    let config = config::load_or_default();
    let mut driver = Driver::new(&config)?;
    let frames = trace::load(&path)?;

    for (i, frame) in frames.iter().enumerate() {
        for command in driver.tick(frame) {
            if let SessionCommand::SectorSelected {
                hand,
                gesture,
                selection,
            } = command
            {
                let index = selection.map_or_else(|| "none".to_string(), |s| s.to_string());
                println!("frame {}: {} hand {} -> {}", i + 1, hand, gesture, index);
            }
        }
    }

    println!("{}", driver.effect().describe());
    Ok(())
}

fn feed(path: PathBuf, socket: Option<PathBuf>) -> anyhow::Result<()> {
    let socket = match socket {
        Some(s) => s,
        None => config::load_or_default().socket_path,
    };
    let text = fs_err::read_to_string(&path)?;

    let mut stream = UnixStream::connect(&socket).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to radial at {}: {}. Is `radial serve` running?",
            socket.display(),
            e
        )
    })?;

    for line in text.lines().filter(|l| trace::is_frame_line(l)) {
        writeln!(stream, "{}", line.trim())?;
    }
    Ok(())
}
