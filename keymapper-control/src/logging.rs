use std::io::IsTerminal;
use tracing::Level;

/// Install the stderr log subscriber, stdout stays free for listings
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}
