//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    let outcome = stopwise_cli::init_logging().and_then(|()| stopwise_cli::run());
    if let Err(err) = outcome {
        eprintln!("stopwise: {err}");
        std::process::exit(1);
    }
}
