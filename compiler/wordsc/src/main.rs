//! Words CLI
//!
//! Runs the built-in demo world, logging each frame to stdout.

use std::thread;

use wordsc::{demo, init_tracing, FrameConfig, FrameLoop};

fn main() {
    init_tracing();

    let mut config = FrameConfig::default();
    for arg in std::env::args().skip(1) {
        if arg == "-h" || arg == "--help" {
            print_usage();
            return;
        }
        if let Err(err) = config.apply_arg(&arg) {
            eprintln!("error: {err}");
            print_usage();
            std::process::exit(1);
        }
    }

    let mut frame_loop = FrameLoop::new(config);

    // Feed the world from another thread, the way a console would.
    let sender = frame_loop.sender();
    let producer = thread::spawn(move || {
        for statement in demo::world() {
            if !sender.send(statement) {
                break;
            }
        }
    });

    let frames = frame_loop.run();
    if producer.join().is_err() {
        eprintln!("error: input thread panicked");
    }
    tracing::debug!(frames, "done");
}

fn print_usage() {
    eprintln!("Words - grid-world interpreter");
    eprintln!();
    eprintln!("Usage: words [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --delay=<ms>    Target time between frames (default: 250, 0 disables pacing)");
    eprintln!("  --frames=<n>    Stop after n frames");
    eprintln!("  --no-pacing     Run frames back to back");
    eprintln!("  -h, --help      Show this message");
}
