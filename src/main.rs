//! Opens the particle backdrop.
//!
//! Usage: `driftfield [PARTICLE_COUNT] [COLOR]`
//!
//! Log output is controlled with `RUST_LOG`.

use std::process::ExitCode;

use driftfield::color::parse_color;
use driftfield::Backdrop;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let mut backdrop = Backdrop::new();

    if let Some(arg) = args.next() {
        match arg.parse() {
            Ok(count) => backdrop = backdrop.with_particle_count(count),
            Err(_) => log::warn!("ignoring particle count '{}'", arg),
        }
    }
    if let Some(color) = args.next() {
        match parse_color(&color) {
            Ok(_) => backdrop = backdrop.with_color(color),
            Err(e) => log::warn!("ignoring color: {}", e),
        }
    }

    match backdrop.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
