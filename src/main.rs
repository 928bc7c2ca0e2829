//! cbusctl - FTDI CBUS pin configuration tool
//!
//! Reads the CBUS function table from the EEPROM of an FTDI FT-X adapter,
//! optionally reassigns pin functions, and drives or samples the pins that
//! are in IOMODE.
//!
//! # Architecture
//!
//! - `cbusctl-core` holds the function table, pin types and the controller,
//!   and defines the `CbusDevice` trait
//! - `cbusctl-ftdi` implements `CbusDevice` for real hardware via rs-ftdi
//! - this binary parses the command line and dispatches a single run

mod cli;
mod commands;

use std::fmt::Display;
use std::io::{self, Write};

use cbusctl_core::CbusDevice;
use cbusctl_ftdi::FtdiCbus;
use clap::Parser;
use cli::Cli;
use commands::Request;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    // Initialize logger, RUST_LOG still wins over -v
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(cli.verbose)),
    )
    .init();

    let request = request_from_cli(cli);

    let status = execute(
        FtdiCbus::open_default(),
        &request,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    );

    std::process::exit(status);
}

/// Default log filter for a `-v` count
fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn request_from_cli(cli: Cli) -> Request {
    Request {
        set: cli.set,
        high: cli.high,
        low: cli.low,
        toggle: cli.toggle,
        input: cli.input,
        get: cli.get,
        dump: cli.dump,
        detach: cli.detach,
    }
}

/// Run `request` on an opened device and close it, returning the exit status
///
/// The device is closed on every path once it was opened, even after a
/// failed run.
fn execute<D, E, W, R>(opened: Result<D, E>, request: &Request, out: &mut W, err: &mut R) -> i32
where
    D: CbusDevice,
    E: Display,
    W: Write,
    R: Write,
{
    let mut device = match opened {
        Ok(device) => device,
        Err(e) => {
            let _ = writeln!(err, "unable to open ftdi device: {}", e);
            return 1;
        }
    };

    let mut status = 0;

    match commands::run(&mut device, request, out) {
        Ok(outcome) => log::debug!("Run finished: {:?}", outcome),
        Err(e) => {
            let _ = writeln!(err, "error: {}", e);
            status = 1;
        }
    }

    if let Err(e) = device.close() {
        let _ = writeln!(err, "unable to close ftdi device: {}", e);
        status = 1;
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbusctl_core::function::IOMODE;
    use cbusctl_dummy::{DummyCbus, DummyConfig};

    fn execute_captured(
        opened: Result<DummyCbus, &str>,
        args: &[&str],
    ) -> (i32, String, String) {
        let cli = Cli::try_parse_from(std::iter::once("cbusctl").chain(args.iter().copied()))
            .unwrap();
        let request = request_from_cli(cli);
        let mut out = Vec::new();
        let mut err = Vec::new();
        let status = execute(opened, &request, &mut out, &mut err);
        (
            status,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_log_filter_follows_verbosity() {
        assert_eq!(log_filter(0), "info");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(2), "trace");
        assert_eq!(log_filter(5), "trace");
    }

    #[test]
    fn test_out_of_range_toggle_exits_cleanly() {
        let dev = DummyCbus::new(DummyConfig::default().function(1, IOMODE));
        let (status, out, err) = execute_captured(Ok(dev), &["--toggle", "5"]);
        assert_eq!(status, 0);
        assert_eq!(out, "");
        assert_eq!(err, "");
    }

    #[test]
    fn test_negative_set_pin_is_ignored() {
        let (status, out, err) =
            execute_captured(Ok(DummyCbus::new_default()), &["--set", "-1:IOMODE"]);
        assert_eq!(status, 0);
        assert_eq!(out, "");
        assert_eq!(err, "");
    }

    #[test]
    fn test_open_failure() {
        let (status, out, err) = execute_captured(Err("no device"), &["-d"]);
        assert_eq!(status, 1);
        assert_eq!(out, "");
        assert_eq!(err, "unable to open ftdi device: no device\n");
    }

    #[test]
    fn test_run_failure_still_closes() {
        let dev = DummyCbus::new(DummyConfig {
            fail_eeprom_read: true,
            fail_close: true,
            ..DummyConfig::default()
        });
        let (status, _, err) = execute_captured(Ok(dev), &["-d"]);
        assert_eq!(status, 1);
        assert_eq!(
            err,
            "error: EEPROM read failed: emulated read failure\n\
             unable to close ftdi device: failed to close device: emulated close failure\n"
        );
    }

    #[test]
    fn test_close_failure_after_successful_run() {
        let dev = DummyCbus::new(DummyConfig {
            fail_close: true,
            ..DummyConfig::default()
        });
        let (status, out, err) = execute_captured(Ok(dev), &["--get", "0"]);
        assert_eq!(status, 1);
        assert_eq!(out, "CBUS0: TRISTATE\n");
        assert_eq!(
            err,
            "unable to close ftdi device: failed to close device: emulated close failure\n"
        );
    }

    #[test]
    fn test_chip_id_failure_fails_dump() {
        let dev = DummyCbus::new(DummyConfig {
            fail_chip_id: true,
            ..DummyConfig::default()
        });
        let (status, out, err) = execute_captured(Ok(dev), &["-d"]);
        assert_eq!(status, 1);
        assert_eq!(out, "");
        assert_eq!(err, "error: failed to read chip ID: emulated chip ID failure\n");
    }
}
