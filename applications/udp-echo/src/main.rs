//! Runs the UDP echo demo from a workstation.
//!
//! Settings come from, in increasing priority: the compiled-in defaults, a
//! JSON file named by `ECHO_CONFIG`, and the `ECHO_SERVER_ENDPOINT` /
//! `ECHO_SERVER_PORT` variables (a `.env` file is honoured).

use std::env;
use std::fs;
use std::process::ExitCode;

use crossbeam::channel;
use dotenvy::dotenv;
use libcellular::demo::config::EchoConfig;
use libcellular::demo::echo::{EchoError, EchoReport, run_echo_task};
use libcellular::network::sockets::StdSockets;
use libcellular::system::task::thread_create;

/// Upper bound for one full run: every packet may time out on every retry.
const JOIN_TIMEOUT_MS: u32 = 30 * 60 * 1000;

fn load_config() -> Result<EchoConfig, String> {
    dotenv().ok();

    let mut config = match env::var("ECHO_CONFIG") {
        Ok(path) => {
            let json = fs::read(&path).map_err(|e| format!("{}: {}", path, e))?;
            EchoConfig::from_json(&json).map_err(|e| format!("{}: {}", path, e))?
        }
        Err(_) => EchoConfig::default(),
    };

    if let Ok(endpoint) = env::var("ECHO_SERVER_ENDPOINT") {
        config.endpoint.clear();
        config
            .endpoint
            .push_str(&endpoint)
            .map_err(|_| format!("endpoint too long: {}", endpoint))?;
    }
    if let Ok(port) = env::var("ECHO_SERVER_PORT") {
        config.port = port
            .parse()
            .map_err(|_| format!("invalid port: {}", port))?;
    }

    Ok(config)
}

/// Runs the echo test on a wrapper task and hands its result back.
fn run_on_task(config: EchoConfig) -> Result<EchoReport, String> {
    let (tx, rx) = channel::bounded::<Result<EchoReport, EchoError>>(1);
    let handle = thread_create(
        move |config: EchoConfig| {
            let _ = tx.send(run_echo_task(StdSockets, &config));
        },
        config,
    )
    .map_err(|e| format!("echo task: {}", e))?;

    handle
        .timed_join(JOIN_TIMEOUT_MS)
        .map_err(|e| format!("echo task: {}", e))?;

    match rx.try_recv() {
        Ok(result) => result.map_err(|e| e.to_string()),
        Err(_) => Err("echo task returned no result".into()),
    }
}

fn main() -> ExitCode {
    let report = load_config().and_then(run_on_task);
    match report {
        Ok(report) => {
            println!(
                "{} packets echoed, {} retries, largest {} bytes",
                report.packets_echoed, report.retries, report.last_size
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("udp-echo: {}", e);
            ExitCode::FAILURE
        }
    }
}
