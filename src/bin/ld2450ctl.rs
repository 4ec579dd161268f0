//! Command-line control and monitoring for an LD2450 on a serial port.
//!
//! Usage: ld2450ctl --device /dev/ttyUSB0 --status --monitor

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;

use ld2450::clock::{Clock, SystemClock};
use ld2450::protocol::{BaudRate, Command, TrackingMode};
use ld2450::select::{NO_TARGET_DISTANCE, distance_or_sentinel};
use ld2450::seq::{self, TIMEOUT};
use ld2450::session::DEFAULT_DEVICE;
use ld2450::{RadarSession, Report, SessionError};

/// Poll interval while monitoring; the radar reports at roughly 10 Hz.
const MONITOR_TICK: Duration = Duration::from_millis(20);

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serial device the radar is attached to
    #[arg(short, long, env = "LD2450_DEVICE", default_value = DEFAULT_DEVICE)]
    device: String,

    /// Rate the radar is currently using
    #[arg(short, long, env = "LD2450_BAUD", default_value_t = 256_000)]
    baud: u32,

    /// Switch target tracking mode
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Print firmware version, MAC address and tracking mode
    #[arg(short, long)]
    status: bool,

    /// Store a new serial rate (applied after restart)
    #[arg(long, value_name = "RATE")]
    set_baud: Option<u32>,

    /// Turn the Bluetooth radio on or off
    #[arg(long, value_enum)]
    bluetooth: Option<Toggle>,

    /// Restore factory settings
    #[arg(long)]
    factory_reset: bool,

    /// Restart the module
    #[arg(long)]
    restart: bool,

    /// Print target reports as they arrive
    #[arg(short, long)]
    monitor: bool,

    /// Stop monitoring after this many reports
    #[arg(long, requires = "monitor")]
    count: Option<u64>,

    /// Print reports as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Mode {
    Single,
    Multi,
}

impl From<Mode> for TrackingMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Single => TrackingMode::Single,
            Mode::Multi => TrackingMode::Multi,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Toggle {
    On,
    Off,
}

#[derive(Serialize)]
struct MonitorLine<'a> {
    report: &'a Report,
    /// Closest valid target distance (cm), 65535 when nothing is visible.
    closest: f64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), SessionError> {
    let baud = BaudRate::try_from(args.baud)?;
    debug!("opening {} at {baud}", args.device);
    let mut radar = RadarSession::open(&args.device, baud)?;
    let mut clock = SystemClock::new();

    if args.status {
        print_status(&mut radar, &mut clock)?;
    }

    if let Some(mode) = args.mode {
        seq::set_tracking_mode(&mut radar, &mut clock, mode.into(), TIMEOUT)?;
        println!("Tracking mode: {mode:?}");
    }

    if let Some(toggle) = args.bluetooth {
        let enabled = matches!(toggle, Toggle::On);
        seq::configure(&mut radar, &mut clock, &Command::Bluetooth { enabled }, TIMEOUT)?;
        println!("Bluetooth: {toggle:?} (applied after restart)");
    }

    if let Some(rate) = args.set_baud {
        let stored = seq::change_baud_rate(&mut radar, &mut clock, rate, TIMEOUT)?;
        println!("Baud rate: {stored} (applied after restart)");
    }

    if args.factory_reset {
        seq::configure(&mut radar, &mut clock, &Command::RestoreFactorySettings, TIMEOUT)?;
        println!("Factory settings restored");
    }

    if args.restart {
        seq::configure(&mut radar, &mut clock, &Command::Restart, TIMEOUT)?;
        info!("restart acknowledged");
        println!("Restarting");
        return Ok(());
    }

    if args.monitor {
        monitor(&mut radar, &mut clock, args)?;
    }
    Ok(())
}

fn print_status<T, C>(radar: &mut RadarSession<T>, clock: &mut C) -> Result<(), SessionError>
where
    T: ld2450::Transport,
    C: Clock,
{
    let version = seq::read_firmware_version(radar, clock, TIMEOUT)?;
    let mac = seq::read_mac_address(radar, clock, TIMEOUT)?;
    let mode = seq::query_tracking_mode(radar, clock, TIMEOUT)?;
    println!("Firmware: {version}");
    println!("MAC: {mac}");
    match mode {
        Some(mode) => println!("Tracking mode: {mode:?}"),
        None => println!("Tracking mode: unknown"),
    }
    Ok(())
}

fn monitor<T, C>(radar: &mut RadarSession<T>, clock: &mut C, args: &Args) -> Result<(), SessionError>
where
    T: ld2450::Transport,
    C: Clock,
{
    let mut seen = 0u64;
    loop {
        for report in radar.poll_reports()? {
            let closest = distance_or_sentinel(report.closest().as_ref());
            if args.json {
                let line = MonitorLine { report: &report, closest };
                match serde_json::to_string(&line) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("error: {e}"),
                }
            } else {
                print_report(&report, closest);
            }

            seen += 1;
            if args.count.is_some_and(|n| seen >= n) {
                return Ok(());
            }
        }
        clock.sleep(MONITOR_TICK);
    }
}

fn print_report(report: &Report, closest: f64) {
    for (i, t) in report.valid_targets().enumerate() {
        println!(
            "T{}: X{:7.1} Y{:7.1} S{:4} R{:5.1}",
            i + 1,
            t.x,
            t.y,
            t.speed,
            t.resolution
        );
    }
    if closest == NO_TARGET_DISTANCE {
        println!("closest: NO SENSOR");
    } else {
        println!("closest: {closest:.1} cm");
    }
}
