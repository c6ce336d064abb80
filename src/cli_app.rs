// cli_app.rs
use anyhow::{Context, anyhow};
use std::thread::JoinHandle;
use tracing::{error, info, warn};

use crate::{
    capture::GamepadCapture,
    config::AppConfig,
    network::UdpTransport,
    poller_worker::PollerWorker,
    stoppable_loop::{LoopError, StoppableLoop},
};

/// Command-line overrides on top of the stored config.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CliArgs {
    pub target_ip: Option<String>,
    pub target_port: Option<u16>,
    pub save: bool,
}

impl CliArgs {
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> anyhow::Result<Self> {
        let mut out = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--target" => {
                    out.target_ip = Some(args.next().context("--target needs an address")?);
                }
                "--port" => {
                    let port = args.next().context("--port needs a number")?;
                    out.target_port = Some(
                        port.parse()
                            .with_context(|| format!("invalid port {port:?}"))?,
                    );
                }
                "--save" => out.save = true,
                other => return Err(anyhow!("unknown argument {other:?}")),
            }
        }
        Ok(out)
    }

    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(ip) = &self.target_ip {
            cfg.target_ip = ip.clone();
        }
        if let Some(port) = self.target_port {
            cfg.target_port = port;
        }
    }
}

/// Owns the poller thread and the loop that drives it.
pub struct CliApp {
    control: StoppableLoop,
    worker_handle: Option<JoinHandle<Result<(), LoopError>>>,
}

impl CliApp {
    /// Opens the gamepad and the socket, then starts polling.
    pub fn new(args: &CliArgs) -> anyhow::Result<Self> {
        let mut cfg = AppConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "could not load config, using defaults");
            AppConfig::default()
        });
        args.apply(&mut cfg);
        if args.save {
            cfg.save().context("failed to save config")?;
            info!("config saved");
        }

        let capture = GamepadCapture::new(cfg.axis_settings())?;
        let name = capture
            .active_gamepad_name()
            .ok_or_else(|| anyhow!("no gamepad connected, connect one and try again"))?;
        let transport = UdpTransport::new((cfg.target_ip.as_str(), cfg.target_port))
            .with_context(|| format!("cannot reach {}:{}", cfg.target_ip, cfg.target_port))?;

        info!(gamepad = %name, target = %transport.target(), mode = ?cfg.wire_mode, "starting");
        info!(
            lstick = cfg.deadzone_lstick,
            rstick = cfg.deadzone_rstick,
            invert_lx = cfg.invert_lx,
            invert_ly = cfg.invert_ly,
            invert_rx = cfg.invert_rx,
            invert_ry = cfg.invert_ry,
            "axis settings"
        );

        let mut worker = PollerWorker::new(capture, transport, cfg.poller_config());
        let control = StoppableLoop::new();
        let lp = control.clone();
        let worker_handle = std::thread::Builder::new()
            .name("poller".into())
            .spawn(move || worker.run(&lp))
            .context("failed to spawn poller thread")?;

        Ok(CliApp {
            control,
            worker_handle: Some(worker_handle),
        })
    }

    /// Installs the Ctrl+C handler and waits for the poller to finish.
    pub fn run(&mut self) -> anyhow::Result<()> {
        let control = self.control.clone();
        ctrlc::set_handler(move || {
            let requested = control.stop(Some(Box::new(|| {
                info!("poller loop has stopped");
            })));
            if requested {
                info!("Ctrl+C pressed, stopping poller");
            } else {
                info!("Ctrl+C pressed, poller already stopped");
            }
        })?;

        info!("running, press Ctrl+C to stop");

        let handle = self
            .worker_handle
            .take()
            .context("poller thread was already joined")?;
        match handle.join() {
            Ok(Ok(())) => info!("poller thread joined"),
            Ok(Err(e)) => error!(error = %e, "poller loop refused to start"),
            Err(_) => return Err(anyhow!("poller thread panicked")),
        }
        Ok(())
    }
}
