use std::io::{BufRead as _, Write as _};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tessled::animation::{ArgType, DEFAULT_ANIMATIONS};
use tessled::effectbox::{Effectbox, build_engine};
use tessled::foundation::clock::MonotonicClock;
#[cfg(target_os = "linux")]
use tessled::hardware::linux::open_chain;
use tessled::hardware::{PollMode, ScanDriver, ScanTiming};
use tessled::transport::{LatestFrame, ReceivePolicy, ZmqPublisher, ZmqSubscriber};
use tessled::{
    AnimationKind, DeviceType, EffectboxConfig, Fps, HardwareConfig, TessledError, TessledResult,
};

#[derive(Parser, Debug)]
#[command(name = "tessled", version, about = "8x8x8 LED cube animation and driver")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate animation frames and publish them.
    Effectbox(EffectboxArgs),
    /// Receive frames and scan them out to the TLC5940 chain.
    Driver(DriverArgs),
    /// List the built-in animations and their parameters.
    List,
    /// Print received frames as text.
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct EffectboxArgs {
    /// TOML file with effectbox settings; flags override it.
    #[arg(long, env = "TSC_CONFIG")]
    config: Option<PathBuf>,

    /// Frames per second.
    #[arg(long, env = "TSC_FPS")]
    fps: Option<f64>,

    /// Device type: simulator, tesseract or minicube.
    #[arg(long, visible_alias = "ttype", env = "TSC_TTYPE")]
    device: Option<String>,

    /// Seconds between animation transitions.
    #[arg(long, env = "TSC_TRANSITION")]
    transition: Option<f64>,

    /// Comma-separated animation identifiers (default: the built-in default set).
    #[arg(long, env = "TSC_ANIMATION")]
    animation: Option<String>,

    /// ZeroMQ address to publish frames to.
    #[arg(long, env = "TSC_FRAME_ADDR")]
    frame_addr: Option<String>,

    /// Fixed RNG seed.
    #[arg(long, env = "TSC_SEED")]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct DriverArgs {
    /// TOML file with hardware settings; flags override it.
    #[arg(long, env = "TSC_HARDWARE")]
    hardware: Option<PathBuf>,

    /// ZeroMQ address to subscribe to.
    #[arg(long, env = "TSC_FRAME_ADDR")]
    frame_addr: Option<String>,

    /// Number of chained TLC chips.
    #[arg(long, env = "TSC_CHIPS")]
    chips: Option<usize>,

    /// Drive the chain with non-inverted logic.
    #[arg(long)]
    no_invert: bool,

    /// Where to check for new frames.
    #[arg(long, value_enum)]
    poll: Option<PollChoice>,

    /// How many queued frames one check consumes.
    #[arg(long, value_enum)]
    receive: Option<ReceiveChoice>,

    /// Uniform dot-correction level (0-63) written at init.
    #[arg(long)]
    dot_correction: Option<u8>,

    /// Cycle each control pin and wait for Enter between steps, then exit.
    #[arg(long, env = "TSC_TEST_IO")]
    test_io: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// ZeroMQ address to subscribe to.
    #[arg(long, env = "TSC_FRAME_ADDR", default_value = tessled::transport::DEFAULT_FRAME_ADDR)]
    frame_addr: String,

    /// Exit after this many frames.
    #[arg(long)]
    count: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PollChoice {
    PerCycle,
    PerLayer,
}

impl From<PollChoice> for PollMode {
    fn from(c: PollChoice) -> Self {
        match c {
            PollChoice::PerCycle => PollMode::PerCycle,
            PollChoice::PerLayer => PollMode::PerLayer,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ReceiveChoice {
    Latest,
    Each,
}

impl From<ReceiveChoice> for ReceivePolicy {
    fn from(c: ReceiveChoice) -> Self {
        match c {
            ReceiveChoice::Latest => ReceivePolicy::DrainToLatest,
            ReceiveChoice::Each => ReceivePolicy::OnePerPoll,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Effectbox(args) => cmd_effectbox(args),
        Command::Driver(args) => cmd_driver(args),
        Command::List => cmd_list(),
        Command::Dump(args) => cmd_dump(args),
    }
}

fn effectbox_config(args: EffectboxArgs) -> anyhow::Result<EffectboxConfig> {
    let mut cfg = match &args.config {
        Some(path) => EffectboxConfig::from_toml_file(path)?,
        None => EffectboxConfig::default(),
    };
    if let Some(fps) = args.fps {
        cfg.fps = Fps::new(fps)?;
    }
    if let Some(device) = &args.device {
        cfg.device = DeviceType::lookup(device)?;
    }
    if let Some(transition) = args.transition {
        cfg.transition = transition;
    }
    if let Some(list) = &args.animation {
        cfg.animations = AnimationKind::resolve_list(list)?
            .into_iter()
            .map(|k| k.name().to_owned())
            .collect();
    }
    if let Some(addr) = args.frame_addr {
        cfg.frame_addr = addr;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_effectbox(args: EffectboxArgs) -> anyhow::Result<()> {
    let cfg = effectbox_config(args).context("effectbox configuration")?;
    let engine = build_engine(&cfg)?;
    let sink = ZmqPublisher::bind(&cfg.frame_addr)
        .with_context(|| format!("bind frame publisher on '{}'", cfg.frame_addr))?;
    let mut fx = Effectbox::new(engine, sink, MonotonicClock::new());
    match fx.run().context("effectbox loop")? {}
}

fn hardware_config(args: &DriverArgs) -> anyhow::Result<HardwareConfig> {
    let mut cfg = match &args.hardware {
        Some(path) => HardwareConfig::from_toml_file(path)?,
        None => HardwareConfig::default(),
    };
    if let Some(addr) = &args.frame_addr {
        cfg.frame_addr = addr.clone();
    }
    if let Some(chips) = args.chips {
        cfg.chips = chips;
    }
    if args.no_invert {
        cfg.inverted = false;
    }
    if let Some(poll) = args.poll {
        cfg.poll = poll.into();
    }
    if let Some(receive) = args.receive {
        cfg.receive = receive.into();
    }
    if args.dot_correction.is_some() {
        cfg.dot_correction = args.dot_correction;
    }
    cfg.validate()?;
    Ok(cfg)
}

#[cfg(target_os = "linux")]
fn wait_for_enter(msg: &str) -> TessledResult<()> {
    let mut stderr = std::io::stderr();
    let mut line = String::new();
    write!(stderr, "{msg} ... press Enter")
        .and_then(|()| stderr.flush())
        .and_then(|()| std::io::stdin().lock().read_line(&mut line))
        .map_err(|e| TessledError::from(anyhow::Error::from(e).context("test-io prompt")))?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn cmd_driver(args: DriverArgs) -> anyhow::Result<()> {
    hardware_config(&args).context("hardware configuration")?;
    anyhow::bail!("the driver needs Linux spidev and sysfs GPIO")
}

#[cfg(target_os = "linux")]
fn cmd_driver(args: DriverArgs) -> anyhow::Result<()> {
    let cfg = hardware_config(&args).context("hardware configuration")?;

    let timing = ScanTiming::estimate(cfg.chips, cfg.spi.speed_hz);
    if timing.is_flicker_free() {
        tracing::info!(
            refresh_hz = format_args!("{:.1}", timing.refresh_hz),
            "expected cube refresh rate"
        );
    } else {
        tracing::warn!(
            refresh_hz = format_args!("{:.1}", timing.refresh_hz),
            spi_hz = cfg.spi.speed_hz,
            "bus too slow for a flicker-free refresh"
        );
    }

    let mut chain = open_chain(&cfg).context("open TLC chain")?;
    if args.test_io {
        eprintln!("Testing IO pins ...");
        chain.test_io(wait_for_enter)?;
        eprintln!("Test complete.");
        return Ok(());
    }
    chain.init(cfg.dot_correction).context("initialize TLC chain")?;

    let source = ZmqSubscriber::connect(&cfg.frame_addr)
        .with_context(|| format!("subscribe to frames on '{}'", cfg.frame_addr))?;
    let mut scan = ScanDriver::new(chain, LatestFrame::new(source, cfg.receive), cfg.poll)?;
    tracing::info!(chips = cfg.chips, addr = %cfg.frame_addr, "driver running");
    match scan.run().context("scan loop")? {}
}

fn describe(ty: &ArgType) -> String {
    let bounds = |min: Option<String>, max: Option<String>| match (min, max) {
        (None, None) => String::new(),
        (min, max) => format!(
            " [{}..{}]",
            min.unwrap_or_default(),
            max.unwrap_or_default()
        ),
    };
    match *ty {
        ArgType::Int { default, min, max } => format!(
            "int = {default}{}",
            bounds(min.map(|v| v.to_string()), max.map(|v| v.to_string()))
        ),
        ArgType::Float { default, min, max } => format!(
            "float = {default}{}",
            bounds(min.map(|v| v.to_string()), max.map(|v| v.to_string()))
        ),
        ArgType::Str { default } => format!("str = {default:?}"),
        ArgType::Bool { default } => format!("bool = {default}"),
    }
}

fn cmd_list() -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for kind in AnimationKind::all() {
        let marker = if DEFAULT_ANIMATIONS.contains(&kind) {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{}{marker}", kind.name())?;
        for arg in kind.args() {
            writeln!(out, "    {}: {}", arg.name, describe(&arg.ty))?;
        }
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let source = ZmqSubscriber::connect(&args.frame_addr)
        .with_context(|| format!("subscribe to frames on '{}'", args.frame_addr))?;
    let mut latest = LatestFrame::new(source, ReceivePolicy::DrainToLatest);
    let mut shown = 0u64;
    let mut out = std::io::stdout().lock();
    while args.count.is_none_or(|n| shown < n) {
        if latest.poll()? {
            shown += 1;
            writeln!(out, "frame {shown} ({} lit)", latest.current().lit_count())?;
            write!(out, "{}", latest.current().to_text())?;
            out.flush()?;
        } else {
            std::thread::sleep(Duration::from_millis(10));
        }
    }
    let stats = latest.stats();
    tracing::info!(
        received = stats.received,
        malformed = stats.malformed,
        "dump finished"
    );
    Ok(())
}
