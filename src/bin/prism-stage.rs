use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use prism_stage::{
    ContentManifest, CpuBackend, MemoryDocument, MemoryPage, NativeScroll, PassBackend, Platform,
    Stage, StageConfig, StageHost, StillFileFactory, Viewport, shared,
};

#[derive(Parser, Debug)]
#[command(name = "prism-stage", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single stage frame as a PNG.
    Frame(FrameArgs),
    /// Sweep the scroll offset and print every section crossing.
    Trace(TraceArgs),
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Content manifest JSON. Media sources resolve relative to its directory.
    #[arg(long)]
    content: PathBuf,

    /// Stage config JSON. Portfolio defaults when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Page scroll offset in pixels.
    #[arg(long, default_value_t = 0.0)]
    scroll: f64,

    /// Media slot hovered before the frame is taken.
    #[arg(long)]
    hover: Option<usize>,

    /// Seconds simulated before the frame is taken.
    #[arg(long, default_value_t = 1.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Last offset of the sweep, in pixels.
    #[arg(long)]
    to: Option<f64>,

    /// Sweep step in pixels.
    #[arg(long, default_value_t = 40.0)]
    step: f64,

    /// Sweep back to zero after reaching the end.
    #[arg(long)]
    back: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    Cpu,
    #[cfg(feature = "gpu")]
    Gpu,
}

const FRAME_STEP: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn read_json(path: &Path, what: &str) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read {what} '{}'", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StageConfig> {
    match path {
        Some(p) => Ok(StageConfig::from_json_str(&read_json(p, "config")?)
            .with_context(|| format!("parse config '{}'", p.display()))?),
        None => Ok(StageConfig::portfolio()),
    }
}

/// Page with one heading per section and the section label as its text.
fn document_for(cfg: &StageConfig) -> MemoryDocument {
    cfg.sections.iter().fold(MemoryDocument::new(), |doc, s| {
        doc.with_section(&s.name, &[s.label.as_str(), s.name.as_str()])
    })
}

fn build_stage(args: &StageArgs) -> anyhow::Result<(Stage, StageConfig)> {
    let cfg = load_config(args.config.as_deref())?;
    let content = ContentManifest::from_json_str(&read_json(&args.content, "content")?)
        .with_context(|| format!("parse content '{}'", args.content.display()))?;
    let viewport = Viewport::try_from(kurbo::Size::new(
        f64::from(args.width),
        f64::from(args.height),
    ))
    .context("invalid --width/--height")?;

    let media_root = args
        .content
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let host = StageHost {
        document: shared(document_for(&cfg)),
        surface: shared(NativeScroll::new()),
        page: shared(MemoryPage::default()),
        media: Box::new(StillFileFactory::new(media_root)),
        platform: Platform::Other,
    };
    let stage = Stage::new(&cfg, &content, viewport, host)?;
    Ok((stage, cfg))
}

fn make_backend(choice: BackendChoice) -> anyhow::Result<Box<dyn PassBackend>> {
    match choice {
        BackendChoice::Cpu => Ok(Box::new(CpuBackend::new())),
        #[cfg(feature = "gpu")]
        BackendChoice::Gpu => Ok(Box::new(prism_stage::GpuBackend::new()?)),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut stage, _) = build_stage(&args.stage)?;
    let mut backend = make_backend(args.backend)?;

    stage.on_scroll(args.scroll);
    if let Some(slot) = args.hover {
        stage.on_hover_enter(slot);
    }
    let mut remaining = args.time.max(0.0);
    while remaining > 0.0 {
        let dt = remaining.min(FRAME_STEP);
        stage.advance(dt);
        remaining -= dt;
    }
    let frame = stage.render(backend.as_mut())?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    if !(args.step.is_finite() && args.step > 0.0) {
        anyhow::bail!("--step must be > 0, got {}", args.step);
    }
    let (mut stage, cfg) = build_stage(&args.stage)?;
    let end = args.to.unwrap_or_else(|| {
        let last = stage.engine().section_count().saturating_sub(1);
        stage.engine().jump_target(last).unwrap_or(0.0) + stage.engine().viewport().height
    });

    let mut offsets = Vec::new();
    let mut y = 0.0;
    while y <= end {
        offsets.push(y);
        y += args.step;
    }
    if args.back {
        let forward = offsets.clone();
        offsets.extend(forward.into_iter().rev().skip(1));
    }

    for offset in offsets {
        for ev in stage.on_scroll(offset) {
            let name = cfg
                .sections
                .get(ev.section())
                .map_or("?", |s| s.name.as_str());
            println!("{offset:>9.1}  {ev:?}  {name}");
        }
    }
    println!(
        "final section: {} ({})",
        stage.engine().active_section(),
        cfg.sections
            .get(stage.engine().active_section())
            .map_or("?", |s| s.label.as_str())
    );
    Ok(())
}
