use anyhow::{anyhow, bail, Context};
use config::{Config, File};
use hexer::{
    timed, Board, BoardConfig, Color, InputEvent, Size2, SvgSurface,
    TileToggle,
};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::{
    cell::Cell,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    process,
    rc::Rc,
};
use structopt::StructOpt;
use strum::{Display, EnumString};

/// CLI for driving a Hexer board without a browser. Loads a board, replays a
/// recorded input script through it, and writes out the result.
#[derive(Debug, StructOpt)]
#[structopt(name = "hexer")]
struct Opt {
    /// Path to a config file that defines the board. Supported formats: JSON,
    /// TOML. If omitted, the default config is used
    #[structopt(short, long)]
    config: Option<PathBuf>,

    /// Path to a JSON input script: an array of input events, each tagged by
    /// `kind` (`pointer_down`, `pointer_move`, `pointer_up`,
    /// `pointer_cancel`, `wheel`). Positions are in viewport pixels
    #[structopt(short, long)]
    script: Option<PathBuf>,

    /// If given, the final board will be saved to this directory. The exact
    /// files that appear in the directory are defined by the output formats.
    /// See `--output-formats` for more info
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// The format(s) to output the board in. Supported formats:
    ///
    /// cfg - The full config object used for the board, in TOML format
    ///
    /// json - Tile ownership as a JSON object of `"q,r": owned`
    ///
    /// svg - The final frame, as seen through the camera
    #[structopt(short = "f", long)]
    output_formats: Vec<OutputFormat>,

    /// Viewport width, in logical pixels
    #[structopt(long, default_value = "800")]
    width: f64,

    /// Viewport height, in logical pixels
    #[structopt(long, default_value = "600")]
    height: f64,

    /// Device pixel ratio. Affects the size of rendered output
    #[structopt(long, default_value = "1")]
    pixel_ratio: f64,

    /// The logging level to use. See
    /// https://docs.rs/log/0.4.11/log/enum.LevelFilter.html for options
    #[structopt(long, default_value = "info")]
    log_level: LevelFilter,
}

/// Different output formats.
#[derive(Copy, Clone, Debug, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
enum OutputFormat {
    // If you change this, make sure to update the help text for
    // `--output-formats`!
    /// Export the board's full config in a human-readable file
    Cfg,
    /// Export tile ownership, which can be loaded back into a board later
    Json,
    /// Render the final frame as an SVG
    Svg,
}

impl OutputFormat {
    fn file_ext(self) -> &'static str {
        match self {
            Self::Cfg => "toml",
            Self::Json => "json",
            Self::Svg => "svg",
        }
    }
}

fn load_config(config_path: &Path) -> anyhow::Result<BoardConfig> {
    let mut settings = Config::new();
    let config_path = config_path.to_str().ok_or_else(|| {
        anyhow!("invalid character in path {:?}", config_path)
    })?;
    settings
        .merge(File::with_name(config_path))
        .context("error reading config file")?;
    settings.try_into().context("error reading config")
}

fn load_script(script_path: &Path) -> anyhow::Result<Vec<InputEvent>> {
    let file = OpenOptions::new()
        .read(true)
        .open(script_path)
        .with_context(|| format!("error opening script {:?}", script_path))?;
    serde_json::from_reader(file)
        .with_context(|| format!("error parsing script {:?}", script_path))
}

/// Feed every event in the script through the board. Returns the timestamp
/// of the last pointer event, which is used for the final frame.
fn replay(board: &mut Board, events: Vec<InputEvent>) -> f64 {
    let toggles = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&toggles);
    board.on_tile_toggled(move |_: TileToggle| {
        counter.set(counter.get() + 1)
    });

    let count = events.len();
    let mut last_timestamp = 0.0;
    timed!(
        format!("Replaying {} events", count),
        log::Level::Info,
        for event in events {
            match event {
                InputEvent::PointerDown { timestamp, .. }
                | InputEvent::PointerMove { timestamp, .. }
                | InputEvent::PointerUp { timestamp, .. } => {
                    last_timestamp = timestamp
                }
                InputEvent::PointerCancel { .. } | InputEvent::Wheel { .. } => {}
            }
            let outcome = board.handle_input(event);
            log::debug!("{:?} -> {}", event, outcome);
        }
    );
    info!(
        "Replay toggled {} tiles, {} now owned",
        toggles.get(),
        board.grid().owned_count()
    );
    last_timestamp
}

/// Generate an output form of the board in the given format.
fn gen_output(
    output_dir: &Path,
    output_format: OutputFormat,
    board: &mut Board,
    svg: &mut SvgSurface,
    timestamp: f64,
) -> anyhow::Result<()> {
    let output_file_path = output_dir
        .join("board")
        .with_extension(output_format.file_ext());

    timed!(
        format!(
            "Generating {} output and writing to {:?}",
            output_format, &output_file_path
        ),
        log::Level::Info,
        {
            let bytes = match output_format {
                OutputFormat::Cfg => toml::to_string_pretty(board.config())
                    // Panics only if config format isn't serializable (a bug)
                    .expect("error serializing config")
                    .into_bytes(),
                OutputFormat::Json => {
                    board.grid().ownership_to_json().into_bytes()
                }
                OutputFormat::Svg => {
                    let stats = board.render_frame(svg, timestamp);
                    info!(
                        "Rendered {} tiles ({} culled, {} failed)",
                        stats.drawn, stats.culled_box, stats.failed
                    );
                    svg.to_document().to_string().into_bytes()
                }
            };
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&output_file_path)
                .with_context(|| {
                    format!("error opening output file {:?}", &output_file_path)
                })?;
            file.write_all(&bytes).with_context(|| {
                format!("error writing to file {:?}", &output_file_path)
            })?;
        }
    );

    Ok(())
}

/// Run the CLI with some options
fn run(opt: Opt) -> anyhow::Result<()> {
    SimpleLogger::new().with_level(opt.log_level).init()?;

    let config = match &opt.config {
        Some(config_path) => load_config(config_path)?,
        None => BoardConfig::default(),
    };
    let mut board = Board::new(config)?;

    let size = Size2::new(opt.width, opt.height);
    let mut svg = SvgSurface::new(size, Some(Color::BLACK));
    board.resize(size, opt.pixel_ratio, &mut svg)?;

    let timestamp = match &opt.script {
        Some(script_path) => {
            let events = load_script(script_path)?;
            replay(&mut board, events)
        }
        None => 0.0,
    };

    // If an output dir was specified, write out output format(s) there
    if let Some(output_dir) = &opt.output {
        if opt.output_formats.is_empty() {
            bail!("output dir was specified, but no output formats were given")
        }
        fs::create_dir_all(output_dir)?;

        for output_format in &opt.output_formats {
            gen_output(
                output_dir,
                *output_format,
                &mut board,
                &mut svg,
                timestamp,
            )?;
        }
    }

    Ok(())
}

fn main() {
    let exit_code = match run(Opt::from_args()) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            1
        }
    };
    process::exit(exit_code);
}
