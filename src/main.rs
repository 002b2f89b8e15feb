use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread::JoinHandle;
use tilegen::config::{self, TileConfig};
use tilegen::imaging::{Rotation, TileFormat};
use tilegen::{output, process};

/// Usage and configuration problems.
const EXIT_USAGE: u8 = 2;
/// The run started but could not complete.
const EXIT_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(name = "tilegen")]
#[command(about = "Cut a large image into a multi-resolution tile pyramid")]
#[command(long_about = "\
Cut a large image into a multi-resolution tile pyramid

The source is halved until it fits in a single tile. Every level is cut into
square tiles, coarsest level first:

  <dest>/
  ├── size.json          # {\"width\":…,\"height\":…,\"tileSize\":…}
  ├── 0/0/0.png          # level 0: whole image in one tile
  └── 1/
      ├── 0/0.png        # <level>/<column>/<row>.<ext>
      └── 1/0.png

Settings are layered: stock defaults, then --config, then flags.")]
#[command(version)]
struct Cli {
    /// Source image (any format the decoder recognizes)
    input: PathBuf,

    /// Destination directory for the tile tree
    destination: PathBuf,

    /// Tile edge length in pixels [default: 256]
    #[arg(short = 's', long = "tile-size")]
    tile_size: Option<u32>,

    /// Tile format: png or jpg [default: png]
    #[arg(short = 'e', long = "format")]
    format: Option<TileFormat>,

    /// JPEG quality, 1-100 [default: 95]
    #[arg(short = 'j', long = "jpeg-quality")]
    jpeg_quality: Option<u32>,

    /// PNG compression effort, 0-9 [default: 3]
    #[arg(short = 'p', long = "png-compression")]
    png_compression: Option<u32>,

    /// Rotate the source 90° clockwise before tiling
    #[arg(short = 'r', long = "rotate-right")]
    rotate_right: bool,

    /// Rotate the source 90° counter-clockwise (-r wins if both are given)
    #[arg(short = 'R', long = "rotate-left")]
    rotate_left: bool,

    /// Use a Gaussian blur when halving instead of area averaging
    #[arg(short = 'b', long = "blur")]
    blur: bool,

    /// TOML file with tiling settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum parallel workers (clamped to the number of cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Only print errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

impl Cli {
    /// Flags as a TOML overlay; only flags that were given appear.
    fn overrides(&self) -> toml::Table {
        let mut table = toml::Table::new();
        if let Some(tile_size) = self.tile_size {
            table.insert("tile_size".into(), toml::Value::Integer(tile_size.into()));
        }
        if let Some(format) = self.format {
            table.insert("format".into(), format.extension().into());
        }
        if let Some(quality) = self.jpeg_quality {
            table.insert("jpeg_quality".into(), toml::Value::Integer(quality.into()));
        }
        if let Some(level) = self.png_compression {
            table.insert("png_compression".into(), toml::Value::Integer(level.into()));
        }
        match Rotation::from_flags(self.rotate_right, self.rotate_left) {
            Rotation::None => {}
            Rotation::Clockwise => {
                table.insert("rotation".into(), "clockwise".into());
            }
            Rotation::CounterClockwise => {
                table.insert("rotation".into(), "counter-clockwise".into());
            }
        }
        if self.blur {
            table.insert("downsample".into(), "blur".into());
        }
        if let Some(threads) = self.threads {
            let mut processing = toml::Table::new();
            processing.insert(
                "max_processes".into(),
                toml::Value::Integer(threads.try_into().unwrap_or(i64::MAX)),
            );
            table.insert("processing".into(), toml::Value::Table(processing));
        }
        table
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(EXIT_USAGE)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match config::load_config(cli.config.as_deref(), cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    init_thread_pool(&config.processing);

    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(cli: &Cli, config: &TileConfig) -> Result<(), process::GenerateError> {
    if cli.quiet {
        process::generate(&cli.input, &cli.destination, config, None)?;
        return Ok(());
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_process_event(&event) {
                println!("{}", line);
            }
        }
    });
    // The sender is moved into `generate` and dropped when it returns, which
    // ends the printer loop on both success and failure.
    let result = process::generate(&cli.input, &cli.destination, config, Some(tx));
    join_printer(printer);
    println!("{}", output::format_summary(&result?));
    Ok(())
}

/// Wait for the progress printer, re-raising its panic if it had one.
fn join_printer(printer: JoinHandle<()>) {
    if let Err(panic) = printer.join() {
        std::panic::resume_unwind(panic);
    }
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
