use std::ffi::OsStr;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use frame_convolve as fc;
use image::ImageReader;
use log::debug;

mod structs;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
#[clap(disable_help_flag = true)]
struct Cli {
    #[clap(long, action = clap::ArgAction::HelpLong)]
    help: Option<bool>,

    /// Path to a still image or to a directory with frames
    #[clap(value_parser)]
    source_path: PathBuf,

    /// Path to file for the last rendered frame
    #[clap(value_parser)]
    destination_path: Option<PathBuf>,

    /// Overwrite destination file
    #[clap(short, long, action)]
    overwrite: bool,

    /// Mode used to filter frames
    #[clap(short, long, value_enum, default_value_t = structs::Mode::Accelerated)]
    mode: structs::Mode,

    /// Max count of ticks; a directory with frames is played once if not set
    #[clap(short, long, value_parser)]
    ticks: Option<u64>,

    /// CPU-extensions used by the accelerated runtime
    #[clap(short, long, value_enum)]
    cpu: Option<structs::Cpu>,

    /// Kernel: "sharpen", "identity" or comma-separated weights of a square kernel
    #[clap(short, long, value_parser, default_value = "sharpen")]
    kernel: structs::KernelWeights,

    /// Divisor of the weighted sum
    #[clap(short, long, value_parser, allow_negative_numbers = true)]
    divisor: Option<i32>,

    #[clap(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

/// Repeats the same frame on every tick.
struct StillImage(fc::Frame<'static>);

impl fc::FrameSource for StillImage {
    fn next_frame(&mut self) -> Result<fc::Frame<'static>, fc::SourceError> {
        Ok(self.0.copy())
    }
}

/// Plays image files of a directory in the order of their names.
struct FrameFiles {
    paths: Vec<PathBuf>,
    position: usize,
    looped: bool,
}

impl fc::FrameSource for FrameFiles {
    fn next_frame(&mut self) -> Result<fc::Frame<'static>, fc::SourceError> {
        if self.position >= self.paths.len() {
            if !self.looped || self.paths.is_empty() {
                return Err(fc::SourceError::Exhausted);
            }
            self.position = 0;
        }
        let path = &self.paths[self.position];
        self.position += 1;
        debug!("Decoding frame {:?}", path);
        let image = ImageReader::open(path)
            .map_err(|e| e.to_string())
            .and_then(|reader| reader.decode().map_err(|e| e.to_string()))
            .map_err(|reason| {
                fc::SourceError::Unavailable(format!("failed to read {:?}: {}", path, reason))
            })?;
        Ok(image.to_rgba8().into())
    }
}

/// Keeps the last rendered frame.
#[derive(Default)]
struct LastFrame(Option<fc::Frame<'static>>);

impl fc::RenderSink for LastFrame {
    fn render(&mut self, frame: &fc::Frame) -> Result<(), fc::RenderError> {
        match self.0 {
            Some(ref mut last) if last.dimensions() == frame.dimensions() => {
                last.buffer_mut().copy_from_slice(frame.buffer());
            }
            _ => self.0 = Some(frame.copy()),
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli: Cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();
    play(&cli)
}

fn play(cli: &Cli) -> Result<()> {
    let kernel = cli
        .kernel
        .kernel(cli.divisor)
        .map_err(|e| anyhow!("Invalid kernel: {}", e))?;
    debug!(
        "Kernel {}x{} with divisor {}",
        kernel.dim(),
        kernel.dim(),
        kernel.divisor()
    );

    let mut convolver = fc::Convolver::new(kernel);
    if let Some(cpu) = cli.cpu {
        let extensions = cpu
            .into_extensions()
            .filter(|e| e.is_supported())
            .ok_or_else(|| anyhow!("CPU-extensions {:?} are not supported", cpu))?;
        unsafe { convolver.set_cpu_extensions(extensions) };
    }
    debug!(
        "Accelerated runtime uses {} row kernel",
        convolver.cpu_extensions().name()
    );

    let mut session = fc::Session::new(convolver, cli.mode.into());
    let mut sink = LastFrame::default();
    let summary = if cli.source_path.is_dir() {
        let mut source = open_frame_files(cli)?;
        session.run(&mut source, &mut sink, cli.ticks)
    } else {
        let mut source = open_still_image(cli)?;
        session.run(&mut source, &mut sink, cli.ticks.or(Some(1)))
    }
    .map_err(|e| anyhow!("Frame loop is stopped: {}", e))?;

    println!(
        "Rendered: {}, skipped: {}, FPS: {}",
        summary.rendered,
        summary.skipped,
        session.fps()
    );

    let frame = sink
        .0
        .ok_or_else(|| anyhow!("No one frame was rendered"))?;
    save_result(cli, frame)
}

fn open_still_image(cli: &Cli) -> Result<StillImage> {
    let source_path = &cli.source_path;
    debug!("Opening the source image {:?}", source_path);
    let image = ImageReader::open(source_path)
        .with_context(|| format!("Failed to read source file from {:?}", source_path))?
        .decode()
        .with_context(|| "Failed to decode source image")?;
    Ok(StillImage(image.to_rgba8().into()))
}

fn open_frame_files(cli: &Cli) -> Result<FrameFiles> {
    let source_path = &cli.source_path;
    debug!("Listing frames in {:?}", source_path);
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(source_path)
        .with_context(|| format!("Failed to read directory {:?}", source_path))?
    {
        let path = entry?.path();
        if path.is_file() && image::ImageFormat::from_path(&path).is_ok() {
            paths.push(path);
        }
    }
    if paths.is_empty() {
        return Err(anyhow!("Directory {:?} has no image files", source_path));
    }
    paths.sort();
    debug!("Found {} frames", paths.len());
    Ok(FrameFiles {
        paths,
        position: 0,
        looped: cli.ticks.is_some(),
    })
}

fn save_result(cli: &Cli, frame: fc::Frame<'static>) -> Result<()> {
    let result_path = if let Some(path) = cli.destination_path.clone() {
        path
    } else {
        let mut path = PathBuf::from("./");
        let ext = if cli.source_path.is_dir() {
            None
        } else {
            cli.source_path.extension()
        };
        path.push("result");
        path.set_extension(ext.unwrap_or_else(|| OsStr::new("png")));
        path
    };
    if result_path.exists() && !cli.overwrite {
        return Err(anyhow!(
            "Destination path {:?} already exists.",
            result_path
        ));
    };

    debug!("Save the last frame into the file {:?}", result_path);
    let image = frame
        .into_rgba_image()
        .ok_or_else(|| anyhow!("Failed to convert the last frame into image"))?;
    image
        .save(&result_path)
        .with_context(|| "Failed to save the last frame")?;
    Ok(())
}
