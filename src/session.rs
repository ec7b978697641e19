use std::time::Instant;

use crate::frame::FrameDimensions;
use crate::{
    Convolver, FilterMode, FpsEstimator, FpsReading, Frame, RenderError, SourceError, TickError,
};

/// Supplies one frame per tick.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame<'static>, SourceError>;
}

/// Consumes filtered frames.
pub trait RenderSink {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    Rendered {
        dimensions: FrameDimensions,
        mode: FilterMode,
        fps: FpsReading,
    },
    /// Frame source was temporarily unavailable; nothing was rendered.
    Skipped,
}

/// Totals of [Session::run].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunSummary {
    pub rendered: u64,
    pub skipped: u64,
    pub fps: Option<f64>,
}

/// State of the frame loop: selected mode, dimensions of the last frame,
/// the convolver with its accelerated runtime and the FPS estimator.
///
/// Every tick pulls one frame from the source, filters it in the mode
/// selected before the tick and passes it to the sink.
#[derive(Debug)]
pub struct Session {
    convolver: Convolver,
    mode: FilterMode,
    dimensions: Option<FrameDimensions>,
    fps: FpsEstimator,
    last_tick: Option<Instant>,
}

impl Session {
    pub fn new(convolver: Convolver, mode: FilterMode) -> Self {
        Self {
            convolver,
            mode,
            dimensions: None,
            fps: FpsEstimator::new(),
            last_tick: None,
        }
    }

    #[inline]
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Mode to use starting from the next tick.
    pub fn set_mode(&mut self, mode: FilterMode) {
        if mode != self.mode {
            log::debug!("Filter mode is switched from {:?} to {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /// Dimensions of the last received frame.
    #[inline]
    pub fn dimensions(&self) -> Option<FrameDimensions> {
        self.dimensions
    }

    #[inline]
    pub fn fps(&self) -> FpsReading {
        self.fps.reading()
    }

    #[inline]
    pub fn convolver(&self) -> &Convolver {
        &self.convolver
    }

    #[inline]
    pub fn convolver_mut(&mut self) -> &mut Convolver {
        &mut self.convolver
    }

    pub fn tick(
        &mut self,
        source: &mut impl FrameSource,
        sink: &mut impl RenderSink,
    ) -> Result<TickOutcome, TickError> {
        self.tick_at(Instant::now(), source, sink)
    }

    /// Runs one tick that started at the given moment.
    ///
    /// Time between starts of two ticks is the duration of a frame.
    pub fn tick_at(
        &mut self,
        now: Instant,
        source: &mut impl FrameSource,
        sink: &mut impl RenderSink,
    ) -> Result<TickOutcome, TickError> {
        if let Some(last_tick) = self.last_tick {
            let duration = now.saturating_duration_since(last_tick);
            self.fps.push(duration.as_secs_f64() * 1000.);
        }
        self.last_tick = Some(now);

        let mut frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(SourceError::Unavailable(reason)) => {
                log::warn!("Tick is skipped: {}", reason);
                return Ok(TickOutcome::Skipped);
            }
            Err(SourceError::Exhausted) => return Err(TickError::SourceExhausted),
        };

        let dimensions = frame.dimensions();
        if self.dimensions != Some(dimensions) {
            log::debug!(
                "Frame size is changed to {}x{}",
                dimensions.width,
                dimensions.height
            );
            self.dimensions = Some(dimensions);
        }

        let mode = self.mode;
        self.convolver.filter(&mut frame, mode)?;
        sink.render(&frame)?;
        Ok(TickOutcome::Rendered {
            dimensions,
            mode,
            fps: self.fps.reading(),
        })
    }

    /// Runs ticks until the source is exhausted or `max_ticks` ticks
    /// were done.
    pub fn run(
        &mut self,
        source: &mut impl FrameSource,
        sink: &mut impl RenderSink,
        max_ticks: Option<u64>,
    ) -> Result<RunSummary, TickError> {
        let mut summary = RunSummary::default();
        let mut ticks = 0;
        while max_ticks.is_none_or(|max| ticks < max) {
            ticks += 1;
            match self.tick(source, sink) {
                Ok(TickOutcome::Rendered { .. }) => summary.rendered += 1,
                Ok(TickOutcome::Skipped) => summary.skipped += 1,
                Err(TickError::SourceExhausted) => break,
                Err(err) => return Err(err),
            }
        }
        summary.fps = self.fps.reading().value();
        Ok(summary)
    }
}
