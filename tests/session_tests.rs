use std::collections::VecDeque;
use std::time::{Duration, Instant};

use frame_convolve::{
    Convolver, FilterMode, FpsEstimator, FpsReading, Frame, FrameDimensions, FrameSource,
    Kernel, RenderError, RenderSink, Session, SourceError, TickError, TickOutcome,
};

mod utils;

struct ScriptedSource(VecDeque<Result<Frame<'static>, SourceError>>);

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Frame<'static>, SourceError> {
        self.0.pop_front().unwrap_or(Err(SourceError::Exhausted))
    }
}

#[derive(Default)]
struct Screen {
    frames: Vec<Frame<'static>>,
    broken: bool,
}

impl RenderSink for Screen {
    fn render(&mut self, frame: &Frame) -> Result<(), RenderError> {
        if self.broken {
            return Err(RenderError("display is lost".into()));
        }
        self.frames.push(frame.copy());
        Ok(())
    }
}

#[test]
fn mode_is_switched_on_the_next_tick() {
    let src = utils::noise_frame(12, 10, 42);
    let mut source = ScriptedSource((0..3).map(|_| Ok(src.copy())).collect());
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Passthrough);

    session.tick(&mut source, &mut screen).unwrap();
    session.set_mode(FilterMode::Software);
    session.tick(&mut source, &mut screen).unwrap();
    session.set_mode(FilterMode::Accelerated);
    let outcome = session.tick(&mut source, &mut screen).unwrap();
    assert!(matches!(
        outcome,
        TickOutcome::Rendered {
            mode: FilterMode::Accelerated,
            ..
        }
    ));

    assert_eq!(screen.frames.len(), 3);
    assert_eq!(screen.frames[0].buffer(), src.buffer());
    assert_ne!(screen.frames[1].buffer(), src.buffer());
    assert_eq!(screen.frames[1].buffer(), screen.frames[2].buffer());
}

#[test]
fn frame_size_may_change_between_ticks() {
    let sizes = [(8, 8), (64, 40), (5, 3), (300, 200), (8, 8)];
    let mut source = ScriptedSource(
        sizes
            .iter()
            .enumerate()
            .map(|(i, &(w, h))| Ok(utils::noise_frame(w, h, i as u32)))
            .collect(),
    );
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Accelerated);

    for &(width, height) in &sizes {
        let outcome = session.tick(&mut source, &mut screen).unwrap();
        let TickOutcome::Rendered { dimensions, .. } = outcome else {
            panic!("tick was skipped");
        };
        assert_eq!(dimensions, FrameDimensions::new(width, height));
        assert_eq!(session.dimensions(), Some(dimensions));
    }

    for (i, (&(width, height), rendered)) in sizes.iter().zip(&screen.frames).enumerate() {
        let mut expected = utils::noise_frame(width, height, i as u32);
        Convolver::new(Kernel::sharpen())
            .filter(&mut expected, FilterMode::Software)
            .unwrap();
        assert_eq!(rendered.buffer(), expected.buffer(), "frame {}", i);
    }
}

#[test]
fn transient_source_errors_are_skipped() {
    let mut source = ScriptedSource(VecDeque::from([
        Ok(Frame::new(3, 3)),
        Err(SourceError::Unavailable("no signal".into())),
        Err(SourceError::Unavailable("no signal".into())),
        Ok(Frame::new(3, 3)),
    ]));
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Software);
    let summary = session.run(&mut source, &mut screen, None).unwrap();
    assert_eq!(summary.rendered, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(screen.frames.len(), 2);
}

#[test]
fn run_is_limited_by_count_of_ticks() {
    let mut source = ScriptedSource((0..10).map(|_| Ok(Frame::new(4, 4))).collect());
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Accelerated);
    let summary = session.run(&mut source, &mut screen, Some(4)).unwrap();
    assert_eq!(summary.rendered, 4);
    assert_eq!(summary.fps, None);
    assert_eq!(source.0.len(), 6);
}

#[test]
fn fatal_errors_stop_the_loop() {
    let mut source = ScriptedSource((0..3).map(|_| Ok(Frame::new(2, 2))).collect());
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Software);
    assert!(matches!(
        session.run(&mut source, &mut screen, None),
        Err(TickError::Filter(_))
    ));
    assert_eq!(source.0.len(), 2);

    let mut source = ScriptedSource((0..3).map(|_| Ok(Frame::new(3, 3))).collect());
    let mut screen = Screen {
        broken: true,
        ..Default::default()
    };
    assert!(matches!(
        session.run(&mut source, &mut screen, None),
        Err(TickError::Render(_))
    ));
}

#[test]
fn fps_of_steady_frame_loop() {
    let mut source = ScriptedSource((0..41).map(|_| Ok(Frame::new(3, 3))).collect());
    let mut screen = Screen::default();
    let mut session = Session::new(Convolver::new(Kernel::sharpen()), FilterMode::Software);
    let start = Instant::now();
    let mut readings = Vec::new();
    for i in 0..41 {
        let now = start + Duration::from_millis(40 * i);
        if let TickOutcome::Rendered { fps, .. } =
            session.tick_at(now, &mut source, &mut screen).unwrap()
        {
            readings.push(fps);
        }
    }
    // The first tick has no duration; 20 durations are needed.
    assert!(readings[..20].iter().all(|r| *r == FpsReading::Warming));
    assert!(readings[20..].iter().all(|r| *r == FpsReading::Steady(25.)));
    assert_eq!(session.fps().to_string(), "25.00");
}

#[test]
fn fps_estimator_window() {
    let mut fps = FpsEstimator::new();
    for _ in 0..19 {
        assert_eq!(fps.push(50.), FpsReading::Warming);
    }
    assert_eq!(fps.reading().to_string(), "NaN");
    assert_eq!(fps.push(50.), FpsReading::Steady(20.));
    assert_eq!(fps.push(100.), FpsReading::Steady(19.05));
    assert_eq!(fps.len(), 20);

    // Window is fully replaced after another 20 samples.
    for _ in 0..20 {
        fps.push(10.);
    }
    assert_eq!(fps.reading(), FpsReading::Steady(100.));

    for _ in 0..20 {
        fps.push(0.);
    }
    assert_eq!(fps.reading(), FpsReading::Steady(f64::MAX));
}
