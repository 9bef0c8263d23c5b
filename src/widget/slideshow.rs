//! Keyframe playback: mutate the host, draw, capture, hold, repeat.
//!
//! Frames are produced strictly one after another; the surface is borrowed mutably for the
//! whole run, so nothing else can draw onto it in between.

use std::fmt;
use std::time::Duration;

use crate::foundation::error::AlgonimResult;
use crate::render::surface::Surface;
use crate::widget::algonim::Algonim;
use crate::widget::sink::{FrameSink, SinkConfig};

/// Source of animation steps.
///
/// `next_step` applies one mutation and returns how long its keyframe is held, or `None`
/// once the animation is over.
pub trait Animation {
    fn next_step(&mut self, alg: &mut Algonim) -> AlgonimResult<Option<Duration>>;
}

impl<F> Animation for F
where
    F: FnMut(&mut Algonim) -> AlgonimResult<Option<Duration>>,
{
    fn next_step(&mut self, alg: &mut Algonim) -> AlgonimResult<Option<Duration>> {
        self(alg)
    }
}

type StepFn = Box<dyn FnMut(&mut Algonim) -> AlgonimResult<()>>;

struct ScriptStep {
    delay: Option<Duration>,
    action: StepFn,
}

/// Fixed sequence of mutations, each followed by a keyframe.
#[derive(Default)]
pub struct Script {
    steps: Vec<ScriptStep>,
    next: usize,
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Script")
            .field("steps", &self.steps.len())
            .field("next", &self.next)
            .finish()
    }
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a step. Without a `delay` the keyframe is held for the host's
    /// `keyframe_delay`.
    pub fn step(
        mut self,
        delay: Option<Duration>,
        action: impl FnMut(&mut Algonim) -> AlgonimResult<()> + 'static,
    ) -> Self {
        self.steps.push(ScriptStep {
            delay,
            action: Box::new(action),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps not yet played.
    pub fn remaining(&self) -> usize {
        self.steps.len() - self.next
    }
}

impl Animation for Script {
    fn next_step(&mut self, alg: &mut Algonim) -> AlgonimResult<Option<Duration>> {
        let Some(step) = self.steps.get_mut(self.next) else {
            return Ok(None);
        };
        self.next += 1;
        (step.action)(alg)?;
        Ok(Some(step.delay.unwrap_or(alg.opts().keyframe_delay)))
    }
}

/// Time source between keyframes.
pub trait Clock {
    fn wait(&mut self, hold: Duration);
}

/// Sleeps the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadClock;

impl Clock for ThreadClock {
    fn wait(&mut self, hold: Duration) {
        std::thread::sleep(hold);
    }
}

/// Records requested holds without sleeping.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    waits: Vec<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }

    pub fn elapsed(&self) -> Duration {
        self.waits.iter().sum()
    }
}

impl Clock for ManualClock {
    fn wait(&mut self, hold: Duration) {
        self.waits.push(hold);
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Slideshow;

impl Slideshow {
    /// Plays `animation` into `sink` and returns the number of frames pushed.
    ///
    /// Frame 0 shows the state before the first step and is not held: the first step runs
    /// as soon as it is pushed. Every step is followed by a keyframe which is drawn, captured
    /// and pushed before the clock waits for its hold time.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run<S, K, C, A>(
        alg: &mut Algonim,
        surface: &mut S,
        sink: &mut K,
        clock: &mut C,
        animation: &mut A,
    ) -> AlgonimResult<u64>
    where
        S: Surface,
        K: FrameSink<S::Frame> + ?Sized,
        C: Clock + ?Sized,
        A: Animation + ?Sized,
    {
        sink.begin(SinkConfig {
            width: surface.width(),
            height: surface.height(),
        })?;

        let first = alg.render_frame(surface)?;
        sink.push_frame(0, &first)?;
        let mut frames = 1u64;

        while let Some(hold) = animation.next_step(alg)? {
            let frame = alg.render_frame(surface)?;
            sink.push_frame(frames, &frame)?;
            tracing::debug!(keyframe = frames, hold_ms = hold.as_millis() as u64, "keyframe");
            frames += 1;
            clock.wait(hold);
        }

        sink.end()?;
        Ok(frames)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/widget/slideshow.rs"]
mod tests;
