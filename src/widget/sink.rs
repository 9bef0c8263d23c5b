use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::core::FrameRGBA;
use crate::foundation::error::AlgonimResult;

/// Configuration handed to a [`FrameSink`] before the first keyframe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    pub width: u32,
    pub height: u32,
}

/// Consumer of captured keyframes.
///
/// `push_frame` is called with strictly increasing indices, starting at 0.
pub trait FrameSink<F> {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> AlgonimResult<()>;
    fn push_frame(&mut self, idx: u64, frame: &F) -> AlgonimResult<()>;
    /// Called once after the last frame.
    fn end(&mut self) -> AlgonimResult<()>;
}

/// Keeps every frame in memory. For tests and inspection.
#[derive(Debug)]
pub struct InMemorySink<F> {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, F)>,
    finished: bool,
}

impl<F> Default for InMemorySink<F> {
    fn default() -> Self {
        Self {
            cfg: None,
            frames: Vec::new(),
            finished: false,
        }
    }
}

impl<F> InMemorySink<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    pub fn frames(&self) -> &[(u64, F)] {
        &self.frames
    }

    /// Whether `end` was called since the last `begin`.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl<F: Clone> FrameSink<F> for InMemorySink<F> {
    fn begin(&mut self, cfg: SinkConfig) -> AlgonimResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.finished = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &F) -> AlgonimResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> AlgonimResult<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes each keyframe as `frame_NNNN.png` into a directory.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, idx: u64) -> PathBuf {
        self.dir.join(format!("frame_{idx:04}.png"))
    }
}

impl FrameSink<FrameRGBA> for PngSequenceSink {
    fn begin(&mut self, _cfg: SinkConfig) -> AlgonimResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("create output dir '{}'", self.dir.display()))?;
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: u64, frame: &FrameRGBA) -> AlgonimResult<()> {
        let path = self.frame_path(idx);
        let data = if frame.premultiplied {
            unpremultiply(&frame.data)
        } else {
            frame.data.clone()
        };
        image::save_buffer_with_format(
            &path,
            &data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        tracing::debug!(path = %path.display(), "wrote keyframe");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> AlgonimResult<()> {
        Ok(())
    }
}

/// Premultiplied RGBA8 to straight alpha, as PNG expects.
pub fn unpremultiply(data: &[u8]) -> Vec<u8> {
    let mut out = data.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            let v = (u16::from(*c) * 255 + a / 2) / a;
            *c = v.min(255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/widget/sink.rs"]
mod tests;
