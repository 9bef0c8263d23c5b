use std::time::Duration;

use crate::foundation::core::Color;

/// Layout recursion budget used by `set_layout` unless overridden.
pub const DEFAULT_DEPTH_LIMIT: usize = 50;

/// Gate for the expensive invariant cross-checks.
///
/// When enabled, detected drift is logged as a warning and drawing carries on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Diagnostics {
    pub consistency_checks: bool,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self {
            consistency_checks: cfg!(debug_assertions),
        }
    }
}

impl Diagnostics {
    pub fn enabled() -> Self {
        Self {
            consistency_checks: true,
        }
    }

    pub fn disabled() -> Self {
        Self {
            consistency_checks: false,
        }
    }

    /// Logs detected drift. Does nothing while checks are disabled.
    pub fn warn_inconsistency(&self, msg: &str) {
        if !self.consistency_checks {
            return;
        }
        tracing::warn!(target: "algonim::consistency", "inconsistency detected: {msg}");
    }
}

/// Host-level options.
#[derive(Clone, Debug)]
pub struct AlgonimOpts {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Maximum nesting of layout descriptions accepted by `set_layout`.
    pub depth_limit: usize,
    pub diagnostics: Diagnostics,
    /// Delay between keyframes when a step does not provide its own.
    pub keyframe_delay: Duration,
    /// Color the whole surface is cleared to before panes draw.
    pub background: Color,
}

impl Default for AlgonimOpts {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            depth_limit: DEFAULT_DEPTH_LIMIT,
            diagnostics: Diagnostics::default(),
            keyframe_delay: Duration::from_millis(1000),
            background: Color::WHITE,
        }
    }
}

impl AlgonimOpts {
    /// Defaults overridden by `ALGONIM_CONSISTENCY_CHECKS` and `ALGONIM_KEYFRAME_DELAY_MS`.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(v) = std::env::var("ALGONIM_CONSISTENCY_CHECKS")
            .ok()
            .and_then(|v| parse_flag(&v))
        {
            opts.diagnostics.consistency_checks = v;
        }
        if let Some(ms) = std::env::var("ALGONIM_KEYFRAME_DELAY_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            opts.keyframe_delay = Duration::from_millis(ms);
        }
        opts
    }
}

fn parse_flag(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
