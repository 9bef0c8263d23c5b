/// Parsed form of a CSS font shorthand such as `"italic bold 18px monospace"`.
#[derive(Clone, Debug, PartialEq)]
pub struct FontDescriptor {
    pub size_px: f64,
    pub weight: u16,
    pub italic: bool,
    pub small_caps: bool,
    /// Comma separated family list with generic aliases normalized (`sans` -> `sans-serif`).
    pub families: String,
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self {
            size_px: 10.0,
            weight: 400,
            italic: false,
            small_caps: false,
            families: "sans-serif".to_string(),
        }
    }
}

impl FontDescriptor {
    /// Parse a shorthand; strings without a recognizable size fall back to `10px sans-serif`.
    pub fn parse(shorthand: &str) -> Self {
        let mut out = Self::default();
        let mut tokens = shorthand.split_whitespace();
        let mut size = None;

        for token in tokens.by_ref() {
            match token.to_ascii_lowercase().as_str() {
                "normal" => {}
                "small-caps" => out.small_caps = true,
                "italic" | "oblique" => out.italic = true,
                "bold" | "bolder" => out.weight = 700,
                "lighter" => out.weight = 300,
                t => {
                    if let Ok(w) = t.parse::<u16>() {
                        if (1..=1000).contains(&w) {
                            out.weight = w;
                            continue;
                        }
                    }
                    size = parse_size(t);
                    if size.is_none() {
                        return Self::default();
                    }
                    break;
                }
            }
        }

        let Some(size) = size else {
            return Self::default();
        };
        out.size_px = size;

        let rest = tokens.collect::<Vec<_>>().join(" ");
        let families = rest
            .split(',')
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|f| match f {
                "sans" => "sans-serif",
                "mono" => "monospace",
                other => other,
            })
            .collect::<Vec<_>>();
        if !families.is_empty() {
            out.families = families.join(", ");
        }
        out
    }
}

// "18px", "12pt", "18px/1.2" (line height ignored).
fn parse_size(token: &str) -> Option<f64> {
    let size = token.split('/').next()?;
    let (num, scale) = if let Some(n) = size.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = size.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        return None;
    };
    let v = num.parse::<f64>().ok()?;
    (v.is_finite() && v > 0.0).then_some(v * scale)
}
