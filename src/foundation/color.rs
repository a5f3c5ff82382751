use crate::foundation::core::Rgba8;
use crate::foundation::error::{FxError, FxResult};

/// Parse a CSS-style color string into straight RGBA8.
///
/// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`, `rgba(r, g, b, a)` (alpha in
/// `0..=1`) and a handful of named colors.
pub fn parse_css_color(s: &str) -> FxResult<Rgba8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex).map_err(FxError::validation);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_fn(args).map_err(FxError::validation);
    }

    named(&lower).ok_or_else(|| FxError::validation(format!("unsupported color \"{s}\"")))
}

fn parse_hex(s: &str) -> Result<Rgba8, String> {
    fn nibble(c: u8) -> Result<u8, String> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| format!("invalid hex digit '{}'", c as char))
    }

    let b = s.as_bytes();
    let expand = |c: u8| -> Result<u8, String> { Ok(nibble(c)? * 17) };
    let pair = |hi: u8, lo: u8| -> Result<u8, String> { Ok(nibble(hi)? * 16 + nibble(lo)?) };

    match b.len() {
        3 => Ok(Rgba8::new(expand(b[0])?, expand(b[1])?, expand(b[2])?, 255)),
        4 => Ok(Rgba8::new(
            expand(b[0])?,
            expand(b[1])?,
            expand(b[2])?,
            expand(b[3])?,
        )),
        6 => Ok(Rgba8::new(
            pair(b[0], b[1])?,
            pair(b[2], b[3])?,
            pair(b[4], b[5])?,
            255,
        )),
        8 => Ok(Rgba8::new(
            pair(b[0], b[1])?,
            pair(b[2], b[3])?,
            pair(b[4], b[5])?,
            pair(b[6], b[7])?,
        )),
        _ => Err("hex color must be #rgb, #rgba, #rrggbb or #rrggbbaa".to_owned()),
    }
}

fn parse_rgb_fn(args: &str) -> Result<Rgba8, String> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(format!("rgb() expects 3 or 4 components, got {}", parts.len()));
    }

    let channel = |p: &str| -> Result<u8, String> {
        let v: f64 = p
            .parse()
            .map_err(|_| format!("invalid rgb component \"{p}\""))?;
        Ok(v.clamp(0.0, 255.0).round() as u8)
    };

    let a = match parts.get(3) {
        Some(p) => {
            let v: f64 = p
                .parse()
                .map_err(|_| format!("invalid alpha component \"{p}\""))?;
            (v.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Ok(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn named(s: &str) -> Option<Rgba8> {
    Some(match s {
        "white" => Rgba8::WHITE,
        "black" => Rgba8::new(0, 0, 0, 255),
        "red" => Rgba8::new(255, 0, 0, 255),
        "green" => Rgba8::new(0, 128, 0, 255),
        "blue" => Rgba8::new(0, 0, 255, 255),
        "gray" | "grey" => Rgba8::new(128, 128, 128, 255),
        "transparent" => Rgba8::transparent(),
        _ => return None,
    })
}
