//! Color parsing and canonicalization.

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, 255 is opaque.
    pub a: u8,
}

impl Rgba {
    /// Canonical lowercase hex form; alpha is only written when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Parses `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(...)` and `rgba(...)`.
pub fn parse_color(input: &str) -> Option<Rgba> {
    let trimmed = input.trim();
    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args, true);
    }
    if let Some(args) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args, false);
    }
    None
}

/// Normalizes a color string to its canonical hex form.
///
/// ```
/// use deckdown_core::normalize::color::normalize_color;
///
/// assert_eq!(normalize_color("#ABC").as_deref(), Some("#aabbcc"));
/// assert_eq!(normalize_color("rgb(255, 0, 0)").as_deref(), Some("#ff0000"));
/// assert_eq!(normalize_color("tomato"), None);
/// ```
pub fn normalize_color(input: &str) -> Option<String> {
    parse_color(input).map(Rgba::to_hex)
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: 255,
        }),
        4 => Some(Rgba {
            r: nibble(0)?,
            g: nibble(1)?,
            b: nibble(2)?,
            a: nibble(3)?,
        }),
        6 => Some(Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: 255,
        }),
        8 => Some(Rgba {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a: byte(6)?,
        }),
        _ => None,
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        let value: f64 = s.parse().ok()?;
        (0.0..=255.0)
            .contains(&value)
            .then(|| value.round() as u8)
    };

    let a = if with_alpha {
        let alpha: f64 = parts[3].parse().ok()?;
        if !(0.0..=1.0).contains(&alpha) {
            return None;
        }
        (alpha * 255.0).round() as u8
    } else {
        255
    };

    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_short_hex() {
        assert_eq!(normalize_color("#abc").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_color("#abcd").as_deref(), Some("#aabbccdd"));
    }

    #[test]
    fn normalization_is_a_fixed_point() {
        for input in ["#abc", "#1A2B3C", "#11223380", "rgba(10, 20, 30, 0.5)", "#fff"] {
            let once = normalize_color(input).expect("valid color");
            let twice = normalize_color(&once).expect("normalized color parses");
            assert_eq!(once, twice, "input {input}");
        }
    }

    #[test]
    fn opaque_alpha_is_dropped() {
        assert_eq!(normalize_color("#aabbccff").as_deref(), Some("#aabbcc"));
        assert_eq!(normalize_color("rgba(0,0,0,1)").as_deref(), Some("#000000"));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(normalize_color("#ab"), None);
        assert_eq!(normalize_color("#ggg"), None);
        assert_eq!(normalize_color("rgb(300, 0, 0)"), None);
        assert_eq!(normalize_color("rgb(1, 2)"), None);
        assert_eq!(normalize_color(""), None);
    }
}
