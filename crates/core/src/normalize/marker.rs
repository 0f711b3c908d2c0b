//! Depth to bullet-marker mapping.

/// Markers for unordered items, by nesting depth.
pub const UNORDERED_MARKERS: [&str; 4] = ["•", "◦", "▪", "–"];

#[derive(Clone, Copy)]
enum Numbering {
    Decimal,
    LowerAlpha,
    LowerRoman,
}

const ORDERED_NUMBERING: [Numbering; 3] = [
    Numbering::Decimal,
    Numbering::LowerAlpha,
    Numbering::LowerRoman,
];

/// Marker for an unordered item. Depths past the palette reuse the deepest marker.
pub fn bullet_marker(depth: usize) -> &'static str {
    UNORDERED_MARKERS[depth.min(UNORDERED_MARKERS.len() - 1)]
}

/// Marker for the `number`-th (1-based) ordered item at `depth`.
///
/// ```
/// use deckdown_core::normalize::marker::ordered_marker;
///
/// assert_eq!(ordered_marker(0, 3), "3.");
/// assert_eq!(ordered_marker(1, 3), "c.");
/// assert_eq!(ordered_marker(2, 4), "iv.");
/// ```
pub fn ordered_marker(depth: usize, number: u32) -> String {
    let numbering = ORDERED_NUMBERING[depth.min(ORDERED_NUMBERING.len() - 1)];
    let label = match numbering {
        Numbering::Decimal => number.to_string(),
        Numbering::LowerAlpha => alpha(number),
        Numbering::LowerRoman => roman(number),
    };
    format!("{label}.")
}

/// Spreadsheet-style letters: 1 → a, 26 → z, 27 → aa.
fn alpha(number: u32) -> String {
    if number == 0 {
        return "0".to_string();
    }
    let mut n = number;
    let mut out = Vec::new();
    while n > 0 {
        n -= 1;
        out.push((b'a' + (n % 26) as u8) as char);
        n /= 26;
    }
    out.iter().rev().collect()
}

fn roman(number: u32) -> String {
    if number == 0 || number >= 4000 {
        return number.to_string();
    }
    const TABLE: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut n = number;
    let mut out = String::new();
    for (value, digits) in TABLE {
        while n >= value {
            out.push_str(digits);
            n -= value;
        }
    }
    out
}
