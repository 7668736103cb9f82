/// Colors offered by the new-task form and the block color picker
pub const COLOR_PALETTE: [&str; 11] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4",
    "#FFEAA7", "#74B9FF", "#A29BFE", "#FD79A8",
    "#FDCB6E", "#6C5CE7", "#00B894",
];

/// Reserved color marking flexible free time; never tracked against the plan
pub const FREE_TIME_COLOR: &str = "#2C3E50";

pub const DEFAULT_COLOR: &str = COLOR_PALETTE[1];

/// Hex colors compare case-insensitively ("#2c3e50" from a custom picker is
/// the same color as the palette's "#2C3E50").
pub fn same_color(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

pub fn is_free_time(color: &str) -> bool {
    same_color(color, FREE_TIME_COLOR)
}

/// Parse "#RRGGBB" into its channels
pub fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

pub fn to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}
