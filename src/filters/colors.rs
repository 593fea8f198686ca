//! Default filter colors.

/// Accent color of the default scheme; new filters use it as background
pub const SCHEME_COLOR_ACCENT: &str = "#1e88e5";

const BLACK: &str = "#000000";
const WHITE: &str = "#ffffff";

/// Parse `#rrggbb` (or `#rgb`) into its channels
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        3 => {
            let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
            Some((expand(0)?, expand(1)?, expand(2)?))
        }
        _ => None,
    }
}

/// Black or white, whichever reads better on top of `background`.
/// Unparseable colors get white.
pub fn contrast_color(background: &str) -> String {
    let Some((r, g, b)) = parse_hex(background) else {
        return WHITE.to_string();
    };
    // ITU-R BT.601 luma
    let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
    if luma > 128 { BLACK.to_string() } else { WHITE.to_string() }
}
