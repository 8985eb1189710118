/// Plotly's default qualitative palette, in assignment order.
pub const PLOTLY_QUALITATIVE: [&str; 10] = [
    "#636EFA", "#EF553B", "#00CC96", "#AB63FA", "#FFA15A", "#19D3F3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

pub fn color_for(index: usize) -> &'static str {
    PLOTLY_QUALITATIVE[index % PLOTLY_QUALITATIVE.len()]
}

pub fn parse_hex(token: &str) -> Option<(u8, u8, u8)> {
    let hex = token.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}
