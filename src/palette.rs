use plotters::style::RGBColor;

/// d3 `schemeCategory10`, the default categorical palette.
pub const CATEGORY10: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// Ordered colours assigned to categories by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPalette {
    colors: Vec<RGBColor>,
}

impl ColorPalette {
    /// Parse every entry; `None` if the list is empty or any entry is not a colour.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Option<Self> {
        if names.is_empty() {
            return None;
        }
        let colors = names
            .iter()
            .map(|n| parse_color(n.as_ref()))
            .collect::<Option<Vec<_>>>()?;
        Some(Self { colors })
    }

    /// Colour for the row at `index`; wraps around the palette.
    pub fn color(&self, index: usize) -> RGBColor {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self {
            colors: CATEGORY10.iter().filter_map(|c| parse_hex_color(c)).collect(),
        }
    }
}

/// Parse a color string into RGBColor, supporting hex (#RRGGBB, #RGB) and named colors
pub fn parse_color(color_str: &str) -> Option<RGBColor> {
    let color_str = color_str.trim();

    if color_str.starts_with('#') {
        return parse_hex_color(color_str);
    }

    // Named colours the default styles rely on; anything else goes through hex.
    match color_str.to_lowercase().as_str() {
        "steelblue" => Some(RGBColor(70, 130, 180)),
        "orange" => Some(RGBColor(255, 165, 0)),
        "black" => Some(RGBColor(0, 0, 0)),
        "white" => Some(RGBColor(255, 255, 255)),
        _ => None,
    }
}

/// Parse hex color (#RRGGBB or #RGB)
fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_color("#a2b8e9"), Some(RGBColor(162, 184, 233)));
        assert_eq!(parse_color("#fff"), Some(RGBColor(255, 255, 255)));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
    }

    #[test]
    fn test_parse_named() {
        assert_eq!(parse_color("SteelBlue"), Some(RGBColor(70, 130, 180)));
        assert_eq!(parse_color("  orange "), Some(RGBColor(255, 165, 0)));
        assert_eq!(parse_color("chartreuse-ish"), None);
        assert_eq!(parse_color("red"), None);
    }

    #[test]
    fn test_default_palette_is_category10() {
        let palette = ColorPalette::default();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.color(0), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(palette.color(1), RGBColor(0xff, 0x7f, 0x0e));
    }

    #[test]
    fn test_palette_wraps_by_index() {
        let palette = ColorPalette::from_names(&["black", "#0000ff"]).unwrap();
        assert_eq!(palette.color(2), palette.color(0));
        assert_eq!(palette.color(3), RGBColor(0, 0, 255));
    }

    #[test]
    fn test_palette_rejects_bad_entries() {
        assert!(ColorPalette::from_names::<&str>(&[]).is_none());
        assert!(ColorPalette::from_names(&["black", "nope"]).is_none());
    }
}
