use plotters::style::RGBColor;

/// The default categorical palette (Plotly's Dark24)
pub const DARK24: [RGBColor; 24] = [
    RGBColor(46, 145, 229),
    RGBColor(225, 95, 153),
    RGBColor(28, 167, 28),
    RGBColor(251, 13, 13),
    RGBColor(218, 22, 255),
    RGBColor(34, 42, 42),
    RGBColor(182, 129, 0),
    RGBColor(117, 13, 134),
    RGBColor(235, 102, 59),
    RGBColor(81, 28, 251),
    RGBColor(0, 160, 139),
    RGBColor(251, 0, 209),
    RGBColor(252, 0, 128),
    RGBColor(178, 130, 141),
    RGBColor(108, 124, 50),
    RGBColor(119, 138, 174),
    RGBColor(134, 42, 22),
    RGBColor(167, 119, 241),
    RGBColor(98, 0, 66),
    RGBColor(22, 22, 167),
    RGBColor(218, 96, 202),
    RGBColor(108, 69, 22),
    RGBColor(13, 42, 99),
    RGBColor(175, 0, 56),
];

/// One color per category, cycling the palette when categories outnumber it
pub fn colors_for(n: usize, palette: &[RGBColor]) -> Vec<RGBColor> {
    (0..n).map(|i| palette[i % palette.len()]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_cycles() {
        let colors = colors_for(30, &DARK24);
        assert_eq!(colors.len(), 30);
        assert_eq!(colors[0], colors[24]);
        assert_eq!(colors[5], colors[29]);
    }
}
