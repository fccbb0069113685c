//! SVG documents rendered from fixed templates sized to the buffer

use crate::formats::SvgTemplate;

/// Render `template` at `width` x `height`. The circle sits at the center
/// with radius `min(w, h) / 4`; the complex template adds a gradient
/// background and a translucent triangle.
pub fn render_svg(template: SvgTemplate, width: u32, height: u32) -> String {
    let (cx, cy) = (width / 2, height / 2);
    let r = width.min(height) / 4;

    match template {
        SvgTemplate::Simple => format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
    <rect width="{width}" height="{height}" fill="#f0f0f0"/>
    <circle cx="{cx}" cy="{cy}" r="{r}" fill="#ff0000"/>
    <text x="10" y="30" font-family="Arial" font-size="16">SVG {width}x{height}</text>
</svg>"##
        ),
        SvgTemplate::Complex => {
            let points = format!(
                "{},{} {},{} {},{}",
                width / 4,
                height / 4,
                3 * width / 4,
                height / 4,
                width / 2,
                3 * height / 4
            );
            format!(
                r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
    <defs>
        <linearGradient id="grad1" x1="0%" y1="0%" x2="100%" y2="100%">
            <stop offset="0%" style="stop-color:rgb(255,255,0);stop-opacity:1" />
            <stop offset="100%" style="stop-color:rgb(255,0,0);stop-opacity:1" />
        </linearGradient>
    </defs>
    <rect width="{width}" height="{height}" fill="url(#grad1)"/>
    <circle cx="{cx}" cy="{cy}" r="{r}" fill="#0000ff" opacity="0.7"/>
    <polygon points="{points}" fill="#00ff00" opacity="0.5"/>
    <text x="10" y="30" font-family="Arial" font-size="20" fill="white">Complex SVG</text>
</svg>"##
            )
        }
    }
}

pub fn is_svg(data: &[u8]) -> bool {
    let Ok(text) = core::str::from_utf8(data) else {
        return false;
    };
    let text = text.trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg")) && text.contains("<svg")
}
