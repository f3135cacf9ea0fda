use std::fmt::{self, Write as FmtWrite};

use crate::primitives::*;
use crate::text::{TextMetrics, measure_styled};

/// Font stack named in the SVG; matches the face the layout metrics assume.
pub const FONT_FAMILY: &str = "DejaVu Sans, Helvetica, Arial, sans-serif";

/// An SVG element stored for deferred rendering.
#[derive(Debug, Clone)]
enum SvgElement {
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        style: Style,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        style: LineStyle,
    },
    Polyline {
        points: Vec<(f64, f64)>,
        style: LineStyle,
    },
    Text {
        x: f64,
        y: f64,
        content: String,
        style: TextStyle,
        rotate: Option<f64>,
    },
    Group {
        clip_id: String,
        children: Vec<SvgElement>,
    },
}

/// Immediate-mode SVG canvas. Coordinates in points (1pt = 1/72").
pub struct Canvas {
    pub width: f64,
    pub height: f64,
    elements: Vec<SvgElement>,
    defs: Vec<String>,
    clip_stack: Vec<(String, Vec<SvgElement>)>,
    next_clip_id: usize,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            elements: Vec::new(),
            defs: Vec::new(),
            clip_stack: Vec::new(),
            next_clip_id: 0,
        }
    }

    // --- Drawing primitives ---

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, style: &Style) {
        self.push(SvgElement::Rect { x, y, w, h, style: style.clone() });
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, style: &LineStyle) {
        self.push(SvgElement::Line { x1, y1, x2, y2, style: style.clone() });
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        if points.len() < 2 {
            return;
        }
        self.push(SvgElement::Polyline { points: points.to_vec(), style: style.clone() });
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, style: &TextStyle) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: None,
        });
    }

    pub fn text_rotated(&mut self, x: f64, y: f64, content: &str, style: &TextStyle, angle: f64) {
        self.push(SvgElement::Text {
            x,
            y,
            content: content.to_string(),
            style: style.clone(),
            rotate: Some(angle),
        });
    }

    // --- Clip paths ---

    /// Clip everything drawn until the matching [`Canvas::pop_clip`] to a rectangle.
    pub fn push_clip(&mut self, x: f64, y: f64, w: f64, h: f64) -> String {
        let id = format!("clip{}", self.next_clip_id);
        self.next_clip_id += 1;
        let rect = format!(r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" />"#);
        self.defs.push(format!(r#"<clipPath id="{id}">{rect}</clipPath>"#));
        self.clip_stack.push((id.clone(), Vec::new()));
        id
    }

    pub fn pop_clip(&mut self) {
        if let Some((clip_id, children)) = self.clip_stack.pop() {
            self.push(SvgElement::Group { clip_id, children });
        }
    }

    // --- Text measurement ---

    pub fn measure_text(&self, content: &str, style: &TextStyle) -> TextMetrics {
        measure_styled(content, style)
    }

    // --- SVG output ---

    fn push(&mut self, elem: SvgElement) {
        match self.clip_stack.last_mut() {
            Some((_, children)) => children.push(elem),
            None => self.elements.push(elem),
        }
    }

    /// Serialise the canvas. Clip regions still open are closed first.
    pub fn finish_svg(mut self) -> String {
        while !self.clip_stack.is_empty() {
            self.pop_clip();
        }
        self.to_string()
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            out,
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" "#,
                r#"width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            ),
            w = self.width,
            h = self.height,
        )?;

        if !self.defs.is_empty() {
            out.write_str("<defs>\n")?;
            for d in &self.defs {
                writeln!(out, "{d}")?;
            }
            out.write_str("</defs>\n")?;
        }

        writeln!(out, r#"<rect width="{}" height="{}" fill="white" />"#, self.width, self.height)?;

        for elem in &self.elements {
            render_element(out, elem)?;
        }

        out.write_str("</svg>\n")
    }
}

fn render_element(out: &mut impl FmtWrite, elem: &SvgElement) -> fmt::Result {
    match elem {
        SvgElement::Rect { x, y, w, h, style } => {
            write!(out, r#"<rect x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}""#)?;
            write_style_attrs(out, style)?;
            out.write_str(" />\n")
        }
        SvgElement::Line { x1, y1, x2, y2, style } => {
            write!(out, r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}""#)?;
            write_line_attrs(out, style)?;
            out.write_str(" />\n")
        }
        SvgElement::Polyline { points, style } => {
            out.write_str(r#"<polyline points=""#)?;
            for (i, (x, y)) in points.iter().enumerate() {
                if i > 0 {
                    out.write_char(' ')?;
                }
                write!(out, "{x:.2},{y:.2}")?;
            }
            out.write_str(r#"" fill="none" stroke-linejoin="round""#)?;
            write_line_attrs(out, style)?;
            out.write_str(" />\n")
        }
        SvgElement::Text { x, y, content, style, rotate } => {
            write!(out, r#"<text x="{x:.2}" y="{y:.2}""#)?;
            write!(out, r#" font-family="{FONT_FAMILY}" font-size="{:.1}""#, style.size)?;
            write!(out, r#" fill="{}""#, style.color.to_svg_fill())?;
            write!(out, r#" text-anchor="{}""#, style.anchor.as_str())?;
            write!(out, r#" dominant-baseline="{}""#, style.baseline.as_str())?;
            if style.weight == FontWeight::Bold {
                out.write_str(r#" font-weight="bold""#)?;
            }
            if let Some(angle) = rotate {
                write!(out, r#" transform="rotate({angle:.1},{x:.2},{y:.2})""#)?;
            }
            out.write_char('>')?;
            write_escaped(out, content)?;
            out.write_str("</text>\n")
        }
        SvgElement::Group { clip_id, children } => {
            writeln!(out, r#"<g clip-path="url(#{clip_id})">"#)?;
            for child in children {
                render_element(out, child)?;
            }
            out.write_str("</g>\n")
        }
    }
}

fn write_escaped(out: &mut impl FmtWrite, content: &str) -> fmt::Result {
    for ch in content.chars() {
        match ch {
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '&' => out.write_str("&amp;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

fn write_style_attrs(out: &mut impl FmtWrite, style: &Style) -> fmt::Result {
    match &style.fill {
        Some(fill) => write!(out, r#" fill="{}""#, fill.to_svg_fill())?,
        None => out.write_str(r#" fill="none""#)?,
    }
    if let Some(stroke) = &style.stroke {
        write!(out, r#" stroke="{}""#, stroke.to_svg_fill())?;
        write!(out, r#" stroke-width="{:.2}""#, style.stroke_width)?;
    }
    Ok(())
}

fn write_line_attrs(out: &mut impl FmtWrite, style: &LineStyle) -> fmt::Result {
    write!(out, r#" stroke="{}""#, style.color.to_svg_fill())?;
    write!(out, r#" stroke-width="{:.2}""#, style.width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn empty_canvas() {
        let svg = Canvas::new(100.0, 50.0).finish_svg();
        assert!(svg.contains("width=\"100\""));
        assert!(svg.contains("height=\"50\""));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn rect_rendering() {
        let mut c = Canvas::new(200.0, 100.0);
        c.rect(10.0, 20.0, 50.0, 30.0, &Style::filled(Color::rgb(255, 0, 0)));
        let svg = c.finish_svg();
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains("width=\"50.00\""));
    }

    #[test]
    fn framed_rect_and_line_attributes() {
        let mut c = Canvas::new(200.0, 100.0);
        let frame = Style {
            fill: Some(Color::WHITE),
            stroke: Some(Color::rgb(0xcc, 0xcc, 0xcc)),
            stroke_width: 0.8,
        };
        c.rect(1.0, 1.0, 20.0, 10.0, &frame);
        c.line(0.0, 0.0, 5.0, 5.0, &LineStyle::solid(Color::BLACK, 2.0));
        let svg = c.finish_svg();
        assert!(svg.contains(r##"stroke="#cccccc" stroke-width="0.80""##));
        assert!(svg.contains(r##"stroke="#000000" stroke-width="2.00""##));
        assert!(!svg.contains("dasharray"));
        assert!(!svg.contains("opacity"));
    }

    #[test]
    fn text_is_escaped() {
        let mut c = Canvas::new(200.0, 100.0);
        c.text(10.0, 20.0, "Wholesale & retail <trade>", &TextStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains("Wholesale &amp; retail &lt;trade&gt;"));
        assert!(svg.contains("DejaVu Sans"));
    }

    #[test]
    fn clipped_elements_are_grouped() {
        let mut c = Canvas::new(200.0, 100.0);
        let id = c.push_clip(0.0, 0.0, 100.0, 100.0);
        c.polyline(&[(0.0, 0.0), (150.0, 50.0)], &LineStyle::default());
        c.pop_clip();
        c.line(0.0, 0.0, 1.0, 1.0, &LineStyle::default());
        let svg = c.finish_svg();
        assert!(svg.contains(&format!(r#"<clipPath id="{id}">"#)));
        let group = svg.find(&format!("url(#{id})")).unwrap();
        let poly = svg.find("<polyline").unwrap();
        let close = svg.find("</g>").unwrap();
        let line = svg.find("<line").unwrap();
        assert!(group < poly && poly < close && close < line);
    }

    #[test]
    fn single_point_polyline_is_skipped() {
        let mut c = Canvas::new(10.0, 10.0);
        c.polyline(&[(1.0, 1.0)], &LineStyle::default());
        assert!(!c.finish_svg().contains("polyline"));
    }
}
