use crate::{backing_size, BackingStore, Color, DrawSurface, Point2, Size2};
use anyhow::{bail, Context};
use std::fmt::Write;
use svg::{
    node::{
        element::{Path, Rectangle},
        Comment,
    },
    Document,
};

/// A drawing surface that builds an SVG document. Each fill or stroke becomes
/// one `<path>` element, so a rendered frame can be written out as a static
/// image. The viewBox is in logical pixels and the document's `width`/`height`
/// are the physical size, so the pixel ratio works the same way it does on a
/// canvas.
#[derive(Clone, Debug)]
pub struct SvgSurface {
    viewport: Size2,
    pixel_ratio: f64,
    backing_size: (u32, u32),
    /// Optional solid background, drawn under everything else
    background: Option<Color>,
    /// `d` attribute of the path currently being built
    current_path: Option<String>,
    elements: Vec<Path>,
}

impl SvgSurface {
    pub fn new(viewport: Size2, background: Option<Color>) -> Self {
        Self {
            viewport,
            pixel_ratio: 1.0,
            backing_size: backing_size(viewport, 1.0),
            background,
            current_path: None,
            elements: Vec::new(),
        }
    }

    /// Change the logical size of the document. Use
    /// [resize_backing](crate::resize_backing) afterwards to update the
    /// physical size.
    pub fn set_viewport(&mut self, viewport: Size2) {
        self.viewport = viewport;
    }

    /// Number of shape elements drawn since the last full clear
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Build an SVG document from everything drawn so far
    pub fn to_document(&self) -> Document {
        let (width, height) = self.backing_size;
        let mut document = Document::new()
            .set(
                "viewBox",
                (0.0, 0.0, self.viewport.width, self.viewport.height),
            )
            .set("width", width)
            .set("height", height)
            .add(Comment::new(format!(
                "{} @ {}x",
                self.viewport, self.pixel_ratio
            )));

        if let Some(background) = self.background {
            let rect = Rectangle::new()
                .set("width", "100%")
                .set("height", "100%");
            document = document.add(paint(rect, "fill", background));
        }
        for element in &self.elements {
            document = document.add(element.clone());
        }
        document
    }

    fn path_mut(&mut self) -> anyhow::Result<&mut String> {
        self.current_path
            .as_mut()
            .context("no path in progress, call begin_path first")
    }

    fn current_path(&self) -> anyhow::Result<&str> {
        match &self.current_path {
            Some(path) if !path.is_empty() => Ok(path),
            Some(_) => bail!("current path is empty"),
            None => bail!("no path in progress, call begin_path first"),
        }
    }
}

/// Apply a color to an attribute (`fill` or `stroke`). SVG 1.1 doesn't take
/// alpha in color values, so that goes into a separate opacity attribute.
fn paint<T: svg::Node>(mut element: T, attribute: &str, color: Color) -> T {
    let opaque = Color::new_int(color.red, color.green, color.blue);
    element.assign(attribute, opaque.to_css());
    if !color.is_opaque() {
        element.assign(format!("{}-opacity", attribute), color.alpha());
    }
    element
}

impl DrawSurface for SvgSurface {
    fn begin_path(&mut self) -> anyhow::Result<()> {
        self.current_path = Some(String::new());
        Ok(())
    }

    fn move_to(&mut self, point: Point2) -> anyhow::Result<()> {
        let path = self.path_mut()?;
        write!(path, "M{} {} ", point.x, point.y)?;
        Ok(())
    }

    fn line_to(&mut self, point: Point2) -> anyhow::Result<()> {
        let path = self.path_mut()?;
        write!(path, "L{} {} ", point.x, point.y)?;
        Ok(())
    }

    fn close_path(&mut self) -> anyhow::Result<()> {
        self.path_mut()?.push('Z');
        Ok(())
    }

    fn fill(&mut self, color: Color) -> anyhow::Result<()> {
        let path = Path::new()
            .set("d", self.current_path()?.trim_end())
            .set("stroke", "none");
        self.elements.push(paint(path, "fill", color));
        Ok(())
    }

    fn stroke(&mut self, color: Color, width: f64) -> anyhow::Result<()> {
        let path = Path::new()
            .set("d", self.current_path()?.trim_end())
            .set("fill", "none")
            .set("stroke-width", width);
        self.elements.push(paint(path, "stroke", color));
        Ok(())
    }

    fn clear_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> anyhow::Result<()> {
        let covers_viewport = x <= 0.0
            && y <= 0.0
            && x + width >= self.viewport.width
            && y + height >= self.viewport.height;
        if !covers_viewport {
            bail!(
                "SVG output only supports clearing the whole viewport, \
                got {}x{} at ({}, {})",
                width,
                height,
                x,
                y
            );
        }
        self.elements.clear();
        Ok(())
    }
}

impl BackingStore for SvgSurface {
    fn backing_size(&self) -> (u32, u32) {
        self.backing_size
    }

    fn set_backing_size(
        &mut self,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.backing_size = (width, height);
        Ok(())
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> anyhow::Result<()> {
        self.pixel_ratio = pixel_ratio;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resize_backing;

    fn triangle(surface: &mut SvgSurface) {
        surface.begin_path().unwrap();
        surface.move_to(Point2::new(0.0, 0.0)).unwrap();
        surface.line_to(Point2::new(10.0, 0.0)).unwrap();
        surface.line_to(Point2::new(5.0, 5.5)).unwrap();
        surface.close_path().unwrap();
    }

    #[test]
    fn test_fill_and_stroke() {
        let mut surface = SvgSurface::new(Size2::new(100.0, 50.0), None);
        triangle(&mut surface);
        surface.fill(Color::new_int(0x26, 0xc2, 0x81)).unwrap();
        surface
            .stroke(Color::new_rgba(255, 255, 255, 0.5), 2.0)
            .unwrap();
        assert_eq!(surface.element_count(), 2);

        let svg = surface.to_document().to_string();
        assert!(svg.contains(r#"d="M0 0 L10 0 L5 5.5 Z""#), "{}", svg);
        assert!(svg.contains(r##"fill="#26c281""##), "{}", svg);
        assert!(svg.contains(r#"stroke-opacity="0.5""#), "{}", svg);
        assert!(svg.contains(r#"viewBox="0 0 100 50""#), "{}", svg);
    }

    #[test]
    fn test_clear() {
        let mut surface =
            SvgSurface::new(Size2::new(100.0, 50.0), Some(Color::BLACK));
        triangle(&mut surface);
        surface.fill(Color::WHITE).unwrap();
        assert!(surface.clear_rect(10.0, 10.0, 5.0, 5.0).is_err());
        assert_eq!(surface.element_count(), 1);
        surface.clear_rect(0.0, 0.0, 100.0, 50.0).unwrap();
        assert_eq!(surface.element_count(), 0);
        // Background survives clearing
        let svg = surface.to_document().to_string();
        assert!(svg.contains(r##"fill="#000000""##), "{}", svg);
    }

    #[test]
    fn test_draw_without_path() {
        let mut surface = SvgSurface::new(Size2::new(10.0, 10.0), None);
        assert!(surface.move_to(Point2::ORIGIN).is_err());
        assert!(surface.fill(Color::WHITE).is_err());
        surface.begin_path().unwrap();
        assert!(surface.stroke(Color::WHITE, 1.0).is_err());
    }

    #[test]
    fn test_physical_size() {
        let mut surface = SvgSurface::new(Size2::new(100.0, 50.0), None);
        resize_backing(&mut surface, Size2::new(100.0, 50.0), 2.0).unwrap();
        let svg = surface.to_document().to_string();
        assert!(svg.contains(r#"width="200""#), "{}", svg);
        assert!(svg.contains(r#"height="100""#), "{}", svg);
    }
}
