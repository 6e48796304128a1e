use crate::util::js_error;
use anyhow::{anyhow, Context};
use hexer::{BackingStore, Color, DrawSurface, Point2};
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// A [DrawSurface] backed by an HTML canvas' 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// Grab a 2D context from the canvas. The context is opaque (clearing
    /// leaves black, not transparency) and desynchronized, which lets the
    /// browser skip compositing work on every frame.
    pub fn new(canvas: HtmlCanvasElement) -> anyhow::Result<Self> {
        let options = Object::new();
        Reflect::set(&options, &"alpha".into(), &JsValue::FALSE)
            .map_err(js_error)?;
        Reflect::set(&options, &"desynchronized".into(), &JsValue::TRUE)
            .map_err(js_error)?;

        let context = canvas
            .get_context_with_context_options("2d", &options)
            .map_err(js_error)?
            .context("canvas has no 2d context")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| anyhow!("2d context has an unexpected type"))?;
        Ok(Self { canvas, context })
    }
}

impl DrawSurface for CanvasSurface {
    fn begin_path(&mut self) -> anyhow::Result<()> {
        self.context.begin_path();
        Ok(())
    }

    fn move_to(&mut self, point: Point2) -> anyhow::Result<()> {
        self.context.move_to(point.x, point.y);
        Ok(())
    }

    fn line_to(&mut self, point: Point2) -> anyhow::Result<()> {
        self.context.line_to(point.x, point.y);
        Ok(())
    }

    fn close_path(&mut self) -> anyhow::Result<()> {
        self.context.close_path();
        Ok(())
    }

    fn fill(&mut self, color: Color) -> anyhow::Result<()> {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
        Ok(())
    }

    fn stroke(&mut self, color: Color, width: f64) -> anyhow::Result<()> {
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(width);
        self.context.stroke();
        Ok(())
    }

    fn clear_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> anyhow::Result<()> {
        self.context.clear_rect(x, y, width, height);
        Ok(())
    }
}

impl BackingStore for CanvasSurface {
    fn backing_size(&self) -> (u32, u32) {
        (self.canvas.width(), self.canvas.height())
    }

    fn set_backing_size(
        &mut self,
        width: u32,
        height: u32,
    ) -> anyhow::Result<()> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        Ok(())
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f64) -> anyhow::Result<()> {
        self.context
            .set_transform(pixel_ratio, 0.0, 0.0, pixel_ratio, 0.0, 0.0)
            .map_err(js_error)
            .context("error setting canvas transform")
    }
}
