use puzzle_core::{Placement, PuzzleError, Rect, Size, Surface};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, HtmlImageElement,
};

use crate::constants::{CANVAS_CLASS, COUNTDOWN_CLASS};

fn unavailable(e: JsValue) -> PuzzleError {
    PuzzleError::RenderSurfaceUnavailable(format!("{e:?}"))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, PuzzleError> {
    canvas
        .get_context("2d")
        .map_err(unavailable)?
        .ok_or_else(|| PuzzleError::RenderSurfaceUnavailable("2D context not available".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| PuzzleError::RenderSurfaceUnavailable("not a 2D context".into()))
}

fn create_canvas(document: &Document) -> Result<HtmlCanvasElement, PuzzleError> {
    document
        .create_element("canvas")
        .map_err(unavailable)?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| PuzzleError::RenderSurfaceUnavailable("canvas element rejected".into()))
}

/// A piece's own offscreen canvas.
pub struct PieceCanvas {
    canvas: HtmlCanvasElement,
}

/// Render surface that takes over a container element: clears it, adds one
/// visible canvas, and clears it again on release.
pub struct CanvasSurface {
    document: Document,
    container: Element,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
}

impl CanvasSurface {
    pub fn mount(document: &Document, container: Element) -> Result<Self, PuzzleError> {
        container.set_inner_html("");
        let canvas = create_canvas(document)?;
        let ctx = context_2d(&canvas)?;
        canvas.set_class_name(CANVAS_CLASS);
        container.append_child(&canvas).map_err(unavailable)?;
        Ok(CanvasSurface {
            document: document.clone(),
            container,
            canvas: Some(canvas),
            ctx: Some(ctx),
        })
    }

    pub fn container(&self) -> &Element {
        &self.container
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;
    type Bitmap = PieceCanvas;

    fn image_size(&self, image: &HtmlImageElement) -> Size {
        Size::new(image.natural_width() as f64, image.natural_height() as f64)
    }

    fn resize(&mut self, size: Size) -> Result<(), PuzzleError> {
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| PuzzleError::RenderSurfaceUnavailable("surface released".into()))?;
        let (w, h) = size.to_pixels();
        canvas.set_width(w);
        canvas.set_height(h);
        Ok(())
    }

    fn cut(
        &mut self,
        image: &HtmlImageElement,
        source: Rect,
        size: Size,
    ) -> Result<PieceCanvas, PuzzleError> {
        let canvas = create_canvas(&self.document)?;
        let (w, h) = size.to_pixels();
        canvas.set_width(w);
        canvas.set_height(h);
        let ctx = context_2d(&canvas)?;
        ctx.draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
            image,
            source.x,
            source.y,
            source.width,
            source.height,
            0.0,
            0.0,
            w as f64,
            h as f64,
        )
        .map_err(|e| PuzzleError::ImageResourceUnavailable(format!("{e:?}")))?;
        Ok(PieceCanvas { canvas })
    }

    fn clear(&mut self) {
        if let (Some(canvas), Some(ctx)) = (&self.canvas, &self.ctx) {
            ctx.clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
    }

    fn draw(&mut self, bitmap: &PieceCanvas, placement: Placement) {
        let Some(ctx) = &self.ctx else {
            return;
        };
        let (w, h) = (placement.size.width, placement.size.height);
        if !placement.is_rotated() {
            let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
                &bitmap.canvas,
                placement.origin.x,
                placement.origin.y,
                w,
                h,
            );
            return;
        }
        let c = placement.center();
        ctx.save();
        let _ = ctx.translate(c.x, c.y);
        let _ = ctx.rotate(placement.rotation.to_radians());
        let _ = ctx.draw_image_with_html_canvas_element_and_dw_and_dh(
            &bitmap.canvas,
            -w / 2.0,
            -h / 2.0,
            w,
            h,
        );
        ctx.restore();
    }

    fn release(&mut self) {
        self.ctx = None;
        if let Some(canvas) = self.canvas.take() {
            canvas.remove();
        }
        self.container.set_inner_html("");
    }
}

/// Text node inside the container showing the time left.
pub struct CountdownLabel {
    el: HtmlElement,
}

impl CountdownLabel {
    pub fn attach(document: &Document, container: &Element) -> Result<Self, JsValue> {
        let el = document.create_element("div")?.dyn_into::<HtmlElement>()?;
        el.set_class_name(COUNTDOWN_CLASS);
        container.append_child(&el)?;
        Ok(CountdownLabel { el })
    }

    pub fn show(&self, text: &str) {
        self.el.set_inner_text(text);
    }
}
