use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use inkboard_shared::{History, Segment};

/// Painting seam between the session and the raster surface.
pub trait Renderer {
    fn clear(&mut self);
    fn paint_dot(&mut self, x: f32, y: f32, color: &str, size: f32);
    fn paint_segment(&mut self, segment: &Segment);
    fn repaint_all(&mut self, history: &History);
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        let renderer = Self { canvas, ctx };
        renderer.init_brush();
        renderer
    }

    // Resizing the canvas resets context state, so this runs again on
    // every full clear.
    fn init_brush(&self) {
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }

    fn segment(&self, x0: f64, y0: f64, x1: f64, y1: f64, color: &str, size: f64) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(size);
        self.ctx.begin_path();
        self.ctx.move_to(x0, y0);
        self.ctx.line_to(x1, y1);
        self.ctx.stroke();
    }

    fn dot(&self, x: f64, y: f64, color: &str, size: f64) {
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(x, y, size / 2.0, 0.0, std::f64::consts::PI * 2.0);
        self.ctx.fill();
    }
}

impl Renderer for CanvasRenderer {
    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
        self.init_brush();
    }

    fn paint_dot(&mut self, x: f32, y: f32, color: &str, size: f32) {
        self.dot(x as f64, y as f64, color, size as f64);
    }

    fn paint_segment(&mut self, segment: &Segment) {
        self.segment(
            segment.x0 as f64,
            segment.y0 as f64,
            segment.x1 as f64,
            segment.y1 as f64,
            &segment.color,
            segment.size as f64,
        );
    }

    /// Replays every stroke from scratch. Each segment is drawn with the
    /// attributes its destination point recorded, so attribute changes
    /// mid-stroke survive a replay. Single-point strokes become dots.
    fn repaint_all(&mut self, history: &History) {
        self.clear();
        for stroke in history.iter() {
            if stroke.is_empty() {
                continue;
            }
            if stroke.len() == 1 {
                let point = &stroke.points[0];
                self.dot(point.x as f64, point.y as f64, &point.color, point.size as f64);
                continue;
            }
            for pair in stroke.points.windows(2) {
                let (from, to) = (&pair[0], &pair[1]);
                self.segment(
                    from.x as f64,
                    from.y as f64,
                    to.x as f64,
                    to.y as f64,
                    &to.color,
                    to.size as f64,
                );
            }
        }
    }
}
