use glam::Vec4;
use sokol::{app as sapp, debugtext as sdtx};

/// Glyph cell of the builtin fonts, in canvas pixels.
const GLYPH_PX: f32 = 8.0;

/// Screen-space text lines for the HUD, drawn with sokol's debug text.
pub struct TextOverlay {
    scale: f32,
    color: Vec4,
    ready: bool,
}

impl TextOverlay {
    pub fn new() -> Self {
        Self {
            scale: 2.0,
            color: Vec4::ONE,
            ready: false,
        }
    }

    pub fn init(&mut self) {
        let mut desc = sdtx::Desc::new();
        desc.fonts[0] = sdtx::font_kc853();
        desc.logger.func = Some(sokol::log::slog_func);
        sdtx::setup(&desc);
        self.ready = true;
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }

    /// Lines stacked from the top-left corner, `margin` glyph cells in.
    pub fn draw_top_left(&mut self, margin: f32, lines: &[String]) {
        self.begin();
        sdtx::origin(margin, margin);
        for line in lines {
            sdtx::puts(line);
            sdtx::crlf();
        }
    }

    /// Each line right-aligned against the top-right corner.
    pub fn draw_top_right(&mut self, margin: f32, lines: &[String]) {
        let columns = self.canvas_columns();
        self.begin();
        for (row, line) in lines.iter().enumerate() {
            let x = (columns - margin - line.chars().count() as f32).max(0.0);
            sdtx::origin(x, margin);
            sdtx::move_y(row as f32);
            sdtx::puts(line);
        }
    }

    /// Render queued text. Must run inside a render pass.
    pub fn draw(&self) {
        if self.ready {
            sdtx::draw();
        }
    }

    pub fn shutdown(&mut self) {
        if self.ready {
            sdtx::shutdown();
            self.ready = false;
        }
    }

    fn begin(&self) {
        sdtx::canvas(sapp::widthf() / self.scale, sapp::heightf() / self.scale);
        sdtx::font(0);
        sdtx::color4f(self.color.x, self.color.y, self.color.z, self.color.w);
    }

    fn canvas_columns(&self) -> f32 {
        sapp::widthf() / self.scale / GLYPH_PX
    }
}
