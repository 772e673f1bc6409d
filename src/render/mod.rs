use crate::utils::{Color, Rect, Size, Vec2};

#[cfg(test)]
pub mod recording;

// ----------------------------------------------
// TextureHandle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextureHandle {
    #[default]
    Invalid,    // Creation failed or not created yet.
    Index(u32), // Host side texture slot.
}

impl TextureHandle {
    #[inline]
    pub const fn invalid() -> Self {
        TextureHandle::Invalid
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        !matches!(self, TextureHandle::Invalid)
    }
}

// ----------------------------------------------
// TextStyle
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub shadow: bool,
    pub scale: f32,
}

impl TextStyle {
    #[inline]
    pub const fn new(color: Color, shadow: bool) -> Self {
        Self { color, shadow, scale: 1.0 }
    }
}

// ----------------------------------------------
// DrawingFacade
// ----------------------------------------------

// The only drawing capability the HUD depends on. A host adapter maps these
// primitives onto whatever its rendering API provides, including any
// retry/fallback strategies for API drift. All coordinates are screen pixels
// with the origin at the top-left corner.
pub trait DrawingFacade {
    // ----------------------
    // Shapes:
    // ----------------------

    fn fill_rect(&mut self, rect: Rect, color: Color);

    // One pixel outline just inside `rect`.
    // Defaults to four fills for hosts without a native border call.
    fn draw_border(&mut self, rect: Rect, color: Color) {
        let (x, y, w, h) = (rect.x(), rect.y(), rect.width(), rect.height());
        if w <= 0.0 || h <= 0.0 {
            return;
        }
        self.fill_rect(Rect::new(x, y, w, 1.0), color);
        self.fill_rect(Rect::new(x, y + h - 1.0, w, 1.0), color);
        self.fill_rect(Rect::new(x, y + 1.0, 1.0, h - 2.0), color);
        self.fill_rect(Rect::new(x + w - 1.0, y + 1.0, 1.0, h - 2.0), color);
    }

    // ----------------------
    // Text:
    // ----------------------

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle);

    // Width of `text` in pixels at scale 1.
    fn text_width(&self, text: &str) -> f32;

    // Height of one line of text in pixels at scale 1.
    fn line_height(&self) -> f32 {
        9.0
    }

    // ----------------------
    // Clipping:
    // ----------------------

    // Clips all following draws to [x, x+width) x [y, y+height).
    fn enable_scissor(&mut self, rect: Rect);
    fn disable_scissor(&mut self);

    // Hosts that cannot clip must report it here; the minimap refuses to
    // draw without clipping.
    fn supports_scissor(&self) -> bool {
        true
    }

    // ----------------------
    // Textures:
    // ----------------------

    // Returns TextureHandle::Invalid when the host cannot allocate the texture.
    fn create_texture(&mut self, _debug_name: &str, _size: Size) -> TextureHandle {
        TextureHandle::invalid()
    }

    // Replaces all pixels. `pixels` is row-major, `size.width * size.height` long.
    fn update_texture(&mut self, _handle: TextureHandle, _size: Size, _pixels: &[Color]) {
    }

    // Draws a textured quad. `corners` and `uvs` are in matching order:
    // top-left, top-right, bottom-right, bottom-left (before any rotation).
    fn draw_textured_quad(&mut self, _handle: TextureHandle, _corners: [Vec2; 4], _uvs: [Vec2; 4]) {
    }
}

// ----------------------------------------------
// ScaledSurface
// ----------------------------------------------

// Applies the HUD scale on top of another facade, so HUD elements can be laid
// out in panel-local (unscaled) units.
pub struct ScaledSurface<'a> {
    inner: &'a mut dyn DrawingFacade,
    scale: f32,
}

impl<'a> ScaledSurface<'a> {
    #[inline]
    pub fn new(inner: &'a mut dyn DrawingFacade, scale: f32) -> Self {
        Self { inner, scale }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }
}

// draw_border() is left to the default four-fill version so outlines
// scale with everything else.
impl DrawingFacade for ScaledSurface<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.inner.fill_rect(rect.scaled_from_origin(self.scale), color);
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        let scaled_style = TextStyle { scale: style.scale * self.scale, ..style };
        self.inner.draw_text(text, pos * self.scale, scaled_style);
    }

    fn text_width(&self, text: &str) -> f32 {
        // Reported in this surface's (unscaled) units.
        self.inner.text_width(text)
    }

    fn line_height(&self) -> f32 {
        self.inner.line_height()
    }

    fn enable_scissor(&mut self, rect: Rect) {
        self.inner.enable_scissor(rect.scaled_from_origin(self.scale));
    }

    fn disable_scissor(&mut self) {
        self.inner.disable_scissor();
    }

    fn supports_scissor(&self) -> bool {
        self.inner.supports_scissor()
    }

    fn create_texture(&mut self, debug_name: &str, size: Size) -> TextureHandle {
        self.inner.create_texture(debug_name, size)
    }

    fn update_texture(&mut self, handle: TextureHandle, size: Size, pixels: &[Color]) {
        self.inner.update_texture(handle, size, pixels);
    }

    fn draw_textured_quad(&mut self, handle: TextureHandle, corners: [Vec2; 4], uvs: [Vec2; 4]) {
        let scaled = corners.map(|corner| corner * self.scale);
        self.inner.draw_textured_quad(handle, scaled, uvs);
    }
}

// ----------------------------------------------
// Helper functions
// ----------------------------------------------

// Draws `thickness` nested one pixel borders growing outwards from `rect`.
pub fn draw_frame(surface: &mut dyn DrawingFacade, rect: Rect, color: Color, thickness: u32) {
    for i in 1..=thickness {
        surface.draw_border(rect.expanded(i as f32), color);
    }
}

// Text over a filled box, centered on `center`.
pub fn draw_boxed_text_centered(surface: &mut dyn DrawingFacade,
                                text: &str,
                                center: Vec2,
                                style: TextStyle,
                                box_color: Color,
                                padding: f32) {
    let text_size = Vec2::new(surface.text_width(text), surface.line_height()) * style.scale;
    let text_pos = center - (text_size * 0.5);

    let box_rect = Rect::from_pos_and_size(text_pos, text_size).expanded(padding);
    surface.fill_rect(box_rect.trunc(), box_color);
    surface.draw_text(text, text_pos.trunc(), style);
}
