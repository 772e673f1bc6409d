use super::*;

// ----------------------------------------------
// RecordingSurface (test double)
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Fill(Rect, Color),
    Text(String, Vec2, TextStyle),
    ScissorOn(Rect),
    ScissorOff,
    TextureCreated(TextureHandle, Size),
    TextureUpdated(TextureHandle, usize),
    TexturedQuad(TextureHandle, [Vec2; 4], [Vec2; 4]),
}

// Records every primitive call. Text is measured as 6 pixels per character.
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    pub scissor_supported: bool,
    pub texture_creation_fails: bool,
    next_texture: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            scissor_supported: true,
            texture_creation_fails: false,
            next_texture: 0,
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn fills(&self) -> Vec<(Rect, Color)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Fill(rect, color) => Some((*rect, *color)),
            _ => None,
        }).collect()
    }

    pub fn fills_with_color(&self, color: Color) -> Vec<Rect> {
        self.fills().into_iter()
            .filter(|(_, fill_color)| *fill_color == color)
            .map(|(rect, _)| rect)
            .collect()
    }

    pub fn texts(&self) -> Vec<(String, Vec2)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text, pos, _) => Some((text.clone(), *pos)),
            _ => None,
        }).collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|(text, _)| text.contains(needle))
    }
}

impl DrawingFacade for RecordingSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::Fill(rect, color));
    }

    fn draw_text(&mut self, text: &str, pos: Vec2, style: TextStyle) {
        self.commands.push(DrawCommand::Text(text.to_string(), pos, style));
    }

    fn text_width(&self, text: &str) -> f32 {
        (text.chars().count() * 6) as f32
    }

    fn enable_scissor(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::ScissorOn(rect));
    }

    fn disable_scissor(&mut self) {
        self.commands.push(DrawCommand::ScissorOff);
    }

    fn supports_scissor(&self) -> bool {
        self.scissor_supported
    }

    fn create_texture(&mut self, _debug_name: &str, size: Size) -> TextureHandle {
        if self.texture_creation_fails {
            return TextureHandle::invalid();
        }
        let handle = TextureHandle::Index(self.next_texture);
        self.next_texture += 1;
        self.commands.push(DrawCommand::TextureCreated(handle, size));
        handle
    }

    fn update_texture(&mut self, handle: TextureHandle, _size: Size, pixels: &[Color]) {
        self.commands.push(DrawCommand::TextureUpdated(handle, pixels.len()));
    }

    fn draw_textured_quad(&mut self, handle: TextureHandle, corners: [Vec2; 4], uvs: [Vec2; 4]) {
        self.commands.push(DrawCommand::TexturedQuad(handle, corners, uvs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_border_is_four_fills() {
        let mut surface = RecordingSurface::new();
        surface.draw_border(Rect::new(0.0, 0.0, 10.0, 5.0), Color::WHITE);

        let fills = surface.fills_with_color(Color::WHITE);
        assert_eq!(fills.len(), 4);
        assert_eq!(fills[0], Rect::new(0.0, 0.0, 10.0, 1.0));
        assert_eq!(fills[1], Rect::new(0.0, 4.0, 10.0, 1.0));
        assert_eq!(fills[2], Rect::new(0.0, 1.0, 1.0, 3.0));
        assert_eq!(fills[3], Rect::new(9.0, 1.0, 1.0, 3.0));
    }

    #[test]
    fn test_scaled_surface_scales_geometry_and_text() {
        let mut surface = RecordingSurface::new();
        {
            let mut scaled = ScaledSurface::new(&mut surface, 2.0);
            scaled.fill_rect(Rect::new(1.0, 2.0, 3.0, 4.0), Color::RED);
            scaled.draw_text("hi", Vec2::new(5.0, 6.0), TextStyle::new(Color::WHITE, true));
            scaled.enable_scissor(Rect::new(1.0, 1.0, 10.0, 10.0));
        }

        assert_eq!(surface.commands[0], DrawCommand::Fill(Rect::new(2.0, 4.0, 6.0, 8.0), Color::RED));
        match &surface.commands[1] {
            DrawCommand::Text(text, pos, style) => {
                assert_eq!(text, "hi");
                assert_eq!(*pos, Vec2::new(10.0, 12.0));
                assert_eq!(style.scale, 2.0);
                assert!(style.shadow);
            }
            other => panic!("Expected text, got {other:?}"),
        }
        assert_eq!(surface.commands[2], DrawCommand::ScissorOn(Rect::new(2.0, 2.0, 20.0, 20.0)));
    }
}
