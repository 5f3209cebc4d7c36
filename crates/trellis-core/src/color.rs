#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8, pub u8);

impl Color {
    pub const TRANSPARENT: Color = Color(0, 0, 0, 0);
    pub const BLACK: Color = Color(0, 0, 0, 255);
    pub const WHITE: Color = Color(255, 255, 255, 255);

    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color(r, g, b, 255)
    }
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(r, g, b, a)
    }
    /// `#RRGGBB` or `#RRGGBBAA`. Malformed input yields opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let s = hex.trim_start_matches('#');
        let channel = |i: usize, fallback: u8| {
            s.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .unwrap_or(fallback)
        };
        match s.len() {
            6 => Color(channel(0, 0), channel(2, 0), channel(4, 0), 255),
            8 => Color(channel(0, 0), channel(2, 0), channel(4, 0), channel(6, 255)),
            _ => Color::BLACK,
        }
    }
    pub fn with_alpha(self, a: u8) -> Self {
        Color(self.0, self.1, self.2, a)
    }

    pub fn is_transparent(self) -> bool {
        self.3 == 0
    }

    /// Channel-wise product, the way a tint is applied to copied commands.
    pub fn modulate(self, tint: Color) -> Color {
        let m = |a: u8, b: u8| ((a as u16 * b as u16 + 127) / 255) as u8;
        Color(
            m(self.0, tint.0),
            m(self.1, tint.1),
            m(self.2, tint.2),
            m(self.3, tint.3),
        )
    }

    /// White tint carrying `opacity` in its alpha channel.
    pub fn opacity_tint(opacity: f32) -> Color {
        let a = if opacity.is_nan() {
            0.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        Color(255, 255, 255, (a * 255.0).round() as u8)
    }
}
