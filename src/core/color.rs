use std::ops::{Add, Mul};

use image::Rgb;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Accepts the single-letter and named colors matplotlib understands for
    /// histograms, and `#rrggbb`.
    pub fn parse(name: &str) -> anyhow::Result<Self> {
        if let Some(hex) = name.strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                let channel = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 2], 16).map(|v| v as f32 / 255.0)
                };
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Self::new(r, g, b));
                }
            }
            anyhow::bail!(format!("'{}' is not a valid hex color", name));
        }

        let color = match name {
            "k" | "black" => Self::BLACK,
            "w" | "white" => Self::WHITE,
            "r" | "red" => Self::new(1.0, 0.0, 0.0),
            "g" => Self::new(0.0, 0.5, 0.0),
            "green" => Self::new(0.0, 0.502, 0.0),
            "b" | "blue" => Self::new(0.0, 0.0, 1.0),
            "c" | "cyan" => Self::new(0.0, 0.75, 0.75),
            "m" | "magenta" => Self::new(0.75, 0.0, 0.75),
            "y" | "yellow" => Self::new(0.75, 0.75, 0.0),
            "orange" => Self::new(1.0, 0.647, 0.0),
            "purple" => Self::new(0.502, 0.0, 0.502),
            "gray" | "grey" => Self::gray(0.502),
            _ => anyhow::bail!(format!("unknown color '{}'", name)),
        };
        Ok(color)
    }

    /// `self` painted with opacity `alpha` over `background`.
    pub fn over(self, background: Color, alpha: f32) -> Color {
        let alpha = alpha.clamp(0.0, 1.0);
        self * alpha + background * (1.0 - alpha)
    }

    pub fn to_rgb(self) -> Rgb<u8> {
        let r = (self.r * 255.0).round().clamp(0.0, 255.0) as u8;
        let g = (self.g * 255.0).round().clamp(0.0, 255.0) as u8;
        let b = (self.b * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb([r, g, b])
    }
}

impl Add for Color {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl Mul<f32> for Color {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}
