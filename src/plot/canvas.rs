use image::RgbImage;

use crate::core::color::Color;

/// Pixel buffer with the plotting primitives the histogram renderer needs.
/// Coordinates are in pixels with the origin at the top left.
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<Color>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let data = vec![background; (width * height) as usize];
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        self.data[self.index_of(x, y)]
    }

    /// Paints `color` with opacity `alpha` over the rectangle `[x0, x1) x [y0, y1)`,
    /// clipped to the canvas.
    pub fn fill_rect(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color, alpha: f32) {
        let x0 = x0.clamp(0, self.width as i64) as u32;
        let x1 = x1.clamp(0, self.width as i64) as u32;
        let y0 = y0.clamp(0, self.height as i64) as u32;
        let y1 = y1.clamp(0, self.height as i64) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                let index = self.index_of(x, y);
                self.data[index] = color.over(self.data[index], alpha);
            }
        }
    }

    pub fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Color) {
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        self.fill_rect(x0, y, x1 + 1, y + 1, color, 1.0);
    }

    pub fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Color) {
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        self.fill_rect(x, y0, x + 1, y1 + 1, color, 1.0);
    }

    /// Rectangle outline, one pixel wide.
    pub fn outline(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, color: Color) {
        self.hline(x0, x1, y0, color);
        self.hline(x0, x1, y1, color);
        self.vline(x0, y0, y1, color);
        self.vline(x1, y0, y1, color);
    }

    pub fn to_image(&self) -> RgbImage {
        let mut image: RgbImage = RgbImage::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                image.put_pixel(x, y, self.pixel(x, y).to_rgb());
            }
        }
        image
    }

    fn index_of(&self, x: u32, y: u32) -> usize {
        (y * self.width + x) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_are_clipped_and_blended() {
        let mut canvas = Canvas::new(4, 3, Color::WHITE);
        canvas.fill_rect(-5, 1, 2, 10, Color::BLACK, 0.5);
        assert_eq!(canvas.pixel(0, 0), Color::WHITE);
        assert_eq!(canvas.pixel(1, 2), Color::gray(0.5));
        assert_eq!(canvas.pixel(2, 2), Color::WHITE);
    }

    #[test]
    fn lines_cover_both_endpoints() {
        let mut canvas = Canvas::new(5, 5, Color::WHITE);
        canvas.hline(3, 1, 2, Color::BLACK);
        canvas.vline(4, 4, 0, Color::BLACK);
        for x in 1..=3 {
            assert_eq!(canvas.pixel(x, 2), Color::BLACK);
        }
        assert_eq!(canvas.pixel(0, 2), Color::WHITE);
        for y in 0..5 {
            assert_eq!(canvas.pixel(4, y), Color::BLACK);
        }
        let image = canvas.to_image();
        assert_eq!(image.dimensions(), (5, 5));
        assert_eq!(image.get_pixel(4, 0).0, [0, 0, 0]);
    }
}
