// render.rs - Side view rasterizer
//
// Projects every exported line onto the x/y plane (looking along -z) and
// draws it in its stress color. The ground plane is a gray line.

use fabric_engine::arena::LineVectors;
use fabric_engine::vector::Vec3;
use image::{Rgb, RgbImage};

const BACKGROUND: Rgb<u8> = Rgb([16, 16, 24]);
const GROUND: Rgb<u8> = Rgb([80, 80, 80]);
const MARGIN: f32 = 0.1;

pub struct SideView {
    img: RgbImage,
    scale: f32,
    center_x: f32,
    center_y: f32,
}

impl SideView {
    /// Fits the view to the given lines with a small margin.
    pub fn fit(w: u32, h: u32, lines: &[LineVectors]) -> Self {
        let mut min = [f32::MAX; 2];
        let mut max = [f32::MIN; 2];
        for point in lines.iter().flatten() {
            for axis in 0..2 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
        // Keep the ground in view.
        min[1] = min[1].min(0.0);
        max[1] = max[1].max(0.0);
        if lines.is_empty() {
            min = [-1.0, -1.0];
            max = [1.0, 1.0];
        }
        let extent = (max[0] - min[0]).max(max[1] - min[1]).max(0.001) * (1.0 + MARGIN * 2.0);
        Self {
            img: RgbImage::from_pixel(w, h, BACKGROUND),
            scale: w.min(h) as f32 / extent,
            center_x: (min[0] + max[0]) / 2.0,
            center_y: (min[1] + max[1]) / 2.0,
        }
    }

    fn project(&self, point: &Vec3) -> (i32, i32) {
        let (w, h) = self.img.dimensions();
        let x = w as f32 / 2.0 + (point[0] - self.center_x) * self.scale;
        let y = h as f32 / 2.0 - (point[1] - self.center_y) * self.scale;
        (x.round() as i32, y.round() as i32)
    }

    fn put(&mut self, x: i32, y: i32, c: Rgb<u8>) {
        let (w, h) = self.img.dimensions();
        if x >= 0 && y >= 0 && (x as u32) < w && (y as u32) < h {
            self.img.put_pixel(x as u32, y as u32, c);
        }
    }

    /// Bresenham
    fn line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), c: Rgb<u8>) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.put(x, y, c);
            if x == x1 && y == y1 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x += sx; }
            if e2 <= dx { err += dx; y += sy; }
        }
    }

    pub fn draw_ground(&mut self) {
        let (w, _) = self.img.dimensions();
        let (_, y) = self.project(&[0.0; 3]);
        self.line((0, y), (w as i32 - 1, y), GROUND);
    }

    pub fn draw_lines(&mut self, lines: &[LineVectors], colors: &[LineVectors]) {
        for (ends, color) in lines.iter().zip(colors) {
            let c = Rgb(color[0].map(|v| (v.clamp(0.0, 1.0) * 255.0) as u8));
            let from = self.project(&ends[0]);
            let to = self.project(&ends[1]);
            self.line(from, to, c);
        }
    }

    pub fn into_image(self) -> RgbImage {
        self.img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_reaches_both_ends() {
        let lines = [[[0.0, 0.0, 0.0], [1.0, 1.0, 0.0]]];
        let colors = [[[1.0, 0.0, 0.0]; 2]];
        let mut view = SideView::fit(64, 64, &lines);
        view.draw_lines(&lines, &colors);
        let (x0, y0) = view.project(&lines[0][0]);
        let (x1, y1) = view.project(&lines[0][1]);
        let img = view.into_image();
        assert_eq!(*img.get_pixel(x0 as u32, y0 as u32), Rgb([255, 0, 0]));
        assert_eq!(*img.get_pixel(x1 as u32, y1 as u32), Rgb([255, 0, 0]));
        assert!(y1 < y0, "up is up");
    }

    #[test]
    fn empty_view_is_background() {
        let mut view = SideView::fit(8, 8, &[]);
        view.draw_lines(&[], &[]);
        assert_eq!(*view.into_image().get_pixel(0, 0), BACKGROUND);
    }
}
