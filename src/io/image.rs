use crate::core::color::to_rgb8;
use crate::core::math::interpolation::{barycentric_coordinates, is_inside_triangle};
use crate::core::pipeline::Canvas;
use crate::error::Result;
use image::{Rgb, RgbImage};
use log::info;
use nalgebra::{Point2, Vector3};
use std::path::Path;

/// An in-memory RGB image that the renderer's output can be painted onto.
///
/// No depth buffer: later triangles simply overwrite earlier ones, which is
/// what a farthest-first draw list needs.
pub struct ImageCanvas {
    image: RgbImage,
}

impl ImageCanvas {
    pub fn new(width: u32, height: u32, background: Vector3<f32>) -> Self {
        Self {
            image: RgbImage::from_pixel(width.max(1), height.max(1), Rgb(to_rgb8(background))),
        }
    }

    pub fn clear(&mut self, background: Vector3<f32>) {
        let bg = Rgb(to_rgb8(background));
        for pixel in self.image.pixels_mut() {
            *pixel = bg;
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Saves the canvas; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image.save(path)?;
        info!("Image saved to {}", path.display());
        Ok(())
    }
}

impl Canvas for ImageCanvas {
    /// Fills pixels whose centers fall inside the triangle (bounding box scan
    /// with barycentric coverage).
    fn fill_triangle(&mut self, points: [Point2<f32>; 3], color: [u8; 3]) {
        let [a, b, c] = points;
        let w = self.image.width() as f32;
        let h = self.image.height() as f32;

        let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
        let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
        let max_x = a.x.max(b.x).max(c.x).ceil().min(w - 1.0);
        let max_y = a.y.max(b.y).max(c.y).ceil().min(h - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let rgb = Rgb(color);
        for y in min_y as u32..=max_y as u32 {
            for x in min_x as u32..=max_x as u32 {
                let p = Point2::new(x as f32 + 0.5, y as f32 + 0.5);
                if barycentric_coordinates(p, a, b, c).is_some_and(is_inside_triangle) {
                    self.image.put_pixel(x, y, rgb);
                }
            }
        }
    }
}
