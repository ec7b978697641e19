use image::RgbaImage;

use crate::Frame;

impl From<RgbaImage> for Frame<'static> {
    fn from(image: RgbaImage) -> Self {
        let width = image.width();
        let height = image.height();
        match Frame::from_vec(width, height, image.into_raw()) {
            Ok(frame) => frame,
            Err(_) => unreachable!("RgbaImage has buffer of exact size"),
        }
    }
}

impl<'a> Frame<'a> {
    /// Create a frame that borrows pixels of the given image.
    pub fn from_rgba_image(image: &'a mut RgbaImage) -> Self {
        let width = image.width();
        let height = image.height();
        let buffer: &mut [u8] = image;
        match Frame::from_slice(width, height, buffer) {
            Ok(frame) => frame,
            Err(_) => unreachable!("RgbaImage has buffer of exact size"),
        }
    }

    /// Converts the frame into an image of the `image` crate.
    pub fn into_rgba_image(self) -> Option<RgbaImage> {
        let width = self.width();
        let height = self.height();
        RgbaImage::from_raw(width, height, self.into_vec())
    }
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn frame_from_image_and_back() {
        let image = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 255]));
        let frame = Frame::from(image);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.pixel(3, 2), Some([10, 20, 30, 255]));

        let image = frame.into_rgba_image().unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn borrowed_frame_writes_into_image() {
        let mut image = RgbaImage::new(3, 3);
        {
            let mut frame = Frame::from_rgba_image(&mut image);
            frame.buffer_mut()[0] = 42;
        }
        assert_eq!(image.get_pixel(0, 0).0[0], 42);
    }
}
