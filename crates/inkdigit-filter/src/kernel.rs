//! Convolution kernels
//!
//! Defines kernel structures for image convolution operations.

/// A 2D convolution kernel
///
/// The origin is the centre element.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Width of the kernel
    width: u32,
    /// Height of the kernel
    height: u32,
    /// Kernel data (row-major order)
    data: Vec<f32>,
}

impl Kernel {
    /// The 3x3 smoothing kernel used on small glyphs.
    ///
    /// ```text
    /// 0.0625 0.125 0.0625
    /// 0.125  0.25  0.125
    /// 0.0625 0.125 0.0625
    /// ```
    pub fn smoothing() -> Self {
        Self {
            width: 3,
            height: 3,
            data: vec![
                0.0625, 0.125, 0.0625, //
                0.125, 0.25, 0.125, //
                0.0625, 0.125, 0.0625,
            ],
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the center X coordinate.
    #[inline]
    pub fn center_x(&self) -> u32 {
        self.width / 2
    }

    /// Get the center Y coordinate.
    #[inline]
    pub fn center_y(&self) -> u32 {
        self.height / 2
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}
