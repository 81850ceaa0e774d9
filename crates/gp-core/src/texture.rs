use crate::color::to_unorm8;
use crate::error::CoreError;
use crate::frame::FrameBuffer;

/// Storage format of a [`RenderTexture`].
///
/// # Example
/// ```
/// use gp_core::texture::ColorFormat;
/// assert_eq!(ColorFormat::Rgba8Unorm.encode(1.7), 1.0);
/// assert_eq!(ColorFormat::DefaultHdr.encode(1.7), 1.7);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    /// 8 bits par canal, valeurs clampées à [0, 1] et quantifiées au 1/255.
    #[default]
    Rgba8Unorm,
    /// Float HDR : valeurs conservées telles quelles, négatifs et NaN ramenés à 0.
    DefaultHdr,
}

impl ColorFormat {
    /// Encode a channel value the way a write into this format stores it.
    #[inline(always)]
    #[must_use]
    pub fn encode(self, v: f32) -> f32 {
        match self {
            Self::Rgba8Unorm => f32::from(to_unorm8(v)) / 255.0,
            Self::DefaultHdr => {
                if v.is_nan() {
                    0.0
                } else {
                    v.max(0.0)
                }
            }
        }
    }
}

/// Size and format of a texture, as reported by the frame target.
///
/// # Example
/// ```
/// use gp_core::texture::{ColorFormat, TextureDescriptor};
/// let desc = TextureDescriptor::new(1920, 1080, ColorFormat::Rgba8Unorm);
/// let hdr = desc.with_format(ColorFormat::DefaultHdr);
/// assert_eq!((hdr.width, hdr.height), (1920, 1080));
/// assert_eq!(hdr.format, ColorFormat::DefaultHdr);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Storage format.
    pub format: ColorFormat,
}

impl TextureDescriptor {
    #[must_use]
    pub fn new(width: u32, height: u32, format: ColorFormat) -> Self {
        Self {
            width,
            height,
            format,
        }
    }

    /// Same extent, different storage format.
    #[must_use]
    pub fn with_format(self, format: ColorFormat) -> Self {
        Self { format, ..self }
    }

    /// Number of f32 channels a texture of this size stores.
    #[must_use]
    pub fn channel_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// Texture RGBA en mémoire, row-major, 4 f32 par texel.
///
/// Stands in for a GPU-resident image: every write goes through the
/// format's [`ColorFormat::encode`], so an 8-bit target behaves like one.
///
/// # Example
/// ```
/// use gp_core::texture::{ColorFormat, RenderTexture, TextureDescriptor};
/// let tex = RenderTexture::new(TextureDescriptor::new(4, 2, ColorFormat::DefaultHdr));
/// assert_eq!(tex.data.len(), 4 * 2 * 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTexture {
    /// Size and format.
    pub descriptor: TextureDescriptor,
    /// Texels RGBA, row-major.
    pub data: Vec<f32>,
}

impl RenderTexture {
    /// Crée une texture remplie de noir transparent.
    #[must_use]
    pub fn new(descriptor: TextureDescriptor) -> Self {
        Self {
            data: vec![0.0; descriptor.channel_len()],
            descriptor,
        }
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    #[inline]
    #[must_use]
    pub fn format(&self) -> ColorFormat {
        self.descriptor.format
    }

    /// Texel (x, y) as `[r, g, b, a]`. Out-of-bounds reads return transparent black.
    #[inline(always)]
    #[must_use]
    pub fn texel(&self, x: u32, y: u32) -> [f32; 4] {
        if x >= self.width() || y >= self.height() {
            return [0.0; 4];
        }
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Write texel (x, y) through the texture format. Out-of-bounds writes are dropped.
    #[inline(always)]
    pub fn set_texel(&mut self, x: u32, y: u32, rgba: [f32; 4]) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let format = self.format();
        let idx = (y as usize * self.width() as usize + x as usize) * 4;
        for (dst, v) in self.data[idx..idx + 4].iter_mut().zip(rgba) {
            *dst = format.encode(v);
        }
    }

    /// Fill every texel with `rgba`.
    pub fn fill(&mut self, rgba: [f32; 4]) {
        let format = self.format();
        let encoded = rgba.map(|v| format.encode(v));
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&encoded);
        }
    }

    /// Unfiltered full-size copy of `src` into this texture, re-encoded to this format.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimensions`] if the extents differ.
    pub fn copy_from(&mut self, src: &RenderTexture) -> Result<(), CoreError> {
        if src.width() != self.width() || src.height() != self.height() {
            return Err(CoreError::InvalidDimensions {
                width: src.width(),
                height: src.height(),
            });
        }
        let format = self.format();
        for (dst, &v) in self.data.iter_mut().zip(&src.data) {
            *dst = format.encode(v);
        }
        Ok(())
    }

    /// Upload an 8-bit frame into a new texture of the given format.
    ///
    /// # Example
    /// ```
    /// use gp_core::frame::FrameBuffer;
    /// use gp_core::texture::{ColorFormat, RenderTexture};
    /// let mut fb = FrameBuffer::new(1, 1);
    /// fb.data.copy_from_slice(&[255, 0, 51, 255]);
    /// let tex = RenderTexture::from_frame(&fb, ColorFormat::Rgba8Unorm);
    /// assert_eq!(tex.texel(0, 0), [1.0, 0.0, 0.2, 1.0]);
    /// ```
    #[must_use]
    pub fn from_frame(frame: &FrameBuffer, format: ColorFormat) -> Self {
        let descriptor = TextureDescriptor::new(frame.width, frame.height, format);
        let data = frame
            .data
            .iter()
            .map(|&c| format.encode(f32::from(c) / 255.0))
            .collect();
        Self { descriptor, data }
    }

    /// Read back as an 8-bit frame (clamped, rounded).
    #[must_use]
    pub fn to_frame(&self) -> FrameBuffer {
        FrameBuffer {
            data: self.data.iter().map(|&v| to_unorm8(v)).collect(),
            width: self.width(),
            height: self.height(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgba8_writes_are_quantized() {
        let mut tex = RenderTexture::new(TextureDescriptor::new(1, 1, ColorFormat::Rgba8Unorm));
        tex.set_texel(0, 0, [0.5, 2.0, -1.0, 1.0]);
        assert_eq!(tex.texel(0, 0), [128.0 / 255.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn hdr_keeps_values_above_one() {
        let mut tex = RenderTexture::new(TextureDescriptor::new(1, 1, ColorFormat::DefaultHdr));
        tex.set_texel(0, 0, [3.5, f32::NAN, -0.5, 1.0]);
        assert_eq!(tex.texel(0, 0), [3.5, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn copy_rejects_size_mismatch() {
        let mut dst = RenderTexture::new(TextureDescriptor::new(2, 2, ColorFormat::Rgba8Unorm));
        let src = RenderTexture::new(TextureDescriptor::new(3, 2, ColorFormat::Rgba8Unorm));
        assert!(dst.copy_from(&src).is_err());
    }

    #[test]
    fn copy_from_hdr_clamps_into_rgba8() {
        let mut src = RenderTexture::new(TextureDescriptor::new(2, 1, ColorFormat::DefaultHdr));
        src.fill([4.0, 0.25, 0.0, 1.0]);
        let mut dst = RenderTexture::new(TextureDescriptor::new(2, 1, ColorFormat::Rgba8Unorm));
        dst.copy_from(&src).unwrap();
        assert_eq!(dst.texel(1, 0), [1.0, 64.0 / 255.0, 0.0, 1.0]);
    }

    #[test]
    fn frame_roundtrip_is_lossless_for_rgba8() {
        let mut fb = FrameBuffer::new(3, 2);
        for (i, b) in fb.data.iter_mut().enumerate() {
            *b = (i * 11 % 256) as u8;
        }
        let tex = RenderTexture::from_frame(&fb, ColorFormat::Rgba8Unorm);
        assert_eq!(tex.to_frame().data, fb.data);
    }
}
