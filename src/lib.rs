// Copyright 2022 Spanfile
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A library to extract dominant colors from an image.
//!
//! Pixels are bucketed into a three-dimensional RGB histogram. Every bucket that holds at least as many pixels as
//! each of its 26 neighbors is a peak, and the averaged color of each peak becomes one extracted color, most
//! populated first. The peaks then pass through optional post-filters (distinct colors only, avoided colors) and an
//! optional brightness ordering.
//!
//! ```
//! use primacy::{image::RgbaImage, Options, Palette};
//!
//! let image = RgbaImage::from_pixel(4, 4, primacy::image::Rgba([204, 204, 204, 255]));
//! let palette = Palette::from_image(image)
//!     .options(Options::ONLY_BRIGHT_COLORS | Options::ONLY_DISTINCT_COLORS)
//!     .generate()?;
//!
//! assert_eq!(palette.len(), 1);
//! # Ok::<(), primacy::ExtractError>(())
//! ```
//!
//! [`Extractor`] runs the same pipeline on a dedicated worker thread.

mod color_cube_quantizer;
mod config;
mod error;
mod extractor;
mod filter;
mod options;
mod order;
mod swatch;

pub use crate::{
    config::Config,
    error::{ExtractError, Result},
    extractor::{Executor, Extraction, Extractor, Inline, Task},
    filter::{AvoidFilter, DistinctFilter, Filter},
    options::Options,
    swatch::Swatch,
};
pub use image;
pub use palette;

use color_cube_quantizer::ColorCubeQuantizer;
use image::{math::Rect, GenericImageView, RgbaImage};

/// An extracted color. Every component is in the range `[0, 1]`.
pub type Color = palette::Srgb<f64>;

pub const DEFAULT_RESIZE_IMAGE_AREA: u32 = 0;

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Palette {
    swatches: Vec<Swatch>,
}

pub struct PaletteBuilder {
    image: RgbaImage,
    options: Options,
    avoid_colors: Vec<Color>,
    config: Config,
    resize_area: u32,
    region: Option<Rect>,
    filters: Vec<Box<dyn Filter + Send>>,
}

impl Palette {
    pub fn from_image(image: RgbaImage) -> PaletteBuilder {
        PaletteBuilder::from_image(image)
    }

    /// The extracted swatches in their final order.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    pub fn colors(&self) -> Vec<Color> {
        self.swatches.iter().map(|swatch| swatch.color()).collect()
    }

    /// The first swatch in the final order.
    pub fn main_swatch(&self) -> Option<Swatch> {
        self.swatches.first().copied()
    }

    pub fn main_color(&self) -> Option<Color> {
        self.main_swatch().map(|swatch| swatch.color())
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn into_colors(self) -> Vec<Color> {
        self.colors()
    }
}

impl PaletteBuilder {
    pub fn from_image(image: RgbaImage) -> Self {
        Self {
            image,
            options: Options::default(),
            avoid_colors: Vec::new(),
            config: Config::default(),
            resize_area: DEFAULT_RESIZE_IMAGE_AREA,
            region: None,
            filters: Vec::new(),
        }
    }

    /// Build from a flat, row-major RGBA8 buffer. A buffer too short for the given dimensions is treated as an empty
    /// image, which produces an empty palette. Bytes past the end of the image are ignored.
    pub fn from_raw(width: u32, height: u32, mut pixels: Vec<u8>) -> Self {
        let image_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|count| count.checked_mul(4));

        if let Some(image_len) = image_len {
            if pixels.len() > image_len {
                log::warn!("ignoring {} bytes past the end of a {}x{} image", pixels.len() - image_len, width, height);
                pixels.truncate(image_len);
            }
        }

        let len = pixels.len();
        let image = RgbaImage::from_raw(width, height, pixels).unwrap_or_else(|| {
            log::warn!("{} bytes are not a {}x{} RGBA8 image, using an empty image", len, width, height);
            RgbaImage::new(0, 0)
        });

        Self::from_image(image)
    }

    pub fn options(self, options: Options) -> Self {
        Self { options, ..self }
    }

    pub fn config(self, config: Config) -> Self {
        Self { config, ..self }
    }

    pub fn avoid_color(mut self, color: Color) -> Self {
        self.avoid_colors.push(color);
        self
    }

    pub fn avoid_colors<I>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = Color>,
    {
        self.avoid_colors.extend(colors);
        self
    }

    /// Scale the image down to roughly this many pixels before extracting. Zero disables scaling, which is the
    /// default. Scaling trades accuracy for speed on large images.
    pub fn resize_image_area(self, resize_area: u32) -> Self {
        Self { resize_area, ..self }
    }

    /// Only extract colors from this part of the image. The region is clamped to the image bounds.
    pub fn region(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            region: Some(Rect { x, y, width, height }),
            ..self
        }
    }

    /// Add a filter that runs after the built-in filters.
    pub fn add_filter<F>(mut self, filter: F) -> Self
    where
        F: Filter + Send + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn clear_region(self) -> Self {
        Self { region: None, ..self }
    }

    pub fn clear_avoid_colors(self) -> Self {
        Self {
            avoid_colors: Vec::new(),
            ..self
        }
    }

    pub fn clear_filters(self) -> Self {
        Self {
            filters: Vec::new(),
            ..self
        }
    }

    pub fn generate(mut self) -> Result<Palette> {
        self.config.validate()?;

        self.crop_to_region();
        self.scale_image_down();

        let swatches = run_pipeline(
            self.image.as_raw(),
            self.options,
            &self.avoid_colors,
            &self.config,
            &self.filters,
        );

        Ok(Palette { swatches })
    }

    fn crop_to_region(&mut self) {
        if let Some(region) = self.region.take() {
            let (width, height) = self.image.dimensions();
            let x = region.x.min(width);
            let y = region.y.min(height);

            let cropped = self
                .image
                .view(x, y, region.width.min(width - x), region.height.min(height - y))
                .to_image();
            self.image = cropped;
        }
    }

    fn scale_image_down(&mut self) {
        let (width, height) = self.image.dimensions();
        let area = width as u64 * height as u64;

        if self.resize_area > 0 && area > self.resize_area as u64 {
            let scale_ratio = (self.resize_area as f64 / area as f64).sqrt();

            self.image = image::imageops::resize(
                &self.image,
                (width as f64 * scale_ratio).ceil() as u32,
                (height as f64 * scale_ratio).ceil() as u32,
                image::imageops::FilterType::Nearest,
            );
        }
    }
}

/// Extract colors from a flat RGBA8 buffer with the default [`Config`].
pub fn extract_colors(pixels: &[u8], options: Options, avoid_colors: &[Color]) -> Vec<Color> {
    run_pipeline(pixels, options, avoid_colors, &Config::default(), &[])
        .into_iter()
        .map(|swatch| swatch.color())
        .collect()
}

/// Extract swatches from a flat RGBA8 buffer.
pub fn extract_swatches(
    pixels: &[u8],
    options: Options,
    avoid_colors: &[Color],
    config: &Config,
) -> Result<Vec<Swatch>> {
    config.validate()?;
    Ok(run_pipeline(pixels, options, avoid_colors, config, &[]))
}

fn run_pipeline(
    pixels: &[u8],
    options: Options,
    avoid_colors: &[Color],
    config: &Config,
    extra_filters: &[Box<dyn Filter + Send>],
) -> Vec<Swatch> {
    let mut swatches = ColorCubeQuantizer::new(pixels, options, *config).get_quantized_colors();

    let builtin = filter::builtin_filters(options, avoid_colors, config);
    for pass in builtin.iter().chain(extra_filters) {
        swatches = filter::apply_filter(pass.as_ref(), swatches);
    }

    order::order_swatches(&mut swatches, options);

    log::debug!("extracted {} colors", swatches.len());
    swatches
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_block_image() -> RgbaImage {
        // left six columns red, right four columns blue
        RgbaImage::from_fn(10, 10, |x, _| {
            if x < 6 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    struct OnlyReddish;
    impl Filter for OnlyReddish {
        fn is_allowed(&self, _: &[Swatch], candidate: Swatch) -> bool {
            let (r, g, b) = candidate.rgb();
            r > g && r > b
        }
    }

    #[test]
    fn single_color_image() {
        let image = RgbaImage::from_pixel(8, 8, Rgba([204, 204, 204, 255]));
        let palette = Palette::from_image(image).generate().unwrap();

        assert_eq!(palette.len(), 1);
        let color = palette.main_color().unwrap();
        assert!((color.red - 0.8).abs() < 1e-9);
        assert!((color.green - 0.8).abs() < 1e-9);
        assert!((color.blue - 0.8).abs() < 1e-9);
        assert_eq!(palette.main_swatch().unwrap().population(), 64);
    }

    #[test]
    fn region_restricts_the_pixels() {
        let palette = Palette::from_image(two_block_image())
            .region(6, 0, 100, 100)
            .generate()
            .unwrap();

        assert_eq!(palette.colors(), vec![Color::new(0.0, 0.0, 1.0)]);
        assert_eq!(palette.main_swatch().unwrap().population(), 40);
    }

    #[test]
    fn region_outside_the_image_is_empty() {
        let palette = Palette::from_image(two_block_image())
            .region(50, 50, 10, 10)
            .generate()
            .unwrap();

        assert!(palette.is_empty());
    }

    #[test]
    fn resized_image_keeps_its_colors() {
        let palette = Palette::from_image(two_block_image())
            .resize_image_area(25)
            .generate()
            .unwrap();

        assert_eq!(palette.colors(), vec![Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0)]);
    }

    #[test]
    fn custom_filters_run_last() {
        let palette = Palette::from_image(two_block_image())
            .add_filter(OnlyReddish)
            .generate()
            .unwrap();
        assert_eq!(palette.colors(), vec![Color::new(1.0, 0.0, 0.0)]);

        let palette = Palette::from_image(two_block_image())
            .add_filter(OnlyReddish)
            .clear_filters()
            .generate()
            .unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn avoid_colors_accumulate() {
        let palette = Palette::from_image(two_block_image())
            .avoid_color(Color::new(1.0, 0.0, 0.0))
            .avoid_colors([Color::new(0.0, 0.0, 1.0)])
            .generate()
            .unwrap();
        assert!(palette.is_empty());

        let palette = Palette::from_image(two_block_image())
            .avoid_color(Color::new(1.0, 0.0, 0.0))
            .clear_avoid_colors()
            .generate()
            .unwrap();
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn short_raw_buffer_is_an_empty_image() {
        let palette = PaletteBuilder::from_raw(4, 4, vec![255; 10]).generate().unwrap();

        assert!(palette.is_empty());
        assert_eq!(palette.main_color(), None);
    }

    #[test]
    fn bytes_past_the_image_are_ignored() {
        let pixels = vec![255, 0, 0, 255, 0, 0, 255, 255, 0, 0, 255, 255];
        let palette = PaletteBuilder::from_raw(1, 1, pixels).generate().unwrap();

        assert_eq!(palette.colors(), vec![Color::new(1.0, 0.0, 0.0)]);
        assert_eq!(palette.main_swatch().unwrap().population(), 1);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let result = Palette::from_image(two_block_image())
            .config(Config::default().resolution(0))
            .generate();

        assert!(matches!(result, Err(ExtractError::InvalidParameter { .. })));
    }

    #[test]
    fn extract_colors_from_raw_bytes() {
        let pixels = two_block_image().into_raw();
        let colors = extract_colors(&pixels, Options::default(), &[]);

        assert_eq!(colors, vec![Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0)]);
        assert!(extract_colors(&[], Options::default(), &[]).is_empty());
    }

    #[test]
    fn extract_swatches_validates_the_config() {
        let pixels = two_block_image().into_raw();

        let swatches = extract_swatches(&pixels, Options::empty(), &[], &Config::default()).unwrap();
        assert_eq!(swatches.iter().map(|swatch| swatch.population()).collect::<Vec<_>>(), vec![60, 40]);

        let config = Config::default().bright_threshold(f64::INFINITY);
        assert!(extract_swatches(&pixels, Options::empty(), &[], &config).is_err());
    }
}
