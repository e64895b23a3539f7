use crate::{config::Config, options::Options, swatch::Swatch};

const BYTES_PER_PIXEL: usize = 4;

pub struct ColorCubeQuantizer<'a> {
    pixels: &'a [u8],
    options: Options,
    config: Config,
}

/// A single histogram bucket: every pixel whose quantized coordinates land in this cube adds to its sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct ColorCube {
    hit_count: u32,
    red_sum: f64,
    green_sum: f64,
    blue_sum: f64,
}

/// The dense R×R×R histogram, flattened so that red varies fastest and blue slowest.
pub(crate) struct CubeGrid {
    resolution: usize,
    cubes: Vec<ColorCube>,
}

impl<'a> ColorCubeQuantizer<'a> {
    /// `pixels` is a flat RGBA8 buffer. The alpha byte of every pixel is ignored.
    pub fn new(pixels: &'a [u8], options: Options, config: Config) -> Self {
        Self {
            pixels,
            options,
            config,
        }
    }

    /// Build the histogram and return its peaks, most populated first.
    pub fn get_quantized_colors(self) -> Vec<Swatch> {
        let remainder = self.pixels.len() % BYTES_PER_PIXEL;
        if remainder != 0 {
            log::warn!("ignoring {} trailing bytes that do not form a whole pixel", remainder);
        }

        let grid = self.build_histogram();
        let peaks = grid.find_peaks();

        log::debug!("found {} peaks in a {}³ histogram", peaks.len(), grid.resolution);
        peaks
    }

    fn build_histogram(&self) -> CubeGrid {
        let mut grid = CubeGrid::new(self.config.resolution);
        let mut retained = 0usize;

        for pixel in self.pixels.chunks_exact(BYTES_PER_PIXEL) {
            let red = pixel[0] as f64 / 255.0;
            let green = pixel[1] as f64 / 255.0;
            let blue = pixel[2] as f64 / 255.0;

            if self.should_skip_pixel(red, green, blue) {
                continue;
            }

            grid.add(red, green, blue);
            retained += 1;
        }

        log::debug!(
            "retained {} of {} pixels",
            retained,
            self.pixels.len() / BYTES_PER_PIXEL
        );
        grid
    }

    fn should_skip_pixel(&self, red: f64, green: f64, blue: f64) -> bool {
        // the dark filter is only consulted when the bright filter is off
        if self.options.contains(Options::ONLY_BRIGHT_COLORS) {
            let threshold = self.config.bright_threshold;
            red < threshold && green < threshold && blue < threshold
        } else if self.options.contains(Options::ONLY_DARK_COLORS) {
            let threshold = self.config.dark_threshold;
            red > threshold || green > threshold || blue > threshold
        } else {
            false
        }
    }
}

impl ColorCube {
    fn add(&mut self, red: f64, green: f64, blue: f64) {
        self.hit_count += 1;
        self.red_sum += red;
        self.green_sum += green;
        self.blue_sum += blue;
    }

    pub fn hit_count(&self) -> u32 {
        self.hit_count
    }

    /// The averaged color of this cube, or `None` if no pixel ever landed in it.
    pub fn average(&self) -> Option<(f64, f64, f64)> {
        if self.hit_count == 0 {
            return None;
        }

        let count = self.hit_count as f64;
        Some((self.red_sum / count, self.green_sum / count, self.blue_sum / count))
    }

    fn to_swatch(self) -> Option<Swatch> {
        self.average().map(|rgb| Swatch::new(rgb, self.hit_count))
    }
}

impl CubeGrid {
    pub fn new(resolution: usize) -> Self {
        Self {
            resolution,
            cubes: vec![ColorCube::default(); resolution * resolution * resolution],
        }
    }

    pub fn cube(&self, red: usize, green: usize, blue: usize) -> &ColorCube {
        &self.cubes[self.index(red, green, blue)]
    }

    /// Which bucket along one axis a normalized channel value falls into.
    pub fn channel_index(&self, value: f64) -> usize {
        let max_index = self.resolution - 1;
        ((value * max_index as f64) as usize).min(max_index)
    }

    pub fn index(&self, red: usize, green: usize, blue: usize) -> usize {
        red + green * self.resolution + blue * self.resolution * self.resolution
    }

    #[cfg(test)]
    pub fn coordinates(&self, index: usize) -> (usize, usize, usize) {
        let red = index % self.resolution;
        let green = (index / self.resolution) % self.resolution;
        let blue = index / (self.resolution * self.resolution);

        (red, green, blue)
    }

    pub fn add(&mut self, red: f64, green: f64, blue: f64) {
        let index = self.index(
            self.channel_index(red),
            self.channel_index(green),
            self.channel_index(blue),
        );

        self.cubes[index].add(red, green, blue);
    }

    /// Collect every populated cube that no neighbor outnumbers, sorted by hit count in descending order.
    ///
    /// Neighbors outside the grid are not compared at all, so cubes on the faces of the grid have fewer rivals.
    /// Ties keep the scan order: red is the outermost loop, blue the innermost.
    pub fn find_peaks(&self) -> Vec<Swatch> {
        let mut peaks = Vec::new();

        for red in 0..self.resolution {
            for green in 0..self.resolution {
                for blue in 0..self.resolution {
                    let cube = self.cube(red, green, blue);
                    if cube.hit_count() == 0 {
                        continue;
                    }

                    if self.is_local_maximum(red, green, blue, cube.hit_count()) {
                        peaks.extend(cube.to_swatch());
                    }
                }
            }
        }

        // stable, so equal populations stay in scan order
        peaks.sort_by(|lhs, rhs| rhs.population().cmp(&lhs.population()));
        peaks
    }

    fn is_local_maximum(&self, red: usize, green: usize, blue: usize, hit_count: u32) -> bool {
        for red_offset in -1..=1 {
            for green_offset in -1..=1 {
                for blue_offset in -1..=1 {
                    if red_offset == 0 && green_offset == 0 && blue_offset == 0 {
                        continue;
                    }

                    let neighbor = (
                        self.offset(red, red_offset),
                        self.offset(green, green_offset),
                        self.offset(blue, blue_offset),
                    );

                    if let (Some(r), Some(g), Some(b)) = neighbor {
                        if self.cube(r, g, b).hit_count > hit_count {
                            return false;
                        }
                    }
                }
            }
        }

        true
    }

    fn offset(&self, coordinate: usize, offset: isize) -> Option<usize> {
        coordinate
            .checked_add_signed(offset)
            .filter(|&moved| moved < self.resolution)
    }
}
