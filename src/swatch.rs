use crate::Color;

/// One extracted color: the average of every pixel that fell into a histogram peak, along with how many pixels
/// that was.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swatch {
    red: f64,
    green: f64,
    blue: f64,
    population: u32,
}

impl Swatch {
    pub fn new((red, green, blue): (f64, f64, f64), population: u32) -> Swatch {
        Self {
            red,
            green,
            blue,
            population,
        }
    }

    pub fn rgb(self) -> (f64, f64, f64) {
        (self.red, self.green, self.blue)
    }

    pub fn color(self) -> Color {
        Color::new(self.red, self.green, self.blue)
    }

    pub fn population(self) -> u32 {
        self.population
    }

    /// The largest of the three channels.
    pub fn brightness(self) -> f64 {
        self.red.max(self.green).max(self.blue)
    }

    /// Euclidean distance between two swatches in RGB space.
    pub fn distance(self, other: Swatch) -> f64 {
        self.distance_to(other.color())
    }

    /// Euclidean distance between this swatch and a color in RGB space.
    pub fn distance_to(self, color: Color) -> f64 {
        let red = self.red - color.red;
        let green = self.green - color.green;
        let blue = self.blue - color.blue;

        (red * red + green * green + blue * blue).sqrt()
    }
}
