use crate::{config::Config, options::Options, swatch::Swatch, Color};

const WHITE: Color = Color::new(1.0, 1.0, 1.0);
const BLACK: Color = Color::new(0.0, 0.0, 0.0);

/// A trait used to implement post-filters for the extracted swatches.
///
/// A filter runs as one pass over the swatches in their current order. For each candidate it is given the swatches
/// it has already let through in this pass, which allows greedy filters such as [`DistinctFilter`]. This trait allows
/// the library consumer to implement custom filters.
///
/// See [`crate::PaletteBuilder::add_filter`] on how to add filters to the extraction process.
pub trait Filter {
    /// Return whether the candidate should be kept.
    fn is_allowed(&self, kept: &[Swatch], candidate: Swatch) -> bool;
}

/// Keeps a swatch only if it is far enough from every swatch kept before it.
///
/// Since the swatches arrive most populated first, the most prominent color of a group of similar colors survives.
#[derive(Debug, Clone, Copy)]
pub struct DistinctFilter {
    threshold: f64,
}

/// Drops every swatch closer than a given distance to a color.
#[derive(Debug, Clone, Copy)]
pub struct AvoidFilter {
    color: Color,
    distance: f64,
}

impl DistinctFilter {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }
}

impl Filter for DistinctFilter {
    fn is_allowed(&self, kept: &[Swatch], candidate: Swatch) -> bool {
        kept.iter().all(|swatch| candidate.distance(*swatch) >= self.threshold)
    }
}

impl AvoidFilter {
    /// Returns `None` if any component of the color isn't a finite number, since nothing can be measured against it.
    pub fn new(color: Color, distance: f64) -> Option<Self> {
        let (red, green, blue) = color.into_components();

        if red.is_finite() && green.is_finite() && blue.is_finite() {
            Some(Self { color, distance })
        } else {
            None
        }
    }
}

impl Filter for AvoidFilter {
    fn is_allowed(&self, _: &[Swatch], candidate: Swatch) -> bool {
        candidate.distance_to(self.color) >= self.distance
    }
}

/// Run one filter pass over the swatches, keeping their order.
pub(crate) fn apply_filter<F>(filter: &F, swatches: Vec<Swatch>) -> Vec<Swatch>
where
    F: Filter + ?Sized,
{
    let mut kept = Vec::with_capacity(swatches.len());

    for swatch in swatches {
        if filter.is_allowed(&kept, swatch) {
            kept.push(swatch);
        }
    }

    kept
}

/// The built-in post-filters selected by the options, in the order they run: the distinct filter, then white and
/// black, then each avoided color in the given order.
pub(crate) fn builtin_filters(
    options: Options,
    avoid_colors: &[Color],
    config: &Config,
) -> Vec<Box<dyn Filter + Send>> {
    let mut filters: Vec<Box<dyn Filter + Send>> = Vec::new();

    if options.contains(Options::ONLY_DISTINCT_COLORS) {
        filters.push(Box::new(DistinctFilter::new(config.distinct_threshold)));
    }

    let mut avoided = Vec::new();
    if options.contains(Options::AVOID_WHITE) {
        avoided.push(WHITE);
    }
    if options.contains(Options::AVOID_BLACK) {
        avoided.push(BLACK);
    }
    avoided.extend_from_slice(avoid_colors);

    for color in avoided {
        match AvoidFilter::new(color, config.avoid_distance) {
            Some(filter) => filters.push(Box::new(filter)),
            None => log::warn!("skipping malformed avoid color {:?}", color.into_components()),
        }
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swatches(colors: &[(f64, f64, f64)]) -> Vec<Swatch> {
        colors
            .iter()
            .enumerate()
            .map(|(i, &rgb)| Swatch::new(rgb, (colors.len() - i) as u32))
            .collect()
    }

    #[test]
    fn distinct_filter_keeps_the_first_of_a_cluster() {
        let input = swatches(&[(0.9, 0.1, 0.1), (0.85, 0.15, 0.1), (0.1, 0.1, 0.9), (0.9, 0.12, 0.1)]);
        let output = apply_filter(&DistinctFilter::new(0.2), input.clone());

        assert_eq!(output, vec![input[0], input[2]]);
    }

    #[test]
    fn distinct_filter_compares_green_with_green() {
        // the two colors only differ in green
        let input = swatches(&[(0.5, 0.1, 0.5), (0.5, 0.9, 0.5)]);
        let output = apply_filter(&DistinctFilter::new(0.2), input.clone());

        assert_eq!(output, input);
    }

    #[test]
    fn avoid_filter_drops_close_colors() {
        let input = swatches(&[(0.95, 0.95, 0.95), (0.2, 0.3, 0.8), (0.8, 0.8, 0.7)]);
        let filter = AvoidFilter::new(WHITE, 0.5).unwrap();

        assert_eq!(apply_filter(&filter, input.clone()), vec![input[1]]);
    }

    #[test]
    fn malformed_avoid_color_is_rejected() {
        assert!(AvoidFilter::new(Color::new(f64::NAN, 0.0, 0.0), 0.5).is_none());
        assert!(AvoidFilter::new(Color::new(0.0, f64::INFINITY, 0.0), 0.5).is_none());
    }

    #[test]
    fn builtin_filters_skip_malformed_colors() {
        let options = Options::ONLY_DISTINCT_COLORS | Options::AVOID_WHITE | Options::AVOID_BLACK;
        let avoid = [Color::new(f64::NAN, 0.0, 0.0), Color::new(1.0, 0.0, 0.0)];

        // distinct, white, black and red
        assert_eq!(builtin_filters(options, &avoid, &Config::default()).len(), 4);
        assert!(builtin_filters(Options::empty(), &[], &Config::default()).is_empty());
    }

    #[test]
    fn avoid_white_and_avoid_black_target_the_right_colors() {
        let input = swatches(&[(0.98, 0.98, 0.98), (0.02, 0.02, 0.02)]);
        let config = Config::default();

        let without_white = builtin_filters(Options::AVOID_WHITE, &[], &config)
            .iter()
            .fold(input.clone(), |swatches, filter| apply_filter(filter.as_ref(), swatches));
        assert_eq!(without_white, vec![input[1]]);

        let without_black = builtin_filters(Options::AVOID_BLACK, &[], &config)
            .iter()
            .fold(input.clone(), |swatches, filter| apply_filter(filter.as_ref(), swatches));
        assert_eq!(without_black, vec![input[0]]);
    }
}
