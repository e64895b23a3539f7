use crate::{options::Options, swatch::Swatch};

/// Sort the swatches by brightness as the options request. Both sorts are stable and run darkness first, so when
/// both flags are set the brightness order is what remains.
pub(crate) fn order_swatches(swatches: &mut [Swatch], options: Options) {
    if options.contains(Options::ORDER_BY_DARKNESS) {
        swatches.sort_by(|lhs, rhs| lhs.brightness().total_cmp(&rhs.brightness()));
    }

    if options.contains(Options::ORDER_BY_BRIGHTNESS) {
        swatches.sort_by(|lhs, rhs| rhs.brightness().total_cmp(&lhs.brightness()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> Vec<Swatch> {
        vec![
            Swatch::new((0.5, 0.2, 0.2), 40),
            Swatch::new((0.1, 0.9, 0.3), 30),
            Swatch::new((0.2, 0.2, 0.5), 20),
            Swatch::new((0.05, 0.1, 0.2), 10),
        ]
    }

    fn brightness(swatches: &[Swatch]) -> Vec<f64> {
        swatches.iter().map(|swatch| swatch.brightness()).collect()
    }

    #[test]
    fn no_ordering_keeps_population_order() {
        let mut swatches = input();
        order_swatches(&mut swatches, Options::empty());

        assert_eq!(swatches, input());
    }

    #[test]
    fn order_by_darkness() {
        let mut swatches = input();
        order_swatches(&mut swatches, Options::ORDER_BY_DARKNESS);

        // the two 0.5 swatches keep their relative order
        assert_eq!(brightness(&swatches), vec![0.2, 0.5, 0.5, 0.9]);
        assert_eq!(swatches[1].population(), 40);
        assert_eq!(swatches[2].population(), 20);
    }

    #[test]
    fn order_by_brightness() {
        let mut swatches = input();
        order_swatches(&mut swatches, Options::ORDER_BY_BRIGHTNESS);

        assert_eq!(brightness(&swatches), vec![0.9, 0.5, 0.5, 0.2]);
        assert_eq!(swatches[1].population(), 40);
    }

    #[test]
    fn brightness_wins_when_both_are_set() {
        let mut swatches = input();
        order_swatches(&mut swatches, Options::ORDER_BY_BRIGHTNESS | Options::ORDER_BY_DARKNESS);

        assert_eq!(brightness(&swatches), vec![0.9, 0.5, 0.5, 0.2]);
        // the darkness sort ran first and left the tie in population order
        assert_eq!(swatches[1].population(), 40);
        assert_eq!(swatches[2].population(), 20);
    }
}
