use std::ops::{BitOr, BitOrAssign};

/// A set of flags that control which colors an extraction keeps and in which order they are returned.
///
/// Flags combine with `|`:
///
/// ```
/// use primacy::Options;
///
/// let options = Options::ONLY_DARK_COLORS | Options::ORDER_BY_DARKNESS;
/// assert!(options.contains(Options::ONLY_DARK_COLORS));
/// assert!(!options.contains(Options::ONLY_BRIGHT_COLORS));
/// ```
///
/// [`Options::ONLY_BRIGHT_COLORS`] and [`Options::ONLY_DARK_COLORS`] are not meant to be combined. When both are
/// set, only the bright filter applies. Likewise, when both ordering flags are set the colors are first ordered by
/// darkness and then by brightness, so the brightness order wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Options(u8);

impl Options {
    /// Skip every pixel whose channels are all below the bright threshold.
    pub const ONLY_BRIGHT_COLORS: Options = Options(1 << 0);
    /// Skip every pixel with any channel above the dark threshold.
    pub const ONLY_DARK_COLORS: Options = Options(1 << 1);
    /// Drop colors too close to a more prominent color.
    pub const ONLY_DISTINCT_COLORS: Options = Options(1 << 2);
    /// Order the result from the brightest color to the darkest.
    pub const ORDER_BY_BRIGHTNESS: Options = Options(1 << 3);
    /// Order the result from the darkest color to the brightest.
    pub const ORDER_BY_DARKNESS: Options = Options(1 << 4);
    /// Drop colors close to white.
    pub const AVOID_WHITE: Options = Options(1 << 5);
    /// Drop colors close to black.
    pub const AVOID_BLACK: Options = Options(1 << 6);

    /// The options used by bright color extractions.
    pub const BRIGHT_COLORS: Options = Options(Self::ONLY_BRIGHT_COLORS.0 | Self::ORDER_BY_BRIGHTNESS.0);
    /// The options used by dark color extractions.
    pub const DARK_COLORS: Options = Options(Self::ONLY_DARK_COLORS.0 | Self::ORDER_BY_DARKNESS.0);

    const ALL: u8 = (1 << 7) - 1;

    pub const fn empty() -> Options {
        Options(0)
    }

    /// Build a set from raw bits, silently dropping unknown ones.
    pub const fn from_bits_truncate(bits: u8) -> Options {
        Options(bits & Self::ALL)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Options) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Options) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Options) {
        self.0 &= !other.0;
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::ONLY_BRIGHT_COLORS
    }
}

impl BitOr for Options {
    type Output = Options;

    fn bitor(self, rhs: Self) -> Self::Output {
        Options(self.0 | rhs.0)
    }
}

impl BitOrAssign for Options {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_only_bright() {
        let options = Options::default();

        assert_eq!(options, Options::ONLY_BRIGHT_COLORS);
        assert!(!options.contains(Options::ONLY_DARK_COLORS));
    }

    #[test]
    fn insert_and_remove() {
        let mut options = Options::empty();
        assert!(options.is_empty());

        options |= Options::AVOID_BLACK;
        options.insert(Options::AVOID_WHITE);
        assert!(options.contains(Options::AVOID_BLACK | Options::AVOID_WHITE));

        options.remove(Options::AVOID_BLACK);
        assert!(!options.contains(Options::AVOID_BLACK));
        assert!(options.contains(Options::AVOID_WHITE));
    }

    #[test]
    fn unknown_bits_are_dropped() {
        assert_eq!(Options::from_bits_truncate(0xff).bits(), 0x7f);
    }

    #[test]
    fn convenience_sets() {
        assert!(Options::BRIGHT_COLORS.contains(Options::ONLY_BRIGHT_COLORS | Options::ORDER_BY_BRIGHTNESS));
        assert!(Options::DARK_COLORS.contains(Options::ONLY_DARK_COLORS | Options::ORDER_BY_DARKNESS));
    }
}
