/// How a raw sensor buffer must be transformed to be presented upright.
///
/// Variants follow the camera-facing naming (`Left` means the buffer is
/// rotated so that its top edge sits on the visual left). Numeric values
/// are the EXIF/TIFF orientation convention consumed by the filters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Orientation {
    #[default]
    Up,
    Down,
    Left,
    Right,
    UpMirrored,
    DownMirrored,
    LeftMirrored,
    RightMirrored,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Up,
        Orientation::Down,
        Orientation::Left,
        Orientation::Right,
        Orientation::UpMirrored,
        Orientation::DownMirrored,
        Orientation::LeftMirrored,
        Orientation::RightMirrored,
    ];

    /// EXIF/TIFF orientation value (1-8).
    pub fn exif(self) -> u16 {
        match self {
            Orientation::Up => 1,
            Orientation::Down => 3,
            Orientation::Left => 8,
            Orientation::Right => 6,
            Orientation::UpMirrored => 2,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::RightMirrored => 7,
        }
    }

    pub fn from_exif(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.exif() == value)
    }

    /// True when presenting the buffer upright needs a quarter turn.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Left
                | Orientation::Right
                | Orientation::LeftMirrored
                | Orientation::RightMirrored
        )
    }

    /// Width and height of the upright image for a raw buffer of `width x height`.
    pub fn upright_extent(self, width: u32, height: u32) -> (u32, u32) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }

    pub fn is_upright(self) -> bool {
        self == Orientation::Up
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Orientation::Up => "up",
            Orientation::Down => "down",
            Orientation::Left => "left",
            Orientation::Right => "right",
            Orientation::UpMirrored => "up-mirrored",
            Orientation::DownMirrored => "down-mirrored",
            Orientation::LeftMirrored => "left-mirrored",
            Orientation::RightMirrored => "right-mirrored",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::up(Orientation::Up, 1)]
    #[case::down(Orientation::Down, 3)]
    #[case::left(Orientation::Left, 8)]
    #[case::right(Orientation::Right, 6)]
    #[case::up_mirrored(Orientation::UpMirrored, 2)]
    #[case::down_mirrored(Orientation::DownMirrored, 4)]
    #[case::left_mirrored(Orientation::LeftMirrored, 5)]
    #[case::right_mirrored(Orientation::RightMirrored, 7)]
    fn test_exif_mapping(#[case] orientation: Orientation, #[case] value: u16) {
        assert_eq!(orientation.exif(), value);
        assert_eq!(Orientation::from_exif(value), Some(orientation));
    }

    #[rstest]
    #[case(0)]
    #[case(9)]
    #[case(255)]
    fn test_from_exif_rejects_out_of_range(#[case] value: u16) {
        assert_eq!(Orientation::from_exif(value), None);
    }

    #[test]
    fn test_exif_values_are_unique() {
        let mut values: Vec<u16> = Orientation::ALL.iter().map(|o| o.exif()).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_quarter_turns_swap_extent() {
        assert_eq!(Orientation::Left.upright_extent(40, 30), (30, 40));
        assert_eq!(Orientation::RightMirrored.upright_extent(40, 30), (30, 40));
        assert_eq!(Orientation::Down.upright_extent(40, 30), (40, 30));
        assert_eq!(Orientation::UpMirrored.upright_extent(40, 30), (40, 30));
    }

    #[test]
    fn test_default_is_up() {
        assert!(Orientation::default().is_upright());
    }
}
