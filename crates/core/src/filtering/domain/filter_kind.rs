use std::str::FromStr;

/// The fixed, ordered set of camera filters.
///
/// Declaration order is the cycle order used by [`FilterKind::next`] and
/// [`FilterKind::previous`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Pass-through, no filter applied.
    #[default]
    None,
    /// Gaussian low-pass blur.
    Blur,
    /// Posterized colours with dark outlines.
    Comic,
    /// Voronoi tessellation.
    Crystallize,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [
        FilterKind::None,
        FilterKind::Blur,
        FilterKind::Comic,
        FilterKind::Crystallize,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            FilterKind::None => 0,
            FilterKind::Blur => 1,
            FilterKind::Comic => 2,
            FilterKind::Crystallize => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::COUNT - 1) % Self::COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            FilterKind::None => "none",
            FilterKind::Blur => "blur",
            FilterKind::Comic => "comic",
            FilterKind::Crystallize => "crystallize",
        }
    }
}

impl std::fmt::Display for FilterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(FilterKind::None),
            "blur" | "gaussian" => Ok(FilterKind::Blur),
            "comic" => Ok(FilterKind::Comic),
            "crystallize" | "crystal" => Ok(FilterKind::Crystallize),
            other => Err(format!(
                "Filter must be one of: none, blur, comic, crystallize, got '{other}'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_index_matches_declaration_order() {
        for (i, kind) in FilterKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
            assert_eq!(FilterKind::from_index(i), Some(*kind));
        }
        assert_eq!(FilterKind::from_index(FilterKind::COUNT), None);
    }

    #[rstest]
    #[case(FilterKind::None, FilterKind::Blur)]
    #[case(FilterKind::Blur, FilterKind::Comic)]
    #[case(FilterKind::Comic, FilterKind::Crystallize)]
    #[case(FilterKind::Crystallize, FilterKind::None)]
    fn test_next_wraps(#[case] from: FilterKind, #[case] expected: FilterKind) {
        assert_eq!(from.next(), expected);
        assert_eq!(expected.previous(), from);
    }

    #[test]
    fn test_next_and_previous_are_inverse() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.next().previous(), kind);
            assert_eq!(kind.previous().next(), kind);
        }
    }

    #[rstest]
    #[case("none", FilterKind::None)]
    #[case("Blur", FilterKind::Blur)]
    #[case("gaussian", FilterKind::Blur)]
    #[case(" COMIC ", FilterKind::Comic)]
    #[case("crystal", FilterKind::Crystallize)]
    fn test_parse(#[case] input: &str, #[case] expected: FilterKind) {
        assert_eq!(input.parse::<FilterKind>(), Ok(expected));
    }

    #[test]
    fn test_parse_unknown_is_error() {
        assert!("sepia".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for kind in FilterKind::ALL {
            assert_eq!(kind.to_string().parse::<FilterKind>(), Ok(kind));
        }
    }
}
