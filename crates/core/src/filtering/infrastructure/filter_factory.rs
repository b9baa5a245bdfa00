use crate::filtering::domain::filter_kind::FilterKind;
use crate::filtering::domain::image_filter::ImageFilter;
use crate::settings::FilterSettings;

use super::comic_filter::ComicFilter;
use super::crystallize_filter::CrystallizeFilter;
use super::gaussian_blur_filter::GaussianBlurFilter;

/// Builds the filter implementation for `kind`, or `None` for the
/// pass-through selection.
pub fn create_filter(kind: FilterKind, settings: &FilterSettings) -> Option<Box<dyn ImageFilter>> {
    match kind {
        FilterKind::None => None,
        FilterKind::Blur => {
            log::debug!("Building blur filter (radius={})", settings.blur_radius);
            Some(Box::new(GaussianBlurFilter::new(settings.blur_radius)))
        }
        FilterKind::Comic => {
            log::debug!(
                "Building comic filter (levels={}, edge_threshold={})",
                settings.comic_levels,
                settings.comic_edge_threshold
            );
            Some(Box::new(ComicFilter::new(
                settings.comic_levels,
                settings.comic_edge_threshold,
            )))
        }
        FilterKind::Crystallize => {
            log::debug!(
                "Building crystallize filter (radius={})",
                settings.crystallize_radius
            );
            Some(Box::new(CrystallizeFilter::new(settings.crystallize_radius)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::frame::Frame;

    #[test]
    fn test_none_has_no_filter() {
        assert!(create_filter(FilterKind::None, &FilterSettings::default()).is_none());
    }

    #[test]
    fn test_every_other_kind_builds_and_runs() {
        let frame = Frame::new(vec![128; 16 * 16 * 3], 16, 16, 3, 0);
        for kind in FilterKind::ALL.into_iter().skip(1) {
            let filter = create_filter(kind, &FilterSettings::default())
                .unwrap_or_else(|| panic!("no filter for {kind}"));
            let out = filter.apply(&frame).unwrap();
            assert_eq!((out.width(), out.height()), (16, 16));
        }
    }

    #[test]
    fn test_blur_uses_configured_radius() {
        let settings = FilterSettings {
            blur_radius: 1.0,
            ..FilterSettings::default()
        };
        let filter = create_filter(FilterKind::Blur, &settings).unwrap();

        // A 1px sigma keeps a single bright pixel visible well above zero.
        let mut frame = Frame::new(vec![0; 15 * 15 * 3], 15, 15, 3, 0);
        frame.data_mut()[(7 * 15 + 7) * 3] = 255;
        let out = filter.apply(&frame).unwrap();
        assert!(out.data()[(7 * 15 + 7) * 3] > 20);
        assert_eq!(out.data()[0], 0);
    }
}
