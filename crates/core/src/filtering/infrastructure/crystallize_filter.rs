use crate::filtering::domain::image_filter::{ensure_filterable, restore_alpha, ImageFilter};
use crate::shared::constants::DEFAULT_CRYSTALLIZE_RADIUS;
use crate::shared::error::FilterError;
use crate::shared::frame::Frame;

/// Voronoi tessellation over a jittered grid of seed points.
///
/// The image is split into `radius x radius` cells, each holding one seed
/// placed by hashing the cell coordinates. Every pixel takes the colour found
/// under its nearest seed, searching the 3x3 neighbouring cells. Seed
/// placement depends only on cell coordinates, so output is reproducible.
pub struct CrystallizeFilter {
    radius: u32,
}

impl CrystallizeFilter {
    pub fn new(radius: u32) -> Self {
        Self {
            radius: radius.max(1),
        }
    }
}

impl Default for CrystallizeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_CRYSTALLIZE_RADIUS)
    }
}

impl ImageFilter for CrystallizeFilter {
    fn apply(&self, frame: &Frame) -> Result<Frame, FilterError> {
        ensure_filterable(frame)?;

        let width = frame.width() as usize;
        let height = frame.height() as usize;
        let channels = frame.channels() as usize;
        let cell = self.radius as usize;
        let grid = SeedGrid::new(width, height, cell);

        let src = frame.data();
        let mut data = vec![0u8; src.len()];

        for y in 0..height {
            for x in 0..width {
                let (sx, sy) = grid.nearest_seed(x, y);
                let dst = (y * width + x) * channels;
                let from = (sy * width + sx) * channels;
                data[dst..dst + channels].copy_from_slice(&src[from..from + channels]);
            }
        }
        restore_alpha(&mut data, frame);

        Ok(Frame::new(data, frame.width(), frame.height(), frame.channels(), frame.index())
            .with_orientation(frame.orientation()))
    }
}

struct SeedGrid {
    cell: usize,
    cols: usize,
    rows: usize,
    seeds: Vec<(usize, usize)>,
}

impl SeedGrid {
    fn new(width: usize, height: usize, cell: usize) -> Self {
        let cols = width.div_ceil(cell);
        let rows = height.div_ceil(cell);
        let mut seeds = Vec::with_capacity(cols * rows);
        for cy in 0..rows {
            for cx in 0..cols {
                let h = cell_hash(cx as u32, cy as u32);
                let jx = (h & 0xffff) as usize % cell;
                let jy = (h >> 16) as usize % cell;
                let sx = (cx * cell + jx).min(width - 1);
                let sy = (cy * cell + jy).min(height - 1);
                seeds.push((sx, sy));
            }
        }
        Self {
            cell,
            cols,
            rows,
            seeds,
        }
    }

    fn nearest_seed(&self, x: usize, y: usize) -> (usize, usize) {
        let cx = x / self.cell;
        let cy = y / self.cell;
        let mut best = self.seeds[cy * self.cols + cx];
        let mut best_dist = distance_sq(best, x, y);

        for ny in cy.saturating_sub(1)..=(cy + 1).min(self.rows - 1) {
            for nx in cx.saturating_sub(1)..=(cx + 1).min(self.cols - 1) {
                let seed = self.seeds[ny * self.cols + nx];
                let dist = distance_sq(seed, x, y);
                if dist < best_dist {
                    best = seed;
                    best_dist = dist;
                }
            }
        }
        best
    }
}

fn distance_sq((sx, sy): (usize, usize), x: usize, y: usize) -> usize {
    let dx = sx.abs_diff(x);
    let dy = sy.abs_diff(y);
    dx * dx + dy * dy
}

/// Integer avalanche hash of a cell coordinate.
fn cell_hash(cx: u32, cy: u32) -> u32 {
    let mut h = cx.wrapping_mul(0x8da6_b343) ^ cy.wrapping_mul(0xd816_3841);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128]);
            }
        }
        Frame::new(data, width, height, 3, 0)
    }

    #[test]
    fn test_alpha_kept_per_pixel() {
        let mut data = Vec::new();
        for i in 0..64u32 {
            data.extend_from_slice(&[(i * 3) as u8, 10, 20, i as u8]);
        }
        let frame = Frame::new(data, 8, 8, 4, 0);
        let out = CrystallizeFilter::new(4).apply(&frame).unwrap();

        let alphas: Vec<u8> = out.data().chunks_exact(4).map(|p| p[3]).collect();
        assert_eq!(alphas, (0..64u8).collect::<Vec<_>>());
    }

    #[test]
    fn test_uniform_frame_unchanged() {
        let frame = Frame::new(vec![42; 30 * 20 * 3], 30, 20, 3, 0);
        let out = CrystallizeFilter::new(6).apply(&frame).unwrap();
        assert_eq!(out.data(), frame.data());
    }

    #[test]
    fn test_output_uses_only_input_colours() {
        let frame = gradient_frame(40, 30);
        let out = CrystallizeFilter::new(8).apply(&frame).unwrap();

        let input: HashSet<&[u8]> = frame.data().chunks_exact(3).collect();
        assert!(out.data().chunks_exact(3).all(|px| input.contains(px)));
    }

    #[test]
    fn test_reduces_distinct_colours() {
        let frame = gradient_frame(40, 30);
        let out = CrystallizeFilter::new(8).apply(&frame).unwrap();

        let distinct: HashSet<&[u8]> = out.data().chunks_exact(3).collect();
        // one colour per seed at most: ceil(40/8) * ceil(30/8) = 20
        assert!(distinct.len() <= 20);
        assert!(distinct.len() > 1);
    }

    #[test]
    fn test_seed_lies_in_its_cell() {
        let grid = SeedGrid::new(50, 35, 10);
        assert_eq!(grid.seeds.len(), 5 * 4);
        for (i, &(sx, sy)) in grid.seeds.iter().enumerate() {
            let (cx, cy) = (i % grid.cols, i / grid.cols);
            assert_eq!(sx / 10, cx);
            assert_eq!(sy / 10, cy);
            assert!(sx < 50 && sy < 35);
        }
    }

    #[test]
    fn test_radius_one_is_identity() {
        let frame = gradient_frame(9, 7);
        let out = CrystallizeFilter::new(1).apply(&frame).unwrap();
        assert_eq!(out.data(), frame.data());
    }

    #[test]
    fn test_deterministic() {
        let frame = gradient_frame(33, 21);
        let filter = CrystallizeFilter::default();
        assert_eq!(filter.apply(&frame).unwrap(), filter.apply(&frame).unwrap());
    }

    #[test]
    fn test_frame_smaller_than_cell() {
        let frame = gradient_frame(3, 2);
        let out = CrystallizeFilter::new(20).apply(&frame).unwrap();
        let first = &out.data()[..3];
        assert!(out.data().chunks_exact(3).all(|px| px == first));
    }

    #[test]
    fn test_empty_frame_fails() {
        let frame = Frame::new(Vec::new(), 0, 10, 3, 0);
        assert!(CrystallizeFilter::default().apply(&frame).is_err());
    }

    #[test]
    fn test_zero_channel_frame_fails() {
        let frame = Frame::new(Vec::new(), 4, 4, 0, 0);
        assert!(matches!(
            CrystallizeFilter::new(2).apply(&frame),
            Err(FilterError::Failed(_))
        ));
    }
}
