use crate::error::{ExpanderPatcherError, Result};
use log::debug;
use ndarray::Array2;
use std::collections::VecDeque;

/// Input value marking expander seed pixels
pub const EXPANDER: i32 = 1;
/// Input value marking patcher pixels
pub const PATCHER: i32 = 2;

/// Output values
pub const OUT_BACKGROUND: u8 = 0;
pub const OUT_EXPANDER: u8 = 1;
pub const OUT_PATCHER: u8 = 2;

/// Row/column offsets of the 8-neighborhood
static NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Build a grid from row vectors, rejecting empty and ragged input
pub fn grid_from_rows(rows: &[Vec<i32>]) -> Result<Array2<i32>> {
    let nrows = rows.len();
    let ncols = rows.first().map_or(0, Vec::len);
    if nrows == 0 || ncols == 0 {
        return Err(ExpanderPatcherError::InvalidInput(
            "grid has no cells".to_string(),
        ));
    }

    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(ExpanderPatcherError::InvalidInput(format!(
            "row {} has {} columns, expected {}",
            idx,
            row.len(),
            ncols
        )));
    }

    let flat: Vec<i32> = rows.iter().flatten().copied().collect();
    Ok(Array2::from_shape_vec((nrows, ncols), flat)?)
}

/// Classify patcher regions by adjacency to expander pixels.
///
/// Every 8-connected region of `PATCHER` cells that touches the one-cell
/// dilation of the `EXPANDER` mask becomes `OUT_EXPANDER`; the remaining
/// patcher regions stay `OUT_PATCHER`. Everything else, the original
/// expander pixels included, becomes `OUT_BACKGROUND`.
pub fn classify(grid: &Array2<i32>) -> Result<Array2<u8>> {
    let (nrows, ncols) = grid.dim();
    if nrows == 0 || ncols == 0 {
        return Err(ExpanderPatcherError::InvalidInput(format!(
            "grid has invalid shape {}x{}",
            nrows, ncols
        )));
    }

    let mask_one = grid.mapv(|v| v == EXPANDER);
    let dilated_one = dilate_8(&mask_one);
    let mask_two = grid.mapv(|v| v == PATCHER);

    let (labels, num_labels) = label_components(&mask_two);
    debug!("Labeled {} patcher regions", num_labels);

    // Index 0 is background and never marked
    let mut adjacent = vec![false; num_labels as usize + 1];
    for ((&two, &near_one), &label) in mask_two.iter().zip(dilated_one.iter()).zip(labels.iter()) {
        if two && near_one {
            adjacent[label as usize] = true;
        }
    }
    debug!(
        "{} of {} patcher regions touch expander pixels",
        adjacent.iter().filter(|&&a| a).count(),
        num_labels
    );

    let result = Array2::from_shape_fn((nrows, ncols), |idx| {
        let label = labels[idx];
        if label != 0 && adjacent[label as usize] {
            OUT_EXPANDER
        } else if mask_two[idx] {
            OUT_PATCHER
        } else {
            OUT_BACKGROUND
        }
    });

    Ok(result)
}

/// Binary dilation with a full 3x3 structuring element; cells outside the grid count as false
pub fn dilate_8(mask: &Array2<bool>) -> Array2<bool> {
    let (nrows, ncols) = mask.dim();
    Array2::from_shape_fn((nrows, ncols), |(row, col)| {
        if mask[[row, col]] {
            return true;
        }
        neighbors(row, col, nrows, ncols).any(|(r, c)| mask[[r, c]])
    })
}

/// Label 8-connected components of `true` cells.
///
/// Labels start at 1 and follow row-major order of each component's first
/// cell; background is 0. Returns the label grid and the number of labels.
pub fn label_components(mask: &Array2<bool>) -> (Array2<u32>, u32) {
    let (nrows, ncols) = mask.dim();
    let mut labels = Array2::<u32>::zeros((nrows, ncols));
    let mut next_label = 0u32;
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for row in 0..nrows {
        for col in 0..ncols {
            if !mask[[row, col]] || labels[[row, col]] != 0 {
                continue;
            }

            next_label += 1;
            labels[[row, col]] = next_label;
            queue.push_back((row, col));

            while let Some((r, c)) = queue.pop_front() {
                for (nr, nc) in neighbors(r, c, nrows, ncols) {
                    if mask[[nr, nc]] && labels[[nr, nc]] == 0 {
                        labels[[nr, nc]] = next_label;
                        queue.push_back((nr, nc));
                    }
                }
            }
        }
    }

    (labels, next_label)
}

/// In-bounds 8-neighbors of (row, col)
fn neighbors(
    row: usize,
    col: usize,
    nrows: usize,
    ncols: usize,
) -> impl Iterator<Item = (usize, usize)> {
    NEIGHBORS_8.iter().filter_map(move |&(dr, dc)| {
        let r = row.checked_add_signed(dr)?;
        let c = col.checked_add_signed(dc)?;
        (r < nrows && c < ncols).then_some((r, c))
    })
}

/// Pixel tally of a classified grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub background: usize,
    pub expander: usize,
    pub patcher: usize,
}

impl ClassCounts {
    pub fn from_grid(grid: &Array2<u8>) -> Self {
        let mut counts = Self::default();
        for &value in grid.iter() {
            match value {
                OUT_EXPANDER => counts.expander += 1,
                OUT_PATCHER => counts.patcher += 1,
                _ => counts.background += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.background + self.expander + self.patcher
    }
}
