use rayon::{
    iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from dest pixels to the nearest source pixel
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_row: Vec<usize>, // source row offset (y * src_w) per dest row
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self {
            src_x: Vec::new(),
            src_row: Vec::new(),
        }
    }

    pub fn dst_size(&self) -> (usize, usize) {
        (self.src_x.len(), self.src_row.len())
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    // sample at pixel centers so integer ratios repeat each source pixel evenly
    let nearest = |d: usize, dst: usize, src: usize| -> usize {
        let f = (d as f64 + 0.5) * src as f64 / dst as f64;
        (f as usize).min(src - 1)
    };

    ScaleLut {
        src_x: (0..dst_w).map(|x| nearest(x, dst_w, src_w)).collect(),
        src_row: (0..dst_h).map(|y| nearest(y, dst_h, src_h) * src_w).collect(),
    }
}

/// Parallel nearest-neighbour stretch, rows processed in parallel.
/// `dst` must hold at least the LUT's dest size; extra rows are left untouched.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], lut: &ScaleLut) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .zip(lut.src_row.par_iter())
        .for_each(|(dst_row, &row)| {
            for (d, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *d = src[row + sx];
            }
        });
}
