//! Per-pixel iteration that runs on rayon when the `parallel` feature is on
//! and falls back to a plain serial loop otherwise. Every pass in this crate
//! is pixel-independent, so both paths produce the same buffer.

use crate::pixels::Pixel;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[cfg(feature = "parallel")]
pub fn for_each_pixel<F>(data: &mut [Pixel], f: F)
where
    F: Fn(&mut Pixel) + Sync + Send,
{
    data.par_iter_mut().for_each(f);
}

#[cfg(not(feature = "parallel"))]
pub fn for_each_pixel<F>(data: &mut [Pixel], f: F)
where
    F: Fn(&mut Pixel) + Sync + Send,
{
    data.iter_mut().for_each(f);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_every_pixel_once() {
        let mut data: Vec<Pixel> = vec![[1.0, 2.0, 3.0]; 1000];
        for_each_pixel(&mut data, |pixel| *pixel = pixel.map(|sub_pixel| sub_pixel + 1.0));
        assert!(data.iter().all(|pixel| *pixel == [2.0, 3.0, 4.0]));
    }
}
