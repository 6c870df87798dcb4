use ndarray::{Array2, Axis};
use num_complex::Complex64;
use once_cell::sync::Lazy;
use rustfft::{num_traits::Zero, FftPlanner};
use std::sync::Mutex;

use crate::types::Alignment;

// Plans are cached by the planner, so repeated stems of the same length reuse them.
static PLANNER: Lazy<Mutex<FftPlanner<f64>>> = Lazy::new(|| Mutex::new(FftPlanner::new()));

/// Full linear convolution via zero-padded FFT.
/// Returns `signal.len() + kernel.len() - 1` samples, or nothing if either input is empty.
pub fn fft_convolve(signal: &[f32], kernel: &[f32]) -> Vec<f64> {
    if signal.is_empty() || kernel.is_empty() {
        return Vec::new();
    }

    let out_len = signal.len() + kernel.len() - 1;
    let n_fft = out_len.next_power_of_two();

    let (fft, ifft) = {
        let mut planner = match PLANNER.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        (planner.plan_fft_forward(n_fft), planner.plan_fft_inverse(n_fft))
    };

    let mut a = vec![Complex64::zero(); n_fft];
    let mut b = vec![Complex64::zero(); n_fft];
    for (dst, &x) in a.iter_mut().zip(signal) {
        dst.re = x as f64;
    }
    for (dst, &x) in b.iter_mut().zip(kernel) {
        dst.re = x as f64;
    }

    fft.process(&mut a);
    fft.process(&mut b);
    for (x, y) in a.iter_mut().zip(&b) {
        *x *= *y;
    }
    ifft.process(&mut a);

    let scale = 1.0 / n_fft as f64;
    a[..out_len].iter().map(|c| c.re * scale).collect()
}

/// Common length of a set of waveforms under `policy`. Zero for an empty set.
pub fn aligned_len<I>(lengths: I, policy: Alignment) -> usize
where
    I: IntoIterator<Item = usize>,
{
    let mut it = lengths.into_iter();
    let Some(first) = it.next() else {
        return 0;
    };
    match policy {
        Alignment::PadToLongest => it.fold(first, usize::max),
        Alignment::TruncateToShortest => it.fold(first, usize::min),
    }
}

/// Stack waveforms into a `[stems, samples]` matrix of the aligned length.
/// Missing samples are zero.
pub fn align<W: AsRef<[f32]>>(waves: &[W], policy: Alignment) -> Array2<f64> {
    let len = aligned_len(waves.iter().map(|w| w.as_ref().len()), policy);
    Array2::from_shape_fn((waves.len(), len), |(s, i)| {
        waves[s].as_ref().get(i).map_or(0.0, |&x| x as f64)
    })
}

/// Sum aligned waveforms sample by sample.
///
/// Contributions at each sample are summed in ascending order, so the result
/// does not depend on the order of `waves`, bit for bit.
pub fn mix_down<W: AsRef<[f32]>>(waves: &[W], policy: Alignment) -> Vec<f64> {
    let stacked = align(waves, policy);
    let mut column: Vec<f64> = Vec::with_capacity(waves.len());

    stacked
        .axis_iter(Axis(1))
        .map(|lane| {
            column.clear();
            column.extend(lane.iter().copied());
            column.sort_by(f64::total_cmp);
            column.iter().fold(0.0, |acc, &x| acc + x)
        })
        .collect()
}
