/// Evenly spaced samples over a closed interval: `n` points including both
/// endpoints. `n == 1` yields `[start]`, `n == 0` yields an empty vector.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// Index of the value closest to `query` by absolute difference. Ties keep
/// the first occurrence.
pub fn argmin_abs(values: &[f64], query: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &value) in values.iter().enumerate() {
        let diff = (value - query).abs();
        match best {
            Some((_, smallest)) if diff >= smallest => {}
            _ => best = Some((index, diff)),
        }
    }
    best.map(|(index, _)| index)
}
