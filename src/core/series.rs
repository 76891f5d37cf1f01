use std::{
    collections::VecDeque,
    ops::{Add, Mul},
};

impl<T> Cumulative for T where T: ?Sized {}

pub trait Cumulative {
    /// Undiscounted running total: the `i`-th item is the sum of the items `0..=i`.
    fn running_sum<V>(self) -> impl Iterator<Item = V>
    where
        Self: Iterator<Item = V> + Sized,
        V: Copy + Add<Output = V>,
    {
        self.scan(None, |sum: &mut Option<V>, value| {
            let next = sum.map_or(value, |sum| sum + value);
            *sum = Some(next);
            Some(next)
        })
    }

    /// Bounded decayed sum: the `i`-th item is `value[i] + Σ value[i - lag] × decay^lag`
    /// for `lag` in `1..=window`, capped at the available history.
    fn decayed_window_sum<V>(self, window: usize, decay: f64) -> impl Iterator<Item = V>
    where
        Self: Iterator<Item = V> + Sized,
        V: Copy + Add<Output = V> + Mul<f64, Output = V>,
    {
        self.scan(VecDeque::with_capacity(window + 1), move |history: &mut VecDeque<V>, value| {
            let sum = history
                .iter()
                .rev()
                .zip(1..)
                .fold(value, |sum, (previous, lag)| sum + *previous * decay.powi(lag));
            history.push_back(value);
            if history.len() > window {
                history.pop_front();
            }
            Some(sum)
        })
    }
}
