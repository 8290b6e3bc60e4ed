//! Reductions of fields to single values
//!
//! Every reduction computes a local partial result and hands it to the
//! [`Collective`] for combination. Componentwise reductions treat each
//! component of a vector or tensor independently.

use crate::fieldcalc::host::Collective;
use crate::fieldcalc::value::{Primitive, Vector};

/// Stand-in for an infinite bound, returned by extrema of empty fields.
pub const VGREAT: f64 = 1.0e300;

fn component_sum<T: Primitive>(data: &[T], c: usize) -> f64 {
    data.iter().map(|v| v.components()[c]).sum()
}

pub fn sum<T: Primitive>(data: &[T], collective: &dyn Collective) -> T {
    T::from_fn(|c| collective.sum(component_sum(data, c)))
}

/// Componentwise minimum; `VGREAT` for a globally empty field.
pub fn min<T: Primitive>(data: &[T], collective: &dyn Collective) -> T {
    if collective.count(data.len()) == 0 {
        return T::from_fn(|_| VGREAT);
    }
    T::from_fn(|c| {
        // an empty partition must not bound the others
        let local = data
            .iter()
            .map(|v| v.components()[c])
            .reduce(f64::min)
            .unwrap_or(f64::INFINITY);
        collective.min(local)
    })
}

/// Componentwise maximum; `-VGREAT` for a globally empty field.
pub fn max<T: Primitive>(data: &[T], collective: &dyn Collective) -> T {
    if collective.count(data.len()) == 0 {
        return T::from_fn(|_| -VGREAT);
    }
    T::from_fn(|c| {
        let local = data
            .iter()
            .map(|v| v.components()[c])
            .reduce(f64::max)
            .unwrap_or(f64::NEG_INFINITY);
        collective.max(local)
    })
}

/// Arithmetic mean; zero for a globally empty field.
pub fn average<T: Primitive>(data: &[T], collective: &dyn Collective) -> T {
    let count = collective.count(data.len());
    if count == 0 {
        return T::default();
    }
    let total = sum(data, collective);
    total.map_components(|x| x / count as f64)
}

/// Mean weighted by `weights`; zero when the weights sum to zero.
pub fn weighted_average<T: Primitive>(
    data: &[T],
    weights: &[f64],
    collective: &dyn Collective,
) -> T {
    let total_weight = collective.sum(weights.iter().take(data.len()).sum());
    if total_weight == 0.0 {
        return T::default();
    }
    T::from_fn(|c| {
        let local: f64 = data
            .iter()
            .zip(weights)
            .map(|(v, w)| v.components()[c] * w)
            .sum();
        collective.sum(local) / total_weight
    })
}

pub fn sum_mag<T: Primitive>(data: &[T], collective: &dyn Collective) -> f64 {
    collective.sum(data.iter().map(|v| v.mag()).sum())
}

pub fn size(len: usize, collective: &dyn Collective) -> f64 {
    collective.count(len) as f64
}

/// Position of the smallest (or largest) value. Ties keep the first index.
/// A globally empty field answers the origin.
pub fn extremum_position(
    values: &[f64],
    positions: &[Vector],
    largest: bool,
    collective: &dyn Collective,
) -> Vector {
    if collective.count(values.len().min(positions.len())) == 0 {
        return Vector::zero();
    }
    let mut candidates = values.iter().copied().zip(positions.iter().copied());
    let (mut best, mut at) = match candidates.next() {
        Some(first) => first,
        None if largest => (f64::NEG_INFINITY, Vector::zero()),
        None => (f64::INFINITY, Vector::zero()),
    };
    for (value, position) in candidates {
        let better = if largest { value > best } else { value < best };
        if better {
            best = value;
            at = position;
        }
    }
    let (_, position) = if largest {
        collective.max_location((best, at))
    } else {
        collective.min_location((best, at))
    };
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fieldcalc::host::Serial;

    #[test]
    fn test_scalar_reductions() {
        let data = [3.0, 1.0, 2.0];
        assert_eq!(sum(&data, &Serial), 6.0);
        assert_eq!(min(&data, &Serial), 1.0);
        assert_eq!(max(&data, &Serial), 3.0);
        assert_eq!(average(&data, &Serial), 2.0);
        assert_eq!(sum_mag(&[-1.0, 2.0], &Serial), 3.0);
        assert_eq!(size(3, &Serial), 3.0);
    }

    #[test]
    fn test_vector_reductions_are_componentwise() {
        let data = [Vector::new(1.0, 5.0, 0.0), Vector::new(2.0, -1.0, 0.0)];
        assert_eq!(min(&data, &Serial), Vector::new(1.0, -1.0, 0.0));
        assert_eq!(max(&data, &Serial), Vector::new(2.0, 5.0, 0.0));
        assert_eq!(sum(&data, &Serial), Vector::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_empty_reductions() {
        let empty: [f64; 0] = [];
        assert_eq!(min(&empty, &Serial), VGREAT);
        assert_eq!(max(&empty, &Serial), -VGREAT);
        assert_eq!(sum(&empty, &Serial), 0.0);
        assert_eq!(average(&empty, &Serial), 0.0);
    }

    #[test]
    fn test_weighted_average() {
        assert_eq!(weighted_average(&[1.0, 4.0], &[3.0, 1.0], &Serial), 1.75);
        assert_eq!(weighted_average(&[1.0], &[0.0], &Serial), 0.0);
    }

    #[test]
    fn test_extremum_position_ties_keep_first() {
        let positions = [
            Vector::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            Vector::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(
            extremum_position(&[3.0, 1.0, 2.0], &positions, false, &Serial),
            Vector::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            extremum_position(&[1.0, 5.0, 5.0], &positions, true, &Serial),
            Vector::new(1.0, 0.0, 0.0)
        );
    }

    #[test]
    fn test_extrema_beyond_the_empty_sentinel() {
        assert_eq!(min(&[2e300, 3e300], &Serial), 2e300);
        assert_eq!(max(&[-2e300, -3e300], &Serial), -2e300);
        assert_eq!(max(&[f64::NEG_INFINITY; 2], &Serial), f64::NEG_INFINITY);
        assert_eq!(min(&[f64::INFINITY; 2], &Serial), f64::INFINITY);

        let positions = [Vector::new(1.0, 0.0, 0.0), Vector::new(2.0, 0.0, 0.0)];
        assert_eq!(
            extremum_position(&[f64::INFINITY; 2], &positions, false, &Serial),
            Vector::new(1.0, 0.0, 0.0)
        );
        assert_eq!(
            extremum_position(&[f64::NEG_INFINITY; 2], &positions, true, &Serial),
            Vector::new(1.0, 0.0, 0.0)
        );
        assert_eq!(extremum_position(&[], &[], true, &Serial), Vector::zero());
    }

    struct TwoPartitions;

    impl Collective for TwoPartitions {
        fn sum(&self, local: f64) -> f64 {
            local * 2.0
        }

        fn count(&self, local: usize) -> usize {
            local * 2
        }
    }

    #[test]
    fn test_collective_combination() {
        let data = [1.0, 3.0];
        assert_eq!(sum(&data, &TwoPartitions), 8.0);
        assert_eq!(average(&data, &TwoPartitions), 2.0);
    }
}
