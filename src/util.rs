/// Checks that a numerical value is in the provided interval `[a,b]` and returns
/// early with an [`InvalidArgument`](crate::error::Error::InvalidArgument) error if not
///
/// ### Example
/// ```ignore
/// let value = 2.0;
/// ensure_interval!(value, 0.0, 1.0);
/// ```
/// This will return the error "Invalid value for \`value\`: 2. Must be in the interval \[0, 1\]."
macro_rules! ensure_interval {
    ($var:expr, $a:expr, $b:expr) => {
        if !($var >= $a && $var <= $b) {
            return Err($crate::error::Error::InvalidArgument(format!(
                "Invalid value for `{}`: {}. Must be in the interval [{}, {}].",
                stringify!($var),
                $var,
                $a,
                $b,
            )));
        }
    };
}

pub(crate) use ensure_interval;

/// Index of the first maximal element, or `None` if `values` is empty
///
/// Ties resolve to the lowest index.
pub(crate) fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
