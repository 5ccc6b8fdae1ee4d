use num::Complex;

/// Poor man's approx assertion for slices of scalars
#[macro_export]
macro_rules! assert_approx_slice_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let x: &[f64] = &$x;
        let y: &[f64] = &$y;
        assert_eq!(x.len(), y.len(), "Slices must have the same length.");

        let max_absdiff = x
            .iter()
            .zip(y.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max);
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {:?}", x);
            println!("right: {:?}", y);
            println!("max diff: {:e}", max_absdiff);
        }
        assert!(approx_eq);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}

pub fn prefix_sum(counts: impl IntoIterator<Item = usize>, x0: usize) -> impl Iterator<Item = usize> {
    counts.into_iter().scan(x0, |sum, x| {
        let current = *sum;
        *sum += x;
        Some(current)
    })
}

/// Values `f(node, dof)` for every node and dof, node by node.
pub fn node_major_values(num_nodes: usize, width: usize, f: impl Fn(usize, usize) -> f64) -> Vec<f64> {
    (0..num_nodes)
        .flat_map(|node| (0..width).map(move |dof| (node, dof)))
        .map(|(node, dof)| f(node, dof))
        .collect()
}

/// Interprets consecutive pairs as real and imaginary parts.
pub fn complex_pairs(values: &[f64]) -> Vec<Complex<f64>> {
    values
        .chunks_exact(2)
        .map(|pair| Complex::new(pair[0], pair[1]))
        .collect()
}
