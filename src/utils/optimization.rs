//! Derivative-free minimisation for likelihood fitting.

use log::debug;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The optimal point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the optimal point.
    pub optimal_value: f64,
    /// Number of iterations performed (all restarts included).
    pub iterations: usize,
    /// Whether the final run met the tolerance.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations per run.
    pub max_iter: usize,
    /// Convergence tolerance on the spread of objective values.
    pub tolerance: f64,
    /// Convergence tolerance on the simplex radius. Both tolerances must hold.
    pub x_tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
    /// Extra runs started from the previous optimum (default: 0).
    pub restarts: usize,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            x_tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
            restarts: 0,
        }
    }
}

/// Minimise `objective` with the Nelder-Mead simplex method.
///
/// With `config.restarts > 0` the search is rebuilt around the best point
/// after each run, which guards against a simplex that collapsed early.
///
/// # Example
/// ```
/// use milk_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(objective: F, initial: &[f64], config: NelderMeadConfig) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let mut result = single_run(&objective, initial, &config);
    for restart in 0..config.restarts {
        let next = single_run(&objective, &result.optimal_point, &config);
        debug!(
            "nelder-mead restart {}: {:.10} -> {:.10}",
            restart + 1,
            result.optimal_value,
            next.optimal_value
        );
        let iterations = result.iterations + next.iterations;
        result = if next.optimal_value <= result.optimal_value {
            next
        } else {
            NelderMeadResult {
                converged: next.converged,
                ..result
            }
        };
        result.iterations = iterations;
    }
    result
}

/// Vertices kept sorted best-first.
struct Simplex {
    points: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    fn sort(&mut self) {
        let mut order: Vec<usize> = (0..self.points.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        self.points = order.iter().map(|&i| self.points[i].clone()).collect();
        self.values = order.iter().map(|&i| self.values[i]).collect();
    }

    fn worst(&self) -> usize {
        self.points.len() - 1
    }

    /// Centroid of every vertex except the worst.
    fn centroid(&self) -> Vec<f64> {
        let dim = self.points[0].len();
        let count = self.worst() as f64;
        let mut c = vec![0.0; dim];
        for p in &self.points[..self.worst()] {
            for (ci, pi) in c.iter_mut().zip(p) {
                *ci += pi;
            }
        }
        c.iter_mut().for_each(|ci| *ci /= count);
        c
    }

    fn replace_worst(&mut self, point: Vec<f64>, value: f64) {
        let w = self.worst();
        self.points[w] = point;
        self.values[w] = value;
    }
}

fn single_run<F>(objective: &F, initial: &[f64], config: &NelderMeadConfig) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_nan() {
            f64::INFINITY
        } else {
            v
        }
    };

    let mut points = Vec::with_capacity(n + 1);
    points.push(initial.to_vec());
    for i in 0..n {
        let mut vertex = initial.to_vec();
        vertex[i] += if initial[i].abs() > 1e-10 {
            config.initial_step * initial[i].abs()
        } else {
            config.initial_step
        };
        points.push(vertex);
    }
    let values = points.iter().map(|p| eval(p)).collect();
    let mut simplex = Simplex { points, values };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        simplex.sort();

        let best = simplex.values[0];
        let worst = simplex.values[n];
        let second_worst = simplex.values[n - 1];

        let centroid = simplex.centroid();
        let spread = simplex
            .points
            .iter()
            .map(|p| euclidean_distance(p, &centroid))
            .fold(0.0, f64::max);
        if (worst - best).abs() < config.tolerance && spread < config.x_tolerance {
            converged = true;
            break;
        }

        let reflected = affine(&centroid, &simplex.points[n], -config.alpha);
        let reflected_value = eval(&reflected);

        if reflected_value < best {
            let expanded = affine(&centroid, &reflected, config.gamma);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex.replace_worst(expanded, expanded_value);
            } else {
                simplex.replace_worst(reflected, reflected_value);
            }
            continue;
        }

        if reflected_value < second_worst {
            simplex.replace_worst(reflected, reflected_value);
            continue;
        }

        let (contracted, limit) = if reflected_value < worst {
            (affine(&centroid, &reflected, config.rho), reflected_value)
        } else {
            (affine(&centroid, &simplex.points[n], config.rho), worst)
        };
        let contracted_value = eval(&contracted);
        if contracted_value < limit {
            simplex.replace_worst(contracted, contracted_value);
            continue;
        }

        // Shrink towards the best vertex.
        let anchor = simplex.points[0].clone();
        for i in 1..=n {
            let shrunk = affine(&anchor, &simplex.points[i], config.sigma);
            simplex.values[i] = eval(&shrunk);
            simplex.points[i] = shrunk;
        }
    }

    simplex.sort();
    NelderMeadResult {
        optimal_point: simplex.points[0].clone(),
        optimal_value: simplex.values[0],
        iterations,
        converged,
    }
}

/// `origin + t * (point - origin)`.
fn affine(origin: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + t * (p - o))
        .collect()
}

/// Euclidean distance between two points.
fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
