use crate::generic_matrix::GenericMatrix;
use crate::traits::MatrixStorage;
use semiring::{Float, Result, Semiring, SemiringError, TOLERANCE};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The iteration bound is this many iterations per vertex
const DEFAULT_ITERATIONS_PER_VERTEX: usize = 100;

/// Options for Howard's policy iteration
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowardOptions {
    /// The maximum number of policy iterations. `None` means
    /// `100 * n`, where `n` is the number of vertices.
    ///
    /// Policy iteration always terminates, so reaching this bound
    /// is reported as an `IterationLimit` error.
    pub max_iterations: Option<usize>,

    /// The difference below which two values (cycle times or biases) are
    /// considered equal
    pub tolerance: Float,
}

impl Default for HowardOptions {
    fn default() -> Self {
        Self {
            max_iterations: None,
            tolerance: TOLERANCE,
        }
    }
}

impl HowardOptions {
    /// The number of iterations allowed for a matrix of `n` vertices
    pub fn iteration_bound(&self, n: usize) -> usize {
        self.max_iterations
            .unwrap_or(DEFAULT_ITERATIONS_PER_VERTEX * n.max(1))
    }
}

/// The fixed point found by [`howard`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowardResult<T: Semiring> {
    /// The cycle time (i.e., the mean weight of the cycle reached by the optimal
    /// policy) of each vertex. All of them are the same when the matrix is
    /// irreducible.
    pub cycle_times: Vec<T>,

    /// A column vector $`v`$ (the bias of the final policy). When all the
    /// cycle times are equal to $`\lambda`$, it holds that
    /// $`A \otimes v = \lambda \otimes v`$.
    pub eigenvector: GenericMatrix<T>,

    /// The successor chosen for each vertex
    pub policy: Vec<usize>,

    /// The number of cycles in the graph of the final policy
    pub n_cycles: usize,

    /// The number of policy iterations performed
    pub iterations: usize,
}

impl<T: Semiring> HowardResult<T> {
    /// Returns the single eigenvalue of the matrix, or `AmbiguousSpectrum`
    /// if the vertices do not all share the same cycle time.
    pub fn eigenvalue(&self, tol: Float) -> Result<T> {
        let mut iter = self.cycle_times.iter();
        let first = match iter.next() {
            Some(v) => *v,
            None => return Ok(T::zero()),
        };
        let (min, max) = iter.fold((first.value(), first.value()), |(min, max), v| {
            (min.min(v.value()), max.max(v.value()))
        });
        if max - min > tol {
            return Err(SemiringError::AmbiguousSpectrum { min, max });
        }
        Ok(first)
    }
}

/// The graph induced by the finite elements of a matrix: the
/// successors of each vertex, with their weights.
struct Successors {
    edges: Vec<Vec<(usize, Float)>>,
}

impl Successors {
    fn new<T: Semiring, M: MatrixStorage<T>>(a: &M) -> Result<Self> {
        let (nrows, ncols) = a.size();
        if nrows != ncols {
            return Err(SemiringError::DimensionMismatch {
                operation: "howard",
                left: (nrows, ncols),
                right: (ncols, nrows),
            });
        }
        let mut edges = vec![Vec::new(); nrows];
        a.for_each_non_zero(|r, c, v| edges[r].push((c, v.value())));
        if let Some(row) = edges.iter().position(|e| e.is_empty()) {
            return Err(SemiringError::UndefinedSpectrum { row });
        }
        Ok(Self { edges })
    }
}

/// Working memory of the policy iteration
struct Policy {
    /// Successor of each vertex
    next: Vec<usize>,
    /// Weight of the edge to the successor
    weight: Vec<Float>,
    chi: Vec<Float>,
    bias: Vec<Float>,
}

impl Policy {
    /// Picks the heaviest (max-plus) or lightest (min-plus) edge of each vertex
    fn initial<T: Semiring>(graph: &Successors) -> Self {
        let n = graph.edges.len();
        let mut next = Vec::with_capacity(n);
        let mut weight = Vec::with_capacity(n);
        for edges in graph.edges.iter() {
            let mut best = edges[0];
            for &(c, w) in edges.iter().skip(1) {
                if T::ORIENTATION * (w - best.1) > 0.0 {
                    best = (c, w);
                }
            }
            next.push(best.0);
            weight.push(best.1);
        }
        Self {
            next,
            weight,
            chi: vec![0.0; n],
            bias: vec![0.0; n],
        }
    }

    fn switch(&mut self, vertex: usize, to: usize, weight: Float) {
        self.next[vertex] = to;
        self.weight[vertex] = weight;
    }

    /// Computes the cycle time and the bias of every vertex for the current policy.
    ///
    /// The graph of a policy is made of cycles with trees hanging from them. Each
    /// vertex gets the mean weight of the cycle it falls into, and a bias
    /// such that `bias[i] + chi[i] = weight[i] + bias[next[i]]`. One vertex
    /// per cycle (the smallest) keeps the bias it had in the previous iteration.
    ///
    /// Returns the number of cycles.
    fn evaluate(&mut self) -> usize {
        const UNVISITED: u8 = 0;
        const ON_PATH: u8 = 1;
        const DONE: u8 = 2;

        let n = self.next.len();
        let mut state = vec![UNVISITED; n];
        let mut position = vec![0; n];
        let mut path: Vec<usize> = Vec::with_capacity(n);
        let mut n_cycles = 0;

        for start in 0..n {
            if state[start] != UNVISITED {
                continue;
            }
            path.clear();
            let mut u = start;
            while state[u] == UNVISITED {
                state[u] = ON_PATH;
                position[u] = path.len();
                path.push(u);
                u = self.next[u];
            }

            if state[u] == ON_PATH {
                // Found a new cycle... it is the tail of the path
                n_cycles += 1;
                let cycle_start = position[u];
                let cycle = &path[cycle_start..];
                let len = cycle.len();
                let total: Float = cycle.iter().map(|v| self.weight[*v]).sum();
                let mean = total / len as Float;

                let mut root_pos = 0;
                for (i, v) in cycle.iter().enumerate() {
                    if *v < cycle[root_pos] {
                        root_pos = i;
                    }
                }
                let root = cycle[root_pos];
                self.chi[root] = mean;
                state[root] = DONE;

                // Walk the cycle backwards from the root
                for k in (1..len).rev() {
                    let v = cycle[(root_pos + k) % len];
                    let next = self.next[v];
                    self.chi[v] = mean;
                    self.bias[v] = self.weight[v] + self.bias[next] - mean;
                    state[v] = DONE;
                }
                path.truncate(cycle_start);
            }

            // Whatever is left on the path leads to vertices that are done
            for &v in path.iter().rev() {
                let next = self.next[v];
                self.chi[v] = self.chi[next];
                self.bias[v] = self.weight[v] + self.bias[next] - self.chi[v];
                state[v] = DONE;
            }
        }
        n_cycles
    }

    /// Switches every vertex that can reach a better cycle time. Returns the
    /// number of vertices that changed.
    fn improve_cycle_times<T: Semiring>(&mut self, graph: &Successors, tol: Float) -> usize {
        let better = |a: Float, b: Float| T::ORIENTATION * (a - b) > tol;
        let mut changed = 0;
        for i in 0..graph.edges.len() {
            let edges = &graph.edges[i];
            let mut best_chi = self.chi[edges[0].0];
            for &(j, _) in edges.iter().skip(1) {
                if better(self.chi[j], best_chi) {
                    best_chi = self.chi[j];
                }
            }
            if !better(best_chi, self.chi[i]) {
                continue;
            }
            // Among the successors with the best cycle time, take the one
            // with the best bias
            let mut choice: Option<(usize, Float, Float)> = None;
            for &(j, w) in edges.iter() {
                if better(best_chi, self.chi[j]) {
                    continue;
                }
                let value = w + self.bias[j];
                match choice {
                    Some((_, _, best)) if !better(value, best) => {}
                    _ => choice = Some((j, w, value)),
                }
            }
            if let Some((j, w, _)) = choice {
                self.switch(i, j, w);
                changed += 1;
            }
        }
        changed
    }

    /// Switches every vertex that can improve its bias without changing its
    /// cycle time. Returns the number of vertices that changed.
    fn improve_biases<T: Semiring>(&mut self, graph: &Successors, tol: Float) -> usize {
        let better = |a: Float, b: Float| T::ORIENTATION * (a - b) > tol;
        let mut changed = 0;
        for i in 0..graph.edges.len() {
            let mut choice: Option<(usize, Float, Float)> = None;
            for &(j, w) in graph.edges[i].iter() {
                if (self.chi[j] - self.chi[i]).abs() > tol {
                    continue;
                }
                let value = w + self.bias[j] - self.chi[i];
                match choice {
                    Some((_, _, best)) if !better(value, best) => {}
                    _ => choice = Some((j, w, value)),
                }
            }
            if let Some((j, w, value)) = choice {
                if j != self.next[i] && better(value, self.bias[i]) {
                    self.switch(i, j, w);
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// Computes the cycle times and an eigenvector of a square matrix using
/// Howard's policy iteration algorithm.
///
/// The matrix is seen as a graph with an edge $`i \to j`$ of weight
/// $`a_{ij}`$ for every element that is not $`\varepsilon`$. A policy
/// picks one successor per vertex; the algorithm alternates between
/// evaluating the policy (the mean weight of the cycle every vertex ends
/// up in) and improving it, until no vertex can do better.
///
/// For reducible matrices the cycle time may differ between vertices; the
/// result then contains one value per vertex (see [`HowardResult::eigenvalue`]).
///
/// Returns `UndefinedSpectrum` if a row has no finite element, and
/// `IterationLimit` if no fixed point is found within
/// [`HowardOptions::iteration_bound`].
pub fn howard<T: Semiring, M: MatrixStorage<T>>(
    a: &M,
    options: &HowardOptions,
) -> Result<HowardResult<T>> {
    let graph = Successors::new(a)?;
    let n = graph.edges.len();
    let bound = options.iteration_bound(n);
    let tol = options.tolerance;

    let mut policy = Policy::initial::<T>(&graph);
    let mut iterations = 0;
    let n_cycles = loop {
        if iterations >= bound {
            return Err(SemiringError::IterationLimit { iterations });
        }
        iterations += 1;

        let n_cycles = policy.evaluate();
        let mut changed = policy.improve_cycle_times::<T>(&graph, tol);
        if changed == 0 {
            changed = policy.improve_biases::<T>(&graph, tol);
        }
        trace!(
            "howard iteration {}: {} cycles, {} vertices changed",
            iterations,
            n_cycles,
            changed
        );
        if changed == 0 {
            break n_cycles;
        }
    };
    debug!(
        "howard converged after {} iterations on {} vertices ({} cycles)",
        iterations, n, n_cycles
    );

    let cycle_times = policy
        .chi
        .iter()
        .map(|v| T::lift(*v))
        .collect::<Result<Vec<T>>>()?;
    let eigenvector = GenericMatrix::from_classical(n, 1, &policy.bias)?;
    Ok(HowardResult {
        cycle_times,
        eigenvector,
        policy: policy.next,
        n_cycles,
        iterations,
    })
}

/// Returns the eigenvalue $`\lambda`$ and an eigenvector $`v`$ (a column)
/// such that $`A \otimes v = \lambda \otimes v`$.
///
/// Returns `AmbiguousSpectrum` if the matrix is reducible and its classes
/// have different cycle times; call [`howard`] to get the cycle time of
/// every vertex instead.
pub fn eigen<T: Semiring, M: MatrixStorage<T>>(a: &M) -> Result<(T, GenericMatrix<T>)> {
    let options = HowardOptions::default();
    let result = howard(a, &options)?;
    let lambda = result.eigenvalue(options.tolerance)?;
    Ok((lambda, result.eigenvector))
}

/// Returns the eigenvalue of the matrix. See [`eigen`].
pub fn eigenvalue<T: Semiring, M: MatrixStorage<T>>(a: &M) -> Result<T> {
    eigen(a).map(|(lambda, _)| lambda)
}

impl<T: Semiring> GenericMatrix<T> {
    /// Runs Howard's algorithm over this matrix. See [`howard`].
    pub fn howard(&self, options: &HowardOptions) -> Result<HowardResult<T>> {
        howard(self, options)
    }

    /// Returns the eigenvalue and an eigenvector of this matrix. See [`eigen`].
    pub fn eigen(&self) -> Result<(T, GenericMatrix<T>)> {
        eigen(self)
    }
}
