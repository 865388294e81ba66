/// Which kernel family evaluates the factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EvalPath {
    /// Generic broadcast-and-sum formulation; allocates a fresh buffer per factor.
    Reference,
    /// Concrete `f32` / `Complex32` kernels.
    #[default]
    Specialized,
    /// The generic block kernel monomorphized for the batch element type.
    Generic,
}

/// How the working buffers are managed between factors.
///
/// Ignored by `EvalPath::Reference`, which always allocates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Buffering {
    /// Two buffers whose roles swap after each factor.
    #[default]
    PingPong,
    /// A single buffer updated block by block.
    InPlace,
}

/// Options for a butterfly product evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct EvalConfig {
    pub path: EvalPath,
    pub buffering: Buffering,
    /// Minimum number of `2m` blocks before a factor is split across rayon
    /// workers. Only read when the `parallel` feature is enabled.
    pub parallel_min_blocks: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            path: EvalPath::default(),
            buffering: Buffering::default(),
            parallel_min_blocks: 4096,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: EvalPath) -> Self {
        self.path = path;
        self
    }

    pub fn with_buffering(mut self, buffering: Buffering) -> Self {
        self.buffering = buffering;
        self
    }

    pub fn with_parallel_min_blocks(mut self, parallel_min_blocks: usize) -> Self {
        self.parallel_min_blocks = parallel_min_blocks;
        self
    }

    /// True when a factor with `num_blocks` blocks should be split across workers.
    pub(crate) fn parallelize(&self, num_blocks: usize) -> bool {
        cfg!(feature = "parallel") && num_blocks >= self.parallel_min_blocks.max(1)
    }
}
