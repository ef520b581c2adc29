//! Cross-stage derived values threaded through a validation run.

use rustc_hash::FxHashMap;

/// A biological data modality processed in parallel by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modality {
    Rna,
    Adt,
    Crispr,
}

impl Modality {
    /// Uppercase name as it appears in v3 group names.
    pub fn name(&self) -> &'static str {
        match self {
            Modality::Rna => "RNA",
            Modality::Adt => "ADT",
            Modality::Crispr => "CRISPR",
        }
    }

    pub const ALL: [Modality; 3] = [Modality::Rna, Modality::Adt, Modality::Crispr];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusteringMethod {
    Kmeans,
    SnnGraph,
}

/// Facts accumulated while validating earlier stages, consumed read-only by
/// later ones. Each stage returns a delta; only the dispatcher merges it in.
#[derive(Debug, Clone, Default)]
pub struct DerivedContext {
    /// Cell count reported by the inputs stage (pre-filtering).
    pub num_cells: usize,
    /// Number of blocks/samples used for per-block QC thresholds.
    pub num_blocks: usize,
    /// Feature count per modality present in the original dataset.
    pub feature_counts: FxHashMap<Modality, usize>,
    /// Post-QC retained cell count per modality; `None` when the QC stage was
    /// skipped or the modality is unused.
    pub qc_remaining: FxHashMap<Modality, Option<usize>>,
    /// Cell count after the filtering stage.
    pub filtered_cells: usize,
    /// Observed principal components per modality.
    pub observed_pcs: FxHashMap<Modality, usize>,
    /// Total dimensions of the combined embedding.
    pub total_dims: usize,
    /// Clustering method selected by `choose_clustering`.
    pub clustering_method: Option<ClusteringMethod>,
    /// Cluster count observed for the chosen method.
    pub num_clusters: usize,
}

impl DerivedContext {
    pub fn new() -> Self {
        DerivedContext::default()
    }

    /// Whether the modality was present in the original dataset.
    pub fn is_in_use(&self, modality: Modality) -> bool {
        self.feature_counts.contains_key(&modality)
    }

    pub fn feature_count(&self, modality: Modality) -> Option<usize> {
        self.feature_counts.get(&modality).copied()
    }

    /// Post-QC remaining count, flattened: `None` when absent or skipped.
    pub fn remaining(&self, modality: Modality) -> Option<usize> {
        self.qc_remaining.get(&modality).copied().flatten()
    }

    pub fn pcs(&self, modality: Modality) -> Option<usize> {
        self.observed_pcs.get(&modality).copied()
    }

    /// Modalities that are in use, in fixed RNA/ADT/CRISPR order.
    pub fn modalities_in_use(&self) -> Vec<Modality> {
        Modality::ALL
            .iter()
            .copied()
            .filter(|m| self.is_in_use(*m))
            .collect()
    }
}
