use super::types::{Destination, QueueId};

/// Square matrix of transition probabilities between queues.
///
/// Row `i` is the source, column `j` the destination. Whatever a row leaves
/// short of 1 is the probability of leaving the network.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingMatrix {
    rows: Vec<Vec<f64>>,
}

impl RoutingMatrix {
    /// Rows are assumed validated (see `SimulationConfig::validate`)
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        Self { rows }
    }

    /// All clients leave the network after service
    pub fn all_exit(queues: usize) -> Self {
        Self::new(vec![vec![0.0; queues]; queues])
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, source: QueueId) -> &[f64] {
        &self.rows[source.index()]
    }

    pub fn exit_probability(&self, source: QueueId) -> f64 {
        (1.0 - self.row(source).iter().sum::<f64>()).max(0.0)
    }

    /// Pick a destination using exactly one draw from `draw`.
    ///
    /// Columns are scanned in index order; the first one whose cumulative
    /// probability exceeds the draw wins.
    pub fn route<F>(&self, source: QueueId, draw: F) -> Destination
    where
        F: FnOnce() -> f64,
    {
        let p = draw();
        let mut cumulative = 0.0;

        for (index, probability) in self.row(source).iter().enumerate() {
            cumulative += probability;
            if p < cumulative {
                return Destination::Queue(QueueId::new(index));
            }
        }

        Destination::Exit
    }
}
