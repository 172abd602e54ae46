/// Index of a queue inside the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(pub(crate) usize);

impl QueueId {
    /// Create a new queue ID
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for QueueId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl std::fmt::Display for QueueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Reports number queues from 1
        write!(f, "Q{}", self.0 + 1)
    }
}

/// Maximum number of clients a queue admits at once (servers + waiting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Finite(usize),
    Unbounded,
}

impl Capacity {
    /// Configuration files use `0` for an unbounded queue
    pub fn from_config(raw: usize) -> Self {
        if raw == 0 {
            Capacity::Unbounded
        } else {
            Capacity::Finite(raw)
        }
    }

    pub fn is_full(&self, population: usize) -> bool {
        match self {
            Capacity::Finite(limit) => population >= *limit,
            Capacity::Unbounded => false,
        }
    }

    pub fn limit(&self) -> Option<usize> {
        match self {
            Capacity::Finite(limit) => Some(*limit),
            Capacity::Unbounded => None,
        }
    }
}

impl std::fmt::Display for Capacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capacity::Finite(limit) => write!(f, "{}", limit),
            Capacity::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Where a client goes after finishing service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Queue(QueueId),
    Exit,
}

/// Outcome of an admission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Queue was full, client lost
    Blocked,
    /// Admitted, all servers busy
    Waiting,
    /// Admitted straight into a free server; caller schedules the departure
    StartService,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Blocked)
    }
}
