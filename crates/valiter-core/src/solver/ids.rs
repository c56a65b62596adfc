/// Dense index assigned to a state once, before the first sweep.
/// Value buffers and transition rows are addressed through it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    /// Position of the state in the caller's state ordering.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for StateId {
    fn from(value: usize) -> Self {
        StateId(value)
    }
}

/// Dense index of an action in the caller's action ordering.
/// Lower indices win ties during policy extraction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(usize);

impl ActionId {
    /// Position of the action in the caller's action ordering.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for ActionId {
    fn from(value: usize) -> Self {
        ActionId(value)
    }
}
