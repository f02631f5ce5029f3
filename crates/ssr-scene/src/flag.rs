/// Change marker with get-and-clear semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyFlag(bool);

impl DirtyFlag {
    pub const fn dirty() -> DirtyFlag {
        DirtyFlag(true)
    }

    pub const fn clean() -> DirtyFlag {
        DirtyFlag(false)
    }

    pub fn set(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }

    /// Returns whether the flag was set and clears it.
    pub fn take(&mut self) -> bool {
        std::mem::replace(&mut self.0, false)
    }
}
