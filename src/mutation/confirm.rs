/// A two-step confirmation for a destructive action. The first step records the target, the second
/// step (see `Mutation::submit_confirmed`) acts on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmGate<T> {
    target: Option<T>,
}

impl<T> Default for ConfirmGate<T> {
    fn default() -> Self {
        Self { target: None }
    }
}

impl<T> ConfirmGate<T> {
    /// Asks for confirmation for `target`, replacing any earlier request.
    pub fn open(&mut self, target: T) {
        self.target = Some(target);
    }

    pub fn close(&mut self) {
        self.target = None;
    }

    pub fn is_open(&self) -> bool {
        self.target.is_some()
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_replaces_target() {
        let mut gate = ConfirmGate::default();
        assert!(!gate.is_open());
        gate.open(1);
        gate.open(2);
        assert_eq!(gate.target(), Some(&2));
        gate.close();
        assert_eq!(gate.target(), None);
    }
}
