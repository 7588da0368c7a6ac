/// Entered/exited counters and the capacity gate derived from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occupancy {
    entered: u64,
    exited: u64,
    capacity_limit: u64,
}

impl Occupancy {
    pub fn new(capacity_limit: u64) -> Self {
        Self {
            entered: 0,
            exited: 0,
            capacity_limit,
        }
    }

    pub fn entered(&self) -> u64 {
        self.entered
    }

    pub fn exited(&self) -> u64 {
        self.exited
    }

    pub fn capacity_limit(&self) -> u64 {
        self.capacity_limit
    }

    /// `entered - exited`.
    pub fn inside(&self) -> u64 {
        self.entered.saturating_sub(self.exited)
    }

    pub fn is_over_capacity(&self) -> bool {
        self.inside() >= self.capacity_limit
    }

    pub fn record_entry(&mut self) {
        self.entered += 1;
    }

    /// Ignored when nobody is inside, so `exited` never passes `entered`.
    pub fn record_exit(&mut self) {
        if self.exited < self.entered {
            self.exited += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inside_and_capacity() {
        let mut occ = Occupancy::new(2);
        assert_eq!(occ.inside(), 0);
        assert!(!occ.is_over_capacity());

        occ.record_entry();
        occ.record_entry();
        assert_eq!(occ.inside(), 2);
        assert!(occ.is_over_capacity());

        occ.record_exit();
        assert_eq!(occ.inside(), 1);
        assert!(!occ.is_over_capacity());
        assert_eq!((occ.entered(), occ.exited()), (2, 1));
    }

    #[test]
    fn test_exit_without_entry_is_ignored() {
        let mut occ = Occupancy::new(2);
        occ.record_exit();
        assert_eq!((occ.entered(), occ.exited(), occ.inside()), (0, 0, 0));
    }

    #[test]
    fn test_zero_capacity_is_always_full() {
        assert!(Occupancy::new(0).is_over_capacity());
    }
}
