/// Monotonic id sequence for a slice-owned collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IdSeq {
    next: u64,
}

impl IdSeq {
    pub(crate) fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub(crate) fn next(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hands_out_consecutive_ids() {
        let mut seq = IdSeq::starting_at(4);
        assert_eq!(seq.next(), 4);
        assert_eq!(seq.next(), 5);
        assert_eq!(seq.next(), 6);
    }
}
