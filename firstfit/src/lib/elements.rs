use serde::{Deserialize, Serialize};
use crate::utils::*;

/// Wire value standing for "this process got no block".
pub const UNALLOCATED: i64 = -1;

/// A fixed memory partition. Its [`capacity`](Block::capacity) never
/// changes; what is still free is tracked in `remaining`, which can
/// only shrink while a [`Run`] is in progress.
///
/// > ***ATTENTION:*** `0 <= remaining <= capacity` must hold at all
/// > times. [`Block::carve`] is the only way to decrease `remaining`
/// > and it refuses requests that do not fit. Loading a block from
/// > JSON goes through the same check (see [BadBlock]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBlock")]
pub struct Block {
    pub capacity:   ByteSteps,
    remaining:      ByteSteps,
}

/// A block as found on the wire, before its bounds are checked.
#[derive(Deserialize)]
struct RawBlock {
    capacity:   ByteSteps,
    remaining:  ByteSteps,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("block with {remaining} remaining out of a {capacity} capacity")]
pub struct BadBlock {
    pub capacity:   ByteSteps,
    pub remaining:  ByteSteps,
}

impl TryFrom<RawBlock> for Block {
    type Error = BadBlock;

    fn try_from(raw: RawBlock) -> Result<Self, Self::Error> {
        if raw.remaining > raw.capacity {
            Err(BadBlock { capacity: raw.capacity, remaining: raw.remaining })
        } else {
            Ok(Self { capacity: raw.capacity, remaining: raw.remaining })
        }
    }
}

impl Block {
    pub fn new(capacity: ByteSteps) -> Self {
        Self {
            capacity,
            remaining: capacity,
        }
    }

    pub fn remaining(&self) -> ByteSteps {
        self.remaining
    }

    /// Space consumed by everything packed into the block so far.
    pub fn used(&self) -> ByteSteps {
        self.capacity - self.remaining
    }

    /// The first-fit test. Note that a zero-sized request
    /// fits everywhere, even in an exhausted block.
    pub fn fits(&self, size: ByteSteps) -> bool {
        size <= self.remaining
    }

    /// Takes `size` units out of the free space. Returns `false`, leaving
    /// the block untouched, if the request does not fit.
    pub fn carve(&mut self, size: ByteSteps) -> bool {
        if self.fits(size) {
            self.remaining -= size;
            true
        } else { false }
    }
}

/// What happened to a single process. Serialized as the index of
/// the chosen block, or [`UNALLOCATED`] when nothing had room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Placement {
    /// 0-based index of the receiving block.
    Block(usize),
    Unallocated,
}

impl Placement {
    pub fn block(&self) -> Option<usize> {
        match self {
            Placement::Block(j)     => Some(*j),
            Placement::Unallocated  => None,
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.block().is_some()
    }
}

impl From<Placement> for i64 {
    fn from(p: Placement) -> i64 {
        match p {
            // Vec lengths are bounded by isize::MAX, so
            // any real block index survives the cast.
            Placement::Block(j)     => j as i64,
            Placement::Unallocated  => UNALLOCATED,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("{0} is neither a block index nor the unallocated sentinel (-1)")]
pub struct BadPlacement(pub i64);

impl TryFrom<i64> for Placement {
    type Error = BadPlacement;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        if v == UNALLOCATED {
            Ok(Placement::Unallocated)
        } else {
            usize::try_from(v)
                .map(Placement::Block)
                .map_err(|_| BadPlacement(v))
        }
    }
}

/// The complete record of one first-fit invocation: the blocks as they
/// stand after every process has been served, the process sizes in
/// service order, one [Placement] per process and the two
/// fragmentation totals.
///
/// A [Run] is produced by [`first_fit`](crate::algo::first_fit) and is
/// never fed back into it; every invocation starts from pristine blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub blocks:         Vec<Block>,
    pub processes:      Vec<ByteSteps>,
    pub allocation:     Vec<Placement>,
    pub internal_frag:  Total,
    pub external_frag:  Total,
}

impl Run {
    pub fn capacities(&self) -> Vec<ByteSteps> {
        self.blocks.iter()
            .map(|b| b.capacity)
            .collect()
    }

    pub fn used_per_block(&self) -> Vec<ByteSteps> {
        self.blocks.iter()
            .map(Block::used)
            .collect()
    }

    pub fn remaining_per_block(&self) -> Vec<ByteSteps> {
        self.blocks.iter()
            .map(Block::remaining)
            .collect()
    }

    /// Process sizes paired with their outcomes, in service order.
    pub fn outcomes(&self) -> impl Iterator<Item = (ByteSteps, Placement)> + '_ {
        self.processes.iter()
            .copied()
            .zip(self.allocation.iter().copied())
    }

    /// Sum of the sizes of every process that got a block.
    pub fn allocated_load(&self) -> Total {
        self.outcomes()
            .filter(|(_, p)| p.is_allocated())
            .map(|(s, _)| s as Total)
            .sum()
    }

    pub fn unallocated_count(&self) -> usize {
        self.allocation.iter()
            .filter(|p| !p.is_allocated())
            .count()
    }

    /// The allocator's contract in its bare form:
    /// (allocation, used per block, internal, external).
    pub fn into_parts(self) -> (Vec<Placement>, Vec<ByteSteps>, Total, Total) {
        let used = self.used_per_block();
        (self.allocation, used, self.internal_frag, self.external_frag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carve_refuses_oversized_requests() {
        let mut b = Block::new(10);
        assert!(!b.carve(11));
        assert_eq!(b.remaining(), 10);
        assert!(b.carve(4));
        assert_eq!(b.remaining(), 6);
        assert_eq!(b.used(), 4);
    }

    #[test]
    fn zero_size_fits_exhausted_block() {
        let mut b = Block::new(5);
        assert!(b.carve(5));
        assert!(b.fits(0));
    }

    #[test]
    fn loaded_blocks_respect_capacity() {
        let b: Block = serde_json::from_str(r#"{"capacity": 10, "remaining": 4}"#).unwrap();
        assert_eq!((b.capacity, b.remaining(), b.used()), (10, 4, 6));
        let err = serde_json::from_str::<Block>(r#"{"capacity": 10, "remaining": 11}"#).unwrap_err();
        assert!(err.to_string().contains("11 remaining out of a 10 capacity"));
    }

    #[test]
    fn placement_sentinel() {
        assert_eq!(i64::from(Placement::Unallocated), -1);
        assert_eq!(i64::from(Placement::Block(3)), 3);
        assert_eq!(Placement::try_from(-1), Ok(Placement::Unallocated));
        assert_eq!(Placement::try_from(0), Ok(Placement::Block(0)));
        assert_eq!(Placement::try_from(-7), Err(BadPlacement(-7)));
    }

    #[test]
    fn placement_json() {
        let v: Vec<Placement> = serde_json::from_str("[1, -1, 0]").unwrap();
        assert_eq!(v, vec![Placement::Block(1), Placement::Unallocated, Placement::Block(0)]);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1,-1,0]");
        assert!(serde_json::from_str::<Placement>("-2").is_err());
    }
}
