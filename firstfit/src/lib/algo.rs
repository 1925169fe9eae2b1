use crate::utils::*;

/// Serves `processes` in order, each one going to the first block
/// (in `blocks` order) that still has room for it. There is no search
/// for a tighter fit further down the row: the earliest sufficient
/// block wins.
///
/// Neither input is touched; the blocks are copied before carving.
/// Runs in O(`blocks.len()` * `processes.len()`).
pub fn first_fit(
    blocks:     &[ByteSteps],
    processes:  &[ByteSteps],
) -> Run {
    let mut working: Vec<Block> = blocks.iter()
        .copied()
        .map(Block::new)
        .collect();

    let allocation: Vec<Placement> = processes.iter()
        .map(|&size| {
            // Carving doubles as the fit test: blocks that
            // cannot hold `size` are left untouched.
            match working.iter_mut().position(|b| b.carve(size)) {
                Some(j) => Placement::Block(j),
                None    => Placement::Unallocated,
            }
        })
        .collect();

    Run {
        internal_frag:  internal_fragmentation(&working, &allocation),
        external_frag:  external_fragmentation(&working),
        blocks:         working,
        processes:      processes.to_vec(),
        allocation,
    }
}

/// For every allocated process, adds the free space that its block
/// has *after the whole run*. A block hosting k processes is thus
/// counted k times.
pub fn internal_fragmentation(blocks: &[Block], allocation: &[Placement]) -> Total {
    allocation.iter()
        .filter_map(Placement::block)
        .filter_map(|j| blocks.get(j))
        .map(|b| b.remaining() as Total)
        .sum()
}

/// Free space left anywhere, allocated to or not.
pub fn external_fragmentation(blocks: &[Block]) -> Total {
    blocks.iter()
        .map(|b| b.remaining() as Total)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Placement::*;

    #[test]
    fn textbook() {
        let blocks = [100, 500, 200, 300, 600];
        let processes = [212, 417, 112, 426];
        let run = first_fit(&blocks, &processes);
        assert_eq!(run.allocation, vec![Block(1), Block(4), Block(1), Unallocated]);
        assert_eq!(run.remaining_per_block(), vec![100, 176, 200, 300, 183]);
        assert_eq!(run.used_per_block(), vec![0, 324, 0, 0, 417]);
        assert_eq!(run.external_frag, 959);
        // Block 1 hosts two processes and is counted twice.
        assert_eq!(run.internal_frag, 176 + 183 + 176);
    }

    #[test]
    fn no_processes() {
        let run = first_fit(&[100], &[]);
        assert!(run.allocation.is_empty());
        assert_eq!(run.external_frag, 100);
        assert_eq!(run.internal_frag, 0);
        assert_eq!(run.used_per_block(), vec![0]);
    }

    #[test]
    fn nothing_fits() {
        let run = first_fit(&[50], &[100]);
        assert_eq!(run.allocation, vec![Unallocated]);
        assert_eq!(run.external_frag, 50);
        assert_eq!(run.internal_frag, 0);
    }

    #[test]
    fn exact_fit() {
        let run = first_fit(&[100], &[100]);
        assert_eq!(run.allocation, vec![Block(0)]);
        assert_eq!(run.remaining_per_block(), vec![0]);
        assert_eq!(run.external_frag, 0);
        assert_eq!(run.internal_frag, 0);
    }

    #[test]
    fn no_blocks() {
        let run = first_fit(&[], &[0, 5]);
        assert_eq!(run.allocation, vec![Unallocated, Unallocated]);
        assert_eq!(run.external_frag, 0);
    }

    #[test]
    fn earliest_block_beats_tighter_one() {
        // Best fit would pick block 1.
        let run = first_fit(&[500, 120], &[100]);
        assert_eq!(run.allocation, vec![Block(0)]);
    }

    #[test]
    fn equal_blocks_tie_on_lowest_index() {
        let run = first_fit(&[300, 300], &[200, 200, 200]);
        assert_eq!(run.allocation, vec![Block(0), Block(1), Unallocated]);
    }

    #[test]
    fn zero_sized_requests_land_in_first_block() {
        let run = first_fit(&[10, 20], &[10, 0]);
        assert_eq!(run.allocation, vec![Block(0), Block(0)]);
        assert_eq!(run.remaining_per_block(), vec![0, 20]);
    }

    #[test]
    fn only_the_chosen_block_shrinks() {
        let run = first_fit(&[10, 30, 40], &[25]);
        assert_eq!(run.allocation, vec![Block(1)]);
        assert_eq!(run.remaining_per_block(), vec![10, 5, 40]);
        assert_eq!(run.used_per_block(), vec![0, 25, 0]);
    }

    #[test]
    fn service_order_matters() {
        let a = first_fit(&[100, 50], &[50, 100]);
        let b = first_fit(&[100, 50], &[100, 50]);
        assert_eq!(a.allocation, vec![Block(0), Unallocated]);
        assert_eq!(b.allocation, vec![Block(0), Block(1)]);
    }

    #[test]
    fn inputs_survive() {
        let blocks = vec![10, 20];
        let processes = vec![5, 15];
        let _ = first_fit(&blocks, &processes);
        assert_eq!(blocks, vec![10, 20]);
        assert_eq!(processes, vec![5, 15]);
    }

    #[test]
    fn into_parts_matches_contract() {
        let (allocation, used, internal, external) = first_fit(&[100], &[30, 30]).into_parts();
        assert_eq!(allocation, vec![Block(0), Block(0)]);
        assert_eq!(used, vec![60]);
        assert_eq!(internal, 80);
        assert_eq!(external, 40);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let run = first_fit(&[usize::MAX, usize::MAX], &[]);
        assert_eq!(run.external_frag, 2 * usize::MAX as Total);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn sizes(max_len: usize) -> impl Strategy<Value = Vec<ByteSteps>> {
        prop::collection::vec(0usize..1000, 0..max_len)
    }

    proptest! {
        #[test]
        fn prop_one_outcome_per_process(blocks in sizes(12), processes in sizes(24)) {
            let run = first_fit(&blocks, &processes);
            prop_assert_eq!(run.allocation.len(), processes.len());
            prop_assert_eq!(run.blocks.len(), blocks.len());
        }

        #[test]
        fn prop_remaining_within_capacity(blocks in sizes(12), processes in sizes(24)) {
            let run = first_fit(&blocks, &processes);
            for (b, &cap) in run.blocks.iter().zip(&blocks) {
                prop_assert_eq!(b.capacity, cap);
                prop_assert!(b.remaining() <= cap);
            }
        }

        #[test]
        fn prop_used_space_is_conserved(blocks in sizes(12), processes in sizes(24)) {
            let run = first_fit(&blocks, &processes);
            let used: Total = run.used_per_block().iter().map(|&u| u as Total).sum();
            prop_assert_eq!(used, run.allocated_load());
            let total: Total = blocks.iter().map(|&c| c as Total).sum();
            prop_assert_eq!(total - used, run.external_frag);
        }

        #[test]
        fn prop_deterministic(blocks in sizes(12), processes in sizes(24)) {
            prop_assert_eq!(first_fit(&blocks, &processes), first_fit(&blocks, &processes));
        }

        #[test]
        fn prop_replay_confirms_choices(blocks in sizes(12), processes in sizes(24)) {
            let run = first_fit(&blocks, &processes);
            let mut replay: Vec<Block> = blocks.iter().copied().map(Block::new).collect();
            for (size, placement) in run.outcomes() {
                let first = replay.iter().position(|b| b.fits(size));
                prop_assert_eq!(placement.block(), first);
                if let Some(j) = first {
                    prop_assert!(replay[j].carve(size));
                }
            }
            prop_assert_eq!(replay, run.blocks);
        }
    }
}
