//! Position bookkeeping for sibling sets.
//!
//! Sibling positions are 1-based and contiguous. Every structural change is
//! expressed as at most one [`Shift`] of a closed position range, which the
//! persistence layer turns into a single `UPDATE ... BETWEEN` statement.

/// Add `delta` to every sibling position in `from..=to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub from: i64,
    pub to: i64,
    pub delta: i64,
}

/// Where a newly inserted row lands among `sibling_count` existing siblings.
pub fn insert_position(requested: Option<i64>, sibling_count: i64) -> i64 {
    let append = sibling_count + 1;
    match requested {
        Some(pos) if pos < 1 => 1,
        Some(pos) if pos <= append => pos,
        _ => append,
    }
}

/// Makes room at `position` for a new sibling.
pub fn insert_shift(position: i64, sibling_count: i64) -> Option<Shift> {
    (position <= sibling_count).then_some(Shift {
        from: position,
        to: sibling_count,
        delta: 1,
    })
}

/// Closes the gap left by removing the sibling at `position`.
/// `sibling_count` includes the removed row.
pub fn removal_shift(position: i64, sibling_count: i64) -> Option<Shift> {
    (position < sibling_count).then_some(Shift {
        from: position + 1,
        to: sibling_count,
        delta: -1,
    })
}

/// Moves a sibling from `from` to the requested position, returning the
/// clamped target and the shift to apply to the other siblings.
pub fn move_shift(from: i64, requested: i64, sibling_count: i64) -> (i64, Option<Shift>) {
    let to = requested.clamp(1, sibling_count.max(1));
    let shift = match from.cmp(&to) {
        std::cmp::Ordering::Equal => None,
        std::cmp::Ordering::Less => Some(Shift {
            from: from + 1,
            to,
            delta: -1,
        }),
        std::cmp::Ordering::Greater => Some(Shift {
            from: to,
            to: from - 1,
            delta: 1,
        }),
    };
    (to, shift)
}

/// Applies a shift to an in-memory position list.
pub fn apply(positions: &mut [i64], shift: Shift) {
    for pos in positions.iter_mut() {
        if (shift.from..=shift.to).contains(pos) {
            *pos += shift.delta;
        }
    }
}

/// True when `positions` is a permutation of `1..=len`.
pub fn is_contiguous(positions: &[i64]) -> bool {
    let mut sorted = positions.to_vec();
    sorted.sort_unstable();
    sorted.iter().enumerate().all(|(i, p)| *p == i as i64 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_position_clamps_into_range() {
        assert_eq!(insert_position(None, 3), 4);
        assert_eq!(insert_position(Some(0), 3), 1);
        assert_eq!(insert_position(Some(-5), 3), 1);
        assert_eq!(insert_position(Some(2), 3), 2);
        assert_eq!(insert_position(Some(4), 3), 4);
        assert_eq!(insert_position(Some(99), 3), 4);
        assert_eq!(insert_position(None, 0), 1);
    }

    #[test]
    fn inserting_in_the_middle_shifts_followers() {
        let mut positions = vec![1, 2, 3];
        let pos = insert_position(Some(2), 3);
        let shift = insert_shift(pos, 3).unwrap();
        apply(&mut positions, shift);
        positions.push(pos);
        assert_eq!(positions, vec![1, 3, 4, 2]);
        assert!(is_contiguous(&positions));
    }

    #[test]
    fn appending_needs_no_shift() {
        assert_eq!(insert_shift(4, 3), None);
    }

    #[test]
    fn removal_closes_the_gap() {
        let mut positions = vec![1, 3, 4];
        apply(&mut positions, removal_shift(2, 4).unwrap());
        assert_eq!(positions, vec![1, 2, 3]);
        assert_eq!(removal_shift(4, 4), None);
    }

    #[test]
    fn moving_down_and_up_keeps_positions_contiguous() {
        // siblings a=1 b=2 c=3 d=4, move a to 3
        let (to, shift) = move_shift(1, 3, 4);
        assert_eq!(to, 3);
        let mut others = vec![2, 3, 4];
        apply(&mut others, shift.unwrap());
        others.push(to);
        assert_eq!(others, vec![1, 2, 4, 3]);
        assert!(is_contiguous(&others));

        // move d (4) to 1
        let (to, shift) = move_shift(4, 1, 4);
        let mut others = vec![1, 2, 3];
        apply(&mut others, shift.unwrap());
        others.push(to);
        assert_eq!(others, vec![2, 3, 4, 1]);
    }

    #[test]
    fn moving_in_place_or_out_of_range() {
        assert_eq!(move_shift(2, 2, 3), (2, None));
        let (to, shift) = move_shift(1, 10, 3);
        assert_eq!(to, 3);
        assert_eq!(
            shift,
            Some(Shift {
                from: 2,
                to: 3,
                delta: -1
            })
        );
    }

    #[test]
    fn contiguity_check() {
        assert!(is_contiguous(&[]));
        assert!(is_contiguous(&[2, 1, 3]));
        assert!(!is_contiguous(&[1, 3]));
        assert!(!is_contiguous(&[1, 1]));
    }
}
