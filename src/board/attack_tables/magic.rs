//! Magic multiplier search for sliding pieces.
//!
//! For each square the relevant blocker mask (rays without the board edge) is
//! enumerated subset by subset, every subset is ray traced, and random sparse
//! multipliers are tried until `(blockers * magic) >> shift` sends every
//! subset to a slot that either is free or already holds the same attack set.

use log::debug;
use rand::rngs::StdRng;
use rand::Rng;

use crate::board::error::MagicError;
use crate::board::types::{Bitboard, Piece, Square};

/// Attempt ceiling per square before the search gives up.
pub const MAX_MAGIC_ATTEMPTS: u64 = 100_000_000;

const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Magic entry for a single square.
#[derive(Clone, Copy, Debug)]
pub struct Magic {
    /// Relevant blocker squares (edges excluded)
    pub mask: Bitboard,
    pub magic: u64,
    /// 64 minus the mask population
    pub shift: u32,
    /// Offset into the shared attack table
    pub offset: usize,
}

impl Magic {
    #[inline]
    pub(crate) fn index(&self, occupied: Bitboard) -> usize {
        let blockers = (occupied & self.mask).0;
        self.offset + (blockers.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Magic entries and the flat attack table for one slider family.
pub(crate) struct SliderTable {
    pub magics: Vec<Magic>,
    pub attacks: Vec<Bitboard>,
}

impl SliderTable {
    #[inline]
    pub(crate) fn attacks(&self, sq: Square, occupied: Bitboard) -> Bitboard {
        let magic = &self.magics[sq.index()];
        self.attacks[magic.index(occupied)]
    }

    /// Find magics for all 64 squares of `slider` (rook or bishop).
    pub(crate) fn generate(
        slider: Piece,
        rng: &mut StdRng,
        max_attempts: u64,
    ) -> Result<Self, MagicError> {
        let mut magics = Vec::with_capacity(64);
        let mut attacks = Vec::new();
        let mut total_attempts = 0;
        for sq in Square::all() {
            let mask = relevant_mask(slider, sq);
            let (magic, table, attempts) = find_magic(slider, sq, mask, rng, max_attempts)?;
            total_attempts += attempts;
            magics.push(Magic {
                mask,
                magic,
                shift: 64 - mask.popcount(),
                offset: attacks.len(),
            });
            attacks.extend(table);
        }
        debug!(
            "generated {slider} magics: {} table entries, {total_attempts} candidates tried",
            attacks.len()
        );
        Ok(SliderTable { magics, attacks })
    }
}

fn directions(slider: Piece) -> &'static [(i8, i8); 4] {
    if slider == Piece::Rook {
        &ROOK_DIRS
    } else {
        &BISHOP_DIRS
    }
}

/// Squares whose occupancy can change the slider's attack set from `sq`.
pub(crate) fn relevant_mask(slider: Piece, sq: Square) -> Bitboard {
    let mut mask = Bitboard::EMPTY;
    for &(dr, df) in directions(slider) {
        let mut cur = sq.offset(dr, df);
        while let Some(s) = cur {
            // the last square of a ray never blocks anything behind it
            let next = s.offset(dr, df);
            if next.is_none() {
                break;
            }
            mask = mask.with(s);
            cur = next;
        }
    }
    mask
}

/// Ray-traced attacks; each ray stops at and includes the first blocker.
pub(crate) fn ray_attacks(slider: Piece, sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(dr, df) in directions(slider) {
        let mut cur = sq.offset(dr, df);
        while let Some(s) = cur {
            attacks = attacks.with(s);
            if occupied.contains(s) {
                break;
            }
            cur = s.offset(dr, df);
        }
    }
    attacks
}

/// Every subset of `mask`, starting with the empty set (carry-rippler).
pub(crate) fn subsets(mask: Bitboard) -> Vec<Bitboard> {
    let mut out = Vec::with_capacity(1 << mask.popcount());
    let mut subset = 0u64;
    loop {
        out.push(Bitboard(subset));
        subset = subset.wrapping_sub(mask.0) & mask.0;
        if subset == 0 {
            break;
        }
    }
    out
}

fn find_magic(
    slider: Piece,
    sq: Square,
    mask: Bitboard,
    rng: &mut StdRng,
    max_attempts: u64,
) -> Result<(u64, Vec<Bitboard>, u64), MagicError> {
    let occupancies = subsets(mask);
    let reference: Vec<Bitboard> = occupancies
        .iter()
        .map(|&occ| ray_attacks(slider, sq, occ))
        .collect();
    let shift = 64 - mask.popcount();
    let size = occupancies.len();

    let mut table = vec![Bitboard::EMPTY; size];
    // slot i is filled for the current attempt only when stamp[i] == attempt
    let mut stamp = vec![0u64; size];

    for attempt in 1..=max_attempts {
        let magic = rng.gen::<u64>() & rng.gen::<u64>() & rng.gen::<u64>();
        if (mask.0.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }

        let mut ok = true;
        for (occ, &attack) in occupancies.iter().zip(&reference) {
            let idx = (occ.0.wrapping_mul(magic) >> shift) as usize;
            if stamp[idx] != attempt {
                stamp[idx] = attempt;
                table[idx] = attack;
            } else if table[idx] != attack {
                ok = false;
                break;
            }
        }
        if ok {
            return Ok((magic, table, attempt));
        }
    }

    Err(MagicError::Exhausted {
        slider,
        square: sq,
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn masks_exclude_edges() {
        let d4: Square = "d4".parse().expect("square");
        assert_eq!(relevant_mask(Piece::Rook, d4).popcount(), 10);
        assert_eq!(relevant_mask(Piece::Bishop, d4).popcount(), 9);
        assert_eq!(relevant_mask(Piece::Rook, Square::A1).popcount(), 12);
        assert_eq!(relevant_mask(Piece::Bishop, Square::A1).popcount(), 6);
    }

    #[test]
    fn subsets_enumerate_power_set() {
        let mask = Bitboard(0b1011);
        let all = subsets(mask);
        assert_eq!(all.len(), 8);
        assert!(all.iter().all(|s| (*s & !mask).is_empty()));
    }

    #[test]
    fn ray_attacks_include_first_blocker() {
        let d4: Square = "d4".parse().expect("square");
        let d6: Square = "d6".parse().expect("square");
        let attacks = ray_attacks(Piece::Rook, d4, Bitboard::from_square(d6));
        assert!(attacks.contains(d6));
        assert!(!attacks.contains("d7".parse().expect("square")));
        assert_eq!(attacks.popcount(), 12);
    }

    #[test]
    fn zero_budget_is_an_error_not_a_zero_magic() {
        let mut rng = StdRng::seed_from_u64(7);
        let err = SliderTable::generate(Piece::Bishop, &mut rng, 0)
            .err()
            .expect("exhaustion must be reported");
        assert!(matches!(
            err,
            MagicError::Exhausted {
                slider: Piece::Bishop,
                attempts: 0,
                ..
            }
        ));
    }

    #[test]
    fn same_seed_same_magics() {
        let mut a = StdRng::seed_from_u64(11);
        let mut b = StdRng::seed_from_u64(11);
        let ta = SliderTable::generate(Piece::Bishop, &mut a, MAX_MAGIC_ATTEMPTS).expect("magics");
        let tb = SliderTable::generate(Piece::Bishop, &mut b, MAX_MAGIC_ATTEMPTS).expect("magics");
        let ma: Vec<u64> = ta.magics.iter().map(|m| m.magic).collect();
        let mb: Vec<u64> = tb.magics.iter().map(|m| m.magic).collect();
        assert_eq!(ma, mb);
    }
}
