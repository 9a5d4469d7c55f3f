use super::error::PositionError;
use super::{Move, Position};

impl Position {
    /// Count leaf nodes of the legal move tree to `depth`.
    ///
    /// # Errors
    /// Propagates a [`PositionError`] if a generated move fails to apply,
    /// which indicates a generator bug.
    pub fn perft(&mut self, depth: usize) -> Result<u64, PositionError> {
        if depth == 0 {
            return Ok(1);
        }

        let moves = self.legal_moves();
        if depth == 1 {
            return Ok(moves.len() as u64);
        }

        let mut nodes = 0;
        for mv in moves {
            let undo = self.apply(mv)?;
            nodes += self.perft(depth - 1)?;
            self.undo(undo);
        }
        Ok(nodes)
    }

    /// Per-root-move leaf counts, in generation order.
    ///
    /// # Errors
    /// Same as [`Position::perft`].
    pub fn perft_divide(&mut self, depth: usize) -> Result<Vec<(Move, u64)>, PositionError> {
        let mut divide = Vec::new();
        if depth == 0 {
            return Ok(divide);
        }
        for mv in self.legal_moves() {
            let undo = self.apply(mv)?;
            let nodes = self.perft(depth - 1)?;
            self.undo(undo);
            divide.push((mv, nodes));
        }
        Ok(divide)
    }
}
