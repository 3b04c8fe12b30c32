use crate::error::VestingError;
use anchor_lang::prelude::*;

/// PDA seed string used to derive a holder's entry index.
pub const HOLDER_INDEX_SEED: &str = "holder_index";

/// Global entry indices owned by one holder, in grant order.
///
/// Grows by one `u64` per grant; the account is reallocated as needed.
#[account]
#[derive(Default, Debug, PartialEq)]
pub struct HolderIndex {
    pub bump: u8,
    pub holder: Pubkey,
    pub entries: Vec<u64>,
}

impl HolderIndex {
    /// Discriminator, bump, holder and the vector length prefix.
    pub const BASE_LEN: usize = 8 + 1 + 32 + 4;

    pub fn space_for(entries: usize) -> usize {
        Self::BASE_LEN + 8 * entries
    }

    pub fn address(holder: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[HOLDER_INDEX_SEED.as_bytes(), holder.as_ref()],
            &crate::ID,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Global index of the holder's `position`-th entry.
    pub fn nth(&self, position: u64) -> Result<u64> {
        usize::try_from(position)
            .ok()
            .and_then(|position| self.entries.get(position))
            .copied()
            .ok_or(error!(VestingError::OutOfRange))
    }

    /// Global indices at positions `from..from + count`, cut at the end of
    /// the index. `count` must be non-zero and `from` a valid position.
    pub fn window(&self, from: u64, count: u64) -> Result<&[u64]> {
        require!(count > 0, VestingError::InvalidParam);
        let start = usize::try_from(from)
            .ok()
            .filter(|start| *start < self.entries.len())
            .ok_or(error!(VestingError::OutOfRange))?;
        let end = usize::try_from(from.saturating_add(count))
            .unwrap_or(usize::MAX)
            .min(self.entries.len());
        Ok(&self.entries[start..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_map_to_global_indices() {
        let index = HolderIndex {
            entries: vec![3, 7, 42],
            ..Default::default()
        };
        assert_eq!(index.nth(0).unwrap(), 3);
        assert_eq!(index.nth(2).unwrap(), 42);
        assert_eq!(index.nth(3).unwrap_err(), VestingError::OutOfRange.into());
        assert_eq!(index.nth(u64::MAX).unwrap_err(), VestingError::OutOfRange.into());
    }

    #[test]
    fn window_is_cut_at_the_end() {
        let index = HolderIndex {
            entries: (10..40).collect(),
            ..Default::default()
        };
        assert_eq!(index.window(0, 4).unwrap(), &[10, 11, 12, 13]);
        assert_eq!(index.window(28, 16).unwrap(), &[38, 39]);
        assert_eq!(index.window(5, u64::MAX).unwrap().len(), 25);
        assert_eq!(index.window(30, 1).unwrap_err(), VestingError::OutOfRange.into());
        assert_eq!(index.window(0, 0).unwrap_err(), VestingError::InvalidParam.into());
    }

    #[test]
    fn space_matches_serialized_size() {
        let index = HolderIndex {
            bump: 1,
            holder: Pubkey::new_unique(),
            entries: vec![1, 2, 3],
        };
        let mut data = Vec::new();
        index.try_serialize(&mut data).unwrap();
        assert_eq!(data.len(), HolderIndex::space_for(3));
    }
}
