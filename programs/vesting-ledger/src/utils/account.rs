use crate::error::VestingError;
use crate::states::{HolderIndex, VestingEntry};
use anchor_lang::prelude::*;
use anchor_lang::solana_program::{program::invoke_signed, system_instruction};
use anchor_lang::system_program;

/// Creates a program-owned PDA of `space` bytes at `target`.
///
/// A PDA that already holds lamports cannot go through `create_account`, so
/// it is topped up, allocated and assigned instead.
pub fn create_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
    signer_seeds: &[&[u8]],
) -> Result<()> {
    let rent = Rent::get()?.minimum_balance(space);
    let current = target.lamports();

    if current == 0 {
        let create_ix = system_instruction::create_account(
            payer.key,
            target.key,
            rent,
            space as u64,
            &crate::ID,
        );
        invoke_signed(
            &create_ix,
            &[payer.clone(), target.clone(), system_program.clone()],
            &[signer_seeds],
        )?;
        return Ok(());
    }

    let top_up = rent.saturating_sub(current);
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(target.key, space as u64),
        &[target.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(target.key, &crate::ID),
        &[target.clone(), system_program.clone()],
        &[signer_seeds],
    )?;
    Ok(())
}

/// Resizes a program-owned account to `space` bytes, paying any extra rent.
pub fn grow_pda_account<'info>(
    payer: &AccountInfo<'info>,
    target: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    space: usize,
) -> Result<()> {
    if target.data_len() >= space {
        return Ok(());
    }
    let top_up = Rent::get()?
        .minimum_balance(space)
        .saturating_sub(target.lamports());
    if top_up > 0 {
        system_program::transfer(
            CpiContext::new(
                system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: target.clone(),
                },
            ),
            top_up,
        )?;
    }
    target.realloc(space, false)?;
    Ok(())
}

/// Deserializes an account owned by `T`'s program; `None` when it was never
/// created.
pub fn load_program_account<T: AccountDeserialize + Owner>(
    info: &AccountInfo,
) -> Result<Option<T>> {
    if info.data_is_empty() {
        return Ok(None);
    }
    require_keys_eq!(
        *info.owner,
        T::owner(),
        anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram
    );
    let data = info.try_borrow_data()?;
    T::try_deserialize(&mut &data[..]).map(Some)
}

pub fn store_program_account<T: AccountSerialize>(info: &AccountInfo, value: &T) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    value.try_serialize(&mut writer)
}

/// Next remaining account, or `MissingRemainingAccount`.
pub fn next_remaining<'a, 'info>(
    accounts: &mut std::slice::Iter<'a, AccountInfo<'info>>,
) -> Result<&'a AccountInfo<'info>> {
    accounts
        .next()
        .ok_or(error!(VestingError::MissingRemainingAccount))
}

/// Loads the holder's index; `None` if the holder was never granted anything.
pub fn load_holder_index(info: &AccountInfo, holder: &Pubkey) -> Result<Option<HolderIndex>> {
    let holder_index = load_program_account::<HolderIndex>(info)?;
    if let Some(holder_index) = &holder_index {
        require_keys_eq!(holder_index.holder, *holder, VestingError::InvalidHolderIndex);
    }
    Ok(holder_index)
}

/// Loads the entry stored at global `index`.
///
/// Entries are only ever created by this program at their index PDA, so a
/// program-owned entry carrying the right index is the right account.
pub fn load_entry(info: &AccountInfo, index: u64) -> Result<VestingEntry> {
    let entry = load_program_account::<VestingEntry>(info)?
        .ok_or(error!(VestingError::InvalidEntryAccount))?;
    require!(entry.index == index, VestingError::InvalidEntryAccount);
    Ok(entry)
}

/// Loads `indices` from the matching leading `infos`.
pub fn load_entries(indices: &[u64], infos: &[AccountInfo]) -> Result<Vec<VestingEntry>> {
    require!(
        infos.len() >= indices.len(),
        VestingError::MissingRemainingAccount
    );
    indices
        .iter()
        .zip(infos)
        .map(|(index, info)| load_entry(info, *index))
        .collect()
}

/// Owned backing store for the `AccountInfo`s that handlers read in tests.
#[cfg(test)]
pub(crate) struct TestAccount {
    pub key: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: Vec<u8>,
}

#[cfg(test)]
impl TestAccount {
    /// An address nothing was ever created at.
    pub fn missing() -> Self {
        TestAccount {
            key: Pubkey::new_unique(),
            owner: Pubkey::default(),
            lamports: 0,
            data: Vec::new(),
        }
    }

    /// A `space`-byte account holding `value`, owned by `T`'s program.
    pub fn holding<T: AccountSerialize + Owner>(value: &T, space: usize) -> Self {
        let mut data = Vec::with_capacity(space);
        value.try_serialize(&mut data).unwrap();
        data.resize(space, 0);
        TestAccount {
            key: Pubkey::new_unique(),
            owner: T::owner(),
            lamports: 1_000_000,
            data,
        }
    }

    pub fn info(&mut self, is_writable: bool) -> AccountInfo<'_> {
        AccountInfo::new(
            &self.key,
            false,
            is_writable,
            &mut self.lamports,
            &mut self.data,
            &self.owner,
            false,
            0,
        )
    }

    pub fn read<T: AccountDeserialize>(&self) -> T {
        T::try_deserialize(&mut &self.data[..]).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_must_match_their_index() {
        let mut entry = TestAccount::holding(
            &VestingEntry {
                index: 4,
                amount: 10,
                ..Default::default()
            },
            VestingEntry::LEN,
        );
        assert_eq!(load_entry(&entry.info(false), 4).unwrap().amount, 10);
        assert_eq!(
            load_entry(&entry.info(false), 5).unwrap_err(),
            VestingError::InvalidEntryAccount.into()
        );

        let mut missing = TestAccount::missing();
        assert_eq!(
            load_entry(&missing.info(false), 4).unwrap_err(),
            VestingError::InvalidEntryAccount.into()
        );
    }

    #[test]
    fn foreign_accounts_are_rejected() {
        let mut entry = TestAccount::holding(&VestingEntry::default(), VestingEntry::LEN);
        entry.owner = Pubkey::new_unique();
        assert_eq!(
            load_entry(&entry.info(false), 0).unwrap_err(),
            anchor_lang::error::ErrorCode::AccountOwnedByWrongProgram.into()
        );
    }

    #[test]
    fn holder_index_must_belong_to_the_holder() {
        let holder = Pubkey::new_unique();
        let mut index = TestAccount::holding(
            &HolderIndex {
                holder,
                entries: vec![0],
                ..Default::default()
            },
            HolderIndex::space_for(1),
        );
        assert!(load_holder_index(&index.info(false), &holder).unwrap().is_some());
        assert_eq!(
            load_holder_index(&index.info(false), &Pubkey::new_unique()).unwrap_err(),
            VestingError::InvalidHolderIndex.into()
        );
        let none = load_holder_index(&TestAccount::missing().info(false), &holder).unwrap();
        assert!(none.is_none());

        // Lookup by position, as `get_claimable` does it.
        let loaded = load_holder_index(&index.info(false), &holder).unwrap();
        assert_eq!(loaded.unwrap_or_default().nth(0).unwrap(), 0);
        assert_eq!(
            none.unwrap_or_default().nth(0).unwrap_err(),
            VestingError::OutOfRange.into()
        );
    }
}
