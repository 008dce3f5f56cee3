use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

/// Root record for one fund instance. Created once by `initialize`; every
/// other instruction validates against it.
#[account]
#[derive(Default)]
pub struct FundState {
    pub is_initialized: bool,
    pub authority: Pubkey,
    pub fund_id: u64,
    pub share_mint: Pubkey,
    pub reserve_vault: Pubkey,
    pub buffer_vault: Pubkey,
    pub fee_treasury: Pubkey,
    pub sol_usd_feed: Pubkey,
    pub oracle_program: Pubkey,
    pub mint_fee_bps: u16,
    pub redeem_fee_bps: u16,
    pub transfer_fee_bps: u16,
    pub total_shares: u64,
    pub holding_count: u16,
    pub last_nav_lamports: u64,
    pub last_share_price: u64,
    pub last_price_ts: i64,
    pub is_locked: bool,
    pub borrow_lamports: u64,
    pub expected_min_out: u64,
    pub snapshot_reserve: u64,
    pub snapshot_output: u64,
    pub output_mint: Pubkey,
    pub bump: u8,
    pub share_mint_bump: u8,
    pub reserve_bump: u8,
    pub buffer_bump: u8,
}

impl FundState {
    pub const LEN: usize = 1
        + 32
        + 8
        + 32
        + 32
        + 32
        + 32
        + 32
        + 32
        + 2
        + 2
        + 2
        + 8
        + 2
        + 8
        + 8
        + 8
        + 1
        + 8
        + 8
        + 8
        + 8
        + 32
        + 1
        + 1
        + 1
        + 1;

    /// Marks the record initialized and pins its authority. Exactly-once:
    /// a second call fails with `AlreadyInitialized` and leaves every field
    /// untouched.
    pub fn initialize(&mut self, authority: Pubkey) -> Result<()> {
        require!(!self.is_initialized, ErrorCode::AlreadyInitialized);
        self.is_initialized = true;
        self.authority = authority;
        Ok(())
    }
}

/// Marker type for the program-owned lamport pools (reserve and buffer).
/// The account carries no data beyond the discriminator; its balance is the
/// state.
#[account]
pub struct LamportVault {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorCode;

    #[test]
    fn initialize_sets_flag_and_authority() {
        let caller = Pubkey::new_unique();
        let mut fund = FundState::default();
        assert!(!fund.is_initialized);

        fund.initialize(caller).unwrap();

        assert!(fund.is_initialized);
        assert_eq!(fund.authority, caller);
    }

    #[test]
    fn initialize_is_not_idempotent() {
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        let mut fund = FundState::default();

        fund.initialize(first).unwrap();
        let err = fund.initialize(second).unwrap_err();

        assert_eq!(err, anchor_lang::error::Error::from(ErrorCode::AlreadyInitialized));
        // Losing attempt must not overwrite the recorded authority.
        assert_eq!(fund.authority, first);
        assert!(fund.is_initialized);
    }

    #[test]
    fn reinitialize_by_same_caller_still_fails() {
        let caller = Pubkey::new_unique();
        let mut fund = FundState::default();

        fund.initialize(caller).unwrap();
        assert!(fund.initialize(caller).is_err());
    }
}
