use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

pub const MAX_HOLDINGS: usize = 25;
pub const BPS_DENOMINATOR: u64 = 10_000;

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoldingWeight {
    pub mint: Pubkey,
    pub weight_bps: u16,
}

/// Allocation policy for one fund: how large the redemption buffer should be
/// relative to NAV, how liquidity-pool rewards are split, and the weight
/// table for the token basket.
#[account]
#[derive(Default)]
pub struct Allocation {
    pub fund: Pubkey,
    pub holding_count: u8,
    pub holdings: [HoldingWeight; MAX_HOLDINGS],
    pub target_buffer_bps: u16,
    pub baseline_buffer_bps: u16,
    pub lp_reward_bps: u16,
    pub lp_reward_destination: Pubkey,
    pub bump: u8,
}

impl Allocation {
    pub const LEN: usize = 32 + 1 + (32 + 2) * MAX_HOLDINGS + 2 + 2 + 2 + 32 + 1;

    /// Buffer band and reward percentages must be mutually consistent:
    /// baseline never exceeds target, and target plus baseline stays within
    /// the whole fund.
    pub fn validate_bands(
        target_buffer_bps: u16,
        baseline_buffer_bps: u16,
        lp_reward_bps: u16,
    ) -> Result<()> {
        require!(
            baseline_buffer_bps <= target_buffer_bps,
            ErrorCode::InvalidAllocation
        );
        require!(
            (target_buffer_bps as u64) + (baseline_buffer_bps as u64) <= BPS_DENOMINATOR,
            ErrorCode::InvalidAllocation
        );
        require!(
            (lp_reward_bps as u64) <= BPS_DENOMINATOR,
            ErrorCode::InvalidAllocation
        );
        Ok(())
    }

    pub fn total_weight_bps(&self) -> u64 {
        self.holdings[..self.holding_count as usize]
            .iter()
            .map(|h| h.weight_bps as u64)
            .sum()
    }

    pub fn add_holding(&mut self, mint: Pubkey, weight_bps: u16) -> Result<()> {
        let count = self.holding_count as usize;
        require!(count < MAX_HOLDINGS, ErrorCode::HoldingTableFull);
        require!(
            !self.holdings[..count].iter().any(|h| h.mint == mint),
            ErrorCode::AlreadyInitialized
        );
        require!(
            self.total_weight_bps() + weight_bps as u64 <= BPS_DENOMINATOR,
            ErrorCode::InvalidAllocation
        );

        self.holdings[count] = HoldingWeight { mint, weight_bps };
        self.holding_count += 1;
        Ok(())
    }

    /// Removes an entry and compacts the table so the live prefix stays
    /// contiguous.
    pub fn remove_holding(&mut self, mint: Pubkey) -> Result<()> {
        let count = self.holding_count as usize;
        let idx = self.holdings[..count]
            .iter()
            .position(|h| h.mint == mint)
            .ok_or(ErrorCode::HoldingNotFound)?;

        for i in idx..count - 1 {
            self.holdings[i] = self.holdings[i + 1];
        }
        self.holdings[count - 1] = HoldingWeight::default();
        self.holding_count -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_reject_baseline_above_target() {
        assert!(Allocation::validate_bands(2_000, 2_500, 0).is_err());
        assert!(Allocation::validate_bands(2_500, 2_000, 0).is_ok());
    }

    #[test]
    fn bands_reject_sum_over_whole() {
        assert!(Allocation::validate_bands(6_000, 5_000, 0).is_err());
        assert!(Allocation::validate_bands(5_000, 5_000, 0).is_ok());
        assert!(Allocation::validate_bands(0, 0, 10_001).is_err());
    }

    #[test]
    fn add_rejects_duplicates_and_tracks_weight() {
        let mut alloc = Allocation::default();
        let mint = Pubkey::new_unique();

        alloc.add_holding(mint, 3_000).unwrap();
        assert_eq!(alloc.holding_count, 1);
        assert_eq!(alloc.total_weight_bps(), 3_000);

        assert!(alloc.add_holding(mint, 1_000).is_err());
        assert_eq!(alloc.holding_count, 1);
    }

    #[test]
    fn add_rejects_weight_overflow() {
        let mut alloc = Allocation::default();
        alloc.add_holding(Pubkey::new_unique(), 9_000).unwrap();
        assert!(alloc.add_holding(Pubkey::new_unique(), 1_001).is_err());
        assert!(alloc.add_holding(Pubkey::new_unique(), 1_000).is_ok());
    }

    #[test]
    fn table_fills_and_frees_capacity() {
        let mut alloc = Allocation::default();
        let mints: Vec<Pubkey> = (0..MAX_HOLDINGS).map(|_| Pubkey::new_unique()).collect();
        for mint in &mints {
            alloc.add_holding(*mint, 100).unwrap();
        }
        assert!(alloc.add_holding(Pubkey::new_unique(), 100).is_err());

        alloc.remove_holding(mints[3]).unwrap();
        assert_eq!(alloc.holding_count as usize, MAX_HOLDINGS - 1);
        // Compaction keeps the live prefix contiguous.
        assert_eq!(alloc.holdings[3].mint, mints[4]);
        assert!(alloc.add_holding(Pubkey::new_unique(), 100).is_ok());
    }

    #[test]
    fn remove_unknown_mint_fails() {
        let mut alloc = Allocation::default();
        alloc.add_holding(Pubkey::new_unique(), 500).unwrap();
        assert!(alloc.remove_holding(Pubkey::new_unique()).is_err());
    }
}
