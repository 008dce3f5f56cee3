use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::pricing::compute_nav_lamports;
use crate::state::fund::{FundState, LamportVault};

const PRICE_SCALE: u64 = 1_000_000_000;

/// Permissionless crank: anyone may refresh the recorded NAV and per-share
/// price, since both are derived purely from balances and oracle data.
pub fn refresh_fund_price<'info>(
    ctx: Context<'_, '_, 'info, 'info, RefreshFundPrice<'info>>,
) -> Result<()> {
    let reserve_balance = ctx.accounts.reserve_vault.to_account_info().lamports();
    let buffer_balance = ctx.accounts.buffer_vault.to_account_info().lamports();
    let nav_lamports = compute_nav_lamports(
        ctx.program_id,
        ctx.accounts.fund_state.key(),
        &ctx.accounts.fund_state,
        reserve_balance,
        buffer_balance,
        ctx.remaining_accounts,
    )?;

    let price = share_price(nav_lamports, ctx.accounts.fund_state.total_shares)?;

    let fund = &mut ctx.accounts.fund_state;
    fund.last_nav_lamports = nav_lamports;
    fund.last_share_price = price;
    fund.last_price_ts = Clock::get()?.unix_timestamp;

    msg!("fund nav {} lamports, share price {}", nav_lamports, price);

    Ok(())
}

/// Lamports per share, scaled by 1e9 so sub-lamport prices survive the
/// integer division.
pub(crate) fn share_price(nav_lamports: u64, total_shares: u64) -> Result<u64> {
    require!(total_shares > 0, ErrorCode::InvalidNav);
    let price = (nav_lamports as u128)
        .checked_mul(PRICE_SCALE as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(total_shares as u128)
        .ok_or(ErrorCode::MathOverflow)? as u64;
    Ok(price)
}

#[derive(Accounts)]
pub struct RefreshFundPrice<'info> {
    #[account(
        mut,
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        seeds = [b"reserve", fund_state.key().as_ref()],
        bump = fund_state.reserve_bump
    )]
    pub reserve_vault: Account<'info, LamportVault>,
    #[account(
        seeds = [b"buffer", fund_state.key().as_ref()],
        bump = fund_state.buffer_bump
    )]
    pub buffer_vault: Account<'info, LamportVault>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_at_par_is_the_scale() {
        assert_eq!(share_price(1_000, 1_000).unwrap(), PRICE_SCALE);
    }

    #[test]
    fn price_tracks_nav_growth() {
        assert_eq!(share_price(3_000, 1_000).unwrap(), 3 * PRICE_SCALE);
        assert_eq!(share_price(500, 1_000).unwrap(), PRICE_SCALE / 2);
    }

    #[test]
    fn price_requires_outstanding_shares() {
        assert!(share_price(1_000, 0).is_err());
    }
}
