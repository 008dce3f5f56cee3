use anchor_lang::prelude::*;
use anchor_spl::token::{burn, Burn, Mint, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::instructions::mint_shares::fee_split;
use crate::instructions::pricing::compute_nav_lamports;
use crate::state::allocation::{Allocation, BPS_DENOMINATOR};
use crate::state::fund::{FundState, LamportVault};

pub fn redeem_shares<'info>(
    ctx: Context<'_, '_, 'info, 'info, RedeemShares<'info>>,
    shares: u64,
) -> Result<()> {
    require!(!ctx.accounts.fund_state.is_locked, ErrorCode::FundLocked);
    require!(shares > 0, ErrorCode::ZeroShares);
    require!(
        ctx.accounts.investor_share_account.amount >= shares,
        ErrorCode::InsufficientFunds
    );

    let total_shares = ctx.accounts.fund_state.total_shares;
    require!(total_shares >= shares, ErrorCode::MathOverflow);

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

    let gross_lamports = redemption_value(shares, total_shares, nav_lamports)?;
    let (fee_lamports, net_lamports) =
        fee_split(gross_lamports, ctx.accounts.fund_state.redeem_fee_bps)?;

    // Buffer pays first; the reserve covers what the buffer cannot give up
    // without dropping below its post-redemption baseline.
    let (from_buffer, from_reserve) = payout_split(
        gross_lamports,
        buffer_balance,
        reserve_balance,
        nav_lamports,
        ctx.accounts.allocation.baseline_buffer_bps,
    )?;

    let burn_ctx = CpiContext::new(
        ctx.accounts.token_program.to_account_info(),
        Burn {
            mint: ctx.accounts.share_mint.to_account_info(),
            from: ctx.accounts.investor_share_account.to_account_info(),
            authority: ctx.accounts.investor.to_account_info(),
        },
    );
    burn(burn_ctx, shares)?;

    let fund = &mut ctx.accounts.fund_state;
    fund.total_shares = fund
        .total_shares
        .checked_sub(shares)
        .ok_or(ErrorCode::MathOverflow)?;

    {
        let buffer_info = ctx.accounts.buffer_vault.to_account_info();
        let reserve_info = ctx.accounts.reserve_vault.to_account_info();
        let investor_info = ctx.accounts.investor.to_account_info();
        let treasury_info = ctx.accounts.fee_treasury.to_account_info();

        let mut buffer_lamports = buffer_info.try_borrow_mut_lamports()?;
        let mut reserve_lamports = reserve_info.try_borrow_mut_lamports()?;
        let mut investor_lamports = investor_info.try_borrow_mut_lamports()?;
        let mut treasury_lamports = treasury_info.try_borrow_mut_lamports()?;

        **buffer_lamports = (**buffer_lamports)
            .checked_sub(from_buffer)
            .ok_or(ErrorCode::MathOverflow)?;
        **reserve_lamports = (**reserve_lamports)
            .checked_sub(from_reserve)
            .ok_or(ErrorCode::MathOverflow)?;
        **investor_lamports = (**investor_lamports)
            .checked_add(net_lamports)
            .ok_or(ErrorCode::MathOverflow)?;
        if fee_lamports > 0 {
            **treasury_lamports = (**treasury_lamports)
                .checked_add(fee_lamports)
                .ok_or(ErrorCode::MathOverflow)?;
        }
    }

    Ok(())
}

/// Lamports owed for burning `shares` at the current NAV.
pub(crate) fn redemption_value(
    shares: u64,
    total_shares: u64,
    nav_lamports: u64,
) -> Result<u64> {
    require!(total_shares > 0, ErrorCode::InvalidNav);
    let gross = (shares as u128)
        .checked_mul(nav_lamports as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(total_shares as u128)
        .ok_or(ErrorCode::MathOverflow)? as u64;
    Ok(gross)
}

/// Decides how much of a payout each pool contributes. The buffer gives up
/// everything above the baseline it must still hold after the redemption;
/// the reserve covers the rest or the whole redemption fails.
pub(crate) fn payout_split(
    gross_lamports: u64,
    buffer_balance: u64,
    reserve_balance: u64,
    nav_lamports: u64,
    baseline_buffer_bps: u16,
) -> Result<(u64, u64)> {
    let nav_after = nav_lamports
        .checked_sub(gross_lamports)
        .ok_or(ErrorCode::InsufficientLiquidity)?;
    let baseline_after = ((nav_after as u128)
        .checked_mul(baseline_buffer_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128) as u64;

    let buffer_available = buffer_balance.saturating_sub(baseline_after);
    let from_buffer = gross_lamports.min(buffer_available);
    let from_reserve = gross_lamports - from_buffer;
    require!(
        reserve_balance >= from_reserve,
        ErrorCode::InsufficientFunds
    );
    Ok((from_buffer, from_reserve))
}

#[derive(Accounts)]
pub struct RedeemShares<'info> {
    #[account(mut)]
    pub investor: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump,
        has_one = fee_treasury
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        seeds = [b"allocation", fund_state.key().as_ref()],
        bump = allocation.bump
    )]
    pub allocation: Account<'info, Allocation>,
    #[account(
        mut,
        seeds = [b"reserve", fund_state.key().as_ref()],
        bump = fund_state.reserve_bump
    )]
    pub reserve_vault: Account<'info, LamportVault>,
    #[account(
        mut,
        seeds = [b"buffer", fund_state.key().as_ref()],
        bump = fund_state.buffer_bump
    )]
    pub buffer_vault: Account<'info, LamportVault>,
    #[account(
        mut,
        seeds = [b"shares", fund_state.key().as_ref()],
        bump = fund_state.share_mint_bump
    )]
    pub share_mint: Account<'info, Mint>,
    #[account(
        mut,
        associated_token::mint = share_mint,
        associated_token::authority = investor
    )]
    pub investor_share_account: Account<'info, TokenAccount>,
    #[account(mut)]
    pub fee_treasury: SystemAccount<'info>,
    pub token_program: Program<'info, Token>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redemption_is_proportional() {
        assert_eq!(redemption_value(250, 1_000, 4_000).unwrap(), 1_000);
        assert_eq!(redemption_value(1_000, 1_000, 4_000).unwrap(), 4_000);
    }

    #[test]
    fn buffer_pays_small_redemptions() {
        // NAV 10_000, baseline 10%: after paying 500, baseline is 950.
        let (from_buffer, from_reserve) =
            payout_split(500, 2_000, 8_000, 10_000, 1_000).unwrap();
        assert_eq!(from_buffer, 500);
        assert_eq!(from_reserve, 0);
    }

    #[test]
    fn reserve_tops_up_when_buffer_hits_baseline() {
        // After paying 3_000, NAV 7_000 and baseline 700; buffer holds 2_000
        // so it can give up 1_300.
        let (from_buffer, from_reserve) =
            payout_split(3_000, 2_000, 8_000, 10_000, 1_000).unwrap();
        assert_eq!(from_buffer, 1_300);
        assert_eq!(from_reserve, 1_700);
        assert_eq!(from_buffer + from_reserve, 3_000);
    }

    #[test]
    fn payout_fails_when_pools_cannot_cover() {
        // Holdings carry most of the NAV; lamport pools cannot cover the
        // redemption.
        assert!(payout_split(6_000, 1_000, 2_000, 10_000, 1_000).is_err());
    }

    #[test]
    fn payout_fails_when_redeeming_above_nav() {
        assert!(payout_split(11_000, 5_000, 5_000, 10_000, 0).is_err());
    }
}
