use anchor_lang::prelude::*;
use anchor_spl::associated_token::AssociatedToken;
use anchor_spl::token::{mint_to, Mint, MintTo, Token, TokenAccount};

use crate::errors::ErrorCode;
use crate::instructions::pricing::compute_nav_lamports;
use crate::state::allocation::{Allocation, BPS_DENOMINATOR};
use crate::state::fund::{FundState, LamportVault};

pub fn mint_shares<'info>(
    ctx: Context<'_, '_, 'info, 'info, MintShares<'info>>,
    amount_lamports: u64,
) -> Result<()> {
    require!(!ctx.accounts.fund_state.is_locked, ErrorCode::FundLocked);
    require!(amount_lamports > 0, ErrorCode::ZeroShares);

    let (fee_lamports, net_lamports) =
        fee_split(amount_lamports, ctx.accounts.fund_state.mint_fee_bps)?;

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

    let shares = shares_for_deposit(
        net_lamports,
        ctx.accounts.fund_state.total_shares,
        nav_lamports,
    )?;

    // Top the buffer up toward its target before the rest lands in the
    // reserve.
    let (to_buffer, to_reserve) = buffer_top_up(
        net_lamports,
        buffer_balance,
        nav_lamports,
        ctx.accounts.allocation.target_buffer_bps,
    )?;

    if fee_lamports > 0 {
        let fee_ctx = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: ctx.accounts.fee_treasury.to_account_info(),
            },
        );
        anchor_lang::system_program::transfer(fee_ctx, fee_lamports)?;
    }
    if to_buffer > 0 {
        let buffer_ctx = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: ctx.accounts.buffer_vault.to_account_info(),
            },
        );
        anchor_lang::system_program::transfer(buffer_ctx, to_buffer)?;
    }
    if to_reserve > 0 {
        let reserve_ctx = CpiContext::new(
            ctx.accounts.system_program.to_account_info(),
            anchor_lang::system_program::Transfer {
                from: ctx.accounts.depositor.to_account_info(),
                to: ctx.accounts.reserve_vault.to_account_info(),
            },
        );
        anchor_lang::system_program::transfer(reserve_ctx, to_reserve)?;
    }

    let authority_key = ctx.accounts.fund_state.authority;
    let fund_id_bytes = ctx.accounts.fund_state.fund_id.to_le_bytes();
    let signer_seeds: &[&[u8]] = &[
        b"fund",
        authority_key.as_ref(),
        fund_id_bytes.as_ref(),
        &[ctx.accounts.fund_state.bump],
    ];
    let signer_seeds_set = [signer_seeds];
    let mint_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        MintTo {
            mint: ctx.accounts.share_mint.to_account_info(),
            to: ctx.accounts.depositor_share_account.to_account_info(),
            authority: ctx.accounts.fund_state.to_account_info(),
        },
        &signer_seeds_set,
    );
    mint_to(mint_ctx, shares)?;

    let fund = &mut ctx.accounts.fund_state;
    fund.total_shares = fund
        .total_shares
        .checked_add(shares)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

/// Splits `amount` into (fee, net) at `fee_bps`. Total is conserved.
pub(crate) fn fee_split(amount: u64, fee_bps: u16) -> Result<(u64, u64)> {
    let fee = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    let fee = fee as u64;
    let net = amount.checked_sub(fee).ok_or(ErrorCode::MathOverflow)?;
    Ok((fee, net))
}

/// Shares minted for a net deposit at the current NAV.
pub(crate) fn shares_for_deposit(
    net_lamports: u64,
    total_shares: u64,
    nav_lamports: u64,
) -> Result<u64> {
    require!(nav_lamports > 0, ErrorCode::InvalidNav);
    require!(total_shares > 0, ErrorCode::InvalidNav);

    let shares = (net_lamports as u128)
        .checked_mul(total_shares as u128)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_div(nav_lamports as u128)
        .ok_or(ErrorCode::MathOverflow)? as u64;
    require!(shares > 0, ErrorCode::ZeroShares);
    Ok(shares)
}

/// Splits a net deposit between the buffer (up to its target share of NAV)
/// and the reserve.
pub(crate) fn buffer_top_up(
    net_lamports: u64,
    buffer_balance: u64,
    nav_lamports: u64,
    target_buffer_bps: u16,
) -> Result<(u64, u64)> {
    let target = (nav_lamports as u128)
        .checked_mul(target_buffer_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128;
    let shortfall = (target as u64).saturating_sub(buffer_balance);
    let to_buffer = net_lamports.min(shortfall);
    let to_reserve = net_lamports - to_buffer;
    Ok((to_buffer, to_reserve))
}

#[derive(Accounts)]
pub struct MintShares<'info> {
    #[account(mut)]
    pub depositor: Signer<'info>,
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
        init_if_needed,
        payer = depositor,
        associated_token::mint = share_mint,
        associated_token::authority = depositor
    )]
    pub depositor_share_account: Account<'info, TokenAccount>,
    #[account(mut)]
    pub fee_treasury: SystemAccount<'info>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
    pub associated_token_program: Program<'info, AssociatedToken>,
    pub rent: Sysvar<'info, Rent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_split_conserves_total() {
        let (fee, net) = fee_split(1_000_000, 250).unwrap();
        assert_eq!(fee, 25_000);
        assert_eq!(fee + net, 1_000_000);
    }

    #[test]
    fn fee_split_zero_bps_is_free() {
        let (fee, net) = fee_split(42, 0).unwrap();
        assert_eq!(fee, 0);
        assert_eq!(net, 42);
    }

    #[test]
    fn deposit_at_par_mints_one_to_one() {
        let shares = shares_for_deposit(500, 1_000, 1_000).unwrap();
        assert_eq!(shares, 500);
    }

    #[test]
    fn deposit_above_par_mints_fewer_shares() {
        // NAV doubled against supply: a lamport buys half a share.
        let shares = shares_for_deposit(500, 1_000, 2_000).unwrap();
        assert_eq!(shares, 250);
    }

    #[test]
    fn dust_deposit_rejected() {
        assert!(shares_for_deposit(1, 1_000, 2_000).is_err());
    }

    #[test]
    fn buffer_takes_shortfall_first() {
        // Target 20% of NAV 10_000 = 2_000; buffer holds 500.
        let (to_buffer, to_reserve) = buffer_top_up(1_000, 500, 10_000, 2_000).unwrap();
        assert_eq!(to_buffer, 1_000);
        assert_eq!(to_reserve, 0);

        let (to_buffer, to_reserve) = buffer_top_up(5_000, 500, 10_000, 2_000).unwrap();
        assert_eq!(to_buffer, 1_500);
        assert_eq!(to_reserve, 3_500);
    }

    #[test]
    fn full_buffer_sends_everything_to_reserve() {
        let (to_buffer, to_reserve) = buffer_top_up(5_000, 2_500, 10_000, 2_000).unwrap();
        assert_eq!(to_buffer, 0);
        assert_eq!(to_reserve, 5_000);
    }
}
