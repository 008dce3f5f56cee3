use anchor_lang::prelude::*;

use crate::errors::ErrorCode;
use crate::instructions::pricing::compute_nav_lamports;
use crate::state::allocation::{Allocation, BPS_DENOMINATOR};
use crate::state::fund::{FundState, LamportVault};

pub fn rebalance_buffer<'info>(
    ctx: Context<'_, '_, 'info, 'info, RebalanceBuffer<'info>>,
) -> Result<()> {
    require!(!ctx.accounts.fund_state.is_locked, ErrorCode::FundLocked);

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

    let adjustment = buffer_adjustment(
        buffer_balance,
        nav_lamports,
        ctx.accounts.allocation.target_buffer_bps,
        ctx.accounts.allocation.baseline_buffer_bps,
    )?;

    let (from_reserve, from_buffer) = match adjustment {
        BufferMove::None => return Ok(()),
        BufferMove::Fill(amount) => {
            require!(reserve_balance >= amount, ErrorCode::InsufficientLiquidity);
            (amount, 0)
        }
        BufferMove::Drain(amount) => (0, amount),
    };

    let reserve_info = ctx.accounts.reserve_vault.to_account_info();
    let buffer_info = ctx.accounts.buffer_vault.to_account_info();
    let mut reserve_lamports = reserve_info.try_borrow_mut_lamports()?;
    let mut buffer_lamports = buffer_info.try_borrow_mut_lamports()?;

    **reserve_lamports = (**reserve_lamports)
        .checked_sub(from_reserve)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_add(from_buffer)
        .ok_or(ErrorCode::MathOverflow)?;
    **buffer_lamports = (**buffer_lamports)
        .checked_sub(from_buffer)
        .ok_or(ErrorCode::MathOverflow)?
        .checked_add(from_reserve)
        .ok_or(ErrorCode::MathOverflow)?;

    Ok(())
}

#[derive(PartialEq, Eq, Debug)]
pub(crate) enum BufferMove {
    None,
    /// Lamports to pull from the reserve into the buffer.
    Fill(u64),
    /// Lamports to push from the buffer back to the reserve.
    Drain(u64),
}

/// Band logic: a buffer under its baseline refills all the way to target; a
/// buffer over target drains back to target; anything inside the band stays
/// put.
pub(crate) fn buffer_adjustment(
    buffer_balance: u64,
    nav_lamports: u64,
    target_buffer_bps: u16,
    baseline_buffer_bps: u16,
) -> Result<BufferMove> {
    let target = ((nav_lamports as u128)
        .checked_mul(target_buffer_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128) as u64;
    let baseline = ((nav_lamports as u128)
        .checked_mul(baseline_buffer_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128) as u64;

    if buffer_balance < baseline {
        Ok(BufferMove::Fill(target - buffer_balance))
    } else if buffer_balance > target {
        Ok(BufferMove::Drain(buffer_balance - target))
    } else {
        Ok(BufferMove::None)
    }
}

#[derive(Accounts)]
pub struct RebalanceBuffer<'info> {
    pub authority: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump,
        has_one = authority
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_baseline_fills_to_target() {
        // Target 20%, baseline 10% of NAV 10_000.
        let mv = buffer_adjustment(500, 10_000, 2_000, 1_000).unwrap();
        assert_eq!(mv, BufferMove::Fill(1_500));
    }

    #[test]
    fn over_target_drains_to_target() {
        let mv = buffer_adjustment(3_000, 10_000, 2_000, 1_000).unwrap();
        assert_eq!(mv, BufferMove::Drain(1_000));
    }

    #[test]
    fn inside_band_is_a_no_op() {
        let mv = buffer_adjustment(1_500, 10_000, 2_000, 1_000).unwrap();
        assert_eq!(mv, BufferMove::None);
        // Band edges belong to the band.
        assert_eq!(
            buffer_adjustment(1_000, 10_000, 2_000, 1_000).unwrap(),
            BufferMove::None
        );
        assert_eq!(
            buffer_adjustment(2_000, 10_000, 2_000, 1_000).unwrap(),
            BufferMove::None
        );
    }
}
