use anchor_lang::prelude::*;
use anchor_spl::token::{self, Token, TokenAccount, Transfer};

use crate::errors::ErrorCode;
use crate::state::allocation::{Allocation, BPS_DENOMINATOR};
use crate::state::fund::FundState;

/// Splits rewards that have accrued in a fund-owned token account: the
/// configured share goes to the reward destination, the remainder stays with
/// the fund.
pub fn collect_lp_rewards(ctx: Context<CollectLpRewards>) -> Result<()> {
    let rewards = ctx.accounts.reward_vault.amount;
    require!(rewards > 0, ErrorCode::InsufficientFunds);

    let reward_amount = ((rewards as u128)
        .checked_mul(ctx.accounts.allocation.lp_reward_bps as u128)
        .ok_or(ErrorCode::MathOverflow)?
        / BPS_DENOMINATOR as u128) as u64;
    if reward_amount == 0 {
        return Ok(());
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

    let transfer_ctx = CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        Transfer {
            from: ctx.accounts.reward_vault.to_account_info(),
            to: ctx.accounts.reward_destination.to_account_info(),
            authority: ctx.accounts.fund_state.to_account_info(),
        },
        &signer_seeds_set,
    );
    token::transfer(transfer_ctx, reward_amount)?;

    Ok(())
}

#[derive(Accounts)]
pub struct CollectLpRewards<'info> {
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
        constraint = reward_vault.owner == fund_state.key() @ ErrorCode::InvalidHoldingVault
    )]
    pub reward_vault: Account<'info, TokenAccount>,
    #[account(
        mut,
        constraint = reward_destination.key() == allocation.lp_reward_destination
            @ ErrorCode::InvalidReceiver,
        constraint = reward_destination.mint == reward_vault.mint @ ErrorCode::InvalidAccount
    )]
    pub reward_destination: Account<'info, TokenAccount>,
    pub token_program: Program<'info, Token>,
}
