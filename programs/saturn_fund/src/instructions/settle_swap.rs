use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::TokenAccount;

use crate::errors::ErrorCode;
use crate::state::fund::{FundState, LamportVault};
use crate::state::holding::Holding;

pub fn settle_swap<'info>(
    ctx: Context<'_, '_, 'info, 'info, SettleSwap<'info>>,
) -> Result<()> {
    require!(ctx.accounts.fund_state.is_locked, ErrorCode::FundNotLocked);
    require!(
        ctx.accounts.holding.mint == ctx.accounts.fund_state.output_mint,
        ErrorCode::InvalidHoldingVault
    );

    let expected_vault = get_associated_token_address(
        &ctx.accounts.fund_state.key(),
        &ctx.accounts.holding.mint,
    );
    require!(
        expected_vault == ctx.accounts.output_vault.key(),
        ErrorCode::InvalidHoldingVault
    );
    require!(
        ctx.accounts.output_vault.mint == ctx.accounts.holding.mint,
        ErrorCode::InvalidHoldingVault
    );

    // The reserve must show exactly the borrow leaving, nothing more.
    let reserve_balance = ctx.accounts.reserve_vault.to_account_info().lamports();
    let expected_reserve = ctx
        .accounts
        .fund_state
        .snapshot_reserve
        .checked_sub(ctx.accounts.fund_state.borrow_lamports)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(
        reserve_balance == expected_reserve,
        ErrorCode::InvalidSettleInstruction
    );

    let output_delta = ctx
        .accounts
        .output_vault
        .amount
        .checked_sub(ctx.accounts.fund_state.snapshot_output)
        .ok_or(ErrorCode::MathOverflow)?;
    require!(
        output_delta >= ctx.accounts.fund_state.expected_min_out,
        ErrorCode::SlippageExceeded
    );

    let fund = &mut ctx.accounts.fund_state;
    fund.is_locked = false;
    fund.borrow_lamports = 0;
    fund.expected_min_out = 0;
    fund.snapshot_reserve = 0;
    fund.snapshot_output = 0;
    fund.output_mint = Pubkey::default();

    Ok(())
}

#[derive(Accounts)]
pub struct SettleSwap<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        mut,
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump,
        has_one = authority
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        seeds = [b"reserve", fund_state.key().as_ref()],
        bump = fund_state.reserve_bump
    )]
    pub reserve_vault: Account<'info, LamportVault>,
    #[account(
        seeds = [b"holding", fund_state.key().as_ref(), holding.mint.as_ref()],
        bump = holding.bump,
        constraint = holding.fund == fund_state.key() @ ErrorCode::InvalidHoldingVault
    )]
    pub holding: Account<'info, Holding>,
    pub output_vault: Account<'info, TokenAccount>,
}
