use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::instructions::ID as IX_SYSVAR_ID;
use anchor_lang::solana_program::sysvar::instructions::{
    load_current_index_checked, load_instruction_at_checked,
};
use anchor_lang::Discriminator;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::TokenAccount;

use crate::errors::ErrorCode;
use crate::state::fund::{FundState, LamportVault};
use crate::state::holding::Holding;

/// Lends reserve SOL to the authority for an external swap into one of the
/// basket tokens. The fund locks until a matching `settle_swap` later in the
/// same transaction proves the output vault received at least
/// `min_amount_out`.
pub fn borrow_reserve<'info>(
    ctx: Context<'_, '_, 'info, 'info, BorrowReserve<'info>>,
    amount_in: u64,
    min_amount_out: u64,
) -> Result<()> {
    require!(!ctx.accounts.fund_state.is_locked, ErrorCode::FundLocked);
    require!(amount_in > 0, ErrorCode::MathOverflow);
    require!(min_amount_out > 0, ErrorCode::InvalidMinOut);
    require!(
        ctx.accounts.authority_receive.key() == ctx.accounts.authority.key(),
        ErrorCode::InvalidReceiver
    );
    require!(ctx.accounts.holding.enabled, ErrorCode::InvalidHoldingVault);

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

    let reserve_balance = ctx.accounts.reserve_vault.to_account_info().lamports();
    require!(reserve_balance >= amount_in, ErrorCode::InsufficientLiquidity);

    // The settle instruction must already sit later in this transaction and
    // target the same fund accounts, or the borrow never leaves the vault.
    let ix_sysvar = &ctx.accounts.instructions_sysvar;
    require!(
        ix_sysvar.key() == IX_SYSVAR_ID,
        ErrorCode::InvalidSettleInstruction
    );
    let current_idx = load_current_index_checked(ix_sysvar)? as usize;
    let expected_settle_accounts = [
        ctx.accounts.authority.key(),
        ctx.accounts.fund_state.key(),
        ctx.accounts.reserve_vault.key(),
        ctx.accounts.holding.key(),
        ctx.accounts.output_vault.key(),
    ];
    let mut found = false;
    let mut scan_idx = current_idx + 1;
    while let Ok(ix) = load_instruction_at_checked(scan_idx, ix_sysvar) {
        if ix.program_id == crate::ID
            && ix.data.starts_with(crate::instruction::SettleSwap::DISCRIMINATOR)
        {
            if ix.accounts.len() >= expected_settle_accounts.len()
                && expected_settle_accounts
                    .iter()
                    .enumerate()
                    .all(|(idx, key)| ix.accounts[idx].pubkey == *key)
            {
                found = true;
            } else {
                return err!(ErrorCode::InvalidSettleInstruction);
            }
            break;
        }
        scan_idx += 1;
    }
    require!(found, ErrorCode::MissingSettleInstruction);

    let fund = &mut ctx.accounts.fund_state;
    fund.is_locked = true;
    fund.borrow_lamports = amount_in;
    fund.expected_min_out = min_amount_out;
    fund.snapshot_reserve = reserve_balance;
    fund.snapshot_output = ctx.accounts.output_vault.amount;
    fund.output_mint = ctx.accounts.holding.mint;

    {
        let reserve_info = ctx.accounts.reserve_vault.to_account_info();
        let receive_info = ctx.accounts.authority_receive.to_account_info();
        let mut reserve_lamports = reserve_info.try_borrow_mut_lamports()?;
        let mut receive_lamports = receive_info.try_borrow_mut_lamports()?;

        **reserve_lamports = (**reserve_lamports)
            .checked_sub(amount_in)
            .ok_or(ErrorCode::InsufficientLiquidity)?;
        **receive_lamports = (**receive_lamports)
            .checked_add(amount_in)
            .ok_or(ErrorCode::MathOverflow)?;
    }

    Ok(())
}

#[derive(Accounts)]
pub struct BorrowReserve<'info> {
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
        mut,
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
    #[account(mut)]
    pub output_vault: Account<'info, TokenAccount>,
    #[account(mut)]
    pub authority_receive: SystemAccount<'info>,
    /// CHECK: instruction sysvar, validated against its fixed address.
    pub instructions_sysvar: AccountInfo<'info>,
    pub system_program: Program<'info, System>,
}
