use anchor_lang::prelude::*;

use crate::state::allocation::Allocation;
use crate::state::fund::FundState;

pub fn configure_allocation(
    ctx: Context<ConfigureAllocation>,
    target_buffer_bps: u16,
    baseline_buffer_bps: u16,
    lp_reward_bps: u16,
    lp_reward_destination: Pubkey,
) -> Result<()> {
    Allocation::validate_bands(target_buffer_bps, baseline_buffer_bps, lp_reward_bps)?;

    let allocation = &mut ctx.accounts.allocation;
    allocation.target_buffer_bps = target_buffer_bps;
    allocation.baseline_buffer_bps = baseline_buffer_bps;
    allocation.lp_reward_bps = lp_reward_bps;
    allocation.lp_reward_destination = lp_reward_destination;

    Ok(())
}

#[derive(Accounts)]
pub struct ConfigureAllocation<'info> {
    pub authority: Signer<'info>,
    #[account(
        seeds = [b"fund", fund_state.authority.as_ref(), fund_state.fund_id.to_le_bytes().as_ref()],
        bump = fund_state.bump,
        has_one = authority
    )]
    pub fund_state: Account<'info, FundState>,
    #[account(
        mut,
        seeds = [b"allocation", fund_state.key().as_ref()],
        bump = allocation.bump
    )]
    pub allocation: Account<'info, Allocation>,
}
