use anchor_lang::prelude::*;

#[error_code]
pub enum ErrorCode {
    #[msg("Account is already initialized.")]
    AlreadyInitialized,
    #[msg("Account does not match the expected size or ownership.")]
    InvalidAccount,
    #[msg("Unauthorized access.")]
    Unauthorized,
    #[msg("Insufficient funds in the holding account.")]
    InsufficientFunds,
    #[msg("Slippage tolerance exceeded.")]
    SlippageExceeded,
    #[msg("Allocation percentages are inconsistent.")]
    InvalidAllocation,
    #[msg("Fee bps must be <= 10000.")]
    InvalidFeeBps,
    #[msg("Math overflow.")]
    MathOverflow,
    #[msg("Oracle account is invalid.")]
    InvalidOracle,
    #[msg("Oracle price is stale or unavailable.")]
    StaleOracle,
    #[msg("Oracle confidence too wide.")]
    InvalidOracleConfidence,
    #[msg("Invalid NAV.")]
    InvalidNav,
    #[msg("Operation results in zero shares.")]
    ZeroShares,
    #[msg("Invalid remaining accounts layout.")]
    InvalidRemainingAccounts,
    #[msg("Invalid holding vault.")]
    InvalidHoldingVault,
    #[msg("Holding table is full.")]
    HoldingTableFull,
    #[msg("Holding not found.")]
    HoldingNotFound,
    #[msg("Holding vault must be empty before removal.")]
    HoldingVaultNotEmpty,
    #[msg("Insufficient fund liquidity.")]
    InsufficientLiquidity,
    #[msg("Fund is locked by a pending swap.")]
    FundLocked,
    #[msg("Fund is not locked.")]
    FundNotLocked,
    #[msg("Missing settle instruction.")]
    MissingSettleInstruction,
    #[msg("Invalid settle instruction.")]
    InvalidSettleInstruction,
    #[msg("Invalid receiver.")]
    InvalidReceiver,
    #[msg("min_amount_out must be greater than zero.")]
    InvalidMinOut,
}
