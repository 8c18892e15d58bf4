//! Currency tables, conversion, distribution, and transfers.

pub mod conversion;
pub mod denomination;
pub mod distribution;
pub mod transfer;

#[cfg(test)]
mod props;

pub use conversion::{base_value, convert_between};
pub use denomination::{DenominationError, DenominationTable};
pub use distribution::{
    CurrencyDistributor, DistributionEvent, DistributionObserver, DistributionOutcome,
    DistributionState, Recipient,
};
pub use transfer::{CurrencyTransfer, TransferError};
