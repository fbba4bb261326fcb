//! Types and interfaces for accessing Celestia's state-relevant information.

mod address;
mod balance;
mod query_delegation;
mod tx_response;

pub use self::address::{AccAddress, Address, AddressKind, ConsAddress, ValAddress};
pub use self::balance::{Amount, Balance, Coin, BOND_DENOM};
pub use self::query_delegation::{
    Delegation, DelegationResponse, PageResponse, QueryDelegationResponse,
    QueryRedelegationsResponse, QueryUnbondingDelegationResponse, Redelegation, RedelegationEntry,
    RedelegationEntryResponse, RedelegationResponse, UnbondingDelegation, UnbondingDelegationEntry,
};
pub use self::tx_response::{AbciMessageLog, Event, EventAttribute, StringEvent, TxResponse};
pub use tendermint::account::Id;
