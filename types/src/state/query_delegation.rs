use serde::{Deserialize, Serialize};
use tendermint::Time;
use tendermint_proto::serializers::bytes::base64string;

use crate::state::{AccAddress, Amount, Balance, ValAddress};

/// Status of the delegation between a delegator and a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDelegationResponse {
    /// The delegation with its balance.
    pub delegation_response: DelegationResponse,
}

/// Delegation together with the tokens it's worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationResponse {
    pub delegation: Delegation,
    pub balance: Balance,
}

/// Bond of the delegator's tokens with a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    /// Amount of validator's shares owned by the delegator, as a decimal string.
    pub shares: String,
}

/// Status of the unbonding between a delegator and a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryUnbondingDelegationResponse {
    pub unbond: UnbondingDelegation,
}

/// All the unbonding entries of a delegator with a single validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegation {
    pub delegator_address: AccAddress,
    pub validator_address: ValAddress,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub entries: Vec<UnbondingDelegationEntry>,
}

/// Single unbonding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnbondingDelegationEntry {
    /// Height at which the unbonding took place.
    #[serde(default)]
    pub creation_height: u64,
    /// Time at which the unbonding completes.
    pub completion_time: Time,
    /// Tokens initially scheduled for the unbonding.
    pub initial_balance: Amount,
    /// Tokens to be received at completion.
    pub balance: Amount,
}

/// Redelegations of a delegator, optionally between a pair of validators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRedelegationsResponse {
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub redelegation_responses: Vec<RedelegationResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageResponse>,
}

/// Redelegation together with the balances of its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationResponse {
    pub redelegation: Redelegation,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub entries: Vec<RedelegationEntryResponse>,
}

/// Tokens moved by a delegator from one validator to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redelegation {
    pub delegator_address: AccAddress,
    pub validator_src_address: ValAddress,
    pub validator_dst_address: ValAddress,
    #[serde(default, with = "crate::serializers::null_as_default")]
    pub entries: Vec<RedelegationEntry>,
}

/// Single redelegation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntry {
    #[serde(default)]
    pub creation_height: u64,
    pub completion_time: Time,
    pub initial_balance: Amount,
    /// Amount of destination validator's shares, as a decimal string.
    pub shares_dst: String,
}

/// Redelegation entry with the tokens it's worth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedelegationEntryResponse {
    pub redelegation_entry: RedelegationEntry,
    pub balance: Amount,
}

/// Pagination of the query results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Key to query the next page with, empty if there are no more results.
    #[serde(default, with = "base64string")]
    pub next_key: Vec<u8>,
    /// Total number of results, if requested.
    #[serde(default)]
    pub total: u64,
}
