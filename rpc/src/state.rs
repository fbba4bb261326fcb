use celestia_openrpc_types::state::{
    AccAddress, Address, Amount, Balance, QueryDelegationResponse, QueryRedelegationsResponse,
    QueryUnbondingDelegationResponse, TxResponse, ValAddress,
};
use celestia_openrpc_types::{Blob, TxConfig};
use jsonrpsee::proc_macros::rpc;

#[rpc(client)]
pub trait State {
    /// AccountAddress retrieves the address of the node's account/signer
    #[method(name = "state.AccountAddress")]
    async fn state_account_address(&self) -> Result<Address, Error>;

    /// Balance retrieves the Celestia coin balance for the node's account/signer and verifies it against the corresponding block's AppHash.
    #[method(name = "state.Balance")]
    async fn state_balance(&self) -> Result<Balance, Error>;

    /// BalanceForAddress retrieves the Celestia coin balance for the given address and verifies the returned balance against the corresponding block's AppHash.
    ///
    /// # NOTE
    ///
    /// The balance returned is the balance reported by the block right before the node's current head (head-1). This is due to the fact that for block N, the block's `AppHash` is the result of applying the previous block's transaction list.
    #[method(name = "state.BalanceForAddress")]
    async fn state_balance_for_address(&self, addr: &Address) -> Result<Balance, Error>;

    /// BeginRedelegate sends a user's delegated tokens to a new validator for redelegation.
    #[method(name = "state.BeginRedelegate")]
    async fn state_begin_redelegate(
        &self,
        src: &ValAddress,
        dest: &ValAddress,
        amount: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// CancelUnbondingDelegation cancels a user's pending undelegation from a validator.
    #[method(name = "state.CancelUnbondingDelegation")]
    async fn state_cancel_unbonding_delegation(
        &self,
        addr: &ValAddress,
        amount: Amount,
        height: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// Delegate sends a user's liquid tokens to a validator for delegation.
    #[method(name = "state.Delegate")]
    async fn state_delegate(
        &self,
        addr: &ValAddress,
        amount: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// GrantFee grants the given amount of fee to the given grantee.
    #[method(name = "state.GrantFee")]
    async fn state_grant_fee(
        &self,
        grantee: &AccAddress,
        amount: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// QueryDelegation retrieves the delegation information between a delegator and a validator.
    #[method(name = "state.QueryDelegation")]
    async fn state_query_delegation(
        &self,
        addr: &ValAddress,
    ) -> Result<QueryDelegationResponse, Error>;

    /// QueryRedelegations retrieves the status of the redelegations between a delegator and a validator.
    #[method(name = "state.QueryRedelegations")]
    async fn state_query_redelegations(
        &self,
        src: &ValAddress,
        dest: &ValAddress,
    ) -> Result<QueryRedelegationsResponse, Error>;

    /// QueryUnbonding retrieves the unbonding status between a delegator and a validator.
    #[method(name = "state.QueryUnbonding")]
    async fn state_query_unbonding(
        &self,
        addr: &ValAddress,
    ) -> Result<QueryUnbondingDelegationResponse, Error>;

    /// RevokeGrantFee revokes the granted fee from the given grantee.
    #[method(name = "state.RevokeGrantFee")]
    async fn state_revoke_grant_fee(
        &self,
        grantee: &AccAddress,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// SubmitPayForBlob builds, signs and submits a PayForBlob transaction.
    #[method(name = "state.SubmitPayForBlob")]
    async fn state_submit_pay_for_blob(
        &self,
        blobs: &[Blob],
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// Transfer sends the given amount of coins from default wallet of the node to the given account address.
    #[method(name = "state.Transfer")]
    async fn state_transfer(
        &self,
        to: &AccAddress,
        amount: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;

    /// Undelegate undelegates a user's delegated tokens, unbonding them from the current validator.
    #[method(name = "state.Undelegate")]
    async fn state_undelegate(
        &self,
        addr: &ValAddress,
        amount: Amount,
        config: TxConfig,
    ) -> Result<TxResponse, Error>;
}
