use serde::{Deserialize, Serialize};

use crate::state::AccAddress;

/// Gas price telling the node to use its own minimal gas price.
pub const DEFAULT_GAS_PRICE: f64 = -1.0;

/// [`TxConfig`] specifies additional options that are be applied to the Tx.
///
/// If no options are provided, then the default ones will be used.
/// Read more about the mechanisms of fees and gas usage in [`submitting data blobs`].
///
/// [`submitting data blobs`]: https://docs.celestia.org/developers/submit-data#fees-and-gas-limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTxConfig", into = "RawTxConfig")]
pub struct TxConfig {
    /// Specifies the address from the keystore that will sign transactions.
    ///
    /// # NOTE
    ///
    /// Only `signer_address` or `key_name` should be passed. `signer_address` is a primary cfg.
    /// This means If both the address and the key are specified, the address field will take priority.
    pub signer_address: Option<AccAddress>,
    /// Specifies the key from the keystore associated with an account that will be used to sign transactions.
    ///
    /// # NOTE
    ///
    /// This account must be available in the Keystore.
    pub key_name: Option<String>,
    /// Calculated amount of gas to be used by transaction.
    ///
    /// `0` or missing `gas` means that the node should calculate it itself.
    pub gas: Option<u64>,
    /// Specifies the account that will pay for the transaction.
    pub fee_granter_address: Option<AccAddress>,
    gas_price: f64,
    is_gas_price_set: bool,
}

/// Options of the `blob.Submit` call.
pub type SubmitOptions = TxConfig;

impl Default for TxConfig {
    fn default() -> Self {
        TxConfig {
            signer_address: None,
            key_name: None,
            gas: None,
            fee_granter_address: None,
            gas_price: DEFAULT_GAS_PRICE,
            is_gas_price_set: false,
        }
    }
}

impl TxConfig {
    /// Sets the gas price of the transaction.
    ///
    /// Negative prices are ignored and the node's minimal gas price stays in use.
    pub fn with_gas_price(mut self, gas_price: f64) -> Self {
        if gas_price >= 0.0 {
            self.gas_price = gas_price;
            self.is_gas_price_set = true;
        }
        self
    }

    /// Sets the [`gas`] of the transaction.
    ///
    /// [`gas`]: TxConfig::gas
    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    /// Sets the [`fee_granter_address`] of the transaction.
    ///
    /// [`fee_granter_address`]: TxConfig::fee_granter_address
    pub fn with_fee_granter_address(mut self, fee_granter_address: AccAddress) -> Self {
        self.fee_granter_address = Some(fee_granter_address);
        self
    }

    /// Sets the [`signer_address`] of the transaction.
    ///
    /// [`signer_address`]: TxConfig::signer_address
    pub fn with_signer_address(mut self, signer_address: AccAddress) -> Self {
        self.signer_address = Some(signer_address);
        self
    }

    /// Sets the [`key_name`] of the transaction.
    ///
    /// [`key_name`]: TxConfig::key_name
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Gas price of the transaction, [`DEFAULT_GAS_PRICE`] unless set.
    pub fn gas_price(&self) -> f64 {
        self.gas_price
    }

    /// Whether the gas price was explicitly set.
    pub fn is_gas_price_set(&self) -> bool {
        self.is_gas_price_set
    }
}

#[derive(Serialize, Deserialize)]
struct RawTxConfig {
    #[serde(default = "default_gas_price")]
    gas_price: f64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    is_gas_price_set: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gas: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signer_address: Option<AccAddress>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fee_granter_address: Option<AccAddress>,
}

fn default_gas_price() -> f64 {
    DEFAULT_GAS_PRICE
}

impl From<RawTxConfig> for TxConfig {
    fn from(value: RawTxConfig) -> Self {
        TxConfig {
            signer_address: value.signer_address,
            key_name: value.key_name.filter(|name| !name.is_empty()),
            gas: value.gas.filter(|gas| *gas != 0),
            fee_granter_address: value.fee_granter_address,
            gas_price: value.gas_price,
            is_gas_price_set: value.is_gas_price_set,
        }
    }
}

impl From<TxConfig> for RawTxConfig {
    fn from(value: TxConfig) -> Self {
        RawTxConfig {
            gas_price: value.gas_price,
            is_gas_price_set: value.is_gas_price_set,
            gas: value.gas,
            key_name: value.key_name,
            signer_address: value.signer_address,
            fee_granter_address: value.fee_granter_address,
        }
    }
}
