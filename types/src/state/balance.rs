use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Denomination of the native token.
pub const BOND_DENOM: &str = "utia";

/// An amount of tokens of some denomination, as in `state.Balance` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCoin", into = "RawCoin")]
pub struct Balance {
    denom: String,
    amount: u64,
}

/// Cosmos name of the [`Balance`].
pub type Coin = Balance;

impl Balance {
    /// Create a new balance with the given denomination and amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the denomination doesn't follow the cosmos rules.
    pub fn new(denom: &str, amount: u64) -> Result<Self> {
        validate_denom(denom)?;

        Ok(Balance {
            denom: denom.to_owned(),
            amount,
        })
    }

    /// Create a balance of `utia`.
    pub fn utia(amount: u64) -> Self {
        Balance {
            denom: BOND_DENOM.to_owned(),
            amount,
        }
    }

    /// Denomination of the tokens.
    pub fn denom(&self) -> &str {
        &self.denom
    }

    /// Amount of the tokens.
    pub fn amount(&self) -> u64 {
        self.amount
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// An integer amount of tokens, sent as a decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(#[serde(with = "tendermint_proto::serializers::from_str")] pub u64);

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(value)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCoin {
    denom: String,
    amount: String,
}

impl TryFrom<RawCoin> for Balance {
    type Error = Error;

    fn try_from(value: RawCoin) -> Result<Self, Self::Error> {
        validate_denom(&value.denom)?;

        let amount = value
            .amount
            .parse()
            .map_err(|_| Error::InvalidBalanceAmount(value.amount))?;

        Ok(Balance {
            denom: value.denom,
            amount,
        })
    }
}

impl From<Balance> for RawCoin {
    fn from(value: Balance) -> Self {
        RawCoin {
            denom: value.denom,
            amount: value.amount.to_string(),
        }
    }
}

fn validate_denom(denom: &str) -> Result<()> {
    // Length must be 3-128 characters
    if denom.len() < 3 || denom.len() > 128 {
        return Err(Error::InvalidBalanceDenomination(denom.to_owned()));
    }

    let mut chars = denom.chars();

    // First character must be a letter
    if !matches!(chars.next(), Some('a'..='z' | 'A'..='Z')) {
        return Err(Error::InvalidBalanceDenomination(denom.to_owned()));
    }

    // The rest can be a letter, a number, or a symbol from '/', ':', '.', '_', '-'
    if chars.all(|c| matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '/' | ':' | '.' | '_' | '-')) {
        Ok(())
    } else {
        Err(Error::InvalidBalanceDenomination(denom.to_owned()))
    }
}
