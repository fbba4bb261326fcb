use std::fmt;
use std::str::FromStr;

use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use tendermint::account::Id;

use crate::consts::cosmos::*;
use crate::{Error, Result};

/// Kind of the address, deciding its `bech32` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressKind {
    /// Account address.
    Account,
    /// Validator operator address.
    Validator,
    /// Consensus node address.
    Consensus,
}

impl AddressKind {
    /// Get the `bech32` human readable prefix of the kind.
    pub fn prefix(&self) -> &'static str {
        match self {
            AddressKind::Account => BECH32_PREFIX_ACC_ADDR,
            AddressKind::Validator => BECH32_PREFIX_VAL_ADDR,
            AddressKind::Consensus => BECH32_PREFIX_CONS_ADDR,
        }
    }
}

impl FromStr for AddressKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            BECH32_PREFIX_ACC_ADDR => Ok(AddressKind::Account),
            BECH32_PREFIX_VAL_ADDR => Ok(AddressKind::Validator),
            BECH32_PREFIX_CONS_ADDR => Ok(AddressKind::Consensus),
            _ => Err(Error::InvalidAddressPrefix(s.to_owned())),
        }
    }
}

/// Any of the addresses used in Celestia network.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::state::{Address, AddressKind};
///
/// let addr: Address = "celestia1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5wgawu3".parse().unwrap();
/// assert_eq!(addr.kind(), AddressKind::Account);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Address {
    /// Account address.
    AccAddress(AccAddress),
    /// Validator operator address.
    ValAddress(ValAddress),
    /// Consensus node address.
    ConsAddress(ConsAddress),
}

impl Address {
    /// Get the kind of the address.
    pub fn kind(&self) -> AddressKind {
        match self {
            Address::AccAddress(_) => AddressKind::Account,
            Address::ValAddress(_) => AddressKind::Validator,
            Address::ConsAddress(_) => AddressKind::Consensus,
        }
    }

    /// Get the account id behind the address.
    pub fn id(&self) -> Id {
        match self {
            Address::AccAddress(addr) => addr.id(),
            Address::ValAddress(addr) => addr.id(),
            Address::ConsAddress(addr) => addr.id(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_bech32(f, self.kind(), &self.id())
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = parse_bech32(s)?;

        Ok(match kind {
            AddressKind::Account => AccAddress::new(id).into(),
            AddressKind::Validator => ValAddress::new(id).into(),
            AddressKind::Consensus => ConsAddress::new(id).into(),
        })
    }
}

impl TryFrom<String> for Address {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_string()
    }
}

macro_rules! typed_address {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name {
            id: Id,
        }

        impl $name {
            /// Create a new address with the given id.
            pub fn new(id: Id) -> Self {
                $name { id }
            }

            /// Get the account id behind the address.
            pub fn id(&self) -> Id {
                self.id
            }

            /// Get the raw bytes of the address.
            pub fn as_bytes(&self) -> &[u8] {
                self.id.as_bytes()
            }

            /// Get the kind of the address.
            pub fn kind(&self) -> AddressKind {
                $kind
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write_bech32(f, $kind, &self.id)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let (kind, id) = parse_bech32(s)?;

                if kind != $kind {
                    return Err(Error::InvalidAddressPrefix(kind.prefix().to_owned()));
                }

                Ok($name::new(id))
            }
        }

        impl TryFrom<String> for $name {
            type Error = Error;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.to_string()
            }
        }

        impl From<$name> for Address {
            fn from(value: $name) -> Self {
                Address::$name(value)
            }
        }

        impl TryFrom<Address> for $name {
            type Error = Error;

            fn try_from(value: Address) -> Result<Self, Self::Error> {
                match value {
                    Address::$name(addr) => Ok(addr),
                    other => Err(Error::InvalidAddressPrefix(other.kind().prefix().to_owned())),
                }
            }
        }
    };
}

typed_address! {
    /// Address of an account, prefixed with `celestia`.
    AccAddress, AddressKind::Account
}

typed_address! {
    /// Address of a validator operator, prefixed with `celestiavaloper`.
    ValAddress, AddressKind::Validator
}

typed_address! {
    /// Address of a consensus node, prefixed with `celestiavalcons`.
    ConsAddress, AddressKind::Consensus
}

fn write_bech32(f: &mut fmt::Formatter<'_>, kind: AddressKind, id: &Id) -> fmt::Result {
    let hrp = Hrp::parse_unchecked(kind.prefix());
    let encoded = bech32::encode::<Bech32>(hrp, id.as_bytes()).map_err(|_| fmt::Error)?;
    f.write_str(&encoded)
}

fn parse_bech32(s: &str) -> Result<(AddressKind, Id)> {
    let (hrp, data) = bech32::decode(s).map_err(|e| Error::InvalidAddress(e.to_string()))?;
    let kind = hrp.as_str().parse()?;
    let bytes = data[..]
        .try_into()
        .map_err(|_| Error::InvalidAddress(format!("invalid id size: {}", data.len())))?;

    Ok((kind, Id::new(bytes)))
}
