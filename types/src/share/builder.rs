use bytes::{BufMut, BytesMut};

use crate::consts::appconsts;
use crate::nmt::{Namespace, NS_SIZE};
use crate::share::{is_compact_namespace, reserved_bytes_index, InfoByte, Share};
use crate::{Error, Result};

/// Incremental writer of a single [`Share`].
///
/// A builder starts with the namespace, the [`InfoByte`] and placeholders for the
/// sequence length (first share of a sequence only) and the reserved bytes
/// (compact shares only). Data is then appended with [`ShareBuilder::add_data`]
/// until the share is full, and [`ShareBuilder::build`] zero-pads it to the
/// [`SHARE_SIZE`].
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::nmt::Namespace;
/// use celestia_openrpc_types::share::ShareBuilder;
///
/// let namespace = Namespace::new_v0(&[1, 2, 3]).unwrap();
/// let mut builder = ShareBuilder::new(namespace, 0, true).unwrap();
///
/// builder.write_sequence_len(3).unwrap();
/// let leftover = builder.add_data(b"foo");
/// assert!(leftover.is_empty());
///
/// let share = builder.build().unwrap();
/// assert_eq!(share.sequence_length(), Some(3));
/// assert_eq!(&share.payload()[..3], b"foo");
/// ```
///
/// [`SHARE_SIZE`]: appconsts::SHARE_SIZE
#[derive(Debug, Clone)]
pub struct ShareBuilder {
    namespace: Namespace,
    share_version: u8,
    is_first_share: bool,
    is_compact_share: bool,
    raw: BytesMut,
}

impl ShareBuilder {
    /// Create a new builder and write the share's headers.
    ///
    /// # Errors
    ///
    /// This function will return an error if the `share_version` exceeds
    /// the [`MAX_SHARE_VERSION`].
    ///
    /// [`MAX_SHARE_VERSION`]: appconsts::MAX_SHARE_VERSION
    pub fn new(namespace: Namespace, share_version: u8, is_first_share: bool) -> Result<Self> {
        let info_byte = InfoByte::new(share_version, is_first_share)?;
        let is_compact_share = is_compact_namespace(&namespace);

        let mut raw = BytesMut::with_capacity(appconsts::SHARE_SIZE);
        raw.put_slice(namespace.as_bytes());
        raw.put_u8(info_byte.as_u8());

        if is_first_share {
            raw.put_bytes(0, appconsts::SEQUENCE_LEN_BYTES);
        }
        if is_compact_share {
            raw.put_bytes(0, appconsts::COMPACT_SHARE_RESERVED_BYTES);
        }

        Ok(ShareBuilder {
            namespace,
            share_version,
            is_first_share,
            is_compact_share,
            raw,
        })
    }

    /// The [`Namespace`] of the share being built.
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// The version of the share being built.
    pub fn share_version(&self) -> u8 {
        self.share_version
    }

    /// Amount of bytes that can still be written to the share.
    pub fn available_bytes(&self) -> usize {
        appconsts::SHARE_SIZE - self.raw.len()
    }

    /// Returns true if no data was written after the headers.
    pub fn is_empty_share(&self) -> bool {
        let mut headers_len = NS_SIZE + appconsts::SHARE_INFO_BYTES;

        if self.is_compact_share {
            headers_len += appconsts::COMPACT_SHARE_RESERVED_BYTES;
        }
        if self.is_first_share {
            headers_len += appconsts::SEQUENCE_LEN_BYTES;
        }

        self.raw.len() == headers_len
    }

    /// Append as much of the `data` as fits into the share.
    ///
    /// Returns the part of the `data` which didn't fit, empty if all was written.
    pub fn add_data<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        let amount = self.available_bytes().min(data.len());
        let (written, leftover) = data.split_at(amount);

        self.raw.put_slice(written);
        leftover
    }

    /// Pad the share with zeroes up to the [`SHARE_SIZE`].
    ///
    /// Returns the amount of padding bytes written.
    ///
    /// [`SHARE_SIZE`]: appconsts::SHARE_SIZE
    pub fn zero_pad_if_necessary(&mut self) -> usize {
        let missing = self.available_bytes();
        self.raw.put_bytes(0, missing);
        missing
    }

    /// Write the length of the whole sequence into the first share.
    ///
    /// # Errors
    ///
    /// This function will return an error if the share doesn't start a sequence.
    pub fn write_sequence_len(&mut self, sequence_len: u32) -> Result<()> {
        if !self.is_first_share {
            return Err(Error::NotFirstShare);
        }

        let start = NS_SIZE + appconsts::SHARE_INFO_BYTES;
        self.raw[start..start + appconsts::SEQUENCE_LEN_BYTES]
            .copy_from_slice(&sequence_len.to_be_bytes());

        Ok(())
    }

    /// Write the index of the next unit of data into the reserved bytes of the compact share.
    ///
    /// This is a no-op if the reserved bytes were already written.
    ///
    /// # Errors
    ///
    /// This function will return an error if the share is not a compact share.
    pub fn maybe_write_reserved_bytes(&mut self) -> Result<()> {
        if !self.is_compact_share {
            return Err(Error::NotCompactShare);
        }

        let start = reserved_bytes_index(self.is_first_share);
        let end = start + appconsts::COMPACT_SHARE_RESERVED_BYTES;

        if parse_reserved_bytes(&self.raw[start..end])? != 0 {
            return Ok(());
        }

        let index = u32::try_from(self.raw.len())
            .map_err(|_| Error::InvalidReservedBytes(u32::MAX))?;
        let reserved = new_reserved_bytes(index)?;
        self.raw[start..end].copy_from_slice(&reserved);

        Ok(())
    }

    /// Flip the sequence start indicator of the [`InfoByte`].
    pub fn flip_sequence_start(&mut self) {
        self.raw[NS_SIZE] ^= 0x01;
    }

    /// Finish the share, padding it with zeroes if needed.
    pub fn build(mut self) -> Result<Share> {
        self.zero_pad_if_necessary();

        if self.raw.len() != appconsts::SHARE_SIZE {
            return Err(Error::InvalidShareSize(self.raw.len()));
        }

        let mut data = [0; appconsts::SHARE_SIZE];
        data.copy_from_slice(&self.raw);

        Ok(Share::from_array_unchecked(data))
    }
}

/// Encode the index of the first unit starting in a compact share.
///
/// # Errors
///
/// This function will return an error if the index doesn't point inside of a share.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::share::{new_reserved_bytes, parse_reserved_bytes};
///
/// let bytes = new_reserved_bytes(38).unwrap();
/// assert_eq!(bytes, [0, 0, 0, 38]);
/// assert_eq!(parse_reserved_bytes(&bytes).unwrap(), 38);
///
/// assert!(new_reserved_bytes(512).is_err());
/// ```
pub fn new_reserved_bytes(byte_index: u32) -> Result<[u8; appconsts::COMPACT_SHARE_RESERVED_BYTES]> {
    if byte_index as usize >= appconsts::SHARE_SIZE {
        return Err(Error::InvalidReservedBytes(byte_index));
    }

    Ok(byte_index.to_be_bytes())
}

/// Decode the index of the first unit starting in a compact share.
///
/// # Errors
///
/// This function will return an error if there are not exactly
/// [`COMPACT_SHARE_RESERVED_BYTES`] or if the decoded index doesn't
/// point inside of a share.
///
/// [`COMPACT_SHARE_RESERVED_BYTES`]: appconsts::COMPACT_SHARE_RESERVED_BYTES
pub fn parse_reserved_bytes(reserved_bytes: &[u8]) -> Result<u32> {
    let bytes: [u8; appconsts::COMPACT_SHARE_RESERVED_BYTES] = reserved_bytes
        .try_into()
        .map_err(|_| Error::InvalidShareSize(reserved_bytes.len()))?;
    let byte_index = u32::from_be_bytes(bytes);

    if byte_index as usize >= appconsts::SHARE_SIZE {
        return Err(Error::InvalidReservedBytes(byte_index));
    }

    Ok(byte_index)
}
