use crate::consts::appconsts;
use crate::nmt::Namespace;
use crate::share::{namespace_padding_shares, Share, ShareBuilder};
use crate::{Blob, Error, Result};

/// Lazily splits blobs into the sparse shares of the data square.
///
/// It also helps to progressively count how many shares the written blobs take up.
///
/// # Example
///
/// ```
/// use celestia_openrpc_types::nmt::Namespace;
/// use celestia_openrpc_types::share::SparseShareSplitter;
/// use celestia_openrpc_types::Blob;
///
/// let namespace = Namespace::new_v0(&[1, 2, 3]).unwrap();
/// let blob = Blob::new(namespace, vec![7; 1000]).unwrap();
///
/// let mut splitter = SparseShareSplitter::new();
/// splitter.write(&blob).unwrap();
/// splitter.write_namespace_padding_shares(1).unwrap();
///
/// assert_eq!(splitter.count(), 4);
/// let shares = splitter.export();
/// assert!(shares[3].is_padding());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SparseShareSplitter {
    shares: Vec<Share>,
}

impl SparseShareSplitter {
    /// Create a new empty splitter.
    pub fn new() -> Self {
        SparseShareSplitter::default()
    }

    /// Split the [`Blob`] into shares.
    ///
    /// # Errors
    ///
    /// This function will return an error if the blob's share version is not supported
    /// or its data doesn't fit into a single sequence.
    pub fn write(&mut self, blob: &Blob) -> Result<()> {
        self.write_data(blob.namespace, blob.share_version, &blob.data)
    }

    /// Split the `data` of the given namespace into shares.
    ///
    /// See [`SparseShareSplitter::write`].
    pub fn write_data(&mut self, namespace: Namespace, share_version: u8, data: &[u8]) -> Result<()> {
        if !appconsts::SUPPORTED_SHARE_VERSIONS.contains(&share_version) {
            return Err(Error::UnsupportedShareVersion(share_version));
        }

        let sequence_len =
            u32::try_from(data.len()).map_err(|_| Error::ShareSequenceLenExceeded(data.len()))?;

        let mut builder = ShareBuilder::new(namespace, share_version, true)?;
        builder.write_sequence_len(sequence_len)?;

        let mut data = data;
        loop {
            data = builder.add_data(data);

            if data.is_empty() {
                self.shares.push(builder.build()?);
                return Ok(());
            }

            self.shares.push(builder.build()?);
            builder = ShareBuilder::new(namespace, share_version, false)?;
        }
    }

    /// Write `count` padding shares with the namespace of the last written share.
    ///
    /// Used to align the next blob to the blob share commitment rules.
    ///
    /// # Errors
    ///
    /// This function will return an error if padding is requested before any share was written.
    pub fn write_namespace_padding_shares(&mut self, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let namespace = self
            .shares
            .last()
            .map(Share::namespace)
            .ok_or(Error::EmptySplitter)?;

        self.shares
            .extend(namespace_padding_shares(namespace, count)?);

        Ok(())
    }

    /// Finalize and return all the shares.
    pub fn export(self) -> Vec<Share> {
        self.shares
    }

    /// Amount of shares written so far.
    pub fn count(&self) -> usize {
        self.shares.len()
    }
}

/// Split the blobs into consecutive shares.
pub fn split_blobs<'a>(blobs: impl IntoIterator<Item = &'a Blob>) -> Result<Vec<Share>> {
    let mut splitter = SparseShareSplitter::new();

    for blob in blobs {
        splitter.write(blob)?;
    }

    Ok(splitter.export())
}
