use crate::consts::appconsts;
use crate::nmt::Namespace;
use crate::share::{Share, ShareBuilder};
use crate::Result;

/// Create a share that acts as padding after a blob.
///
/// Namespace padding shares follow a blob so that the next blob may start at an index
/// that conforms to the blob share commitment rules. The `namespace` should be the one
/// of the blob preceding this padding in the data square.
///
/// The padding share starts a sequence of zero length and carries no data.
pub fn namespace_padding_share(namespace: Namespace) -> Result<Share> {
    let mut builder = ShareBuilder::new(namespace, appconsts::SHARE_VERSION_ZERO, true)?;
    builder.write_sequence_len(0)?;
    builder.build()
}

/// Create `count` namespace padding shares.
///
/// See [`namespace_padding_share`].
pub fn namespace_padding_shares(namespace: Namespace, count: usize) -> Result<Vec<Share>> {
    let share = namespace_padding_share(namespace)?;
    Ok(vec![share; count])
}

/// Create `count` shares padding the end of the reserved namespaces.
pub fn reserved_padding_shares(count: usize) -> Result<Vec<Share>> {
    namespace_padding_shares(Namespace::PRIMARY_RESERVED_PADDING, count)
}

/// Create `count` shares padding the end of the original data square.
pub fn tail_padding_shares(count: usize) -> Result<Vec<Share>> {
    namespace_padding_shares(Namespace::TAIL_PADDING, count)
}
