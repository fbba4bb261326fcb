//! Types related to EDS.

use std::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::consts::appconsts::{AppVersion, SHARE_SIZE};
use crate::consts::data_availability_header::{
    max_extended_square_width, MIN_EXTENDED_SQUARE_WIDTH,
};
use crate::error::{bail_validation, validation_error};
use crate::nmt::{Namespace, Nmt, NmtExt};
use crate::share::{NamespacedRow, NamespacedShares};
use crate::{DataAvailabilityHeader, Error, Result, Share};

/// Represents either column or row of the [`ExtendedDataSquare`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum AxisType {
    /// A row of the data square.
    Row = 0,
    /// A column of the data square.
    Col,
}

impl Display for AxisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisType::Row => write!(f, "Row"),
            AxisType::Col => write!(f, "Column"),
        }
    }
}

/// The data matrix in Celestia blocks extended with parity data, as returned
/// by `share.GetEDS`.
///
/// The upper-left quadrant is the original data square, the other three
/// quadrants are the parity data encoded with the Reed-Solomon `codec`.
///
/// ```text
///  ---------------------------
/// |             |             |
/// |      1      |      2      |
/// |   original  |  row parity |
/// |             |             |
///  -------------+-------------
/// |             |             |
/// |      3      |      4      |
/// | col parity  |   parity    |
/// |             |             |
///  ---------------------------
/// ```
///
/// The parity data is carried as is, only the structure of the square and
/// the namespaces of the original data are checked.
///
/// # Example
///
/// This example rebuilds the merkle trees for each row of the EDS and compares
/// them with the root hashes stored in data availability header.
///
/// ```no_run
/// # use celestia_openrpc_types::{ExtendedDataSquare, ExtendedHeader};
/// # fn get_header(_: usize) -> ExtendedHeader {
/// #     unimplemented!()
/// # }
/// # fn get_eds(_: usize) -> ExtendedDataSquare {
/// #     unimplemented!()
/// # }
/// let header = get_header(15);
/// let eds = get_eds(15);
///
/// for row in 0..eds.square_width() {
///     let root = eds.row_nmt(row).unwrap().root();
///     assert_eq!(Some(root), header.dah.row_root(row.into()));
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExtendedDataSquare", into = "RawExtendedDataSquare")]
pub struct ExtendedDataSquare {
    data_square: Vec<Vec<u8>>,
    codec: String,
    square_width: u16,
}

impl ExtendedDataSquare {
    /// Create a new EDS out of the provided shares.
    ///
    /// Shares should be provided in a row-major order, i.e. first shares of the first row,
    /// then of the second row and so on.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    ///  - shares are of sizes different than [`SHARE_SIZE`]
    ///  - amount of shares doesn't allow for forming a square
    ///  - width of the square is smaller than [`MIN_EXTENDED_SQUARE_WIDTH`]
    ///  - width of the square is bigger than [`max_extended_square_width`]
    ///  - width of the square isn't a power of 2
    ///  - original shares have invalid namespaces or those aren't in non-decreasing
    ///    order row and column wise
    pub fn new(shares: Vec<Vec<u8>>, codec: String, app_version: AppVersion) -> Result<Self> {
        const MIN_SHARES: usize = MIN_EXTENDED_SQUARE_WIDTH * MIN_EXTENDED_SQUARE_WIDTH;

        let max_extended_square_width = max_extended_square_width(app_version);
        let max_shares = max_extended_square_width * max_extended_square_width;

        if shares.len() < MIN_SHARES {
            bail_validation!(
                "shares len ({}) < MIN_SHARES ({})",
                shares.len(),
                MIN_SHARES
            );
        }
        if shares.len() > max_shares {
            bail_validation!(
                "shares len ({}) > max shares ({})",
                shares.len(),
                max_shares
            );
        }

        let square_width = f64::sqrt(shares.len() as f64) as usize;

        if square_width * square_width != shares.len() {
            return Err(Error::EdsInvalidDimentions(format!(
                "{} shares don't form a square",
                shares.len()
            )));
        }

        // must be a power of 2
        if !square_width.is_power_of_two() {
            return Err(Error::EdsInvalidDimentions(format!(
                "width {square_width} is not a power of 2"
            )));
        }

        let square_width = u16::try_from(square_width)
            .map_err(|_| Error::EdsInvalidDimentions(format!("width {square_width} too big")))?;

        if let Some(share) = shares.iter().find(|share| share.len() != SHARE_SIZE) {
            return Err(Error::InvalidShareSize(share.len()));
        }

        let eds = ExtendedDataSquare {
            data_square: shares,
            codec,
            square_width,
        };

        let ods_width = eds.ods_width();

        for axis in [AxisType::Row, AxisType::Col] {
            for index in 0..ods_width {
                let mut prev_ns = None;

                for i in 0..ods_width {
                    let share = match axis {
                        AxisType::Row => eds.ods_share(index, i)?,
                        AxisType::Col => eds.ods_share(i, index)?,
                    };

                    if prev_ns.is_some_and(|prev_ns| share.namespace() < prev_ns) {
                        bail_validation!(
                            "Shares of {axis} {index} are not sorted by their namespace"
                        );
                    }

                    prev_ns = Some(share.namespace());
                }
            }
        }

        Ok(eds)
    }

    /// The codec used to encode parity shares.
    pub fn codec(&self) -> &str {
        self.codec.as_str()
    }

    /// Get EDS square length.
    pub fn square_width(&self) -> u16 {
        self.square_width
    }

    /// Width of the original data square.
    pub fn ods_width(&self) -> u16 {
        self.square_width / 2
    }

    /// Returns the raw bytes of the share with the provided coordinates.
    pub fn share(&self, row: u16, column: u16) -> Result<&[u8]> {
        let index = flatten_index(row, column, self.square_width);

        if row >= self.square_width || column >= self.square_width {
            return Err(Error::IndexOutOfRange(index, self.data_square.len()));
        }

        Ok(&self.data_square[index])
    }

    /// Returns the share of the original data square with the provided coordinates.
    pub fn ods_share(&self, row: u16, column: u16) -> Result<Share> {
        if !is_ods_square(row, column, self.square_width) {
            return Err(validation_error!(
                "({row}, {column}) is outside of the original data square"
            )
            .into());
        }

        Share::from_raw(self.share(row, column)?)
    }

    /// Returns all the shares of the original data square in a row-major order.
    pub fn ods_shares(&self) -> Result<Vec<Share>> {
        let ods_width = self.ods_width();
        let mut shares = Vec::with_capacity(usize::from(ods_width) * usize::from(ods_width));

        for row in 0..ods_width {
            for col in 0..ods_width {
                shares.push(self.ods_share(row, col)?);
            }
        }

        Ok(shares)
    }

    /// Returns the shares of a row.
    pub fn row(&self, index: u16) -> Result<Vec<&[u8]>> {
        self.axis(AxisType::Row, index)
    }

    /// Returns the [`Nmt`] of a row.
    pub fn row_nmt(&self, index: u16) -> Result<Nmt> {
        self.axis_nmt(AxisType::Row, index)
    }

    /// Returns the shares of a column.
    pub fn column(&self, index: u16) -> Result<Vec<&[u8]>> {
        self.axis(AxisType::Col, index)
    }

    /// Returns the [`Nmt`] of a column.
    pub fn column_nmt(&self, index: u16) -> Result<Nmt> {
        self.axis_nmt(AxisType::Col, index)
    }

    /// Returns the shares of column or row.
    pub fn axis(&self, axis: AxisType, index: u16) -> Result<Vec<&[u8]>> {
        (0..self.square_width)
            .map(|i| {
                let (row, col) = coordinates(axis, index, i);
                self.share(row, col)
            })
            .collect()
    }

    /// Returns the [`Nmt`] of column or row.
    ///
    /// Leaves outside of the original data square belong to the
    /// [`Namespace::PARITY_SHARE`].
    pub fn axis_nmt(&self, axis: AxisType, index: u16) -> Result<Nmt> {
        let mut tree = <Nmt as NmtExt>::default();

        for i in 0..self.square_width {
            let (row, col) = coordinates(axis, index, i);
            let share = self.share(row, col)?;

            let namespace = if is_ods_square(row, col, self.square_width) {
                Share::from_raw(share)?.namespace()
            } else {
                Namespace::PARITY_SHARE
            };

            tree.push_leaf(share, *namespace)
                .map_err(|e| validation_error!("failed to push a leaf: {e}"))?;
        }

        Ok(tree)
    }

    /// Compute the [`DataAvailabilityHeader`] of this square.
    pub fn dah(&self, app_version: AppVersion) -> Result<DataAvailabilityHeader> {
        let mut row_roots = Vec::with_capacity(self.square_width.into());
        let mut column_roots = Vec::with_capacity(self.square_width.into());

        for index in 0..self.square_width {
            row_roots.push(self.row_nmt(index)?.root());
            column_roots.push(self.column_nmt(index)?.root());
        }

        let dah = DataAvailabilityHeader::new_unchecked(row_roots, column_roots);
        crate::ValidateBasicWithAppVersion::validate_basic(&dah, app_version)?;

        Ok(dah)
    }

    /// Return all the shares that belong to the provided namespace in the EDS.
    ///
    /// Results are returned as a list of rows of shares with the inclusion proof,
    /// one for each row root of the `dah` which may contain the namespace.
    pub fn namespaced_shares(
        &self,
        namespace: Namespace,
        dah: &DataAvailabilityHeader,
    ) -> Result<NamespacedShares> {
        let mut rows = Vec::new();

        for (row, row_root) in (0..self.ods_width()).zip(dah.row_roots()) {
            if namespace.is_outside_range(row_root, row_root) {
                continue;
            }

            let mut shares = Vec::new();

            for col in 0..self.ods_width() {
                let share = self.ods_share(row, col)?;

                // Shares in each row of EDS are sorted by namespace, so we
                // can stop search the row if we reach to a bigger namespace.
                match share.namespace().cmp(&namespace) {
                    Ordering::Less => {}
                    Ordering::Equal => shares.push(share),
                    Ordering::Greater => break,
                }
            }

            let proof = self.row_nmt(row)?.get_namespace_proof(*namespace);

            rows.push(NamespacedRow {
                shares,
                proof: proof.into(),
            });
        }

        Ok(NamespacedShares { rows })
    }
}

#[derive(Serialize, Deserialize)]
struct RawExtendedDataSquare {
    #[serde(with = "tendermint_proto::serializers::bytes::vec_base64string")]
    data_square: Vec<Vec<u8>>,
    codec: String,
}

impl TryFrom<RawExtendedDataSquare> for ExtendedDataSquare {
    type Error = Error;

    fn try_from(value: RawExtendedDataSquare) -> Result<Self, Self::Error> {
        // the widest square is allowed, the header of the block is what bounds it
        ExtendedDataSquare::new(value.data_square, value.codec, AppVersion::latest())
    }
}

impl From<ExtendedDataSquare> for RawExtendedDataSquare {
    fn from(eds: ExtendedDataSquare) -> RawExtendedDataSquare {
        RawExtendedDataSquare {
            data_square: eds.data_square,
            codec: eds.codec,
        }
    }
}

/// Returns true if and only if the provided coordinates belongs to Original Data Square
/// (i.e. first quadrant of Extended Data Square).
pub(crate) fn is_ods_square(row: u16, column: u16, square_width: u16) -> bool {
    let ods_width = square_width / 2;
    row < ods_width && column < ods_width
}

fn flatten_index(row: u16, col: u16, square_width: u16) -> usize {
    usize::from(row) * usize::from(square_width) + usize::from(col)
}

fn coordinates(axis: AxisType, index: u16, i: u16) -> (u16, u16) {
    match axis {
        AxisType::Row => (index, i),
        AxisType::Col => (i, index),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::tail_padding_shares;
    use crate::test_utils::{random_bytes, random_namespace};
    use crate::Blob;

    // original square of 4x4, parity filled with random bytes
    fn eds_with_blob(blob: &Blob) -> ExtendedDataSquare {
        let ods_width = 4;
        let mut ods: Vec<_> = blob.to_shares().unwrap();
        ods.extend(tail_padding_shares(ods_width * ods_width - ods.len()).unwrap());

        let mut shares = Vec::new();
        for row in ods.chunks(ods_width) {
            shares.extend(row.iter().map(|share| share.to_vec()));
            shares.extend((0..ods_width).map(|_| random_bytes(SHARE_SIZE)));
        }
        shares.extend((0..ods_width * ods_width * 2).map(|_| random_bytes(SHARE_SIZE)));

        ExtendedDataSquare::new(shares, "Leopard".to_string(), AppVersion::latest()).unwrap()
    }

    #[test]
    fn axis_type_serialization() {
        assert_eq!(serde_json::to_string(&AxisType::Row).unwrap(), r#""Row""#);
        assert_eq!(AxisType::Col.to_string(), "Column");
    }

    #[test]
    fn square_shape() {
        let blob = Blob::new(random_namespace(), random_bytes(2000)).unwrap();
        let eds = eds_with_blob(&blob);

        assert_eq!(eds.square_width(), 8);
        assert_eq!(eds.ods_width(), 4);
        assert_eq!(eds.codec(), "Leopard");
        assert_eq!(eds.row(1).unwrap().len(), 8);
        assert_eq!(eds.column(7).unwrap().len(), 8);
        assert_eq!(eds.row(0).unwrap()[1], eds.column(1).unwrap()[0]);

        eds.share(8, 0).unwrap_err();
        eds.ods_share(0, 4).unwrap_err();

        let ods = eds.ods_shares().unwrap();
        assert_eq!(ods.len(), 16);
        assert_eq!(Blob::reconstruct(&ods, AppVersion::latest()).unwrap(), blob);
    }

    #[test]
    fn namespaced_shares_of_blob() {
        let blob = Blob::new(random_namespace(), random_bytes(2000)).unwrap();
        let eds = eds_with_blob(&blob);
        let dah = eds.dah(AppVersion::latest()).unwrap();

        let namespaced = eds.namespaced_shares(blob.namespace, &dah).unwrap();
        namespaced.verify(blob.namespace, &dah).unwrap();
        assert_eq!(namespaced.shares().count(), blob.shares_len());

        // absence proofs for a namespace that isn't there
        let other = random_namespace();
        let absent = eds.namespaced_shares(other, &dah).unwrap();
        absent.verify(other, &dah).unwrap();
        assert_eq!(absent.shares().count(), 0);
    }

    #[test]
    fn json_roundtrip() {
        let blob = Blob::new(random_namespace(), random_bytes(100)).unwrap();
        let eds = eds_with_blob(&blob);

        let json = serde_json::to_value(&eds).unwrap();
        assert_eq!(json["codec"], "Leopard");
        assert_eq!(json["data_square"].as_array().unwrap().len(), 64);

        let decoded: ExtendedDataSquare = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, eds);
    }

    #[test]
    fn validation() {
        let share = || tail_padding_shares(1).unwrap()[0].to_vec();

        // too small
        ExtendedDataSquare::new(vec![share()], "fake".to_string(), AppVersion::V1).unwrap_err();
        // not a square
        ExtendedDataSquare::new(vec![share(); 6], "fake".to_string(), AppVersion::V1)
            .unwrap_err();
        // not a power of 2
        ExtendedDataSquare::new(vec![share(); 36], "fake".to_string(), AppVersion::V1)
            .unwrap_err();
        // wrong share size
        let mut shares = vec![share(); 16];
        shares[15] = vec![0; 100];
        ExtendedDataSquare::new(shares, "fake".to_string(), AppVersion::V1).unwrap_err();
        // too big for v1
        ExtendedDataSquare::new(vec![share(); 512 * 512], "fake".to_string(), AppVersion::V1)
            .unwrap_err();

        ExtendedDataSquare::new(vec![share(); 16], "fake".to_string(), AppVersion::V1).unwrap();
    }

    #[test]
    fn unsorted_namespaces() {
        let mut first = tail_padding_shares(1).unwrap()[0].to_vec();
        let blob = Blob::new(random_namespace(), random_bytes(10)).unwrap();
        let second = blob.to_shares().unwrap()[0].to_vec();

        // tail padding before a blob in the first row
        let mut shares = vec![first.clone(); 16];
        shares[1] = second.clone();
        ExtendedDataSquare::new(shares, "fake".to_string(), AppVersion::V1).unwrap_err();

        // the same in the parity is fine
        let mut shares = vec![first.clone(); 16];
        shares[3] = second.clone();
        ExtendedDataSquare::new(shares, "fake".to_string(), AppVersion::V1).unwrap();

        // invalid namespace version in the original data
        first[0] = 7;
        let mut shares = vec![second; 16];
        shares[0] = first;
        ExtendedDataSquare::new(shares, "fake".to_string(), AppVersion::V1).unwrap_err();
    }
}
