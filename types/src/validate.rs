use crate::consts::appconsts::AppVersion;
use crate::ValidationError;

/// Structural validation of the received data, without any cryptographic checks.
pub trait ValidateBasic {
    /// Perform the validation.
    fn validate_basic(&self) -> Result<(), ValidationError>;
}

/// Same as [`ValidateBasic`] for the types whose bounds depend on the [`AppVersion`].
pub trait ValidateBasicWithAppVersion {
    /// Perform the validation.
    fn validate_basic(&self, app_version: AppVersion) -> Result<(), ValidationError>;
}
