//! Constants shared by several entity descriptors

use crate::shared::metadata::StatusToggle;

/// Short business codes: 2-5 capital letters followed by 1-3 digits
pub const CODE_PATTERN: &str = r"^[A-Z]{2,5}[0-9]{1,3}$";
pub const CODE_ERROR: &str = "Code must be 2-5 capital letters followed by 1-3 digits";

/// Indian mobile numbers
pub const MOBILE_PATTERN: &str = r"^[6-9][0-9]{9}$";

pub const ACTIVE_TOGGLE: StatusToggle = StatusToggle {
    field: "status",
    on_label: "Active",
    off_label: "Inactive",
    on_action: "Activate",
    off_action: "Deactivate",
};
