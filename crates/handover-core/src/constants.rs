//! Fixed values of the handover flow.

/// Country prefix of every derived IBAN.
pub const IBAN_COUNTRY_CODE: &str = "CZ";

/// Length of a Czech IBAN (`CZ` + 2 check digits + 4 bank code + 16 account).
pub const CZ_IBAN_LENGTH: usize = 24;

/// Width the account part is left-padded to inside the BBAN.
pub const ACCOUNT_PAD_WIDTH: usize = 16;

/// Version tag opening every SPD payment payload.
pub const SPD_VERSION_TAG: &str = "SPD*1.0";

/// Field delimiter of the SPD payload.
pub const SPD_DELIMITER: char = '*';

pub const DEFAULT_CURRENCY: &str = "CZK";

/// 24.8 MiB, the aggregate size limit for everything embedded in the protocol.
pub const DEFAULT_PHOTO_BUDGET_BYTES: u64 = 26_004_684;

pub const DEFAULT_PHOTO_DIMENSIONS: [u32; 3] = [800, 600, 400];

pub const DEFAULT_PHOTO_QUALITIES: [u8; 4] = [60, 50, 40, 30];

pub const DEFAULT_QR_SIZE_PX: u32 = 180;

pub const MIN_MANUFACTURE_YEAR: i32 = 1900;

pub const PROTOCOL_FILE_PREFIX: &str = "predavaci_protokol";

pub const SUMMARY_FILE_PREFIX: &str = "souhrn_predani";
