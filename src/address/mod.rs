//! Settlement address derivation and validation.
//!
//! Addresses are bech32 strings with the `serv` human-readable part. In the
//! absence of a real chain the [`AddressRegistry`] derives addresses from
//! seeds and remembers them, so that "addresses we recognise" can gate task
//! operations. A production ledger replaces recognition with signature
//! verification behind the settlement gateway.

mod error;
mod registry;
mod value;

pub use error::AddressError;
pub use registry::{AddressPolicy, AddressRegistry, ParseAddressPolicyError, derive_address};
pub use value::{ADDRESS_LENGTH, ADDRESS_PREFIX, Address, is_well_formed};

pub(crate) use value::ADDRESS_PAYLOAD_LEN;
