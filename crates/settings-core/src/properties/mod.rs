//! Properties module containing the `key=value` text codec.

pub mod codec;

pub use codec::{decode_properties, encode_properties, PropertiesError, PropertyMap};
