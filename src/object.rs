//! Shared JSON object-model contract for the crate's §6 object surface.
//!
//! `Region`, `RegionSet`, and `RegionIntersectionGraph` each have their own
//! wire struct (`RegionObject`, `RegionSetObject`, `GraphObject`) shaped to
//! match §6. `ToObject`/`FromObject` name the conversion to and from that
//! struct uniformly, independent of whatever concrete serializer a caller
//! eventually hands the object to (`serde_json`, or anything else in the
//! pack that speaks `serde`).

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Convert `self` into its §6 JSON object representation.
pub trait ToObject {
    type Object: Serialize;

    fn to_object(&self) -> Self::Object;
}

/// Reconstruct `Self` from its §6 JSON object representation.
pub trait FromObject: Sized {
    type Object: DeserializeOwned;

    fn from_object(obj: Self::Object) -> Result<Self>;
}
