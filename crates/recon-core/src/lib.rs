//! Foundation types for the recon engine: the change-family capability,
//! branded identifiers, the sequenced commit record, and two reference
//! families — integer intentions (context-free) and positional list edits
//! (context-sensitive).

pub mod codec;
pub mod commit;
pub mod count;
pub mod family;
pub mod ids;
pub mod list;

pub use codec::{ChangeCodec, CodecError};
pub use commit::Commit;
pub use count::{apply_delta, CountAnchors, CountChange, CountingFamily, COUNT_CODEC_VERSION};
pub use family::ChangeFamily;
pub use ids::{RefNumber, SeqNumber, SessionId};
pub use list::{apply_list_delta, ListAnchors, ListChange, ListFamily, ListOp, LIST_CODEC_VERSION};
