//! XML-RPC values and the document codec.

mod value;
pub use value::*;

mod codec;
pub use codec::*;
