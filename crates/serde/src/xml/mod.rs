//! XML text support.
//!
//! The engine works on [`Element`](crate::Element) trees. This module turns
//! them into text and back:
//!
//! - **Writing** uses a quick-xml [`Writer`](quick_xml::Writer), optionally
//!   indented, with an `<?xml?>` declaration unless disabled in the options.
//! - **Reading** uses roxmltree, which resolves entities and namespaces before
//!   the tree is built.
//!
//! ## Namespace Handling
//!
//! Elements whose namespace is unset inherit the parent's. A fiscal document
//! such as
//!
//! ```xml
//! <CFe xmlns="http://www.fazenda.sp.gov.br/sat">
//!   <infCFe versaoDadosEnt="0.08">..</infCFe>
//! </CFe>
//! ```
//!
//! therefore only declares its namespace on the root.

pub mod de;
pub mod ser;

pub use de::{from_xml_reader, from_xml_slice, from_xml_str};
pub use ser::{to_xml_string, to_xml_vec, to_xml_writer};
