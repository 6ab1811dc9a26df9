mod attrs;
mod datatype;
mod layout;
mod params;
mod tensor_desc;

pub use attrs::{AttrField, AttrKind, AttrList, AttrSpec, AttrValue};
pub use datatype::DataType;
pub use layout::TensorLayout;
pub use params::PoseNmsParams;
pub use tensor_desc::TensorDesc;

pub(crate) const CROSS_MARK: &str = "❌";
